pub mod agent;
pub mod app;
pub mod config;
pub mod context;
pub mod db;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod runtime;
pub mod session;
pub mod settings;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
pub mod vector_store;
