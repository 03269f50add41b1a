pub mod executor;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod tools;
pub mod web;
