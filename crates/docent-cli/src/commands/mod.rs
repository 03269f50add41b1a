pub mod ask;
pub mod chat;
pub mod clear;
pub mod ingest;
pub mod model;
pub mod search;
pub mod status;
