pub mod docs;
pub mod model;
