pub mod chunker;
pub mod rag;
