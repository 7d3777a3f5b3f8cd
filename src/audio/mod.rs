pub mod chunker;
pub mod probe;
