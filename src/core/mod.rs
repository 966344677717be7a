// Public modules
pub mod cmssw;
pub mod error;
pub mod exec;
pub mod jobs;
pub mod physics;
pub mod shell;
pub mod storage;

// Re-export common types for convenience
pub use error::{Error, Result};
