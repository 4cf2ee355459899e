pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logger;
pub mod runner;

// Re-export commonly used types
pub use error::{DiagrunError, Result};
