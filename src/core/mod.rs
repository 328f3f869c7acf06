// Public modules
pub mod archive;
pub mod error;
pub mod pattern;
pub mod rename;
pub mod sanitize;

// Re-export common types for convenience
pub use error::{Error, Result};
