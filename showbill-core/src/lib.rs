pub mod common;
pub mod directory;
pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use common::error::{DirectoryError, Result};
pub use domain::*;
pub use storage::traits::Storage;
