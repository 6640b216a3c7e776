//! Utility modules

pub mod fallback_storage;
pub mod memory_storage;
pub mod validation;

pub use fallback_storage::*;
pub use memory_storage::*;
pub use validation::*;
