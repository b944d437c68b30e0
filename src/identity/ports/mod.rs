//! Port contracts for identity resolution.

pub mod directory;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
