//! Task tracking within projects.
//!
//! Tasks are created inside a project by its owner, assigned to a user
//! (the creator unless someone else is named), and optionally nested under
//! a parent task of the same project. Status transitions and detail edits
//! are guarded by a version compare-and-swap, so of two writers that read
//! the same version only one wins. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
