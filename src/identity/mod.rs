//! User identities referenced by projects and tasks.
//!
//! Credential handling lives outside this crate. What remains here is the
//! directory the core resolves caller emails against, plus the one profile
//! mutation users may perform (renaming themselves). The module follows the
//! same hexagonal layout as [`crate::task`]:
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
