//! Projects: named, owned containers of tasks.
//!
//! A project has exactly one owner, fixed at creation. Projects are only
//! ever listed per owner; there is no public listing. The module follows
//! the same hexagonal layout as [`crate::task`]:
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
