//! Taskboard: multi-tenant project and task tracking core.
//!
//! Users own projects, projects contain tasks, and tasks can be assigned,
//! prioritized, nested under parent tasks, and moved through their
//! lifecycle. Every operation takes the caller's identity explicitly and
//! enforces ownership before touching data. Task mutations use optimistic
//! concurrency on a per-task version.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and lookup
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration returning caller-facing views
//!
//! # Modules
//!
//! - [`identity`]: Users and caller resolution
//! - [`project`]: Owned project containers
//! - [`task`]: Tasks, assignment, nesting, and versioned updates
//! - [`feature`]: Immutable feature toggle snapshot
//! - [`paging`]: Page requests, sort specifications, and page envelopes
//! - [`config`]: JSON configuration with environment overrides
//! - [`storage`]: Connection pool and schema bootstrap
//! - [`error`]: Error classification shared by every service

pub mod config;
pub mod error;
pub mod feature;
pub mod identity;
pub mod paging;
pub mod project;
pub mod storage;
pub mod task;
pub mod timestamp;
