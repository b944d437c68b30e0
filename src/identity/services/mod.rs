//! Application services for identity resolution and profile updates.

mod caller;
mod profile;

pub use caller::{CallerError, resolve_caller};
pub use profile::{IdentityService, IdentityServiceError, RegisterUserRequest};
