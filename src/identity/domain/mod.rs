//! Domain model for user identities.

mod email;
mod error;
mod ids;
mod user;

pub use email::EmailAddress;
pub use error::{IdentityDomainError, ParseUserRoleError};
pub use ids::UserId;
pub use user::{DisplayName, PersistedUserData, User, UserRole};
