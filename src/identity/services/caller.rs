//! Resolution of the authenticated caller identity.
//!
//! The serving layer authenticates requests and hands the core a login email.
//! Services trust that value but still resolve it against the directory so
//! every ownership check works on a concrete [`User`].

use crate::error::{ClassifiedError, ErrorKind};
use crate::identity::{
    domain::{EmailAddress, User},
    ports::{UserDirectory, UserDirectoryError},
};
use thiserror::Error;

/// Failures resolving the caller identity.
#[derive(Debug, Clone, Error)]
pub enum CallerError {
    /// No usable identity accompanied the request.
    #[error("caller identity is missing")]
    Unauthenticated,

    /// The identity does not belong to any known user.
    #[error("user not found: {0}")]
    UnknownUser(EmailAddress),

    /// The identity is not an email address, so no user can hold it.
    #[error("user not found: {0}")]
    UnresolvableIdentity(String),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl ClassifiedError for CallerError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::UnknownUser(_) | Self::UnresolvableIdentity(_) => ErrorKind::NotFound,
            Self::Directory(_) => ErrorKind::Unexpected,
        }
    }
}

/// Resolves a caller-supplied login identity to a user.
///
/// # Errors
///
/// Returns [`CallerError::Unauthenticated`] for a blank identity,
/// [`CallerError::UnresolvableIdentity`] when it is not an email address,
/// [`CallerError::UnknownUser`] when no user holds the email, and
/// [`CallerError::Directory`] when the lookup fails.
pub async fn resolve_caller<D>(directory: &D, identity: &str) -> Result<User, CallerError>
where
    D: UserDirectory + ?Sized,
{
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        return Err(CallerError::Unauthenticated);
    }
    let email = EmailAddress::new(trimmed)
        .map_err(|_| CallerError::UnresolvableIdentity(trimmed.to_owned()))?;
    directory
        .find_by_email(&email)
        .await?
        .ok_or(CallerError::UnknownUser(email))
}
