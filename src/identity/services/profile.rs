//! Service layer for user registration and profile updates.

use super::{CallerError, resolve_caller};
use crate::error::{ClassifiedError, ErrorKind, FieldErrors, field_error};
use crate::identity::{
    domain::{DisplayName, EmailAddress, IdentityDomainError, User, UserRole},
    ports::{UserDirectory, UserDirectoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    email: String,
    display_name: String,
    role: UserRole,
}

impl RegisterUserRequest {
    /// Creates a request for a regular user.
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            role: UserRole::User,
        }
    }

    /// Sets the role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Caller resolution failed.
    #[error(transparent)]
    Caller(#[from] CallerError),
    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

impl ClassifiedError for IdentityServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Directory(UserDirectoryError::DuplicateEmail(_)) => {
                ErrorKind::ValidationFailed
            }
            Self::Caller(err) => err.kind(),
            Self::Directory(UserDirectoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Directory(_) => ErrorKind::Unexpected,
        }
    }

    fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Domain(err) => field_error(err.field(), err),
            Self::Directory(UserDirectoryError::DuplicateEmail(_)) => field_error("email", self),
            Self::Caller(_) | Self::Directory(_) => FieldErrors::new(),
        }
    }
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Identity orchestration service.
#[derive(Clone)]
pub struct IdentityService<D, C>
where
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<D, C> IdentityService<D, C>
where
    D: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(directory: Arc<D>, clock: Arc<C>) -> Self {
        Self { directory, clock }
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Domain`] for invalid input and
    /// [`IdentityServiceError::Directory`] when the email is taken or
    /// persistence fails.
    pub async fn register_user(&self, request: RegisterUserRequest) -> IdentityServiceResult<User> {
        let RegisterUserRequest {
            email,
            display_name,
            role,
        } = request;
        let user = User::new(
            EmailAddress::new(email)?,
            DisplayName::new(display_name)?,
            role,
            &*self.clock,
        );
        self.directory.store(&user).await?;
        info!(user_id = %user.id(), role = user.role().as_str(), "registered user");
        Ok(user)
    }

    /// Changes the display name of the identified user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Caller`] when the identity does not
    /// resolve, [`IdentityServiceError::Domain`] for an invalid name, and
    /// [`IdentityServiceError::Directory`] when persistence fails.
    pub async fn update_display_name(
        &self,
        identity: &str,
        display_name: impl Into<String>,
    ) -> IdentityServiceResult<User> {
        let mut user = resolve_caller(&*self.directory, identity).await?;
        user.rename(DisplayName::new(display_name)?, &*self.clock);
        self.directory.update(&user).await?;
        info!(user_id = %user.id(), "updated display name");
        Ok(user)
    }

    /// Looks up a user by login email.
    ///
    /// Returns `Ok(None)` when no user holds the email.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Domain`] for a malformed email and
    /// [`IdentityServiceError::Directory`] when lookup fails.
    pub async fn find_by_email(&self, email: &str) -> IdentityServiceResult<Option<User>> {
        let address = EmailAddress::new(email)?;
        Ok(self.directory.find_by_email(&address).await?)
    }
}
