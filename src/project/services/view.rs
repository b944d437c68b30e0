//! Response projection of a project.

use crate::identity::domain::EmailAddress;
use crate::project::domain::{Project, ProjectId};
use crate::timestamp::serde_timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Caller-facing view of a project.
///
/// The owner is reported by email; the internal owner identifier never
/// leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Email of the owning user.
    pub owner_email: EmailAddress,
    /// Creation timestamp.
    #[serde(with = "serde_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    #[serde(with = "serde_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ProjectView {
    /// Projects `project`, reporting `owner_email` as its owner.
    #[must_use]
    pub fn from_project(project: &Project, owner_email: EmailAddress) -> Self {
        Self {
            id: project.id(),
            name: project.name().as_str().to_owned(),
            description: project.description().map(str::to_owned),
            owner_email,
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}
