//! Recognized feature flags and the configured snapshot.

use serde::{Deserialize, Serialize};

/// Feature flags recognized by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureFlag {
    /// Soft deletion of records.
    SoftDelete,
    /// Analytics events for task activity.
    Analytics,
    /// User notifications.
    Notifications,
}

impl FeatureFlag {
    /// Every recognized flag.
    pub const ALL: [Self; 3] = [Self::SoftDelete, Self::Analytics, Self::Notifications];

    /// Returns the configuration and lookup name of the flag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SoftDelete => "soft-delete",
            Self::Analytics => "analytics",
            Self::Notifications => "notifications",
        }
    }

    /// Resolves a flag by name; names are case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

/// Immutable snapshot of the configured flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureToggles {
    /// Whether soft deletion is enabled.
    #[serde(rename = "soft-delete")]
    pub soft_delete: bool,
    /// Whether analytics events are emitted.
    pub analytics: bool,
    /// Whether notifications are enabled.
    pub notifications: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            soft_delete: false,
            analytics: false,
            notifications: true,
        }
    }
}

impl FeatureToggles {
    /// Returns the configured value of `flag`.
    #[must_use]
    pub const fn get(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::SoftDelete => self.soft_delete,
            FeatureFlag::Analytics => self.analytics,
            FeatureFlag::Notifications => self.notifications,
        }
    }

    /// Returns a copy with `flag` set to `enabled`.
    #[must_use]
    pub const fn with(mut self, flag: FeatureFlag, enabled: bool) -> Self {
        match flag {
            FeatureFlag::SoftDelete => self.soft_delete = enabled,
            FeatureFlag::Analytics => self.analytics = enabled,
            FeatureFlag::Notifications => self.notifications = enabled,
        }
        self
    }
}
