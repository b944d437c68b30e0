//! Read-only lookup over the feature toggle snapshot.

use super::{FeatureFlag, FeatureToggles};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared, read-only view of the configured feature toggles.
#[derive(Debug, Clone, Default)]
pub struct FeatureToggleService {
    toggles: Arc<FeatureToggles>,
}

impl FeatureToggleService {
    /// Creates a service over a loaded snapshot.
    #[must_use]
    pub fn new(toggles: FeatureToggles) -> Self {
        Self {
            toggles: Arc::new(toggles),
        }
    }

    /// Returns whether the named feature is enabled.
    ///
    /// Unrecognized names are reported as disabled.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        FeatureFlag::from_name(name).is_some_and(|flag| self.toggles.get(flag))
    }

    /// Returns whether `flag` is enabled.
    #[must_use]
    pub fn flag(&self, flag: FeatureFlag) -> bool {
        self.toggles.get(flag)
    }

    /// Returns every recognized flag with its value.
    #[must_use]
    pub fn all_features(&self) -> BTreeMap<&'static str, bool> {
        FeatureFlag::ALL
            .into_iter()
            .map(|flag| (flag.name(), self.toggles.get(flag)))
            .collect()
    }

    /// Returns the underlying snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &FeatureToggles {
        &self.toggles
    }
}
