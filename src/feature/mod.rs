//! Process-wide feature toggles.
//!
//! Toggles are read once from configuration into an immutable
//! [`FeatureToggles`] snapshot and shared by reference. Nothing mutates them
//! at runtime.

mod service;
mod toggles;

pub use service::FeatureToggleService;
pub use toggles::{FeatureFlag, FeatureToggles};
