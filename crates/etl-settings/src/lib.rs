//! # etl-settings
//!
//! Configuration for the etl-hub jobs and session logger.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`EtlSettings::default()`]
//! 2. **User file**: `~/.etlhub/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `ETLHUB_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    settings_path,
};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
static SETTINGS: OnceLock<EtlSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.etlhub/settings.json` with env var
/// overrides. If loading fails, the failure is logged and compiled defaults
/// are used.
pub fn get_settings() -> &'static EtlSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            EtlSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: EtlSettings) -> std::result::Result<(), EtlSettings> {
    SETTINGS.set(settings)
}
