use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use backdrop::{OverlayTypes, Settings, SharedSettings};
use prefs::Prefs;
use tracing_subscriber::EnvFilter;

use crate::overlays::builtin_types;
use crate::paths::resolve_settings_path;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Settings file contents resolved against the built-in overlay registry.
pub struct HostContext {
    pub settings_path: PathBuf,
    pub prefs: Prefs,
    pub types: OverlayTypes,
    pub settings: SharedSettings,
}

impl HostContext {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let settings_path = resolve_settings_path(explicit)?;
        let prefs = Prefs::load_or_default(&settings_path)
            .with_context(|| format!("failed to load {}", settings_path.display()))?;
        let types = builtin_types()?;
        let settings = SharedSettings::new(Settings::from_prefs(&prefs, &types));
        tracing::debug!(
            path = %settings_path.display(),
            exists = settings_path.exists(),
            "resolved settings file"
        );
        Ok(Self {
            settings_path,
            prefs,
            types,
            settings,
        })
    }
}
