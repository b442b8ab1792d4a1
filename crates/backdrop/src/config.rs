//! Effect settings and their cross-thread publication.
//!
//! The settings subsystem may replace the configuration at any moment from any
//! thread. Readers never see individual fields change: they take an immutable
//! [`Settings`] snapshot once per entry point and work from that.

use std::sync::Arc;

use parking_lot::RwLock;
use prefs::Prefs;

use crate::overlay::{Blacklist, OverlayTypes};
use crate::types::{winding_from_clockwise, Argb32, AudioChannel, CORNER_COUNT};

#[derive(Clone, Debug)]
pub struct Settings {
    pub blur_enabled: bool,
    pub blur_radius: u32,
    pub fade_duration_ms: u32,
    /// Target corner tints in winding order.
    pub fade_colors: [Argb32; CORNER_COUNT],
    pub blacklist: Blacklist,
    pub inactive_volume: f32,
    pub minimized_volume: f32,
    pub duck_channel: AudioChannel,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_prefs(&Prefs::default(), &OverlayTypes::new())
    }
}

impl Settings {
    /// Builds a snapshot from a parsed settings file, resolving the blacklist
    /// against `types`.
    pub fn from_prefs(prefs: &Prefs, types: &OverlayTypes) -> Self {
        Self {
            blur_enabled: prefs.blur.enabled,
            blur_radius: prefs.blur.radius,
            fade_duration_ms: prefs.fade_duration_ms(),
            fade_colors: winding_from_clockwise(prefs.background.colors),
            blacklist: Blacklist::load(&prefs.blur.blacklist, types),
            inactive_volume: prefs.audio.inactive_volume.clamp(0.0, 1.0),
            minimized_volume: prefs.audio.minimized_volume.clamp(0.0, 1.0),
            duck_channel: prefs.audio.channel.into(),
        }
    }

    /// Lowest volume multiplier the duck can settle on.
    pub fn volume_floor(&self) -> f32 {
        self.inactive_volume.min(self.minimized_volume)
    }
}

/// Handle to the live settings, cheap to clone and share across threads.
#[derive(Clone, Debug, Default)]
pub struct SharedSettings {
    current: Arc<RwLock<Arc<Settings>>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    pub fn snapshot(&self) -> Arc<Settings> {
        self.current.read().clone()
    }

    /// Publishes a complete replacement. In-flight snapshots keep the old values.
    pub fn replace(&self, settings: Settings) {
        *self.current.write() = Arc::new(settings);
        tracing::debug!("effect settings replaced");
    }

    /// Applies `update` to a copy of the current settings and publishes it.
    pub fn update(&self, update: impl FnOnce(&mut Settings)) {
        let mut guard = self.current.write();
        let mut next: Settings = (**guard).clone();
        update(&mut next);
        *guard = Arc::new(next);
    }
}
