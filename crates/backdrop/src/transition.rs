//! Overlay transition state machine.
//!
//! The controller reacts to three host cadences:
//!
//! ```text
//!   overlay change ──▶ transition() ──▶ blur on/off, fade-in start
//!   render frame   ──▶ tick()       ──▶ blur radius + corner colors
//!   host tick      ──▶ update_audio ──▶ volume duck ──▶ AudioSink
//! ```
//!
//! Opening the first overlay over the scene starts the fade-in. Replacing one
//! overlay with another keeps the running state, so the first overlay of a
//! chain decides whether the rest are blurred. Closing the last overlay stops
//! blur and fade immediately; there is no fade-out.

use std::sync::Arc;

use crate::audio::{AudioSink, VolumeDuck};
use crate::config::{Settings, SharedSettings};
use crate::overlay::Overlay;
use crate::timeline::{fade_progress, fade_radius};
use crate::types::{Argb32, WindowFocus, CORNER_COUNT};

/// Mutable effect state owned by the [`TransitionController`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    pub has_overlay: bool,
    pub blurring: bool,
    pub fading_in: bool,
    /// Only meaningful while `blurring` is set.
    pub blur_radius: f32,
    /// Current corner tints in winding order.
    pub corner_colors: [Argb32; CORNER_COUNT],
    pub volume_multiplier: f32,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            has_overlay: false,
            blurring: false,
            fading_in: false,
            blur_radius: 0.0,
            corner_colors: [Argb32::TRANSPARENT; CORNER_COUNT],
            volume_multiplier: 1.0,
        }
    }
}

/// Which edge a call to [`TransitionController::transition`] took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEdge {
    Opened,
    Replaced,
    Closed,
    Idle,
}

pub struct TransitionController {
    settings: SharedSettings,
    state: TransitionState,
    duck: VolumeDuck,
    scene_present: bool,
}

impl TransitionController {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            state: TransitionState::default(),
            duck: VolumeDuck::default(),
            scene_present: true,
        }
    }

    /// Tells the controller whether the host has a live scene. Overlay
    /// changes while no scene is loaded are ignored entirely.
    pub fn set_scene_present(&mut self, present: bool) {
        self.scene_present = present;
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Blur radius to feed the post chain, if blur is active.
    pub fn active_blur_radius(&self) -> Option<f32> {
        self.state.blurring.then_some(self.state.blur_radius)
    }

    /// Handles a change of the foreground overlay, including to none.
    pub fn transition(&mut self, next: Option<&dyn Overlay>) -> TransitionEdge {
        if !self.scene_present {
            tracing::debug!(
                overlay = next.map(|overlay| overlay.type_tag()),
                "overlay change ignored without a scene"
            );
            return TransitionEdge::Idle;
        }
        let settings = self.settings.snapshot();
        let has_overlay = next.is_some();
        let blocked = next.is_some_and(|overlay| is_blocked(overlay, &settings));

        if blocked && self.state.blurring {
            self.state.blurring = false;
            tracing::debug!("blur stopped for blocked overlay");
        }

        let edge = match (self.state.has_overlay, has_overlay) {
            (false, true) => {
                self.open(blocked, &settings);
                TransitionEdge::Opened
            }
            (_, false) => {
                self.state.blurring = false;
                self.state.fading_in = false;
                if self.state.has_overlay {
                    TransitionEdge::Closed
                } else {
                    TransitionEdge::Idle
                }
            }
            (true, true) => TransitionEdge::Replaced,
        };
        self.state.has_overlay = has_overlay;

        tracing::debug!(
            ?edge,
            blocked,
            overlay = next.map(|overlay| overlay.type_tag()),
            blurring = self.state.blurring,
            fading_in = self.state.fading_in,
            "overlay transition"
        );
        edge
    }

    fn open(&mut self, blocked: bool, settings: &Settings) {
        let animate = settings.fade_duration_ms > 0;
        if !blocked && settings.blur_enabled && !self.state.blurring && settings.blur_radius >= 1 {
            self.state.blurring = true;
            self.state.blur_radius = if animate {
                1.0
            } else {
                settings.blur_radius as f32
            };
        }
        if animate {
            self.state.fading_in = true;
            self.state.corner_colors = [Argb32::TRANSPARENT; CORNER_COUNT];
        } else {
            self.state.fading_in = false;
            self.state.corner_colors = settings.fade_colors;
        }
    }

    /// Advances the fade-in. `elapsed_ms` is measured from the start of the
    /// current fade by the host clock.
    pub fn tick(&mut self, elapsed_ms: i64) {
        if !self.state.fading_in {
            return;
        }
        let settings = self.settings.snapshot();
        let progress = fade_progress(elapsed_ms, settings.fade_duration_ms);
        if self.state.blurring {
            self.state.blur_radius = fade_radius(progress, settings.blur_radius);
        }
        for (current, target) in self
            .state
            .corner_colors
            .iter_mut()
            .zip(settings.fade_colors.iter())
        {
            *current = target.scaled_from_transparent(progress);
        }
        if progress == 1.0 {
            self.state.fading_in = false;
            tracing::debug!(elapsed_ms, "overlay fade-in complete");
        }
    }

    /// Steps the focus-driven volume duck and pushes the resulting output
    /// volume when the multiplier changed.
    pub fn update_audio(&mut self, focus: WindowFocus, audio: &mut dyn AudioSink) {
        let settings: Arc<Settings> = self.settings.snapshot();
        if let Some(multiplier) = self.duck.step(focus, &settings) {
            self.state.volume_multiplier = multiplier;
            let channel = settings.duck_channel;
            audio.set_output_volume(channel, audio.channel_volume(channel) * multiplier);
        }
    }

    /// Drops blur when the effect pipeline turned out to be unavailable.
    pub(crate) fn cancel_blur(&mut self) {
        self.state.blurring = false;
    }
}

fn is_blocked(overlay: &dyn Overlay, settings: &Settings) -> bool {
    if !settings.blur_enabled {
        return false;
    }
    match overlay.should_blur_background() {
        Some(wants_blur) => !wants_blur,
        None => match settings.blacklist.matches(overlay.type_tag()) {
            Some(entry) => {
                tracing::debug!(
                    overlay = overlay.type_tag(),
                    entry,
                    "overlay matched blur blacklist"
                );
                true
            }
            None => false,
        },
    }
}
