use crate::config::Settings;
use crate::types::{AudioChannel, WindowFocus};

/// Volume gained per host tick while recovering focus.
pub const VOLUME_RISE_STEP: f32 = 0.5;
/// Volume lost per host tick while ducking; a full swing takes about a second
/// at 20 ticks per second.
pub const VOLUME_FALL_STEP: f32 = 0.05;

/// Host audio mixer.
pub trait AudioSink {
    /// User-selected volume of `channel`, before any ducking.
    fn channel_volume(&self, channel: AudioChannel) -> f32;

    fn set_output_volume(&mut self, channel: AudioChannel, volume: f32);
}

/// Asymmetric attenuation that follows window focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeDuck {
    multiplier: f32,
}

impl Default for VolumeDuck {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl VolumeDuck {
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn target(focus: WindowFocus, settings: &Settings) -> f32 {
        if focus.active {
            1.0
        } else if focus.minimized && settings.minimized_volume < settings.inactive_volume {
            settings.minimized_volume
        } else {
            settings.inactive_volume
        }
    }

    /// Moves one step toward the focus target without overshooting it.
    /// Returns the new multiplier when it changed.
    pub fn step(&mut self, focus: WindowFocus, settings: &Settings) -> Option<f32> {
        let target = Self::target(focus, settings);
        if self.multiplier == target {
            return None;
        }
        self.multiplier = if self.multiplier < target {
            (self.multiplier + VOLUME_RISE_STEP).min(target)
        } else {
            (self.multiplier - VOLUME_FALL_STEP).max(target)
        };
        Some(self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(inactive: f32, minimized: f32) -> Settings {
        Settings {
            inactive_volume: inactive,
            minimized_volume: minimized,
            ..Settings::default()
        }
    }

    #[test]
    fn target_prefers_quieter_minimized_volume() {
        let quiet_minimized = settings(0.5, 0.2);
        assert_eq!(VolumeDuck::target(WindowFocus::ACTIVE, &quiet_minimized), 1.0);
        assert_eq!(VolumeDuck::target(WindowFocus::INACTIVE, &quiet_minimized), 0.5);
        assert_eq!(VolumeDuck::target(WindowFocus::MINIMIZED, &quiet_minimized), 0.2);

        let louder_minimized = settings(0.3, 0.8);
        assert_eq!(
            VolumeDuck::target(WindowFocus::MINIMIZED, &louder_minimized),
            0.3
        );
    }

    #[test]
    fn falls_slowly_and_rises_fast() {
        let half = settings(0.5, 0.5);
        let mut duck = VolumeDuck::default();

        let first = duck.step(WindowFocus::INACTIVE, &half).unwrap();
        assert!((first - 0.95).abs() < 1e-6);

        let recovered = duck.step(WindowFocus::ACTIVE, &half).unwrap();
        assert_eq!(recovered, 1.0);
        assert_eq!(duck.step(WindowFocus::ACTIVE, &half), None);
    }

    #[test]
    fn never_overshoots_target() {
        let half = settings(0.5, 0.5);
        let mut duck = VolumeDuck::default();
        let mut steps = 0;
        while duck.step(WindowFocus::INACTIVE, &half).is_some() {
            steps += 1;
            assert!(duck.multiplier() >= 0.5);
            assert!(steps <= 20);
        }
        assert_eq!(duck.multiplier(), 0.5);
    }
}
