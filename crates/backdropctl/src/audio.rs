use anyhow::Result;
use backdrop::{AudioChannel, AudioSink, TransitionController, WindowFocus};
use serde::Serialize;

use crate::cli::{AudioArgs, Focus};
use crate::run::HostContext;

/// Mixer stand-in that remembers the last pushed volume.
struct ConsoleMixer {
    channel_volume: f32,
    pushed: Option<(AudioChannel, f32)>,
}

impl AudioSink for ConsoleMixer {
    fn channel_volume(&self, _channel: AudioChannel) -> f32 {
        self.channel_volume
    }

    fn set_output_volume(&mut self, channel: AudioChannel, volume: f32) {
        self.pushed = Some((channel, volume));
    }
}

#[derive(Debug, Serialize)]
pub struct TickReport {
    pub tick: usize,
    pub focus: &'static str,
    pub multiplier: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed: Option<f32>,
}

fn window_focus(focus: Focus) -> (WindowFocus, &'static str) {
    match focus {
        Focus::Active => (WindowFocus::ACTIVE, "active"),
        Focus::Inactive => (WindowFocus::INACTIVE, "inactive"),
        Focus::Minimized => (WindowFocus::MINIMIZED, "minimized"),
    }
}

pub fn step_audio(context: &HostContext, args: &AudioArgs) -> Vec<TickReport> {
    let mut controller = TransitionController::new(context.settings.clone());
    let mut mixer = ConsoleMixer {
        channel_volume: args.channel_volume.clamp(0.0, 1.0),
        pushed: None,
    };

    args.pattern
        .0
        .iter()
        .enumerate()
        .map(|(tick, focus)| {
            let (focus, label) = window_focus(*focus);
            mixer.pushed = None;
            controller.update_audio(focus, &mut mixer);
            TickReport {
                tick,
                focus: label,
                multiplier: controller.state().volume_multiplier,
                pushed: mixer.pushed.map(|(_, volume)| volume),
            }
        })
        .collect()
}

pub fn print_ticks(reports: &[TickReport], json: bool) -> Result<()> {
    for report in reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            let pushed = report
                .pushed
                .map(|volume| format!("{volume:.3}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "tick={:<4} focus={:<9} multiplier={:.3} pushed={}",
                report.tick, report.focus, report.multiplier, pushed
            );
        }
    }
    Ok(())
}
