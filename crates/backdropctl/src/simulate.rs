use anyhow::Result;
use backdrop::{Corner, TransitionController, TransitionState};
use serde::Serialize;

use crate::cli::SimulateArgs;
use crate::overlays::HostOverlay;
use crate::run::HostContext;

#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub frame: u32,
    pub elapsed_ms: i64,
    pub has_overlay: bool,
    pub blurring: bool,
    pub fading_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_radius: Option<f32>,
    pub corners: CornerReport,
}

/// Corner tints as `#AARRGGBB`.
#[derive(Debug, Serialize)]
pub struct CornerReport {
    pub top_right: String,
    pub top_left: String,
    pub bottom_left: String,
    pub bottom_right: String,
}

impl CornerReport {
    fn from_state(state: &TransitionState) -> Self {
        let color = |corner: Corner| state.corner_colors[corner.index()].to_string();
        Self {
            top_right: color(Corner::TopRight),
            top_left: color(Corner::TopLeft),
            bottom_left: color(Corner::BottomLeft),
            bottom_right: color(Corner::BottomRight),
        }
    }
}

pub fn simulate(context: &HostContext, args: &SimulateArgs) -> Result<Vec<FrameReport>> {
    let overlay = HostOverlay::open(&context.types, &args.overlay)?;
    let mut controller = TransitionController::new(context.settings.clone());
    let edge = controller.transition(Some(&overlay));
    tracing::info!(overlay = %args.overlay, ?edge, "overlay opened");

    let mut reports = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        if args.close_at == Some(frame) {
            let edge = controller.transition(None);
            tracing::info!(frame, ?edge, "overlay closed");
        }
        let elapsed_ms = i64::from(frame) * i64::from(args.frame_ms);
        controller.tick(elapsed_ms);

        let state = controller.state();
        reports.push(FrameReport {
            frame,
            elapsed_ms,
            has_overlay: state.has_overlay,
            blurring: state.blurring,
            fading_in: state.fading_in,
            blur_radius: controller.active_blur_radius(),
            corners: CornerReport::from_state(state),
        });
    }
    Ok(reports)
}

pub fn print_reports(reports: &[FrameReport], json: bool) -> Result<()> {
    for report in reports {
        if json {
            println!("{}", serde_json::to_string(report)?);
        } else {
            let radius = report
                .blur_radius
                .map(|radius| format!("{radius:.2}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "frame={:<4} t={:<6} overlay={:<5} blur={:<5} fade={:<5} radius={:<6} tr={} tl={} bl={} br={}",
                report.frame,
                report.elapsed_ms,
                report.has_overlay,
                report.blurring,
                report.fading_in,
                radius,
                report.corners.top_right,
                report.corners.top_left,
                report.corners.bottom_left,
                report.corners.bottom_right,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::builtin_types;
    use backdrop::{Settings, SharedSettings};
    use prefs::Prefs;
    use std::path::PathBuf;

    fn context(toml: &str) -> HostContext {
        let prefs = Prefs::from_toml_str(toml).unwrap();
        let types = builtin_types().unwrap();
        let settings = SharedSettings::new(Settings::from_prefs(&prefs, &types));
        HostContext {
            settings_path: PathBuf::from("settings.toml"),
            prefs,
            types,
            settings,
        }
    }

    fn args(overlay: &str, frames: u32, close_at: Option<u32>) -> SimulateArgs {
        SimulateArgs {
            overlay: overlay.to_string(),
            frames,
            frame_ms: 50,
            close_at,
            json: false,
        }
    }

    #[test]
    fn fade_completes_on_duration_boundary() {
        let context = context("[background]\nduration = 200\n[blur]\nradius = 8\n");
        let reports = simulate(&context, &args("PauseMenu", 6, None)).unwrap();

        assert!(reports[0].fading_in);
        assert_eq!(reports[0].blur_radius, Some(1.0));
        assert_eq!(reports[0].corners.top_left, "#00000000");
        assert!((reports[2].blur_radius.unwrap() - 4.0).abs() < 1e-5);
        assert!(!reports[4].fading_in);
        assert_eq!(reports[4].blur_radius, Some(8.0));
        assert_eq!(reports[5].corners.bottom_right, "#99000000");
    }

    #[test]
    fn blacklisted_overlay_fades_without_blur() {
        let context = context("[blur]\nblacklist = [\"MenuScreen\"]\n");
        let reports = simulate(&context, &args("PauseMenu", 3, None)).unwrap();
        assert!(reports.iter().all(|report| !report.blurring));
        assert!(reports[0].fading_in);
    }

    #[test]
    fn closing_stops_everything() {
        let context = context("");
        let reports = simulate(&context, &args("InventoryScreen", 4, Some(2))).unwrap();
        assert!(reports[1].blurring);
        assert!(!reports[2].has_overlay);
        assert!(!reports[2].blurring && !reports[2].fading_in);
        assert_eq!(reports[3].blur_radius, None);
    }

    #[test]
    fn unknown_overlay_is_an_error() {
        let context = context("");
        assert!(simulate(&context, &args("Settings", 1, None)).is_err());
    }
}
