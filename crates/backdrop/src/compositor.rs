//! Per-frame application of the transition state to the host frame.

use crate::transition::TransitionController;
use crate::types::{Argb32, Corner, Rect};

/// Name of the post-processing chain that performs the background blur.
pub const BLUR_CHAIN: &str = "gaussian_blur";
/// Uniform receiving the blur radius in effect-space units.
pub const RADIUS_UNIFORM: &str = "Progress";
/// Single-pass blur radius matching the host's multi-pass blur at equal
/// perceived strength.
pub const AMBIENT_BLUR_SCALE: f32 = 1.8;
/// Background used while no scene is loaded.
pub const NO_SCENE_COLOR: Argb32 = Argb32::from_argb(255, 30, 31, 34);

/// Host-managed sequence of GPU passes applied to the main color target.
pub trait PostChain {
    fn set_uniform(&mut self, name: &str, value: f32);

    /// Runs every pass against the main color target.
    fn process(&mut self);
}

/// The host frame the compositor draws into.
pub trait FrameHost {
    /// False before any scene is loaded (e.g. title screens).
    fn has_scene(&self) -> bool;

    fn post_chain(&mut self, name: &str) -> Option<&mut dyn PostChain>;

    /// Makes the main color target the destination of subsequent draws.
    fn bind_main_target(&mut self);

    fn push_vertex(&mut self, x: f32, y: f32, color: Argb32);

    /// Submits pending vertices.
    fn flush(&mut self);

    /// Host-side ambient blur strength in the host's own multi-pass units.
    fn ambient_blur_amount(&self) -> u32 {
        0
    }
}

#[derive(Clone, Debug)]
pub struct FrameCompositor {
    chain: String,
}

impl Default for FrameCompositor {
    fn default() -> Self {
        Self::new(BLUR_CHAIN)
    }
}

impl FrameCompositor {
    pub fn new(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
        }
    }

    pub fn chain_name(&self) -> &str {
        &self.chain
    }

    /// Draws the overlay background quad covering `rect`, blurring the scene
    /// beneath first when blur is active.
    pub fn draw_overlay_background(
        &self,
        controller: &mut TransitionController,
        host: &mut dyn FrameHost,
        rect: Rect,
    ) {
        if !host.has_scene() {
            for corner in Corner::WINDING {
                let (x, y) = rect.corner(corner);
                host.push_vertex(x, y, NO_SCENE_COLOR);
            }
            host.flush();
            return;
        }

        if let Some(radius) = controller.active_blur_radius() {
            if self.run_chain(host, radius) {
                host.bind_main_target();
            } else {
                tracing::warn!(
                    chain = %self.chain,
                    "post chain unavailable; disabling background blur"
                );
                controller.cancel_blur();
            }
        }

        let colors = controller.state().corner_colors;
        for corner in Corner::WINDING {
            let (x, y) = rect.corner(corner);
            host.push_vertex(x, y, colors[corner.index()]);
        }
        host.flush();
    }

    /// Applies the always-on ambient blur driven by the host's own setting.
    pub fn apply_blur_to_frame(&self, host: &mut dyn FrameHost) {
        let radius = ambient_radius(host.ambient_blur_amount());
        if radius >= 1.0 && !self.run_chain(host, radius) {
            tracing::debug!(chain = %self.chain, "post chain unavailable; ambient blur skipped");
        }
    }

    fn run_chain(&self, host: &mut dyn FrameHost, radius: f32) -> bool {
        match host.post_chain(&self.chain) {
            Some(chain) => {
                chain.set_uniform(RADIUS_UNIFORM, radius);
                chain.process();
                true
            }
            None => false,
        }
    }
}

pub fn ambient_radius(amount: u32) -> f32 {
    amount as f32 * AMBIENT_BLUR_SCALE
}
