//! Overlay backdrop effects: background blur, four-corner fade, and a
//! focus-driven audio duck, driven by the host's per-frame loop.
//!
//! The host calls into the crate at three cadences:
//!
//! ```text
//!   overlay change ──▶ TransitionController::transition
//!   render frame   ──▶ TransitionController::tick
//!                  ──▶ FrameCompositor::draw_overlay_background ──▶ FrameHost
//!                                          │                          │
//!                                          └─▶ PostChain (blur)       └─▶ quad
//!   host tick      ──▶ TransitionController::update_audio ──▶ AudioSink
//! ```
//!
//! Settings arrive from another thread through [`SharedSettings`]; every
//! entry point works from a single snapshot. The [`gpu`] module provides a
//! headless wgpu implementation of the host collaborators, used by the
//! `backdropctl` binary to render frames offscreen.

pub mod audio;
pub mod compositor;
pub mod config;
pub mod gpu;
pub mod overlay;
pub mod resources;
mod timeline;
pub mod transition;
pub mod types;

pub use audio::{AudioSink, VolumeDuck};
pub use compositor::{FrameCompositor, FrameHost, PostChain};
pub use config::{Settings, SharedSettings};
pub use overlay::{Blacklist, Overlay, OverlayTypes, ResolveError, TypeKind};
pub use resources::{CacheState, EffectDevice, PlaceholderCache};
pub use transition::{TransitionController, TransitionEdge, TransitionState};
pub use types::{Argb32, AudioChannel, Corner, Rect, WindowFocus};
