//! wgpu-backed host collaborators for the compositor.
//!
//! Everything here runs headless against an offscreen target:
//! - `context` owns the wgpu instance/adapter/device wiring and reports
//!   whether the placeholder pixel format is available.
//! - `texture` creates the nearest-filtered RGBA8 images the placeholder cache
//!   hands out.
//! - `shaders` holds the WGSL sources for the blur and quad passes.
//! - `blur` is the `gaussian_blur` post chain applied in place to the main
//!   color target.
//! - `quad` draws the four-corner overlay background with alpha blending.
//! - `frame` glues the above into an [`OffscreenFrame`] implementing
//!   `FrameHost`, plus readback to an `image::RgbaImage`.

mod blur;
mod context;
mod frame;
mod quad;
mod shaders;
mod texture;

pub use blur::GaussianBlurChain;
pub use context::{AdapterSummary, GpuContext, GpuPower};
pub use frame::{checkerboard, padded_bytes_per_row, OffscreenFrame};
pub use quad::{quad_indices, QuadPipeline, QuadVertex};
pub use texture::GpuImage;

/// Pixel format of the main color target and every pass that writes to it.
pub(crate) const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
