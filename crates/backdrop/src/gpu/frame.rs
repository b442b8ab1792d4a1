use std::sync::mpsc;

use anyhow::{anyhow, bail, Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::compositor::{FrameHost, PostChain, BLUR_CHAIN};
use crate::resources::PlaceholderCache;
use crate::types::Argb32;

use super::blur::GaussianBlurChain;
use super::context::GpuContext;
use super::quad::{QuadPipeline, QuadVertex};
use super::texture::GpuImage;
use super::TARGET_FORMAT;

const BYTES_PER_PIXEL: u32 = 4;

/// Offscreen stand-in for the host's main frame.
///
/// Owns the main color target and the collaborators the compositor drives
/// against it. Nothing is presented; call [`OffscreenFrame::read_pixels`] to
/// inspect the result.
pub struct OffscreenFrame {
    gpu: GpuContext,
    width: u32,
    height: u32,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    blur: Option<GaussianBlurChain>,
    quad: QuadPipeline,
    placeholder: PlaceholderCache<GpuImage>,
    pending: Vec<QuadVertex>,
    has_scene: bool,
    main_bound: bool,
    ambient_blur: u32,
}

impl OffscreenFrame {
    pub fn new(gpu: GpuContext, width: u32, height: u32) -> Result<Self> {
        let max_dimension = gpu.max_texture_dimension();
        if width == 0 || height == 0 {
            bail!("frame size must be non-zero, got {width}x{height}");
        }
        if width > max_dimension || height > max_dimension {
            bail!("GPU max texture dimension is {max_dimension}, requested frame is {width}x{height}");
        }

        let target = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("main color target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let blur = GaussianBlurChain::new(&gpu.device, &gpu.queue, &target);
        let quad = QuadPipeline::new(&gpu.device);

        Ok(Self {
            gpu,
            width,
            height,
            target,
            target_view,
            blur: Some(blur),
            quad,
            placeholder: PlaceholderCache::new(),
            pending: Vec::new(),
            has_scene: false,
            main_bound: true,
            ambient_blur: 0,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    /// Drops the blur chain, as when the host failed to build its effects.
    pub fn remove_post_chain(&mut self) {
        if self.blur.take().is_some() {
            tracing::debug!(chain = BLUR_CHAIN, "post chain removed");
        }
    }

    pub fn set_ambient_blur(&mut self, amount: u32) {
        self.ambient_blur = amount;
    }

    /// Uploads `scene` as the frame content, stretched to the target size.
    pub fn load_scene(&mut self, scene: &RgbaImage) {
        let pixels = if scene.dimensions() == (self.width, self.height) {
            scene.clone()
        } else {
            imageops::resize(scene, self.width, self.height, FilterType::Triangle)
        };
        self.write_target(pixels.as_raw());
        self.has_scene = true;
    }

    /// Fills the frame with a two-tone checkerboard of `cell`-pixel squares.
    pub fn load_checkerboard(&mut self, cell: u32) {
        let scene = checkerboard(self.width, self.height, cell);
        self.write_target(scene.as_raw());
        self.has_scene = true;
    }

    /// Clears the frame to transparent black and enters no-scene mode.
    pub fn clear_scene(&mut self) {
        let blank = vec![0u8; (self.width * self.height * BYTES_PER_PIXEL) as usize];
        self.write_target(&blank);
        self.has_scene = false;
    }

    fn write_target(&self, pixels: &[u8]) {
        self.gpu.queue.write_texture(
            self.target.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * BYTES_PER_PIXEL),
                rows_per_image: Some(self.height),
            },
            self.target.size(),
        );
    }

    /// Copies the main color target back to host memory.
    pub fn read_pixels(&self) -> Result<RgbaImage> {
        let padded = padded_bytes_per_row(self.width);
        let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame readback"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            self.target.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            self.target.size(),
        );
        self.gpu.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.gpu
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|err| anyhow!("GPU poll failed: {err}"))?;
        receiver
            .recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let pixels = {
            let mapped = slice.get_mapped_range();
            strip_row_padding(&mapped, self.width, self.height, padded)
        };
        buffer.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .context("readback size does not match frame size")
    }

    /// Releases device-bound resources ahead of device loss or shutdown.
    /// Later draws recreate what they need.
    pub fn teardown(&mut self) {
        self.pending.clear();
        self.placeholder.release();
    }
}

impl FrameHost for OffscreenFrame {
    fn has_scene(&self) -> bool {
        self.has_scene
    }

    fn post_chain(&mut self, name: &str) -> Option<&mut dyn PostChain> {
        if name != BLUR_CHAIN {
            return None;
        }
        let chain = self.blur.as_mut()?;
        self.main_bound = false;
        Some(chain as &mut dyn PostChain)
    }

    fn bind_main_target(&mut self) {
        self.main_bound = true;
    }

    fn push_vertex(&mut self, x: f32, y: f32, color: Argb32) {
        let slot = self.pending.len();
        self.pending.push(QuadVertex::corner(slot, x, y, color));
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if !self.main_bound {
            tracing::warn!("flush without the main target bound; rebinding");
            self.main_bound = true;
        }
        let tint = self.placeholder.acquire(&self.gpu);
        self.quad.draw(
            &self.gpu.device,
            &self.gpu.queue,
            &self.target_view,
            (self.width, self.height),
            &self.pending,
            &tint,
        );
        self.pending.clear();
    }

    fn ambient_blur_amount(&self) -> u32 {
        self.ambient_blur
    }
}

/// Row pitch for texture-to-buffer copies, rounded up to the copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn strip_row_padding(data: &[u8], width: u32, height: u32, padded: u32) -> Vec<u8> {
    let row_len = (width * BYTES_PER_PIXEL) as usize;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in data.chunks(padded as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }
    pixels
}

pub fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([0xE0, 0x6C, 0x3A, 0xFF])
        } else {
            image::Rgba([0x2A, 0x5D, 0xB0, 0xFF])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_pitch_rounds_up_to_alignment() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn padding_is_stripped_per_row() {
        let padded = padded_bytes_per_row(2);
        let mut data = vec![0u8; padded as usize * 2];
        data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        data[padded as usize..padded as usize + 8].copy_from_slice(&[9; 8]);

        let pixels = strip_row_padding(&data, 2, 2, padded);
        assert_eq!(pixels.len(), 16);
        assert_eq!(&pixels[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&pixels[8..], &[9; 8]);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let board = checkerboard(8, 8, 4);
        assert_eq!(board.get_pixel(0, 0), board.get_pixel(4, 4));
        assert_ne!(board.get_pixel(0, 0), board.get_pixel(4, 0));
        assert_eq!(board.get_pixel(3, 3), board.get_pixel(0, 0));
    }
}
