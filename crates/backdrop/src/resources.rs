//! Lazily created placeholder image shared by the overlay effect path.
//!
//! The cache moves through `Uncreated -> Created -> Released` and back to
//! `Created` on the next acquire. Both [`PlaceholderCache::acquire`] and
//! [`PlaceholderCache::release`] are idempotent. Callers only ever borrow the
//! image through the returned [`Arc`]; the cache is its sole creator.

use std::sync::Arc;

pub const PLACEHOLDER_LABEL: &str = "WhiteTexture";
/// Edge length of the square placeholder image, in texels.
pub const PLACEHOLDER_EXTENT: u32 = 8;
const BYTES_PER_TEXEL: usize = 4;

/// Description of an RGBA8 image with nearest-neighbour sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSpec {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ImageSpec {
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_TEXEL
    }
}

/// The slice of a GPU device the cache needs.
pub trait EffectDevice {
    type Image;

    /// Whether 8-bit RGBA images can be created, uploaded to, and sampled.
    fn supports_rgba8(&self) -> bool;

    /// Creates a nearest-filtered RGBA8 image initialised with `pixels`.
    fn create_image(&self, spec: &ImageSpec, pixels: &[u8]) -> Self::Image;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    Uncreated,
    Created,
    Released,
}

enum Slot<I> {
    Uncreated,
    Created(Arc<I>),
    Released,
}

pub struct PlaceholderCache<I> {
    slot: Slot<I>,
}

impl<I> Default for PlaceholderCache<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> PlaceholderCache<I> {
    pub fn new() -> Self {
        Self {
            slot: Slot::Uncreated,
        }
    }

    pub fn state(&self) -> CacheState {
        match self.slot {
            Slot::Uncreated => CacheState::Uncreated,
            Slot::Created(_) => CacheState::Created,
            Slot::Released => CacheState::Released,
        }
    }

    /// Returns the shared image, creating it on first use or after a release.
    ///
    /// Render thread only.
    ///
    /// # Panics
    ///
    /// Panics when `device` cannot create RGBA8 images. Every supported host
    /// provides that format, so its absence means the environment is unusable.
    pub fn acquire<D>(&mut self, device: &D) -> Arc<I>
    where
        D: EffectDevice<Image = I>,
    {
        if let Slot::Created(image) = &self.slot {
            return Arc::clone(image);
        }
        assert!(
            device.supports_rgba8(),
            "GPU device cannot create RGBA8 images for the {PLACEHOLDER_LABEL} placeholder"
        );
        let spec = ImageSpec {
            label: PLACEHOLDER_LABEL,
            width: PLACEHOLDER_EXTENT,
            height: PLACEHOLDER_EXTENT,
        };
        let pixels = vec![0xFF; spec.byte_len()];
        let image = Arc::new(device.create_image(&spec, &pixels));
        if self.state() == CacheState::Released {
            tracing::debug!(label = PLACEHOLDER_LABEL, "placeholder texture recreated");
        } else {
            tracing::debug!(label = PLACEHOLDER_LABEL, "placeholder texture created");
        }
        self.slot = Slot::Created(Arc::clone(&image));
        image
    }

    /// Drops the cached image. Returns whether one was held.
    ///
    /// Call on device teardown so the image never outlives its device.
    pub fn release(&mut self) -> bool {
        match std::mem::replace(&mut self.slot, Slot::Released) {
            Slot::Created(_) => {
                tracing::debug!(label = PLACEHOLDER_LABEL, "placeholder texture released");
                true
            }
            Slot::Uncreated => {
                self.slot = Slot::Uncreated;
                false
            }
            Slot::Released => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, PartialEq)]
    struct FakeImage {
        serial: usize,
        spec: ImageSpec,
        pixels: Vec<u8>,
    }

    struct FakeDevice {
        rgba8: bool,
        created: RefCell<usize>,
    }

    impl FakeDevice {
        fn new(rgba8: bool) -> Self {
            Self {
                rgba8,
                created: RefCell::new(0),
            }
        }
    }

    impl EffectDevice for FakeDevice {
        type Image = FakeImage;

        fn supports_rgba8(&self) -> bool {
            self.rgba8
        }

        fn create_image(&self, spec: &ImageSpec, pixels: &[u8]) -> FakeImage {
            let mut created = self.created.borrow_mut();
            *created += 1;
            FakeImage {
                serial: *created,
                spec: *spec,
                pixels: pixels.to_vec(),
            }
        }
    }

    #[test]
    fn first_acquire_creates_opaque_white_image() {
        let device = FakeDevice::new(true);
        let mut cache = PlaceholderCache::new();
        assert_eq!(cache.state(), CacheState::Uncreated);

        let image = cache.acquire(&device);
        assert_eq!(cache.state(), CacheState::Created);
        assert_eq!(image.spec.label, "WhiteTexture");
        assert_eq!((image.spec.width, image.spec.height), (8, 8));
        assert_eq!(image.pixels.len(), 8 * 8 * 4);
        assert!(image.pixels.iter().all(|byte| *byte == 0xFF));
    }

    #[test]
    fn acquire_reuses_the_cached_image() {
        let device = FakeDevice::new(true);
        let mut cache = PlaceholderCache::new();
        let first = cache.acquire(&device);
        let second = cache.acquire(&device);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*device.created.borrow(), 1);
    }

    #[test]
    fn release_then_acquire_recreates() {
        let device = FakeDevice::new(true);
        let mut cache = PlaceholderCache::new();
        let first = cache.acquire(&device);

        assert!(cache.release());
        assert_eq!(cache.state(), CacheState::Released);
        assert!(!cache.release(), "second release is a no-op");

        let second = cache.acquire(&device);
        assert_eq!(second.serial, 2);
        assert_eq!(first.serial, 1, "borrowers keep their handle alive");
    }

    #[test]
    fn release_before_creation_stays_uncreated() {
        let mut cache: PlaceholderCache<FakeImage> = PlaceholderCache::new();
        assert!(!cache.release());
        assert_eq!(cache.state(), CacheState::Uncreated);
    }

    #[test]
    #[should_panic(expected = "RGBA8")]
    fn unsupported_format_is_fatal() {
        let device = FakeDevice::new(false);
        let mut cache = PlaceholderCache::new();
        cache.acquire(&device);
    }
}
