use anyhow::{Context as AnyhowContext, Result};

/// Adapter power preference for the headless device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GpuPower {
    #[default]
    Low,
    High,
}

#[derive(Clone, Debug)]
pub struct AdapterSummary {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

/// Headless wgpu device and queue with no presentation surface.
pub struct GpuContext {
    _instance: wgpu::Instance,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter: AdapterSummary,
    max_texture_dimension: u32,
    rgba8_supported: bool,
}

impl GpuContext {
    pub fn headless(power: GpuPower) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let power_preference = match power {
            GpuPower::Low => wgpu::PowerPreference::LowPower,
            GpuPower::High => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        let adapter_summary = AdapterSummary {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        };
        tracing::debug!(
            name = %adapter_summary.name,
            backend = ?adapter_summary.backend,
            device_type = ?adapter_summary.device_type,
            "selected GPU adapter"
        );

        let required_usages = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        let rgba8_supported = adapter
            .get_texture_format_features(wgpu::TextureFormat::Rgba8Unorm)
            .allowed_usages
            .contains(required_usages);

        let limits = adapter.limits();
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("backdrop device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        Ok(Self {
            _instance: instance,
            device,
            queue,
            adapter: adapter_summary,
            max_texture_dimension: limits.max_texture_dimension_2d,
            rgba8_supported,
        })
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    pub(crate) fn rgba8_supported(&self) -> bool {
        self.rgba8_supported
    }
}
