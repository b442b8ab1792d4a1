use std::borrow::Cow;

pub(crate) fn compile_blur_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gaussian blur"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(BLUR_WGSL)),
    })
}

pub(crate) fn compile_quad_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("overlay quad"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(QUAD_WGSL)),
    })
}

/// Single-pass Gaussian approximation over a fullscreen triangle.
///
/// The uniform block must match `BlurUniforms` in `blur.rs`. The kernel
/// samples a fixed 17x17 grid whose spacing follows `radius`, so cost is
/// constant while the spread grows with the radius.
const BLUR_WGSL: &str = r"
struct BlurParams {
    texel: vec2<f32>,
    radius: f32,
    padding: f32,
};

@group(0) @binding(0) var<uniform> params: BlurParams;
@group(0) @binding(1) var source_texture: texture_2d<f32>;
@group(0) @binding(2) var source_sampler: sampler;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOut {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -3.0),
        vec2<f32>(3.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let pos = positions[index];
    var result: VertexOut;
    result.position = vec4<f32>(pos, 0.0, 1.0);
    result.uv = vec2<f32>(pos.x * 0.5 + 0.5, 0.5 - pos.y * 0.5);
    return result;
}

const TAPS: i32 = 8;

@fragment
fn fs_main(input: VertexOut) -> @location(0) vec4<f32> {
    let radius = max(params.radius, 1.0);
    let sigma = radius * 0.5;
    let spacing = radius / f32(TAPS);
    var total = vec4<f32>(0.0);
    var weight_sum = 0.0;
    for (var y = -TAPS; y <= TAPS; y = y + 1) {
        for (var x = -TAPS; x <= TAPS; x = x + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * spacing;
            let weight = exp(-dot(offset, offset) / (2.0 * sigma * sigma));
            let uv = input.uv + offset * params.texel;
            total = total + textureSampleLevel(source_texture, source_sampler, uv, 0.0) * weight;
            weight_sum = weight_sum + weight;
        }
    }
    return total / weight_sum;
}
";

/// Pixel-space quad tinted by straight-alpha vertex colors.
///
/// The uniform block must match `ViewportUniform` in `quad.rs`.
const QUAD_WGSL: &str = r"
struct Viewport {
    size: vec2<f32>,
    padding: vec2<f32>,
};

@group(0) @binding(0) var<uniform> viewport: Viewport;
@group(0) @binding(1) var tint_texture: texture_2d<f32>;
@group(0) @binding(2) var tint_sampler: sampler;

struct VertexIn {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexIn) -> VertexOut {
    let ndc = vec2<f32>(
        vertex.position.x / viewport.size.x * 2.0 - 1.0,
        1.0 - vertex.position.y / viewport.size.y * 2.0,
    );
    var result: VertexOut;
    result.position = vec4<f32>(ndc, 0.0, 1.0);
    result.color = vertex.color;
    result.uv = vertex.uv;
    return result;
}

@fragment
fn fs_main(input: VertexOut) -> @location(0) vec4<f32> {
    return textureSample(tint_texture, tint_sampler, input.uv) * input.color;
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::naga;

    fn validate(source: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(source).expect("WGSL parses");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("WGSL validates");
        module
    }

    fn entry_points(module: &naga::Module) -> Vec<&str> {
        module
            .entry_points
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    #[test]
    fn blur_shader_is_valid() {
        let module = validate(BLUR_WGSL);
        assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
    }

    #[test]
    fn quad_shader_is_valid() {
        let module = validate(QUAD_WGSL);
        assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
    }
}
