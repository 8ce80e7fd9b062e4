//! WGSL sources for the GPU backend.

/// Maximum gradient stops passed to the GPU; extra stops are dropped.
pub const MAX_GRADIENT_STOPS: usize = 8;

/// Lines and discs, one vertex stream in surface-space pixels.
pub const SHAPE_SHADER: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> viewport: Viewport;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) local: vec2<f32>,
    @location(3) shape: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) local: vec2<f32>,
    @location(2) shape: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let ndc = vec2<f32>(
        in.position.x / viewport.size.x * 2.0 - 1.0,
        1.0 - in.position.y / viewport.size.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.color = in.color;
    out.local = in.local;
    out.shape = in.shape;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // shape.y: 0 = line (distance across the spine), 1 = disc (distance to center)
    var dist = abs(in.local.x);
    if in.shape.y > 0.5 {
        dist = length(in.local);
    }
    let coverage = clamp(in.shape.x + 0.5 - dist, 0.0, 1.0);
    if coverage <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * coverage);
}
"#;

/// Fullscreen linear gradient.
pub const GRADIENT_SHADER: &str = r#"
struct Gradient {
    // start.xy, axis.xy
    line: vec4<f32>,
    // x = stop count
    info: vec4<u32>,
    offsets: array<vec4<f32>, 2>,
    colors: array<vec4<f32>, 8>,
};

@group(0) @binding(0) var<uniform> gradient: Gradient;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    var corners = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    return vec4<f32>(corners[vertex_index], 0.0, 1.0);
}

fn stop_offset(i: u32) -> f32 {
    return gradient.offsets[i / 4u][i % 4u];
}

@fragment
fn fs_main(@builtin(position) frag: vec4<f32>) -> @location(0) vec4<f32> {
    let count = max(gradient.info.x, 1u);
    let t = dot(frag.xy - gradient.line.xy, gradient.line.zw);

    if t <= stop_offset(0u) {
        return gradient.colors[0];
    }
    for (var i = 1u; i < count; i++) {
        let hi = stop_offset(i);
        if t <= hi {
            let lo = stop_offset(i - 1u);
            let span = hi - lo;
            var f = 1.0;
            if span > 0.0 {
                f = (t - lo) / span;
            }
            return mix(gradient.colors[i - 1u], gradient.colors[i], f);
        }
    }
    return gradient.colors[count - 1u];
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_shape_shader_is_valid() {
        validate_wgsl(SHAPE_SHADER).expect("shape shader should be valid");
    }

    #[test]
    fn test_gradient_shader_is_valid() {
        validate_wgsl(GRADIENT_SHADER).expect("gradient shader should be valid");
    }

    #[test]
    fn test_gradient_capacity_matches_shader() {
        assert!(GRADIENT_SHADER.contains(&format!("array<vec4<f32>, {MAX_GRADIENT_STOPS}>")));
        assert!(GRADIENT_SHADER.contains(&format!("array<vec4<f32>, {}>", MAX_GRADIENT_STOPS / 4)));
    }
}
