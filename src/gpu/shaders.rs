//! WGSL sources for the built-in programs.
//!
//! Every program is a full-screen triangle plus one fragment shader, and
//! they all share a single bind group layout:
//!
//! | binding | resource |
//! |---------|----------|
//! | 0 | `ProgramUniforms` |
//! | 1 | field sampler |
//! | 2 | first texture (`Target` / `Velocity`) |
//! | 3 | second texture (`Source`) |
//!
//! Fragment shaders work in GL-style texcoords (origin bottom-left), which
//! is what pointer texcoords use. `to_texture` converts to wgpu's top-left
//! convention when sampling.

use crate::backend::ProgramKind;

/// Uniform block and vertex stage shared by every program.
const COMMON: &str = r#"
struct ProgramUniforms {
    color: vec4<f32>,
    point: vec2<f32>,
    texel_size: vec2<f32>,
    dye_texel_size: vec2<f32>,
    aspect_ratio: f32,
    radius: f32,
    dt: f32,
    dissipation: f32,
    _pad: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: ProgramUniforms;
@group(0) @binding(1)
var field_sampler: sampler;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );

    var out: VertexOutput;
    let pos = positions[vertex_index];
    out.clip_position = vec4<f32>(pos, 0.0, 1.0);
    out.uv = pos * 0.5 + vec2<f32>(0.5, 0.5);
    return out;
}

fn to_texture(uv: vec2<f32>) -> vec2<f32> {
    return vec2<f32>(uv.x, 1.0 - uv.y);
}
"#;

const SPLAT: &str = r#"
@group(0) @binding(2)
var u_target: texture_2d<f32>;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var p = in.uv - uniforms.point;
    p.x = p.x * uniforms.aspect_ratio;
    let splat = exp(-dot(p, p) / uniforms.radius) * uniforms.color.xyz;
    let base = textureSampleLevel(u_target, field_sampler, to_texture(in.uv), 0.0).xyz;
    return vec4<f32>(base + splat, 1.0);
}
"#;

const ADVECTION: &str = r#"
@group(0) @binding(2)
var u_velocity: texture_2d<f32>;
@group(0) @binding(3)
var u_source: texture_2d<f32>;

fn sample_at(tex: texture_2d<f32>, uv: vec2<f32>) -> vec4<f32> {
    return textureSampleLevel(tex, field_sampler, to_texture(uv), 0.0);
}

// Bilinear filtering from four nearest samples.
fn bilerp(tex: texture_2d<f32>, uv: vec2<f32>, tsize: vec2<f32>) -> vec4<f32> {
    let st = uv / tsize - vec2<f32>(0.5, 0.5);
    let iuv = floor(st);
    let fuv = fract(st);

    let a = sample_at(tex, (iuv + vec2<f32>(0.5, 0.5)) * tsize);
    let b = sample_at(tex, (iuv + vec2<f32>(1.5, 0.5)) * tsize);
    let c = sample_at(tex, (iuv + vec2<f32>(0.5, 1.5)) * tsize);
    let d = sample_at(tex, (iuv + vec2<f32>(1.5, 1.5)) * tsize);

    return mix(mix(a, b, fuv.x), mix(c, d, fuv.x), fuv.y);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var result: vec4<f32>;
    if MANUAL_FILTERING {
        let velocity = bilerp(u_velocity, in.uv, uniforms.texel_size).xy;
        let coord = in.uv - uniforms.dt * velocity * uniforms.texel_size;
        result = bilerp(u_source, coord, uniforms.dye_texel_size);
    } else {
        let velocity = sample_at(u_velocity, in.uv).xy;
        let coord = in.uv - uniforms.dt * velocity * uniforms.texel_size;
        result = sample_at(u_source, coord);
    }
    let decay = 1.0 + uniforms.dissipation * uniforms.dt;
    return result / decay;
}
"#;

const COLOR: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return uniforms.color;
}
"#;

/// Full WGSL module for `program`.
///
/// `manual_filtering` switches the advection program to four-tap bilinear
/// sampling for surfaces without hardware filtering.
pub fn program_source(program: ProgramKind, manual_filtering: bool) -> String {
    match program {
        ProgramKind::Splat => format!("{COMMON}{SPLAT}"),
        ProgramKind::Advection => format!(
            "const MANUAL_FILTERING: bool = {manual_filtering};\n{COMMON}{ADVECTION}"
        ),
        ProgramKind::Color => format!("{COMMON}{COLOR}"),
    }
}

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

    // ========== Shader Validation Tests ==========

    #[test]
    fn test_splat_wgsl_valid() {
        let src = program_source(ProgramKind::Splat, false);
        assert!(src.contains("u_target"));
        validate_wgsl(&src).unwrap();
    }

    #[test]
    fn test_advection_wgsl_valid_both_modes() {
        for manual in [false, true] {
            let src = program_source(ProgramKind::Advection, manual);
            assert!(src.contains(&format!("MANUAL_FILTERING: bool = {}", manual)));
            validate_wgsl(&src).unwrap();
        }
    }

    #[test]
    fn test_color_wgsl_valid() {
        validate_wgsl(&program_source(ProgramKind::Color, false)).unwrap();
    }

    #[test]
    fn test_uniform_block_is_64_bytes() {
        let module = naga::front::wgsl::parse_str(&program_source(ProgramKind::Color, false))
            .unwrap();
        let (_, ty) = module
            .types
            .iter()
            .find(|(_, t)| t.name.as_deref() == Some("ProgramUniforms"))
            .unwrap();
        match ty.inner {
            naga::TypeInner::Struct { span, .. } => assert_eq!(span, 64),
            _ => panic!("ProgramUniforms is not a struct"),
        }
    }
}
