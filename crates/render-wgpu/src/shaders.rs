/// WGSL shader for the ground plane.
pub const GROUND_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    tint_strength: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GroundVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_ground(vertex: GroundVertex) -> GroundOutput {
    var out: GroundOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_ground(in: GroundOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// WGSL shader for instanced, textured icon quads.
pub const ICON_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    tint_strength: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var icon_texture: texture_2d<f32>;
@group(1) @binding(1)
var icon_sampler: sampler;

struct QuadVertex {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct IconOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) tint: vec4<f32>,
};

@vertex
fn vs_icon(vertex: QuadVertex, instance: InstanceInput) -> IconOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var out: IconOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.tint = instance.tint;
    return out;
}

@fragment
fn fs_icon(in: IconOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(icon_texture, icon_sampler, in.uv);
    if texel.a < 0.1 {
        discard;
    }
    let rgb = mix(texel.rgb, texel.rgb * in.tint.rgb, uniforms.tint_strength);
    return vec4<f32>(rgb, texel.a);
}
"#;
