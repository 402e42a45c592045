/// WGSL shader for atlas-textured map cubes and floor/ceiling quads.
pub const MAP_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var atlas: texture_2d<f32>;
@group(1) @binding(1)
var atlas_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) top: f32,
};

struct InstanceInput {
    @location(4) offset: vec3<f32>,
    @location(5) side_uv: vec4<f32>,
    @location(6) top_uv: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_map(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let rect = select(instance.side_uv, instance.top_uv, vertex.top > 0.5);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position + instance.offset, 1.0);
    out.normal = vertex.normal;
    out.uv = rect.xy + vertex.uv * rect.zw;
    return out;
}

@fragment
fn fs_map(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(atlas, atlas_sampler, in.uv);
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let lighting = 0.6 + 0.4 * abs(dot(normalize(in.normal), light_dir));
    return vec4<f32>(color.rgb * lighting, 1.0);
}
"#;

/// WGSL shader for camera-facing billboards. Transparent texels are
/// discarded so billboards can write depth.
pub const BILLBOARD_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var sprite: texture_2d<f32>;
@group(1) @binding(1)
var sprite_sampler: sampler;

struct VertexInput {
    @location(0) corner: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) center: vec3<f32>,
    @location(3) size: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_billboard(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world_pos = instance.center
        + uniforms.camera_right.xyz * vertex.corner.x * instance.size
        + uniforms.camera_up.xyz * vertex.corner.y * instance.size;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_billboard(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(sprite, sprite_sampler, in.uv);
    if color.a < 0.1 {
        discard;
    }
    return color;
}
"#;
