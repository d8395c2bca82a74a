/// WGSL shader for lit, instance-tinted meshes (enemy cube and player model).
pub const ENTITY_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    sky_top: vec4<f32>,
    sky_bottom: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let ambient = 0.3;
    let diffuse = max(dot(in.world_normal, uniforms.light_dir.xyz), 0.0);
    let lighting = ambient + diffuse * 0.7;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;

/// WGSL shader for the ground plane: the grass texture tiled by the UVs and
/// lit from above.
pub const GROUND_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    sky_top: vec4<f32>,
    sky_bottom: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var t_ground: texture_2d<f32>;
@group(1) @binding(1)
var s_ground: sampler;

struct GroundVertex {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct GroundOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_ground(vertex: GroundVertex) -> GroundOutput {
    var out: GroundOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_ground(in: GroundOutput) -> @location(0) vec4<f32> {
    let base = textureSample(t_ground, s_ground, in.uv).rgb;
    let diffuse = max(uniforms.light_dir.y, 0.0);
    return vec4<f32>(base * (0.4 + 0.6 * diffuse), 1.0);
}
"#;

/// WGSL shader for the sky: a fullscreen triangle with a vertical gradient.
pub const SKY_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_dir: vec4<f32>,
    sky_top: vec4<f32>,
    sky_bottom: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct SkyOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) height: f32,
};

@vertex
fn vs_sky(@builtin(vertex_index) index: u32) -> SkyOutput {
    let x = f32((index << 1u) & 2u) * 2.0 - 1.0;
    let y = f32(index & 2u) * 2.0 - 1.0;
    var out: SkyOutput;
    out.clip_position = vec4<f32>(x, y, 1.0, 1.0);
    out.height = y * 0.5 + 0.5;
    return out;
}

@fragment
fn fs_sky(in: SkyOutput) -> @location(0) vec4<f32> {
    return mix(uniforms.sky_bottom, uniforms.sky_top, clamp(in.height, 0.0, 1.0));
}
"#;
