use crate::scene::{self, EntityInstance, GROUND_SIZE, LIGHT_POSITION, SceneColors};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use pursuit_assets::{MeshData, StartupAssets, TextureAsset};
use pursuit_kernel::GameSession;
use pursuit_render::RenderView;
use wgpu::util::DeviceExt;

/// Enemy in slot 0, player in slot 1.
const MAX_INSTANCES: u32 = 2;
const ENEMY_SLOT: u32 = 0;
const PLAYER_SLOT: u32 = 1;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    sky_top: [f32; 4],
    sky_bottom: [f32; 4],
}

impl Uniforms {
    fn new(view_proj: Mat4) -> Self {
        let light = LIGHT_POSITION.normalize();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: [light.x, light.y, light.z, 0.0],
            sky_top: SceneColors::SKY_TOP,
            sky_bottom: SceneColors::SKY_BOTTOM,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl From<&EntityInstance> for InstanceData {
    fn from(instance: &EntityInstance) -> Self {
        let cols = instance.model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: instance.color,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GroundVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

/// Unit cube centred on the origin, one quad per face.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, tangent u, tangent v) per face, counter-clockwise seen from outside.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = std::array::from_fn(|i| n[i] * 0.5 + u[i] * su + v[i] * sv);
            vertices.push(Vertex { position, normal: n });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// Square ground plane at y = 0 whose UVs tile `repeat[0]` times along x and
/// `repeat[1]` times along z.
fn ground_mesh(size: f32, repeat: [f32; 2]) -> Vec<GroundVertex> {
    let h = size / 2.0;
    let corner = |x: f32, z: f32, u: f32, v: f32| GroundVertex {
        position: [x, 0.0, z],
        uv: [u * repeat[0], v * repeat[1]],
    };
    vec![
        corner(-h, h, 0.0, 0.0),
        corner(h, h, 1.0, 0.0),
        corner(h, -h, 1.0, 1.0),
        corner(h, -h, 1.0, 1.0),
        corner(-h, -h, 0.0, 1.0),
        corner(-h, h, 0.0, 0.0),
    ]
}

fn model_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .map(|(&position, &normal)| Vertex { position, normal })
        .collect()
}

/// Indexed mesh resident on the GPU.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// wgpu-based scene renderer.
pub struct WgpuRenderer {
    sky_pipeline: wgpu::RenderPipeline,
    ground_pipeline: wgpu::RenderPipeline,
    entity_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    ground_vertex_buffer: wgpu::Buffer,
    ground_vertex_count: u32,
    ground_layout: wgpu::BindGroupLayout,
    ground_sampler: wgpu::Sampler,
    ground_bind_group: wgpu::BindGroup,
    player_mesh: Option<GpuMesh>,
    player_tint: [f32; 4],
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::new(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let ground_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ground_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let ground_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ground_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout, &ground_layout],
                push_constant_ranges: &[],
            });
        let ground_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ground_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let ground_bind_group = Self::ground_texture(
            device,
            queue,
            &ground_layout,
            &ground_sampler,
            1,
            1,
            &SceneColors::GRASS,
        );

        let color_target = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let depth = |write: bool, compare: wgpu::CompareFunction| wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: Default::default(),
            bias: Default::default(),
        };

        // Sky: fullscreen triangle at the far plane, behind everything.
        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SKY_SHADER.into()),
        });
        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &sky_shader,
                entry_point: Some("vs_sky"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &sky_shader,
                entry_point: Some("fs_sky"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth(false, wgpu::CompareFunction::LessEqual)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let ground_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ground_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GROUND_SHADER.into()),
        });
        let ground_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ground_pipeline"),
            layout: Some(&ground_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &ground_shader,
                entry_point: Some("vs_ground"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GroundVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &ground_shader,
                entry_point: Some("fs_ground"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth(true, wgpu::CompareFunction::Less)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let entity_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("entity_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::ENTITY_SHADER.into()),
        });
        let entity_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("entity_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &entity_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &entity_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &color_target,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(depth(true, wgpu::CompareFunction::Less)),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let ground_verts = ground_mesh(GROUND_SIZE, [1.0, 1.0]);
        let ground_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ground_vertex_buffer"),
            contents: bytemuck::cast_slice(&ground_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: MAX_INSTANCES as u64 * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!(?surface_format, width, height, "wgpu renderer created");

        Self {
            sky_pipeline,
            ground_pipeline,
            entity_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            ground_vertex_buffer,
            ground_vertex_count: ground_verts.len() as u32,
            ground_layout,
            ground_sampler,
            ground_bind_group,
            player_mesh: None,
            player_tint: [1.0; 4],
            instance_buffer,
            depth_texture: Self::create_depth_texture(device, width, height),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Upload the decoded ground texture and the player model. Replaces
    /// anything uploaded before.
    pub fn upload_assets(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets: &StartupAssets,
    ) {
        let TextureAsset {
            width,
            height,
            rgba,
            repeat,
            ..
        } = &assets.ground;
        self.ground_bind_group = Self::ground_texture(
            device,
            queue,
            &self.ground_layout,
            &self.ground_sampler,
            *width,
            *height,
            rgba,
        );
        let ground_verts = ground_mesh(GROUND_SIZE, *repeat);
        self.ground_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ground_vertex_buffer"),
            contents: bytemuck::cast_slice(&ground_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.ground_vertex_count = ground_verts.len() as u32;

        let model = &assets.player;
        let vertices = model_vertices(&model.mesh);
        self.player_mesh = Some(GpuMesh {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("player_vertex_buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("player_index_buffer"),
                contents: bytemuck::cast_slice(&model.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: model.mesh.indices.len() as u32,
        });
        self.player_tint = model.base_color;

        tracing::info!(
            texture = ?(width, height),
            vertices = vertices.len(),
            "startup assets uploaded"
        );
    }

    fn ground_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> wgpu::BindGroup {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ground_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&Default::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ground_texture_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Render one frame: sky, ground, enemy cube, then the player model.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: &RenderView,
        session: &GameSession,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(view.view_projection())),
        );

        let stride = std::mem::size_of::<InstanceData>() as u64;
        let enemy = InstanceData::from(&scene::enemy_instance(session));
        queue.write_buffer(
            &self.instance_buffer,
            u64::from(ENEMY_SLOT) * stride,
            bytemuck::bytes_of(&enemy),
        );
        let player = self
            .player_mesh
            .as_ref()
            .zip(scene::player_instance(session, self.player_tint));
        if let Some((_, instance)) = &player {
            queue.write_buffer(
                &self.instance_buffer,
                u64::from(PLAYER_SLOT) * stride,
                bytemuck::bytes_of(&InstanceData::from(instance)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = SceneColors::SKY_BOTTOM.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.sky_pipeline);
            pass.draw(0..3, 0..1);

            pass.set_pipeline(&self.ground_pipeline);
            pass.set_bind_group(1, &self.ground_bind_group, &[]);
            pass.set_vertex_buffer(0, self.ground_vertex_buffer.slice(..));
            pass.draw(0..self.ground_vertex_count, 0..1);

            pass.set_pipeline(&self.entity_pipeline);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.cube_index_count, 0, ENEMY_SLOT..ENEMY_SLOT + 1);

            if let Some((mesh, _)) = player {
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, PLAYER_SLOT..PLAYER_SLOT + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_faces_wind_outward() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(verts[i as usize].position));
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
        assert!(verts
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
    }

    #[test]
    fn ground_tiles_by_texture_repeat() {
        let verts = ground_mesh(GROUND_SIZE, pursuit_assets::GROUND_TEXTURE_REPEAT);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[1] == 0.0));
        assert!(verts.iter().all(|v| v.position[0].abs() == 50.0));
        let max_u = verts.iter().map(|v| v.uv[0]).fold(0.0, f32::max);
        let max_v = verts.iter().map(|v| v.uv[1]).fold(0.0, f32::max);
        assert_eq!((max_u, max_v), (40.0, 40.0));

        let uneven = ground_mesh(10.0, [2.0, 5.0]);
        assert_eq!(uneven[2].uv, [2.0, 5.0]);
    }

    #[test]
    fn model_vertices_pair_positions_with_normals() {
        let mesh = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
        };
        let verts = model_vertices(&mesh);
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert!(verts.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn ground_faces_up() {
        let verts = ground_mesh(10.0, [1.0, 1.0]);
        let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(verts[i].position));
        assert!((b - a).cross(c - a).y > 0.0);
    }

    #[test]
    fn uniforms_light_points_towards_light() {
        let u = Uniforms::new(Mat4::IDENTITY);
        let dir = Vec3::new(u.light_dir[0], u.light_dir[1], u.light_dir[2]);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.y > dir.x && dir.x == dir.z);
    }
}
