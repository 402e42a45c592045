use crate::mesh::{
    self, BillboardInstance, BillboardVertex, MapInstance, Uniforms, Vertex,
};
use crate::shaders;
use gridwalk_assets::{AssetStore, ImageData};
use gridwalk_common::TextureId;
use gridwalk_render::{DrawList, MapMesh, RenderView};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct MeshBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new<V: bytemuck::Pod>(device: &wgpu::Device, label: &str, verts: &[V], idx: &[u16]) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(idx),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: idx.len() as u32,
        }
    }
}

/// Static level buffers, built once by [`WgpuRenderer::set_map`].
struct MapBuffers {
    instances: wgpu::Buffer,
    wall_count: u32,
    tile_count: u32,
    atlas: TextureId,
}

struct PipelineSpec<'a> {
    label: &'a str,
    shader: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: wgpu::BlendState,
}

/// wgpu-based level renderer.
pub struct WgpuRenderer {
    map_pipeline: wgpu::RenderPipeline,
    billboard_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: BTreeMap<TextureId, wgpu::BindGroup>,
    cube: MeshBuffers,
    flat_quad: MeshBuffers,
    billboard_quad: MeshBuffers,
    billboard_instances: wgpu::Buffer,
    max_billboards: u32,
    map: Option<MapBuffers>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
                camera_right: [1.0, 0.0, 0.0, 0.0],
                camera_up: [0.0, 1.0, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
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
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        // Pixel-art textures: no filtering between texels.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nearest_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let map_pipeline = Self::create_pipeline(
            device,
            &textured_layout,
            surface_format,
            PipelineSpec {
                label: "map",
                shader: shaders::MAP_SHADER,
                vs: "vs_map",
                fs: "fs_map",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x2,
                            3 => Float32,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MapInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            4 => Float32x3,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
                blend: wgpu::BlendState::REPLACE,
            },
        );

        let billboard_pipeline = Self::create_pipeline(
            device,
            &textured_layout,
            surface_format,
            PipelineSpec {
                label: "billboard",
                shader: shaders::BILLBOARD_SHADER,
                vs: "vs_billboard",
                fs: "fs_billboard",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BillboardVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x2,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BillboardInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x3,
                            3 => Float32,
                        ],
                    },
                ],
                blend: wgpu::BlendState::ALPHA_BLENDING,
            },
        );

        let (cube_verts, cube_indices) = mesh::cube_mesh();
        let (quad_verts, quad_indices) = mesh::flat_quad_mesh();
        let (bb_verts, bb_indices) = mesh::billboard_quad();

        let max_billboards = 1_024u32;
        let billboard_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("billboard_instance_buffer"),
            size: max_billboards as u64 * std::mem::size_of::<BillboardInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            map_pipeline,
            billboard_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            textures: BTreeMap::new(),
            cube: MeshBuffers::new(device, "cube", &cube_verts, &cube_indices),
            flat_quad: MeshBuffers::new(device, "flat_quad", &quad_verts, &quad_indices),
            billboard_quad: MeshBuffers::new(device, "billboard", &bb_verts, &bb_indices),
            billboard_instances,
            max_billboards,
            map: None,
            depth_texture: Self::create_depth_texture(device, width, height),
            surface_format,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
        spec: PipelineSpec<'_>,
    ) -> wgpu::RenderPipeline {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{}_shader", spec.label)),
            source: wgpu::ShaderSource::Wgsl(spec.shader.into()),
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{}_pipeline", spec.label)),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(spec.vs),
                compilation_options: Default::default(),
                buffers: spec.buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(spec.fs),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(spec.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // Floor and ceiling quads are seen from both sides.
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Upload one RGBA8 image and make it drawable under `id`.
    pub fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: TextureId,
        image: &ImageData,
    ) {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(&image.name),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );
        let view = texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{}_bind_group", image.name)),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.textures.insert(id, bind_group);
        tracing::debug!(name = %image.name, ?id, "texture uploaded");
    }

    /// Upload every image in the store.
    pub fn upload_assets(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, store: &AssetStore) {
        for (id, image) in store.iter() {
            self.upload_texture(device, queue, id, image);
        }
        tracing::info!(textures = self.textures.len(), "textures uploaded");
    }

    /// Build the static level buffers.
    pub fn set_map(&mut self, device: &wgpu::Device, mesh: &MapMesh, atlas: TextureId) {
        let (instances, wall_count) = mesh::map_instances(mesh);
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("map_instance_buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        tracing::info!(walls = wall_count, tiles = instances.len(), "map mesh uploaded");
        self.map = Some(MapBuffers {
            instances: instance_buffer,
            wall_count,
            tile_count: instances.len() as u32 - wall_count,
            atlas,
        });
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: map, then billboards far to near.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: &RenderView,
        draws: &DrawList,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view.view_projection().to_cols_array_2d(),
                camera_right: view.right().extend(0.0).to_array(),
                camera_up: view.billboard_up().extend(0.0).to_array(),
            }),
        );

        let billboards: Vec<(TextureId, BillboardInstance)> = draws
            .billboards
            .iter()
            .take(self.max_billboards as usize)
            .map(|b| (b.texture, mesh::billboard_instance(b)))
            .collect();
        if !billboards.is_empty() {
            let instances: Vec<BillboardInstance> = billboards.iter().map(|(_, i)| *i).collect();
            queue.write_buffer(&self.billboard_instances, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.96,
                            g: 0.96,
                            b: 0.96,
                            a: 1.0,
                        }),
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

            if let Some(map) = &self.map {
                if let Some(atlas) = self.textures.get(&map.atlas) {
                    pass.set_pipeline(&self.map_pipeline);
                    pass.set_bind_group(1, atlas, &[]);
                    pass.set_vertex_buffer(1, map.instances.slice(..));

                    pass.set_vertex_buffer(0, self.cube.vertices.slice(..));
                    pass.set_index_buffer(self.cube.indices.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..self.cube.index_count, 0, 0..map.wall_count);

                    pass.set_vertex_buffer(0, self.flat_quad.vertices.slice(..));
                    pass.set_index_buffer(
                        self.flat_quad.indices.slice(..),
                        wgpu::IndexFormat::Uint16,
                    );
                    let tiles = map.wall_count..map.wall_count + map.tile_count;
                    pass.draw_indexed(0..self.flat_quad.index_count, 0, tiles);
                }
            }

            if !billboards.is_empty() {
                pass.set_pipeline(&self.billboard_pipeline);
                pass.set_vertex_buffer(0, self.billboard_quad.vertices.slice(..));
                pass.set_vertex_buffer(1, self.billboard_instances.slice(..));
                pass.set_index_buffer(
                    self.billboard_quad.indices.slice(..),
                    wgpu::IndexFormat::Uint16,
                );
                for (i, (texture, _)) in billboards.iter().enumerate() {
                    let Some(bind_group) = self.textures.get(texture) else {
                        continue;
                    };
                    let i = i as u32;
                    pass.set_bind_group(1, bind_group, &[]);
                    pass.draw_indexed(0..self.billboard_quad.index_count, 0, i..i + 1);
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
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
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
