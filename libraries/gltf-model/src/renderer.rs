use std::{borrow::Cow, mem::size_of};

use lib_geometry::{Camera, Projection};
use log::debug;
use wgpu::{self, util::DeviceExt};

use crate::model::{MeshData, Model, Vertex};

struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &MeshData) -> Option<Self> {
        let index_count = u32::try_from(mesh.indices.len()).ok()?;
        if index_count == 0 {
            return None;
        }

        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", mesh.label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", mesh.label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(Self {
            vertex_buf,
            index_buf,
            index_count,
        })
    }
}

/// Draws all meshes of a [`Model`] with a single pipeline.
pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    bind_group: wgpu::BindGroup,
    camera_matrix_buf: wgpu::Buffer,
    projection_matrix_buf: wgpu::Buffer,
}

impl Renderer {
    /// Uploads `model` to the GPU and creates the pipeline to draw it.
    ///
    /// The shader needs a `vs_main` and a `fs_main` entry point and reads the view matrix
    /// from binding 0 and the projection matrix from binding 1.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        view_format: wgpu::TextureFormat,
        shader_source: Cow<'_, str>,
        depth_stencil_state: wgpu::DepthStencilState,
        model: &Model,
    ) -> Self {
        let meshes = model
            .meshes
            .iter()
            .filter_map(|mesh| GpuMesh::upload(device, mesh))
            .collect::<Vec<_>>();
        debug!(
            "uploaded {} meshes with {} vertices",
            meshes.len(),
            model.vertex_count()
        );

        // Create pipeline layout
        let matrix_binding_type = wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(64),
        };

        let bind_group_layout_descriptor = wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: matrix_binding_type,
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: matrix_binding_type,
                    count: None,
                },
            ],
        };
        let bind_group_layout = device.create_bind_group_layout(&bind_group_layout_descriptor);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_matrix = |label| wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: &[0_u8; size_of::<[f32; 16]>()],
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        };

        let camera_matrix_buf =
            device.create_buffer_init(&uniform_matrix("camera matrix uniform buffer"));
        let projection_matrix_buf =
            device.create_buffer_init(&uniform_matrix("projection matrix uniform buffer"));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_matrix_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: projection_matrix_buf.as_entire_binding(),
                },
            ],
            label: None,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(shader_source),
        });

        let pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            &[Vertex::buffer_layout()],
            view_format,
            depth_stencil_state,
        );

        Self {
            pipeline,
            meshes,
            bind_group,
            camera_matrix_buf,
            projection_matrix_buf,
        }
    }

    pub fn render(
        &self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        camera: &Camera,
        projection: &Projection,
    ) {
        self.update_matrices(projection, camera, queue);

        render_pass.push_debug_group("Prepare data for draw.");
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.pop_debug_group();

        for mesh in &self.meshes {
            render_pass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn update_matrices(&self, projection: &Projection, camera: &Camera, queue: &wgpu::Queue) {
        let camera_matrix = camera.matrix();
        queue.write_buffer(
            &self.camera_matrix_buf,
            0,
            bytemuck::cast_slice(camera_matrix.as_ref()),
        );

        let projection_matrix = projection.matrix();
        queue.write_buffer(
            &self.projection_matrix_buf,
            0,
            bytemuck::cast_slice(projection_matrix.as_ref()),
        );
    }

    fn create_pipeline(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        vertex_buffers: &[wgpu::VertexBufferLayout<'_>; 1],
        view_format: wgpu::TextureFormat,
        depth_stencil_state: wgpu::DepthStencilState,
    ) -> wgpu::RenderPipeline {
        let vertex = wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: vertex_buffers,
        };

        let fragment_state = wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(view_format.into())],
        };

        // room models are often modelled single-sided, so both faces are drawn
        let primitive = wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(pipeline_layout),
            vertex,
            fragment: Some(fragment_state),
            primitive,
            depth_stencil: Some(depth_stencil_state),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
