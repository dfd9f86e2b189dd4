use std::{
    borrow::Cow,
    f32::consts::PI,
    sync::{PoisonError, TryLockError},
};

use lib_geometry::Projection;
use lib_gltf_model::GltfModelRenderer;
use log::{debug, trace};
use walkthrough_framework::renderer;

use crate::{render_state::RenderState, SharedGameState};

/// Vertical field of view.
const FIELD_OF_VIEW: f32 = 75.0 * PI / 180.0;

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

const ROOM_SHADER: &str = include_str!("../shaders/room.wgsl");

pub struct RendererBuilder {
    game_state: SharedGameState,
}

impl RendererBuilder {
    #[must_use]
    pub fn new(game_state: SharedGameState) -> Self {
        Self { game_state }
    }
}

impl renderer::RendererBuilder for RendererBuilder {
    type Renderer = Renderer;

    fn build(
        self,
        _adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) -> Renderer {
        let state = RenderState::new(
            &self
                .game_state
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let projection = Projection::new_perspective(
            (surface.width, surface.height),
            FIELD_OF_VIEW,
            state.view_range.clone(),
        );

        let view_format = surface
            .view_formats
            .first()
            .copied()
            .unwrap_or(surface.format);

        let mut renderer = Renderer {
            game_state: self.game_state,
            projection,
            depth_map: DepthTexture::create_depth_texture(device, surface, "depth_map"),
            state,
            view_format,
            room_renderer: None,
        };
        renderer.upload_room(device);
        renderer
    }
}

pub struct Renderer {
    game_state: SharedGameState,
    projection: Projection,
    depth_map: DepthTexture,
    state: RenderState,
    view_format: wgpu::TextureFormat,
    /// `None` until the room has been loaded
    room_renderer: Option<GltfModelRenderer>,
}

impl Renderer {
    fn upload_room(&mut self, device: &wgpu::Device) {
        let Some(room) = self.state.room.as_ref() else {
            return;
        };
        debug!("uploading room to the GPU");
        self.room_renderer = Some(GltfModelRenderer::new(
            device,
            self.view_format,
            Cow::Borrowed(ROOM_SHADER),
            DepthTexture::depth_stencil_state(),
            room,
        ));
    }

    fn render_room(
        &self,
        texture_view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
    ) {
        let render_pass_color_attachment = wgpu::RenderPassColorAttachment {
            view: texture_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                store: wgpu::StoreOp::Store,
            },
        };
        let color_attachments = [Some(render_pass_color_attachment)];
        let render_pass_depth_stencil_attachment = wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_map.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        };
        let render_pass_descriptor = wgpu::RenderPassDescriptor {
            label: Some("room"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: Some(render_pass_depth_stencil_attachment),
            timestamp_writes: None,
            occlusion_query_set: None,
        };

        // without a room the pass still clears the frame
        let mut render_pass = encoder.begin_render_pass(&render_pass_descriptor);
        if let Some(room_renderer) = self.room_renderer.as_ref() {
            room_renderer.render(
                queue,
                &mut render_pass,
                &self.state.camera,
                &self.projection,
            );
        }
    }
}

impl renderer::Renderer for Renderer {
    fn update(&mut self, device: &wgpu::Device, _surface: &wgpu::SurfaceConfiguration) {
        let room_changed = match self.game_state.try_read() {
            Ok(game_state) => self.state.update(&game_state),
            Err(TryLockError::WouldBlock) => {
                trace!("game state is busy, drawing the previous state again");
                return;
            }
            Err(TryLockError::Poisoned(error)) => self.state.update(&error.into_inner()),
        };

        self.projection.set_z_range(self.state.view_range.clone());
        if room_changed {
            self.upload_room(device);
        }
    }

    fn resize(
        &mut self,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) {
        self.projection
            .set_surface_dimensions((surface.width, surface.height));
        self.depth_map = DepthTexture::create_depth_texture(device, surface, "depth_map");
    }

    fn render(
        &mut self,
        texture_view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) {
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        self.render_room(texture_view, &mut encoder, queue);

        queue.submit(Some(encoder.finish()));
    }
}

struct DepthTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTexture {
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }

    fn depth_stencil_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}
