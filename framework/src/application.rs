use crate::{render_surface::RenderSurface, renderer};
use log::{debug, error, info, trace};
use std::{
    sync::{mpsc::Sender, Arc},
    time::Duration,
};
use walkthrough_framework_common::event::{ApplicationEvent, EngineEvent};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{WindowAttributes, WindowId},
};

/// The window side of an application.
///
/// Owns the window and its render surface, draws as fast as the display allows and forwards all
/// input to the game loop via `event_sink`.
pub struct Application<RendererBuilder: renderer::RendererBuilder> {
    /// consumed when the window gets created for the first time
    renderer_builder: Option<RendererBuilder>,
    render_surface: Option<RenderSurface<RendererBuilder::Renderer>>,
    title: String,
    frame_counter: u32,
    frame_time: Instant,
    event_sink: Sender<EngineEvent>,
}

impl<RendererBuilder: renderer::RendererBuilder> Application<RendererBuilder> {
    #[must_use]
    pub fn new(
        title: String,
        event_sender: Sender<EngineEvent>,
        renderer_builder: RendererBuilder,
    ) -> Self {
        Self {
            renderer_builder: Some(renderer_builder),
            render_surface: None,
            title,
            frame_counter: 0,
            frame_time: Instant::now(),
            event_sink: event_sender,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "frame counts stay small enough for f32"
    )]
    fn update_fps(&mut self) {
        self.frame_counter += 1;
        let span = self.frame_time.elapsed();
        if span >= Duration::from_secs(1) {
            debug!(
                "{} fps",
                ((self.frame_counter as f32) / span.as_secs_f32()).round()
            );
            self.frame_counter = 0;
            self.frame_time += span;
        }
    }

    /// Passes `event` on to the game loop; stops the window loop if there's nobody listening.
    fn forward(&self, event_loop: &ActiveEventLoop, event: EngineEvent) {
        if self.event_sink.send(event).is_err() {
            debug!("game loop is gone, shutting down window event loop");
            event_loop.exit();
        }
    }

    fn forward_keyboard_input(
        &self,
        event_loop: &ActiveEventLoop,
        key_event: &KeyEvent,
        event: WindowEvent,
    ) {
        match key_event.logical_key {
            Key::Named(NamedKey::Escape) => {
                trace!("escape pressed, requesting exit");
                self.forward(event_loop, ApplicationEvent::Exit.into());
            }
            Key::Named(_) | Key::Character(_) | Key::Unidentified(_) | Key::Dead(_) => {
                self.forward(event_loop, EngineEvent::Window { event });
            }
        }
    }
}

impl<RendererBuilder: renderer::RendererBuilder> ApplicationHandler<EngineEvent>
    for Application<RendererBuilder>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_surface.is_some() {
            trace!("window event loop resumed");
            return;
        }

        // First-time init of the window and the scene
        let Some(renderer_builder) = self.renderer_builder.take() else {
            return;
        };

        let attributes = WindowAttributes::default().with_title(&self.title);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => {
                error!("failed to create window: {error}");
                self.forward(event_loop, ApplicationEvent::Exit.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(RenderSurface::new(window, renderer_builder)) {
            Ok(render_surface) => {
                render_surface.window().request_redraw();
                self.render_surface = Some(render_surface);
            }
            Err(error) => {
                error!("{error}");
                self.forward(event_loop, ApplicationEvent::Exit.into());
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: EngineEvent) {
        match event {
            EngineEvent::Application {
                event: ApplicationEvent::Exit,
            } => {
                info!("Window event loop received an ExitEvent. Shutting down event loop.");
                event_loop.exit();
            }
            other => {
                trace!("ignoring user event {other:?}");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                trace!("WindowEvent::Resized({size:?})");
                if let Some(render_surface) = self.render_surface.as_mut() {
                    render_surface.resize(size);
                }
            }

            WindowEvent::CloseRequested => {
                trace!("WindowEvent::CloseRequested()");
                self.forward(event_loop, ApplicationEvent::Exit.into());
            }

            WindowEvent::KeyboardInput {
                device_id,
                event: ref key_event,
                is_synthetic,
            } => {
                trace!("WindowEvent::KeyboardInput({device_id:?}, {key_event:?}, {is_synthetic})");
                self.forward_keyboard_input(event_loop, key_event, event.clone());
            }

            WindowEvent::RedrawRequested => {
                // On MacOS, currently redraw requested comes in _before_ Init does.
                // If this happens, just drop the requested redraw on the floor.
                //
                // See https://github.com/rust-windowing/winit/issues/3235 for some discussion
                let Some(render_surface) = self.render_surface.as_mut() else {
                    return;
                };

                render_surface.redraw();
                self.update_fps();
            }

            _ => {
                self.forward(event_loop, EngineEvent::Window { event });
            }
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            DeviceEvent::MouseMotion { .. } => {
                // these are super-noisy, so they're not traced
                self.forward(event_loop, EngineEvent::Device { event });
            }
            DeviceEvent::Added => {
                trace!("DeviceEvent::Added");
            }
            DeviceEvent::Removed => {
                trace!("DeviceEvent::Removed");
            }
            DeviceEvent::MouseWheel { delta } => {
                trace!("DeviceEvent::MouseWheel({delta:?})");
            }
            DeviceEvent::Motion { axis: _, value: _ } => {
                // these are super-noisy
            }
            DeviceEvent::Button { button, state } => {
                trace!("DeviceEvent::Button({button}, {state:?})");
            }
            DeviceEvent::Key(key) => {
                trace!("DeviceEvent::Key({key:?})");
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop is exiting");
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop was suspended");
    }
}
