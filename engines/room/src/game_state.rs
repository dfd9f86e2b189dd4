use std::{ops::Range, sync::Arc};

use glam::Vec3;
use lib_geometry::Camera;
use lib_gltf_model::Model;
use log::{debug, info, warn};
use walkthrough_framework_common::xr::{XrEvent, XrFrame};
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};

use crate::{
    movement::{FrameInput, MoveState, MovementConfig, PlayerController, RoomBounds},
    view::LookControl,
};

/// Depth range used until a room has been loaded.
const INITIAL_VIEW_RANGE: Range<f32> = 0.1..100.0;
/// Near plane once a room has been loaded.
const ROOM_NEAR_PLANE: f32 = 0.05;
/// The far plane is put at this multiple of the room's largest extent.
const ROOM_FAR_PLANE_FACTOR: f32 = 5.0;
/// After loading a room the view is tilted down towards a point this far below eye level.
const INITIAL_LOOK_DROP: f32 = 0.3;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Tick(pub u64);

/// Where the picture currently goes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Presentation {
    /// A regular window; movement comes from the keyboard.
    #[default]
    Desktop,
    /// A headset; movement comes from the XR controllers.
    Xr,
}

/// Contains every information about the current state of the walkthrough.
pub struct GameState {
    /// ever increasing counter representing the number of game loop iterations so far
    pub(crate) tick: Tick,
    pub(crate) camera: Camera,
    pub(crate) player: PlayerController,
    pub(crate) move_state: MoveState,
    pub(crate) look: LookControl,
    pub(crate) presentation: Presentation,
    /// inputs of the most recent XR frame; empty outside of a session
    pub(crate) xr_frame: XrFrame,
    /// the loaded room, shared with the renderers
    pub(crate) room: Option<Arc<Model>>,
    /// bumped every time `room` gets replaced
    pub(crate) room_generation: u64,
    pub(crate) view_range: Range<f32>,
}

impl GameState {
    #[must_use]
    pub fn new(config: MovementConfig) -> Self {
        let player = PlayerController::new(config);
        let eye = player.position();
        let camera = Camera::new(eye, eye + Vec3::NEG_Z);

        Self {
            tick: Tick::default(),
            camera,
            player,
            move_state: MoveState::default(),
            look: LookControl::looking_along(camera.look_direction()),
            presentation: Presentation::default(),
            xr_frame: XrFrame::default(),
            room: None,
            room_generation: 0,
            view_range: INITIAL_VIEW_RANGE,
        }
    }

    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                self.move_state.apply_key(physical_key, state);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.look.set_dragging(state == ElementState::Pressed);
            }
            WindowEvent::Focused(false) => {
                debug!("focus lost, releasing all keys");
                self.move_state.release_all();
                self.look.set_dragging(false);
            }
            _ => {}
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = *event {
            if self.presentation == Presentation::Desktop && self.look.rotate(dx, dy) {
                self.camera.look_along(self.look.direction());
            }
        }
    }

    pub fn handle_xr_event(&mut self, event: XrEvent) {
        match event {
            XrEvent::SessionStarted => {
                info!("XR session started");
                self.presentation = Presentation::Xr;
                self.move_state.release_all();
                self.look.set_dragging(false);
            }
            XrEvent::SessionEnded => {
                info!("XR session ended");
                self.presentation = Presentation::Desktop;
                self.xr_frame = XrFrame::default();
                let position = self.player.pin_to_eye_height();
                self.camera.move_to(position);
                self.look.set_direction(self.camera.look_direction());
            }
            XrEvent::Frame(frame) => {
                if self.presentation != Presentation::Xr {
                    debug!("ignoring XR frame outside of a session");
                    return;
                }
                self.camera.look_along(frame.look_direction());
                self.xr_frame = frame;
            }
        }
    }

    /// Advances the walkthrough by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.tick.0 += 1;

        let input = match self.presentation {
            Presentation::Desktop => FrameInput::Desktop(self.move_state),
            Presentation::Xr => FrameInput::Xr(&self.xr_frame.input_sources),
        };
        if let Some(position) =
            self.player
                .update(delta, &input, self.camera.look_direction())
        {
            self.camera.move_to(position);
        }
    }

    /// Takes over a freshly loaded room and puts the player in the middle of it.
    pub fn apply_room(&mut self, room: Model) {
        if let Some(aabb) = room.bounds {
            let bounds = RoomBounds::from_aabb(&aabb, self.player.config().wall_offset());
            let position = self.player.place_in_room(bounds, aabb.min.y);
            info!(
                "room bounds x: {:.2}..{:.2}, z: {:.2}..{:.2}, floor at {:.2}",
                bounds.x_min,
                bounds.x_max,
                bounds.z_min,
                bounds.z_max,
                aabb.min.y
            );

            let target = position + Vec3::new(0.0, -INITIAL_LOOK_DROP, -1.0);
            self.camera = Camera::new(position, target);
            self.look.set_direction(self.camera.look_direction());

            let extent = aabb.size().max_element();
            let far = (extent * ROOM_FAR_PLANE_FACTOR).max(1.0);
            self.view_range = ROOM_NEAR_PLANE..far;
        } else {
            warn!("room has no geometry, keeping the placeholder bounds");
        }

        self.room = Some(Arc::new(room));
        self.room_generation += 1;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}
