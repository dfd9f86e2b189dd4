//! Walking around inside the room.
//!
//! Every frame the current [`FrameInput`] gets turned into a horizontal displacement relative to
//! the viewing direction, which is then clamped to the [`RoomBounds`] by the [`PlayerController`].

mod bounds;
mod config;
mod controller;
mod input;

pub use bounds::RoomBounds;
pub use config::MovementConfig;
pub use controller::PlayerController;
pub use input::{FrameInput, MoveDirection, MoveState};
