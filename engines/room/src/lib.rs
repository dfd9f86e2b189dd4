#![allow(missing_docs, reason = "TODO remove before release")]
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "tests may panic on unexpected results"
    )
)]

mod game_loop;
mod game_state;
pub mod movement;
mod render_state;
mod renderer;
mod room_loader;
mod view;

pub use game_loop::{GameLoop, SharedGameState};
pub use game_state::{GameState, Presentation, Tick};
pub use render_state::RenderState;
pub use renderer::{Renderer, RendererBuilder};
pub use room_loader::RoomLoader;
pub use view::LookControl;
