#![allow(missing_docs, reason = "TODO add later")]
#![cfg_attr(
    test,
    allow(
        clippy::indexing_slicing,
        clippy::unwrap_used,
        reason = "tests may panic on unexpected data"
    )
)]

mod model;
mod renderer;

pub use model::{load_model, MeshData, Model, Vertex};
pub use renderer::Renderer as GltfModelRenderer;
