#![allow(missing_docs, reason = "TODO add later")]

mod aabb;
mod camera;
mod projection;

pub use aabb::Aabb;
pub use camera::Camera;
pub use projection::Projection;
