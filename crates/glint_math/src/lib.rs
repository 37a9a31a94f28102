// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod frame;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use frame::{Frame, FrameError};
pub use interval::Interval;
pub use ray::Ray;
