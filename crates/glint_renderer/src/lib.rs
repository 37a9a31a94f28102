//! Glint renderer - CPU path tracing
//!
//! A Monte Carlo path tracer with BRDF importance sampling and
//! Russian-roulette path termination.
//!
//! Scenes are flat lists of [`Shape`]s, each placed by a locked
//! [`Frame`](glint_math::Frame) and bound to a [`Material`] through a
//! [`MaterialId`]. [`render`] splits the image into vertical strips and traces
//! them on a rayon pool.

mod bvh;
mod camera;
mod filter;
mod hittable;
mod integrator;
mod material;
mod output;
mod plane;
mod random;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod strip;
mod triangle;

pub use bvh::{Bvh, BvhNode, BvhNodeKind, LEAF_MAX_SIZE};
pub use camera::{Camera, CameraError};
pub use filter::{gaussian_blur, median_filter};
pub use hittable::{closest_intersect, Intersection, LocalHit};
pub use integrator::illuminance;
pub use material::{Color, Material};
pub use output::{save_png, RenderError, RenderResult};
pub use plane::Plane;
pub use random::{seed_from_clock, Random};
pub use renderer::{
    render, render_to_file, tone_map, FilterKind, RenderConfig, RenderContext, RenderOutput,
    DISPLAY_GAMMA,
};
pub use scene::{MaterialId, Scene, SceneError};
pub use shape::{Shape, ShapeKind, DEFAULT_MESH_DEPTH};
pub use sphere::Sphere;
pub use strip::{generate_strips, render_pixel, render_strip, Progress, Strip, StripResult};
pub use triangle::Triangle;

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Frame, FrameError, Interval, Ray, Vec3};
