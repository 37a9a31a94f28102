//! Glint Core - Asset types shared by the renderer and the CLI.
//!
//! This crate provides:
//!
//! - **Mesh geometry**: `TriangleMesh` and OBJ loading
//! - **Environment lighting**: analytic sky gradient and equirectangular HDR maps
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{load_obj, Environment};
//!
//! let mesh = load_obj("bunny.obj")?;
//! println!("Loaded {} triangles", mesh.triangle_count());
//!
//! let mut env = Environment::default();
//! env.load_map("studio.hdr")?;
//! ```

pub mod environment;
pub mod mesh;

// Re-export commonly used types
pub use environment::{Environment, EnvironmentError, EnvironmentMap, SkyGradient};
pub use mesh::{load_obj, MeshError, TriangleMesh};
