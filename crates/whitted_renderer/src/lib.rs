//! Whitted-style recursive ray tracer.
//!
//! Primary rays from a pinhole camera are shaded with Phong lighting and
//! hard shadows; reflective and transmissive surfaces spawn secondary rays up
//! to a fixed depth. Deterministic: no sampling, no randomness.

mod assembly;
mod camera;
mod light;
mod output;
mod plane;
mod primitive;
mod renderer;
mod scene;
mod shader;
mod sphere;
mod triangle;
mod triangle_mesh;

pub use assembly::{AssemblyError, SceneAssets};
pub use camera::{Camera, CameraError};
pub use light::Light;
pub use output::{write_ppm, OutputError, PpmFormat};
pub use plane::Plane;
pub use primitive::{nearest_hit, Hit, Primitive};
pub use renderer::{render, render_parallel, render_pixel, ImageBuffer, RenderConfig};
pub use scene::Scene;
pub use shader::shade;
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use triangle_mesh::{Face, MeshPlacementError, TriangleMesh};

/// Re-export common math types from whitted_math
pub use whitted_math::{Color, Ray, Vector3};
