//! Whitted Core - scene data for the Whitted ray tracer.
//!
//! This crate provides:
//!
//! - **Materials**: `Material` and the MTL-backed `MaterialLibrary`
//! - **Meshes**: index-based triangle meshes loaded from OBJ files
//! - **Scene descriptions**: the JSON scene format read by the renderer
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::{Mesh, SceneDescription};
//!
//! let scene = SceneDescription::load("scene.json")?;
//! let (mesh, materials) = Mesh::load_obj("models/icosahedron.obj")?;
//! println!("{} triangles, {} materials", mesh.triangle_count(), materials.len());
//! ```

pub mod material;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use material::{Material, MaterialError, MaterialLibrary};
pub use mesh::{Mesh, MeshError, MeshFace};
pub use scene::{
    CameraDescription, LightDescription, MaterialDescription, ObjectDescription,
    PlacementDescription, RenderDescription, SceneDescription, SceneError,
};
