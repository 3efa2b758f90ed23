//! Triangle mesh geometry as authored on disk.
//!
//! This module provides a renderer-agnostic mesh: a vertex pool plus
//! triangles that reference it by index. Meshes are populated from OBJ files
//! (through `tobj`) and turned into ray-traceable primitives by the renderer.

use std::fs;
use std::path::Path;

use thiserror::Error;
use whitted_math::{Aabb, Vector3};

use crate::material::{MaterialError, MaterialLibrary};

/// Errors that can occur while loading or building a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Material library error: {0}")]
    Material(#[from] MaterialError),

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// A triangle referencing three vertices of the owning mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshFace {
    /// Indices into [`Mesh::positions`]
    pub indices: [usize; 3],

    /// Name of the material bound by `usemtl`, if any
    pub material: Option<String>,
}

impl MeshFace {
    pub fn new(indices: [usize; 3]) -> Self {
        Self {
            indices,
            material: None,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// A mesh consisting of vertex positions and triangles.
///
/// Fields are only reachable through accessors, so every face index is
/// known to be in range once a `Mesh` exists.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Vector3>,
    faces: Vec<MeshFace>,
    bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh, checking that every face index is in range.
    pub fn new(positions: Vec<Vector3>, faces: Vec<MeshFace>) -> Result<Self, MeshError> {
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i >= positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }

        let bounds = Aabb::enclosing(&positions);
        Ok(Self {
            positions,
            faces,
            bounds,
        })
    }

    /// Load an OBJ file together with the material library named by its
    /// `mtllib` statement.
    ///
    /// Polygons are fan-triangulated. Each face records the name given by
    /// the preceding `usemtl`, whether or not the OBJ's own library defines
    /// it, so names can later resolve against materials from elsewhere. An
    /// `mtllib` that cannot be read is an error.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<(Self, MaterialLibrary), MeshError> {
        let path = path.as_ref();
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let source = fs::read_to_string(path)?;

        let mut library = MaterialLibrary::new();
        let mut names: Vec<&str> = Vec::new();
        let mut geometry = String::with_capacity(source.len());

        for line in source.lines() {
            match directive(line) {
                Some(("mtllib", file)) if !file.is_empty() => {
                    library.extend(MaterialLibrary::load(base.join(file))?);
                }
                Some(("usemtl", name)) if !name.is_empty() => {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                    geometry.push_str("usemtl ");
                    geometry.push_str(name);
                    geometry.push('\n');
                }
                _ => {
                    geometry.push_str(line);
                    geometry.push('\n');
                }
            }
        }

        // tobj drops `usemtl` names its library lacks, so hand it a library
        // holding one placeholder per name and map ids back to names.
        let placeholders: String = names.iter().map(|name| format!("newmtl {}\n", name)).collect();
        if !names.is_empty() {
            geometry.insert_str(0, "mtllib names.mtl\n");
        }

        let (models, bound) = tobj::load_obj_buf(
            &mut geometry.as_bytes(),
            &tobj::LoadOptions {
                triangulate: true,
                ..Default::default()
            },
            |_| tobj::load_mtl_buf(&mut placeholders.as_bytes()),
        )?;
        let bound = bound?;

        let mut positions = Vec::new();
        let mut faces = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            let offset = positions.len();
            let material = mesh
                .material_id
                .and_then(|id| bound.get(id))
                .map(|mtl| mtl.name.clone());

            positions.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );

            for tri in mesh.indices.chunks_exact(3) {
                faces.push(MeshFace {
                    indices: [
                        offset + tri[0] as usize,
                        offset + tri[1] as usize,
                        offset + tri[2] as usize,
                    ],
                    material: material.clone(),
                });
            }

            log::debug!(
                "OBJ model '{}': {} triangles, material {:?}",
                model.name,
                mesh.indices.len() / 3,
                material
            );
        }

        let mesh = Self::new(positions, faces)?;
        if mesh.faces.is_empty() {
            log::warn!("OBJ file {} contains no faces", path.display());
        }
        log::info!(
            "Loaded {}: {} vertices, {} triangles, {} materials",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            library.len()
        );

        Ok((mesh, library))
    }

    /// Vertex positions, one per vertex.
    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    /// Triangles indexing into [`Mesh::positions`].
    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    /// Axis-aligned bounds of the vertex positions.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vector3 {
        self.bounds.centroid()
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f64 {
        self.bounds.diagonal()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Split an OBJ line into its keyword and the trimmed remainder.
fn directive(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (keyword, rest) = line.split_once(char::is_whitespace)?;
    Some((keyword, rest.trim()))
}
