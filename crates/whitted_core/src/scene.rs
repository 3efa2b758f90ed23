//! Serializable scene description.
//!
//! A `SceneDescription` is the on-disk (JSON) form of everything the
//! renderer needs: camera pose and screen, render settings, lights,
//! materials and objects. It carries plain data only; the renderer turns it
//! into primitives.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whitted_math::{Color, Placement, Vector3};

use crate::material::{Material, MaterialError, MaterialLibrary};

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDescription,
    pub render: RenderDescription,
    pub ambient_light: [f64; 3],
    pub background: [f64; 3],
    pub lights: Vec<LightDescription>,
    /// MTL files whose materials become available by name
    pub material_libraries: Vec<PathBuf>,
    pub materials: Vec<MaterialDescription>,
    pub objects: Vec<ObjectDescription>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: CameraDescription::default(),
            render: RenderDescription::default(),
            ambient_light: [0.1, 0.1, 0.1],
            background: [0.0, 0.0, 0.0],
            lights: Vec::new(),
            material_libraries: Vec::new(),
            materials: Vec::new(),
            objects: Vec::new(),
        }
    }
}

/// Pinhole camera and virtual screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub position: [f64; 3],
    pub target: [f64; 3],
    /// Resolution in pixels
    pub width: u32,
    pub height: u32,
    /// Distance from the eye to the virtual screen
    pub screen_distance: f64,
    /// Physical size of the virtual screen
    pub screen_width: f64,
    pub screen_height: f64,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, 1.0],
            width: 1600,
            height: 900,
            screen_distance: 1.0,
            screen_width: 1.6,
            screen_height: 0.9,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDescription {
    /// Maximum number of reflection/refraction bounces
    pub max_depth: u32,
}

impl Default for RenderDescription {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// A point light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: [f64; 3],
    #[serde(default = "white")]
    pub color: [f64; 3],
}

fn white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// A material defined inline in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub name: String,
    pub diffuse: [f64; 3],
    pub specular: [f64; 3],
    pub ambient: [f64; 3],
    pub emissive: [f64; 3],
    pub opacity: f64,
    pub refractive_index: f64,
    pub shininess: f64,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        let m = Material::default();
        Self {
            name: m.name,
            diffuse: m.diffuse.to_array(),
            specular: m.specular.to_array(),
            ambient: m.ambient.to_array(),
            emissive: m.emissive.to_array(),
            opacity: m.opacity,
            refractive_index: m.refractive_index,
            shininess: m.shininess,
        }
    }
}

impl From<&MaterialDescription> for Material {
    fn from(desc: &MaterialDescription) -> Self {
        Self {
            name: desc.name.clone(),
            diffuse: Color::from_array(desc.diffuse),
            specular: Color::from_array(desc.specular),
            ambient: Color::from_array(desc.ambient),
            emissive: Color::from_array(desc.emissive),
            opacity: desc.opacity,
            refractive_index: desc.refractive_index,
            shininess: desc.shininess,
        }
    }
}

/// Mesh placement in the scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementDescription {
    pub position: [f64; 3],
    pub rotation_degrees: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for PlacementDescription {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation_degrees: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl From<&PlacementDescription> for Placement {
    fn from(desc: &PlacementDescription) -> Self {
        Placement::at(Vector3::from_array(desc.position))
            .with_rotation(Vector3::from_array(desc.rotation_degrees))
            .with_scale(Vector3::from_array(desc.scale))
    }
}

/// A renderable object. `material` names an entry of the material table;
/// `None` selects the default material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
        #[serde(default)]
        material: Option<String>,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
        #[serde(default)]
        material: Option<String>,
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        #[serde(default)]
        material: Option<String>,
    },
    /// An OBJ mesh. Faces without `usemtl` use `material`.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        placement: Option<PlacementDescription>,
        #[serde(default)]
        material: Option<String>,
    },
}

impl SceneDescription {
    /// Parse a scene from JSON text. Relative paths stay relative.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scene file. Relative mesh and material paths are resolved
    /// against the directory holding the scene file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut scene = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            scene.resolve_paths(base);
        }
        log::info!(
            "Loaded scene {}: {} objects, {} lights",
            path.display(),
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Make relative file references relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for library in &mut self.material_libraries {
            if library.is_relative() {
                *library = base.join(&*library);
            }
        }
        for object in &mut self.objects {
            if let ObjectDescription::Mesh { path, .. } = object {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    /// Build the material table: MTL libraries first, inline materials on top.
    pub fn material_library(&self) -> Result<MaterialLibrary, MaterialError> {
        let mut library = MaterialLibrary::new();
        for path in &self.material_libraries {
            library.extend(MaterialLibrary::load(path)?);
        }
        for desc in &self.materials {
            library.insert(Material::from(desc));
        }
        Ok(library)
    }

    pub fn ambient_light(&self) -> Color {
        Color::from_array(self.ambient_light)
    }

    pub fn background(&self) -> Color {
        Color::from_array(self.background)
    }
}
