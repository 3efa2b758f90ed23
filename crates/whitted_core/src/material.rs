//! Surface materials and MTL material libraries.
//!
//! A [`Material`] holds the reflectance parameters consumed by the shader.
//! Materials are shared between many primitives through `Arc`, and a
//! [`MaterialLibrary`] maps MTL names (`newmtl`) to them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use whitted_math::Color;

/// Errors that can occur while building or querying a material library.
#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("Failed to load material library: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Material '{0}' is not defined in the material library")]
    Unknown(String),
}

/// Per-surface reflectance parameters (Phong + mirror + dielectric).
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from `newmtl`)
    pub name: String,

    /// Lambertian color (`Kd`)
    pub diffuse: Color,

    /// Phong highlight color and mirror weight (`Ks`)
    pub specular: Color,

    /// Response to the scene's ambient light (`Ka`)
    pub ambient: Color,

    /// Emitted color (`Ke`). Carried through but not used in shading.
    pub emissive: Color,

    /// 1 = opaque, 0 = fully transmissive (`d`)
    pub opacity: f64,

    /// Index of refraction (`Ni`)
    pub refractive_index: f64,

    /// Phong exponent (`Ns`)
    pub shininess: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            diffuse: Color::WHITE,
            specular: Color::BLACK,
            ambient: Color::splat(0.1),
            emissive: Color::BLACK,
            opacity: 1.0,
            refractive_index: 0.5,
            shininess: 0.0,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse: Color) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ..Default::default()
        }
    }

    pub fn with_specular(mut self, specular: Color, shininess: f64) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Make the material partly transmissive.
    pub fn with_transparency(mut self, opacity: f64, refractive_index: f64) -> Self {
        self.opacity = opacity;
        self.refractive_index = refractive_index;
        self
    }

    /// True when the material spawns mirror rays.
    pub fn is_reflective(&self) -> bool {
        !self.specular.is_black()
    }

    /// True when the material spawns refraction rays.
    pub fn is_transmissive(&self) -> bool {
        self.opacity < 1.0
    }
}

impl From<&tobj::Material> for Material {
    /// Convert a parsed MTL entry. Keys absent from the file keep the
    /// defaults of [`Material::default`].
    fn from(mtl: &tobj::Material) -> Self {
        let defaults = Material::default();
        let color = |c: Option<[f32; 3]>, fallback: Color| {
            c.map(|[r, g, b]| Color::new(r as f64, g as f64, b as f64))
                .unwrap_or(fallback)
        };

        Self {
            name: mtl.name.clone(),
            diffuse: color(mtl.diffuse, defaults.diffuse),
            specular: color(mtl.specular, defaults.specular),
            ambient: color(mtl.ambient, defaults.ambient),
            emissive: color(
                mtl.emissive,
                mtl.unknown_param
                    .get("Ke")
                    .and_then(|value| parse_rgb(value))
                    .unwrap_or(defaults.emissive),
            ),
            opacity: mtl.dissolve.map_or(defaults.opacity, |d| d as f64),
            refractive_index: mtl
                .optical_density
                .map_or(defaults.refractive_index, |ni| ni as f64),
            shininess: mtl.shininess.map_or(defaults.shininess, |ns| ns as f64),
        }
    }
}

/// Parse an "r g b" triple.
fn parse_rgb(value: &str) -> Option<Color> {
    let mut channels = value.split_whitespace().map(str::parse::<f64>);
    match (channels.next(), channels.next(), channels.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) => Some(Color::new(r, g, b)),
        _ => None,
    }
}

/// Name → material lookup built from MTL text.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an `.mtl` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let (materials, _) = tobj::load_mtl(path)?;
        log::debug!("Loaded {} materials from {}", materials.len(), path.display());
        Ok(Self::from_tobj(&materials))
    }

    /// Parse MTL text held in memory.
    pub fn parse(text: &str) -> Result<Self, MaterialError> {
        let mut reader = text.as_bytes();
        let (materials, _) = tobj::load_mtl_buf(&mut reader)?;
        Ok(Self::from_tobj(&materials))
    }

    /// Build a library from materials already parsed by `tobj`.
    pub fn from_tobj(materials: &[tobj::Material]) -> Self {
        let mut library = Self::new();
        for mtl in materials {
            library.insert(Material::from(mtl));
        }
        library
    }

    /// Add (or replace) a material under its own name.
    pub fn insert(&mut self, material: Material) -> Arc<Material> {
        let material = Arc::new(material);
        self.materials
            .insert(material.name.clone(), Arc::clone(&material));
        material
    }

    /// Look up a material by name.
    ///
    /// A missing name is an error rather than a silent fallback: every
    /// primitive must end up with a real material.
    pub fn get(&self, name: &str) -> Result<Arc<Material>, MaterialError> {
        self.materials
            .get(name)
            .cloned()
            .ok_or_else(|| MaterialError::Unknown(name.to_string()))
    }

    /// Merge another library into this one. Entries from `other` win.
    pub fn extend(&mut self, other: MaterialLibrary) {
        self.materials.extend(other.materials);
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
