//! Scene assembly: turn a `SceneDescription` into owned primitives.
//!
//! `SceneAssets` owns every primitive and material; `Scene` borrows them for
//! the duration of a render.

use std::sync::Arc;

use thiserror::Error;
use whitted_core::{Material, MaterialError, Mesh, MeshError, ObjectDescription, SceneDescription};
use whitted_math::{Color, Placement, Vector3};

use crate::camera::{Camera, CameraError};
use crate::light::Light;
use crate::plane::Plane;
use crate::primitive::Primitive;
use crate::renderer::RenderConfig;
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::triangle_mesh::{MeshPlacementError, TriangleMesh};

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Mesh placement error: {0}")]
    Placement(#[from] MeshPlacementError),
}

/// Everything needed to render a described scene.
pub struct SceneAssets {
    pub camera: Camera,
    pub config: RenderConfig,
    primitives: Vec<Box<dyn Primitive>>,
    lights: Vec<Light>,
    ambient_light: Color,
    background: Color,
}

impl SceneAssets {
    /// Build camera, lights and primitives from a description.
    ///
    /// Objects without a material, and mesh faces without `usemtl`, use the
    /// default material.
    pub fn from_description(desc: &SceneDescription) -> Result<Self, AssemblyError> {
        let library = desc.material_library()?;
        let default_material = Arc::new(Material::default());
        let resolve = |name: &Option<String>| -> Result<Arc<Material>, MaterialError> {
            match name {
                Some(name) => library.get(name),
                None => Ok(Arc::clone(&default_material)),
            }
        };

        let mut primitives: Vec<Box<dyn Primitive>> = Vec::with_capacity(desc.objects.len());
        for object in &desc.objects {
            let primitive: Box<dyn Primitive> = match object {
                ObjectDescription::Plane {
                    point,
                    normal,
                    material,
                } => Box::new(Plane::new(
                    Vector3::from_array(*point),
                    Vector3::from_array(*normal),
                    resolve(material)?,
                )),
                ObjectDescription::Sphere {
                    center,
                    radius,
                    material,
                } => Box::new(Sphere::new(
                    Vector3::from_array(*center),
                    *radius,
                    resolve(material)?,
                )),
                ObjectDescription::Triangle { vertices, material } => Box::new(Triangle::new(
                    Vector3::from_array(vertices[0]),
                    Vector3::from_array(vertices[1]),
                    Vector3::from_array(vertices[2]),
                    resolve(material)?,
                )),
                ObjectDescription::Mesh {
                    path,
                    placement,
                    material,
                } => {
                    let (mesh, mesh_library) = Mesh::load_obj(path)?;
                    // The mesh's own MTL entries shadow scene materials.
                    let mut materials = library.clone();
                    materials.extend(mesh_library);

                    let mut primitive = TriangleMesh::new(&mesh, &materials, resolve(material)?)?;
                    if let Some(placement) = placement {
                        primitive.apply_placement(&Placement::from(placement))?;
                    }
                    Box::new(primitive)
                }
            };
            primitives.push(primitive);
        }

        let lights = desc
            .lights
            .iter()
            .map(|l| Light::new(Vector3::from_array(l.position)).with_color(Color::from_array(l.color)))
            .collect();

        let cam = &desc.camera;
        let camera = Camera::new(Vector3::from_array(cam.position), Vector3::from_array(cam.target))?
            .with_resolution(cam.width, cam.height)
            .with_screen(cam.screen_distance, cam.screen_width, cam.screen_height);

        log::info!(
            "Assembled scene: {} primitives, {} lights, {} materials",
            primitives.len(),
            desc.lights.len(),
            library.len()
        );

        Ok(Self {
            camera,
            config: RenderConfig {
                max_depth: desc.render.max_depth,
            },
            primitives,
            lights,
            ambient_light: desc.ambient_light(),
            background: desc.background(),
        })
    }

    /// Borrow the assets as a renderable scene.
    pub fn scene(&self) -> Scene<'_> {
        let mut scene = Scene::new()
            .with_ambient_light(self.ambient_light)
            .with_background(self.background);
        for primitive in &self.primitives {
            scene.add(primitive.as_ref());
        }
        for light in &self.lights {
            scene.add_light(*light);
        }
        scene
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}
