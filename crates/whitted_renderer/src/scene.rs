//! Renderable scene: lights plus borrowed primitives.

use whitted_math::{Color, Ray};

use crate::light::Light;
use crate::primitive::{nearest_hit, Hit, Primitive};

/// Everything the shader reads. Primitives are borrowed, so a scene can only
/// be built once all geometry (including mesh placement) is final.
pub struct Scene<'a> {
    pub lights: Vec<Light>,
    pub primitives: Vec<&'a dyn Primitive>,
    pub ambient_light: Color,
    pub background: Color,
}

impl<'a> Default for Scene<'a> {
    fn default() -> Self {
        Self {
            lights: Vec::new(),
            primitives: Vec::new(),
            ambient_light: Color::splat(0.1),
            background: Color::BLACK,
        }
    }
}

impl<'a> Scene<'a> {
    /// Create an empty scene with a dim grey ambient light and black background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive to the scene.
    pub fn add(&mut self, primitive: &'a dyn Primitive) {
        self.primitives.push(primitive);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn with_ambient_light(mut self, ambient_light: Color) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Nearest valid hit along `ray`.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'a>> {
        nearest_hit(&self.primitives, ray)
    }

    /// True when some primitive is hit closer than `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f64) -> bool {
        self.primitives
            .iter()
            .any(|p| p.raycast(ray).is_some_and(|hit| hit.distance < max_distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use std::sync::Arc;
    use whitted_core::Material;
    use whitted_math::Vector3;

    #[test]
    fn test_scene_defaults() {
        let scene = Scene::new();
        assert_eq!(scene.ambient_light, Color::splat(0.1));
        assert_eq!(scene.background, Color::BLACK);
        assert!(scene.lights.is_empty());
    }

    #[test]
    fn test_occluded_respects_distance() {
        let sphere = Sphere::new(Vector3::new(0.0, 5.0, 0.0), 1.0, Arc::new(Material::default()));
        let mut scene = Scene::new();
        scene.add(&sphere);

        let up = Ray::new(Vector3::ZERO, Vector3::Y);
        assert!(scene.occluded(&up, 10.0));
        // Light between the origin and the sphere.
        assert!(!scene.occluded(&up, 3.0));
        assert!(!scene.occluded(&Ray::new(Vector3::ZERO, Vector3::X), 10.0));
    }
}
