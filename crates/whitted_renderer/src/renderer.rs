//! Render loop.
//!
//! Rows are emitted top to bottom, so camera row `H - 1` becomes image row
//! 0. The parallel loop shades rows on the rayon pool and reassembles them in
//! the same order, so both loops produce identical images.

use rayon::prelude::*;
use whitted_math::Color;

use crate::camera::Camera;
use crate::scene::Scene;
use crate::shader::shade;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Maximum number of reflection/refraction bounces
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_depth: 3 }
    }
}

/// Simple image buffer for storing render output, in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), with y = 0 the top row.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Quantized RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgb8()).collect()
    }
}

/// Shade the pixel at camera `(row, col)`.
pub fn render_pixel(camera: &Camera, scene: &Scene<'_>, row: u32, col: u32, config: &RenderConfig) -> Color {
    shade(scene, &camera.primary_ray(row, col), config.max_depth)
}

fn render_row(camera: &Camera, scene: &Scene<'_>, row: u32, config: &RenderConfig) -> Vec<Color> {
    (0..camera.image_width)
        .map(|col| render_pixel(camera, scene, row, col, config))
        .collect()
}

/// Render the entire scene on the calling thread.
pub fn render(camera: &Camera, scene: &Scene<'_>, config: &RenderConfig) -> ImageBuffer {
    log::info!(
        "Rendering {}x{} (max depth {}, {} primitives, {} lights)",
        camera.image_width,
        camera.image_height,
        config.max_depth,
        scene.primitives.len(),
        scene.lights.len()
    );

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for (y, row) in (0..camera.image_height).rev().enumerate() {
        for col in 0..camera.image_width {
            image.set(col, y as u32, render_pixel(camera, scene, row, col, config));
        }
    }

    log::info!("Render complete");
    image
}

/// Render the scene with rows distributed over the rayon thread pool.
pub fn render_parallel(camera: &Camera, scene: &Scene<'_>, config: &RenderConfig) -> ImageBuffer {
    log::info!(
        "Rendering {}x{} on {} threads (max depth {})",
        camera.image_width,
        camera.image_height,
        rayon::current_num_threads(),
        config.max_depth
    );

    let rows: Vec<Vec<Color>> = (0..camera.image_height)
        .into_par_iter()
        .rev()
        .map(|row| render_row(camera, scene, row, config))
        .collect();

    log::info!("Render complete");
    ImageBuffer {
        width: camera.image_width,
        height: camera.image_height,
        pixels: rows.into_iter().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Light, Plane, Primitive, Sphere};
    use std::sync::Arc;
    use whitted_core::Material;
    use whitted_math::{Ray, Vector3, EPSILON};

    const LIGHT: Vector3 = Vector3::new(0.0, 8.0, -5.0);

    fn floor_material() -> Arc<Material> {
        Arc::new(Material::new("floor", Color::new(0.5, 0.25, 0.0)))
    }

    fn camera(width: u32, height: u32) -> Camera {
        Camera::new(Vector3::new(-2.0, 3.0, 0.0), Vector3::new(6.0, 1.5, 0.0))
            .unwrap()
            .with_resolution(width, height)
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::WHITE);
        assert_eq!(image.get(3, 2), Color::WHITE);
        assert_eq!(image.pixels[11], Color::WHITE);
        assert_eq!(image.to_rgb8().len(), 36);
        assert_eq!(&image.to_rgb8()[33..], &[255, 255, 255]);
    }

    #[test]
    fn test_plane_diffuse_only() {
        let floor = Plane::new(Vector3::ZERO, Vector3::Y, floor_material());
        let mut scene = Scene::new().with_ambient_light(Color::new(0.1, 0.1, 0.4));
        scene.add(&floor);
        scene.add_light(Light::new(LIGHT));

        let camera = camera(32, 18);
        let image = render(&camera, &scene, &RenderConfig { max_depth: 0 });
        let ambient = Color::new(0.1, 0.1, 0.4) * Color::splat(0.1);

        let mut below = 0;
        for (y, row) in (0..camera.image_height).rev().enumerate() {
            for col in 0..camera.image_width {
                let pixel = image.get(col, y as u32);
                let ray = camera.primary_ray(row, col);

                if ray.direction.y >= 0.0 {
                    assert_eq!(pixel, Color::BLACK);
                    continue;
                }
                below += 1;

                let t = -ray.origin.y / ray.direction.y;
                let origin = ray.at(t) + Vector3::Y * EPSILON;
                let cos = (LIGHT - origin).normalize().y;
                let expected = Color::new(0.5, 0.25, 0.0) * cos + ambient;

                assert!((pixel.r - expected.r).abs() < 1e-9, "{:?} vs {:?}", pixel, expected);
                assert!((pixel.g - expected.g).abs() < 1e-9);
                assert!((pixel.b - expected.b).abs() < 1e-9);
            }
        }
        assert!(below > 0);
    }

    #[test]
    fn test_shadowed_pixels_are_ambient_only() {
        let floor = Plane::new(Vector3::ZERO, Vector3::Y, floor_material());
        // Halfway between the light and a visible floor point.
        let blocker = Sphere::new((LIGHT + Vector3::new(5.0, 0.0, 0.0)) * 0.5, 1.0, floor_material());
        let mut scene = Scene::new().with_ambient_light(Color::new(0.1, 0.1, 0.4));
        scene.add(&floor);
        scene.add(&blocker);
        scene.add_light(Light::new(LIGHT));

        let camera = camera(64, 36);
        let image = render(&camera, &scene, &RenderConfig { max_depth: 0 });
        let ambient = Color::new(0.1, 0.1, 0.4) * Color::splat(0.1);

        let mut shadowed = 0;
        for (y, row) in (0..camera.image_height).rev().enumerate() {
            for col in 0..camera.image_width {
                let ray = camera.primary_ray(row, col).normalized().unwrap();
                let Some(hit) = scene.nearest_hit(&ray) else {
                    continue;
                };
                if hit.normal != Vector3::Y {
                    continue;
                }

                let origin = ray.at(hit.distance) + Vector3::Y * EPSILON;
                let shadow = Ray::new(origin, (LIGHT - origin).normalize());
                if blocker.raycast(&shadow).is_some() {
                    shadowed += 1;
                    assert_eq!(image.get(col, y as u32), ambient);
                }
            }
        }
        assert!(shadowed > 0);
    }

    #[test]
    fn test_glass_sphere_stays_bounded() {
        let floor_mat = Arc::new(
            Material::new("floor", Color::new(0.5, 0.25, 0.0))
                .with_specular(Color::splat(0.9), 10.0),
        );
        let glass = Arc::new(
            Material::new("glass", Color::splat(0.9))
                .with_specular(Color::splat(0.5), 10.0)
                .with_transparency(0.5, 1.5),
        );
        let floor = Plane::new(Vector3::ZERO, Vector3::Y, Arc::clone(&floor_mat));
        let sphere = Sphere::new(Vector3::new(6.0, 1.5, 0.0), 2.0, Arc::clone(&glass));
        let mut scene = Scene::new().with_ambient_light(Color::new(0.1, 0.1, 0.4));
        scene.add(&floor);
        scene.add(&sphere);
        scene.add_light(Light::new(LIGHT));

        let config = RenderConfig { max_depth: 3 };
        let image = render(&camera(48, 27), &scene, &config);

        // Local term bound: diffuse + specular per light, plus ambient.
        let local = [&floor_mat, &glass]
            .iter()
            .map(|m| {
                m.diffuse.max_channel()
                    + m.specular.max_channel()
                    + scene.ambient_light.max_channel() * m.ambient.max_channel()
            })
            .fold(0.0, f64::max);
        let gain = [&floor_mat, &glass]
            .iter()
            .map(|m| m.specular.max_channel() + (1.0 - m.opacity).max(0.0))
            .fold(0.0, f64::max);
        let bound: f64 = (0..=config.max_depth).map(|d| local * gain.powi(d as i32)).sum();

        for pixel in &image.pixels {
            assert!(pixel.is_finite());
            for c in pixel.to_array() {
                assert!(c >= 0.0 && c <= bound + 1e-9, "{:?} exceeds {}", pixel, bound);
            }
        }
    }

    #[test]
    fn test_render_is_deterministic_and_parallel_matches() {
        let floor = Plane::new(Vector3::ZERO, Vector3::Y, floor_material());
        let glass = Arc::new(Material::new("glass", Color::splat(0.9)).with_transparency(0.5, 1.5));
        let sphere = Sphere::new(Vector3::new(6.0, 1.5, 0.0), 2.0, glass);
        let mut scene = Scene::new();
        scene.add(&floor);
        scene.add(&sphere);
        scene.add_light(Light::new(LIGHT));

        let camera = camera(40, 22);
        let config = RenderConfig::default();
        let first = render(&camera, &scene, &config);
        let second = render(&camera, &scene, &config);
        let parallel = render_parallel(&camera, &scene, &config);

        assert_eq!(first.to_rgb8(), second.to_rgb8());
        assert_eq!(first, parallel);
    }

    #[test]
    fn test_top_row_comes_first() {
        // Light floor below the horizon, dark background above it.
        let floor = Plane::new(Vector3::ZERO, Vector3::Y, floor_material());
        let mut scene = Scene::new().with_ambient_light(Color::WHITE);
        scene.add(&floor);

        let camera = camera(8, 8);
        let image = render(&camera, &scene, &RenderConfig { max_depth: 0 });
        assert_eq!(image.get(0, 0), Color::BLACK);
        assert!(!image.get(0, 7).is_black());
    }
}
