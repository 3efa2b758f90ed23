//! Recursive Whitted shading.
//!
//! Local Phong lighting with hard shadows, plus mirror reflection and Snell
//! refraction spawned recursively up to a fixed depth.

use whitted_core::Material;
use whitted_math::{reflect, refract, Color, Ray, Vector3, EPSILON};

use crate::scene::Scene;

/// Compute the color seen by a ray.
///
/// `depth` is the number of secondary bounces still allowed; at zero only
/// local lighting is evaluated.
pub fn shade(scene: &Scene<'_>, ray: &Ray, depth: u32) -> Color {
    let Some(ray) = ray.normalized() else {
        return scene.background;
    };
    let Some(hit) = scene.nearest_hit(&ray) else {
        return scene.background;
    };

    let point = ray.at(hit.distance);
    let normal = hit.normal;
    let material = hit.material;
    let view = ray.direction;
    let mirror = reflect(view, normal);

    let mut color = direct_lighting(scene, point, normal, mirror, material);
    color += scene.ambient_light * material.ambient;

    if depth == 0 {
        return color;
    }

    // Normal on the side the ray arrives from.
    let entering = view.dot(normal) < 0.0;
    let facing = if entering { normal } else { -normal };

    if material.is_reflective() {
        let reflected = Ray::new(point + facing * EPSILON, mirror);
        color += material.specular * shade(scene, &reflected, depth - 1);
    }

    if material.is_transmissive() {
        let ratio = if entering {
            1.0 / material.refractive_index
        } else {
            material.refractive_index
        };
        let direction = refract(view, facing, ratio).unwrap_or(mirror);
        // Start just off the surface on the side the ray travels into.
        let side = if direction.dot(facing) < 0.0 { -facing } else { facing };
        let transmitted = Ray::new(point + side * EPSILON, direction);

        let weight = (1.0 - material.opacity).max(0.0);
        color += shade(scene, &transmitted, depth - 1) * weight;
    }

    color
}

/// Diffuse and specular contribution of every unoccluded light.
fn direct_lighting(
    scene: &Scene<'_>,
    point: Vector3,
    normal: Vector3,
    mirror: Vector3,
    material: &Material,
) -> Color {
    let origin = point + normal * EPSILON;
    let mut color = Color::BLACK;

    for light in &scene.lights {
        let to_light = light.position - origin;
        let distance = to_light.length();
        let Some(direction) = to_light.try_normalize() else {
            continue;
        };

        // A light behind the surface contributes nothing.
        let cos = normal.dot(direction);
        if cos <= 0.0 {
            continue;
        }
        if scene.occluded(&Ray::new(origin, direction), distance) {
            continue;
        }

        color += light.color * material.diffuse * cos;
        let highlight = mirror.dot(direction).max(0.0).powf(material.shininess);
        color += light.color * material.specular * highlight;
    }

    color
}
