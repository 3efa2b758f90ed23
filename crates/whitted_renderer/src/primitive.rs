//! Primitive trait and Hit record for ray-object intersection.

use whitted_core::Material;
use whitted_math::{Ray, Vector3};

/// Nearest valid intersection of a ray with a primitive.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Distance from the ray origin along the normalized direction
    pub distance: f64,
    /// Outward unit normal of the surface at the hit point
    pub normal: Vector3,
    /// Material of the surface that was hit
    pub material: &'a Material,
}

/// Trait for objects that can be hit by rays.
///
/// Implementations normalize the ray direction themselves. A zero-length
/// direction, parallel or degenerate geometry, and hits no farther than
/// `EPSILON` all report `None`.
pub trait Primitive: Send + Sync {
    /// Nearest valid intersection along `ray`.
    fn raycast(&self, ray: &Ray) -> Option<Hit<'_>>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vector3) -> Vector3;
}

/// Nearest hit over a set of primitives.
pub fn nearest_hit<'a>(primitives: &[&'a dyn Primitive], ray: &Ray) -> Option<Hit<'a>> {
    let mut closest: Option<Hit<'a>> = None;

    for &primitive in primitives {
        if let Some(hit) = primitive.raycast(ray) {
            if closest.map_or(true, |c| hit.distance < c.distance) {
                closest = Some(hit);
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Sphere};
    use std::sync::Arc;
    use whitted_math::Color;

    #[test]
    fn test_nearest_hit_picks_closest() {
        let near = Arc::new(Material::new("near", Color::new(1.0, 0.0, 0.0)));
        let far = Arc::new(Material::new("far", Color::new(0.0, 0.0, 1.0)));
        let back_wall = Plane::new(Vector3::new(0.0, 0.0, -10.0), Vector3::Z, far);
        let sphere = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, near);
        let primitives: Vec<&dyn Primitive> = vec![&back_wall, &sphere];

        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        let hit = nearest_hit(&primitives, &ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert_eq!(hit.material.name, "near");
        assert!((hit.normal - Vector3::Z).length() < 1e-12);
    }

    #[test]
    fn test_nearest_hit_empty() {
        let ray = Ray::new(Vector3::ZERO, Vector3::X);
        assert!(nearest_hit(&[], &ray).is_none());
    }
}
