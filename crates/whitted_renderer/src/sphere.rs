//! Sphere primitive for ray tracing.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Interval, Ray, Vector3};

use crate::primitive::{Hit, Primitive};

/// A sphere primitive.
pub struct Sphere {
    center: Vector3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vector3, radius: f64, material: Arc<Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn raycast(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = ray.normalized()?;

        // Geometric test: project the center onto the ray. A center behind
        // the origin is a miss, even when the origin lies inside the sphere.
        let oc = self.center - ray.origin;
        let projection = oc.dot(ray.direction);
        if projection < 0.0 {
            return None;
        }

        let radius_sq = self.radius * self.radius;
        let dist_sq = oc.length_squared() - projection * projection;
        if dist_sq > radius_sq {
            return None;
        }

        let half_chord = (radius_sq - dist_sq).sqrt();
        let near = projection - half_chord;
        let far = projection + half_chord;

        let distance = [near, far]
            .into_iter()
            .find(|&t| Interval::FORWARD.surrounds(t))?;

        Some(Hit {
            distance,
            normal: self.normal_at(ray.at(distance)),
            material: &self.material,
        })
    }

    fn normal_at(&self, point: Vector3) -> Vector3 {
        (point - self.center).normalize_or_zero()
    }
}
