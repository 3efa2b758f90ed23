//! Infinite plane primitive.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Interval, Ray, Vector3, EPSILON};

use crate::primitive::{Hit, Primitive};

/// An infinite plane through `point` with a fixed unit normal.
pub struct Plane {
    point: Vector3,
    normal: Vector3,
    material: Arc<Material>,
}

impl Plane {
    /// Create a new plane. A zero normal yields a plane no ray can hit.
    pub fn new(point: Vector3, normal: Vector3, material: Arc<Material>) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    pub fn point(&self) -> Vector3 {
        self.point
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Primitive for Plane {
    fn raycast(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = ray.normalized()?;

        let denom = self.normal.dot(ray.direction);
        if denom.abs() <= EPSILON {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if !Interval::FORWARD.surrounds(t) {
            return None;
        }

        Some(Hit {
            distance: t,
            normal: self.normal,
            material: &self.material,
        })
    }

    fn normal_at(&self, _point: Vector3) -> Vector3 {
        self.normal
    }
}
