//! Triangle primitive for ray tracing.
//!
//! Intersects the supporting plane first, then solves for barycentric
//! coordinates with the 2x2 system of edge dot products.

use std::sync::Arc;

use whitted_core::Material;
use whitted_math::{Interval, Ray, Vector3, EPSILON};

use crate::primitive::{Hit, Primitive};

/// Barycentric coordinates must lie strictly inside this range, so points on
/// edges and vertices are not inside.
const INTERIOR: Interval = Interval::new(0.0, 1.0);

/// Unit normal of the triangle `(a, b, c)` with counter-clockwise winding.
/// Degenerate triangles get a zero normal.
pub(crate) fn face_normal(a: Vector3, b: Vector3, c: Vector3) -> Vector3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Barycentric weights of `p` for vertices `(a, b, c)`, or `None` when the
/// triangle is degenerate.
pub(crate) fn barycentric(a: Vector3, b: Vector3, c: Vector3, p: Vector3) -> Option<[f64; 3]> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d00 = ab.dot(ab);
    let d01 = ab.dot(ac);
    let d11 = ac.dot(ac);
    let d20 = ap.dot(ab);
    let d21 = ap.dot(ac);

    let det = d00 * d11 - d01 * d01;
    if det.abs() < EPSILON {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / det;
    let w = (d00 * d21 - d01 * d20) / det;
    Some([1.0 - v - w, v, w])
}

/// Distance along a normalized ray to the interior of triangle `(a, b, c)`.
pub(crate) fn intersect(
    a: Vector3,
    b: Vector3,
    c: Vector3,
    normal: Vector3,
    ray: &Ray,
) -> Option<f64> {
    let denom = normal.dot(ray.direction);
    if denom.abs() <= EPSILON {
        return None;
    }

    let t = (a - ray.origin).dot(normal) / denom;
    if !Interval::FORWARD.surrounds(t) {
        return None;
    }

    let weights = barycentric(a, b, c, ray.at(t))?;
    weights
        .iter()
        .all(|&w| INTERIOR.surrounds(w))
        .then_some(t)
}

/// A standalone triangle owning its three vertices.
pub struct Triangle {
    vertices: [Vector3; 3],
    /// Pre-computed face normal (unit length, zero when degenerate)
    normal: Vector3,
    material: Arc<Material>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3, material: Arc<Material>) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normal: face_normal(v0, v1, v2),
            material,
        }
    }

    pub fn vertices(&self) -> &[Vector3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vector3 {
        self.normal
    }
}

impl Primitive for Triangle {
    fn raycast(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = ray.normalized()?;
        let [a, b, c] = self.vertices;

        let distance = intersect(a, b, c, self.normal, &ray)?;
        Some(Hit {
            distance,
            normal: self.normal,
            material: &self.material,
        })
    }

    fn normal_at(&self, _point: Vector3) -> Vector3 {
        self.normal
    }
}
