use crate::Vector3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is stored as given; intersection code normalizes it before
/// measuring distances, so `at(t)` on a normalized ray is `t` units from the
/// origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// The same ray with a unit-length direction, or `None` when the
    /// direction has zero length.
    pub fn normalized(&self) -> Option<Ray> {
        self.direction
            .try_normalize()
            .map(|direction| Ray::new(self.origin, direction))
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }
}
