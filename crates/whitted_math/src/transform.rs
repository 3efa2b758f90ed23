// Mesh placement transform
//
// Builds the one-shot affine matrix that moves a mesh from its authored
// coordinates into the scene: center -> rotate -> scale -> place.

use glam::{DMat4, DVec3};

use crate::{Aabb, EPSILON};

/// Where and how a mesh sits in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World position of the mesh's bounding-box center.
    pub position: DVec3,
    /// Euler angles in degrees, applied about X, then Y, then Z.
    pub rotation_degrees: DVec3,
    /// Per-axis size relative to a mesh whose bounding diagonal is 1.
    pub scale: DVec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation_degrees: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Placement {
    /// Create a placement at `position` with no rotation and unit scale.
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation_degrees: DVec3) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    /// Set the per-axis scale.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Matrix taking authored vertices with the given bounds to world space.
    ///
    /// The order is load-bearing: vertices are recentered on the bounding-box
    /// midpoint, rotated about X, Y then Z, scaled by `scale / diagonal`, and
    /// finally translated to `position`.
    pub fn matrix(&self, bounds: &Aabb) -> DMat4 {
        let recenter = DMat4::from_translation(-bounds.centroid());

        let mut rotation = DMat4::IDENTITY;
        let radians = DVec3::new(
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.z.to_radians(),
        );
        if radians.x != 0.0 {
            rotation = DMat4::from_rotation_x(radians.x) * rotation;
        }
        if radians.y != 0.0 {
            rotation = DMat4::from_rotation_y(radians.y) * rotation;
        }
        if radians.z != 0.0 {
            rotation = DMat4::from_rotation_z(radians.z) * rotation;
        }

        let diagonal = bounds.diagonal();
        let normalization = if diagonal > EPSILON { 1.0 / diagonal } else { 1.0 };
        let scale = DMat4::from_scale(self.scale * normalization);

        let place = DMat4::from_translation(self.position);

        place * scale * rotation * recenter
    }
}
