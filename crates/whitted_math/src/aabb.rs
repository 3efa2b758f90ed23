use crate::{Interval, Vector3};

/// Axis-aligned bounding box, used to recenter and size meshes.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vector3, b: Vector3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Tightest box around a set of points. Empty input gives `Aabb::EMPTY`.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Vector3>) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |bounds, p| bounds.include(*p))
    }

    /// Grow the box so it contains `p`.
    pub fn include(&self, p: Vector3) -> Aabb {
        Self {
            x: self.x.include(p.x),
            y: self.y.include(p.y),
            z: self.z.include(p.z),
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vector3 {
        Vector3::new(self.x.center(), self.y.center(), self.z.center())
    }

    /// Edge lengths along each axis.
    pub fn extent(&self) -> Vector3 {
        Vector3::new(self.x.size(), self.y.size(), self.z.size())
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.extent().length()
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
