// Re-export glam for convenience
pub use glam::*;

// Whitted math types
mod aabb;
mod color;
mod interval;
mod ray;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use color::Color;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Placement;
pub use vector::{reflect, refract, MathError, Vector3Ext};

/// Points and directions in world space.
pub type Vector3 = DVec3;

/// Tolerance used to reject self-intersections and near-parallel or
/// degenerate geometry.
pub const EPSILON: f64 = 1.0e-8;
