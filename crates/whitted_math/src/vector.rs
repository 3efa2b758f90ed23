//! Vector helpers on top of glam's `DVec3`.

use thiserror::Error;

use crate::Vector3;

/// Errors raised by vector algebra preconditions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLength,
}

/// Extension trait for `Vector3` with checked normalization.
pub trait Vector3Ext: Sized {
    /// Return the unit vector pointing the same way.
    ///
    /// Zero-length (or non-finite) input is rejected instead of silently
    /// producing NaN components.
    fn normalized(self) -> Result<Self, MathError>;
}

impl Vector3Ext for Vector3 {
    fn normalized(self) -> Result<Self, MathError> {
        self.try_normalize().ok_or(MathError::ZeroLength)
    }
}

/// Mirror `v` about the unit normal `n`.
///
/// The result satisfies `r·n = -v·n`, so `v` points toward the surface and
/// the result points away from it.
#[inline]
pub fn reflect(v: Vector3, n: Vector3) -> Vector3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit direction `v` through a surface with unit normal `n`.
///
/// `n` must face the incoming ray (`v·n <= 0`) and `ratio` is
/// `n_incident / n_transmitted`. Returns `None` on total internal reflection.
/// The result is a unit vector for unit `v`; at normal incidence it is `v`
/// itself, not `v` scaled by `ratio`.
#[inline]
pub fn refract(v: Vector3, n: Vector3, ratio: f64) -> Option<Vector3> {
    let cos_i = -v.dot(n);
    let k = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(ratio * v + (ratio * cos_i - k.sqrt()) * n)
}
