//! Pinhole camera with a virtual screen.

use thiserror::Error;
use whitted_math::{MathError, Ray, Vector3, Vector3Ext};

/// Errors that can occur while building a camera.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error("Camera target coincides with its position: {0}")]
    TargetAtPosition(#[source] MathError),

    #[error("Camera looks straight along the world up axis: {0}")]
    LooksAlongUp(#[source] MathError),
}

/// Camera for generating primary rays.
///
/// The screen is a rectangle `screen_distance` in front of the eye, centered
/// on the view axis and divided into `image_width` x `image_height` pixels.
/// Row indices grow upward.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    position: Vector3,
    target: Vector3,
    world_up: Vector3,

    // Virtual screen
    screen_distance: f64,
    screen_width: f64,
    screen_height: f64,

    // Orthonormal basis
    forward: Vector3,
    right: Vector3,
    up: Vector3,
}

impl Camera {
    /// Create a camera at `position` looking at `target`, with a 1600x900
    /// image on a 1.6 x 0.9 screen one unit away.
    pub fn new(position: Vector3, target: Vector3) -> Result<Self, CameraError> {
        let world_up = Vector3::Y;
        let forward = (target - position)
            .normalized()
            .map_err(CameraError::TargetAtPosition)?;
        let right = forward
            .cross(world_up)
            .normalized()
            .map_err(CameraError::LooksAlongUp)?;
        let up = right.cross(forward);

        Ok(Self {
            image_width: 1600,
            image_height: 900,
            position,
            target,
            world_up,
            screen_distance: 1.0,
            screen_width: 1.6,
            screen_height: 0.9,
            forward,
            right,
            up,
        })
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the distance and physical size of the virtual screen.
    pub fn with_screen(mut self, distance: f64, width: f64, height: f64) -> Self {
        self.screen_distance = distance;
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn world_up(&self) -> Vector3 {
        self.world_up
    }

    /// The (forward, right, up) basis.
    pub fn basis(&self) -> (Vector3, Vector3, Vector3) {
        (self.forward, self.right, self.up)
    }

    /// World position of the center of pixel `(row, col)`.
    pub fn screen_to_world(&self, row: u32, col: u32) -> Vector3 {
        let pixel_width = self.screen_width / self.image_width as f64;
        let pixel_height = self.screen_height / self.image_height as f64;

        let center = self.position + self.forward * self.screen_distance;
        let dv = (row as f64 - (self.image_height as f64 - 1.0) * 0.5) * pixel_height;
        let du = (col as f64 - (self.image_width as f64 - 1.0) * 0.5) * pixel_width;

        center + self.up * dv + self.right * du
    }

    /// Normalized ray from the eye through pixel `(row, col)`.
    pub fn primary_ray(&self, row: u32, col: u32) -> Ray {
        let direction = self.screen_to_world(row, col) - self.position;
        Ray::new(self.position, direction.normalize_or_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let camera = Camera::new(Vector3::new(-2.0, 3.0, 0.0), Vector3::new(6.0, 1.5, 0.0)).unwrap();
        let (forward, right, up) = camera.basis();

        for v in [forward, right, up] {
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
        assert!(forward.dot(right).abs() < 1e-12);
        assert!(forward.dot(up).abs() < 1e-12);
        assert!(right.dot(up).abs() < 1e-12);
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_right_is_screen_right() {
        // Looking down -Z with +Y up, right is +X.
        let camera = Camera::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let (_, right, up) = camera.basis();
        assert!((right - Vector3::X).length() < 1e-12);
        assert!((up - Vector3::Y).length() < 1e-12);
    }

    #[test]
    fn test_target_at_position_fails() {
        let result = Camera::new(Vector3::ONE, Vector3::ONE);
        assert_eq!(result.unwrap_err(), CameraError::TargetAtPosition(MathError::ZeroLength));
    }

    #[test]
    fn test_looking_straight_up_fails() {
        let result = Camera::new(Vector3::ZERO, Vector3::new(0.0, 5.0, 0.0));
        assert_eq!(result.unwrap_err(), CameraError::LooksAlongUp(MathError::ZeroLength));
    }

    #[test]
    fn test_screen_to_world() {
        let camera = Camera::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0))
            .unwrap()
            .with_resolution(3, 3)
            .with_screen(2.0, 3.0, 3.0);

        // Center pixel is on the view axis.
        assert!((camera.screen_to_world(1, 1) - Vector3::new(0.0, 0.0, -2.0)).length() < 1e-12);
        // Row 0 is the bottom row, col 0 the left column.
        assert!((camera.screen_to_world(0, 0) - Vector3::new(-1.0, -1.0, -2.0)).length() < 1e-12);
        assert!((camera.screen_to_world(2, 2) - Vector3::new(1.0, 1.0, -2.0)).length() < 1e-12);
    }

    #[test]
    fn test_primary_ray_is_normalized() {
        let camera = Camera::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 0.0, -1.0))
            .unwrap()
            .with_resolution(16, 9);

        for (row, col) in [(0, 0), (4, 8), (8, 15)] {
            let ray = camera.primary_ray(row, col);
            assert_eq!(ray.origin, camera.position());
            assert!((ray.direction.length() - 1.0).abs() < 1e-12);
        }
    }
}
