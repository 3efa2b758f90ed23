//! Point lights.

use whitted_math::{Color, Vector3};

/// A point light without distance attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3,
    pub color: Color,
}

impl Light {
    /// Create a white light at `position`.
    pub fn new(position: Vector3) -> Self {
        Self {
            position,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
