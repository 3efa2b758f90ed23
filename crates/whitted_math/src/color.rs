//! Radiometric RGB color.
//!
//! Kept separate from `Vector3` so geometric and radiometric quantities
//! cannot be mixed by accident. Channels are unbounded while shading and only
//! clamped when converted to bytes.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use crate::Interval;

/// Upper bound of a channel after scaling to the byte range.
const CHANNEL_MAX: f64 = 255.99;

/// An RGB color with `f64` channels in `[0, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a new color.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create a grey with all three channels set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Create a color from an `[r, g, b]` array.
    pub fn from_array(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel is exactly zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// True when every channel is a finite number.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Largest of the three channels.
    pub fn max_channel(&self) -> f64 {
        self.r.max(self.g).max(self.b)
    }

    /// Quantize to 8-bit RGB: each channel is scaled by 255.99, clamped to
    /// `[0, 255.99]` and truncated.
    pub fn to_rgb8(self) -> [u8; 3] {
        let range = Interval::new(0.0, CHANNEL_MAX);
        let quantize = |c: f64| {
            // NaN maps to 0 through the float-to-int cast.
            range.clamp(c * CHANNEL_MAX) as u8
        };
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }
}

impl Add for Color {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Mul for Color {
    type Output = Self; // component-wise
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for Color {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;
    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

impl MulAssign<f64> for Color {
    fn mul_assign(&mut self, rhs: f64) {
        self.r *= rhs;
        self.g *= rhs;
        self.b *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_arithmetic() {
        let a = Color::new(0.5, 0.25, 1.0);
        let b = Color::new(2.0, 4.0, 0.5);

        assert_eq!(a + b, Color::new(2.5, 4.25, 1.5));
        assert_eq!(a * b, Color::new(1.0, 1.0, 0.5));
        assert_eq!(a * 2.0, Color::new(1.0, 0.5, 2.0));
        assert_eq!(2.0 * a, a * 2.0);

        let mut c = Color::BLACK;
        c += a;
        c *= 4.0;
        assert_eq!(c, Color::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn test_is_black() {
        assert!(Color::BLACK.is_black());
        assert!(Color::default().is_black());
        assert!(!Color::new(0.0, 0.0, 1e-9).is_black());
    }

    #[test]
    fn test_to_rgb8_clamps() {
        assert_eq!(Color::BLACK.to_rgb8(), [0, 0, 0]);
        assert_eq!(Color::WHITE.to_rgb8(), [255, 255, 255]);
        assert_eq!(Color::new(0.5, 2.0, -1.0).to_rgb8(), [127, 255, 0]);
        assert_eq!(Color::new(f64::NAN, 0.1, 0.0).to_rgb8(), [0, 25, 0]);
    }
}
