use std::ops::{ Add, Sub, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Radiance
/// computed by the tracer is unbounded; values are only clamped to 0.0..=1.0
/// when written to a pixel.
///
/// # Examples
///
/// Blend two colors:
///
/// ```
/// # use whitted::color::Color;
/// let green = Color::rgb(0.0, 1.0, 0.0);
/// let blue = Color::rgb(0.0, 0.0, 1.0);
/// let blend = Color::mix(&green, &blue, 0.5);
/// assert_eq!(blend, Color::rgb(0.0, 0.5, 0.5));
/// ```
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(c: [f64; 3]) -> Color {
        Color { r: c[0], g: c[1], b: c[2] }
    }
}

impl From<Color> for [f64; 3] {
    fn from(c: Color) -> [f64; 3] {
        [c.r, c.g, c.b]
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Creates a gray with every channel set to `v`.
    pub fn gray(v: f64) -> Color {
        Color { r: v, g: v, b: v }
    }

    /// The color black.
    pub fn black() -> Color {
        Color::gray(0.0)
    }

    /// The color white.
    pub fn white() -> Color {
        Color::gray(1.0)
    }

    /// Computes the Hadamard (per-channel) product of two colors.
    ///
    /// ```
    /// # use whitted::color::Color;
    /// let yellow = Color::rgb(1.0, 1.0, 0.0);
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// assert_eq!(Color::hadamard(&yellow, &purple), Color::rgb(1.0, 0.0, 0.0));
    /// ```
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Linearly interpolates between two colors: `c1 * (1 - p) + c2 * p`.
    pub fn mix(c1: &Color, c2: &Color, p: f64) -> Color {
        *c1 * (1.0 - p) + *c2 * p
    }

    /// Converts to 8-bit channels, clamping each channel to `[0, 1]` first.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0) as u8,
        ]
    }
}

/// Adds two colors together.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Subtracts one color from another, channel by channel.
impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(c1 * Color::rgb(0.5, 0.0, 2.0), Color::rgb(0.1, 0.0, 0.8));
}

#[test]
fn clamp_to_bytes() {
    assert_eq!(Color::rgb(1.7, 0.5, -0.2).to_rgb8(), [255, 127, 0]);
    assert_eq!(Color::white().to_rgb8(), [255, 255, 255]);
    assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
}

#[test]
fn colors_deserialize_from_arrays() {
    let c: Color = serde_json::from_str("[0.25, 0.5, 1.0]").unwrap();

    assert_eq!(c, Color::rgb(0.25, 0.5, 1.0));
}
