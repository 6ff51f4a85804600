use std::ops::{ Add, Sub, Mul };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Visible colors range from
/// 0.0 to 1.0, but shading sums light contributions without clamping, so
/// intermediate colors may exceed 1.0. Clamping happens on output.
///
/// # Examples
///
/// Mixing light:
///
/// ```
/// # use glint::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::red());
/// assert_eq!(yellow + purple, Color::rgb(2.0, 1.0, 1.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise, within `FEQ_EPSILON`.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// Conversion from an `[r, g, b]` array, as found in scene files.
impl From<[f64; 3]> for Color {
    fn from(v: [f64; 3]) -> Color {
        Color { r: v[0], g: v[1], b: v[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    pub fn red() -> Color {
        Color { r: 1.0, g: 0.0, b: 0.0 }
    }

    pub fn green() -> Color {
        Color { r: 0.0, g: 1.0, b: 0.0 }
    }

    pub fn blue() -> Color {
        Color { r: 0.0, g: 0.0, b: 1.0 }
    }

    /// Computes the Hadamard product of two colors.
    ///
    /// Each component of the two colors is multiplied together. This is how
    /// a surface color filters the color of incoming light.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Maps the color to 8-bit channels, clamping to `[0, 255]` and rounding
    /// up.
    pub fn to_bytes(&self) -> [u8; 3] {
        fn channel(c: f64) -> u8 {
            (c * 255.0).ceil().clamp(0.0, 255.0) as u8
        }

        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

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
    assert_eq!(2.0 * c1, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(Color::rgb(1.0, 0.2, 0.4) * Color::rgb(0.9, 1.0, 0.1),
        Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn bytes_are_clamped_and_rounded_up() {
    assert_eq!(Color::rgb(1.5, 0.0, -0.5).to_bytes(), [255, 0, 0]);
    assert_eq!(Color::rgb(0.0, 0.5, 1.0).to_bytes(), [0, 128, 255]);
    assert_eq!(Color::rgb(0.1, 0.7, 0.3).to_bytes(), [26, 179, 77]);
}
