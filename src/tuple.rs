use std::ops::{ Add, Sub, Neg, Mul, Div, Index, IndexMut };

use crate::feq;

/// A homogeneous 4D tuple.
///
/// Points carry `w == 1.0` and vectors carry `w == 0.0`. The arithmetic
/// operators work on all four components, so subtracting two points yields a
/// vector and adding a vector to a point yields a point.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Tuple4D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

/// Component-wise approximate equality.
///
/// Infinite components compare equal to an infinity of the same sign, which
/// keeps unbounded bounding boxes comparable.
impl PartialEq for Tuple4D {
    fn eq(&self, other: &Tuple4D) -> bool {
        (0..4).all(|i| feq(self[i], other[i]))
    }
}

impl Tuple4D {
    pub fn tuple(x: f64, y: f64, z: f64, w: f64) -> Tuple4D {
        Tuple4D { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 1.0 }
    }

    pub fn vector(x: f64, y: f64, z: f64) -> Tuple4D {
        Tuple4D { x, y, z, w: 0.0 }
    }

    /// The object-space origin.
    pub fn origin() -> Tuple4D {
        Tuple4D::point(0.0, 0.0, 0.0)
    }

    pub fn is_point(&self) -> bool {
        self.w == 1.0
    }

    pub fn is_vector(&self) -> bool {
        self.w == 0.0
    }

    /// Applies `f` to each pair of matching components.
    fn zip_with(self, other: Tuple4D, f: impl Fn(f64, f64) -> f64) -> Tuple4D {
        Tuple4D {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
            z: f(self.z, other.z),
            w: f(self.w, other.w),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Tuple4D {
        self.zip_with(self, |a, _| f(a))
    }

    /// The smaller of each spatial component. `w` is taken from `self`.
    pub fn min_by_axis(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D { w: self.w, ..self.zip_with(*other, f64::min) }
    }

    /// The larger of each spatial component. `w` is taken from `self`.
    pub fn max_by_axis(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D { w: self.w, ..self.zip_with(*other, f64::max) }
    }

    /// True if no spatial component is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn dot(&self, other: &Tuple4D) -> f64 {
        (0..4).map(|i| self[i] * other[i]).sum()
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Tuple4D {
        *self / self.magnitude()
    }

    /// The 3D cross product. The result is always a vector.
    pub fn cross(&self, other: &Tuple4D) -> Tuple4D {
        Tuple4D::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Tuple4D) -> Tuple4D {
        *self - (*normal * 2.0 * self.dot(normal))
    }
}

/// Indexes the components of a tuple by axis (`0` is X, `2` is Z, `3` is W).
///
/// Anything larger panics.
impl Index<usize> for Tuple4D {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Tuple4D axis {} is out of range.", axis),
        }
    }
}

impl IndexMut<usize> for Tuple4D {
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Tuple4D axis {} is out of range.", axis),
        }
    }
}

impl Add for Tuple4D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for Tuple4D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl Neg for Tuple4D {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|a| -a)
    }
}

/// Scales every component, `w` included.
///
/// ```
/// use glint::tuple::Tuple4D;
///
/// let v = Tuple4D::vector(1.0, -2.0, 0.5);
/// assert_eq!(v * 2.0, 2.0 * v);
/// assert_eq!(v * 2.0, Tuple4D::vector(2.0, -4.0, 1.0));
/// ```
impl Mul<f64> for Tuple4D {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        self.map(|a| a * k)
    }
}

impl Mul<Tuple4D> for f64 {
    type Output = Tuple4D;

    fn mul(self, t: Tuple4D) -> Tuple4D {
        t * self
    }
}

impl Div<f64> for Tuple4D {
    type Output = Self;

    fn div(self, k: f64) -> Self {
        self.map(|a| a / k)
    }
}

#[test]
fn point_and_vector_flags() {
    assert!(Tuple4D::point(4.3, -4.2, 3.1).is_point());
    assert!(!Tuple4D::point(4.3, -4.2, 3.1).is_vector());
    assert!(Tuple4D::vector(4.3, -4.2, 3.1).is_vector());
}

#[test]
fn homogeneous_arithmetic() {
    let p = Tuple4D::point(3.0, 2.0, 1.0);
    let q = Tuple4D::point(5.0, 6.0, 7.0);
    let v = Tuple4D::vector(5.0, 6.0, 7.0);

    assert_eq!(p - q, Tuple4D::vector(-2.0, -4.0, -6.0));
    assert_eq!(p - v, Tuple4D::point(-2.0, -4.0, -6.0));
    assert_eq!(p + v, Tuple4D::point(8.0, 8.0, 8.0));
    assert_eq!(-v, Tuple4D::vector(-5.0, -6.0, -7.0));
}

#[test]
fn scaling_tuples() {
    let a = Tuple4D::tuple(1.0, -2.0, 3.0, -4.0);

    assert_eq!(a * 3.5, Tuple4D::tuple(3.5, -7.0, 10.5, -14.0));
    assert_eq!(a / 2.0, Tuple4D::tuple(0.5, -1.0, 1.5, -2.0));
}

#[test]
fn magnitude_and_normalization() {
    let v = Tuple4D::vector(1.0, 2.0, 3.0);
    let k = 14.0f64.sqrt();

    assert_eq!(v.magnitude(), k);
    assert_eq!((-v).magnitude(), k);
    assert_eq!(v.normalize(), Tuple4D::vector(1.0 / k, 2.0 / k, 3.0 / k));

    for v in [Tuple4D::vector(4.0, 0.0, 0.0), Tuple4D::vector(-0.3, 12.0, 7.5),
              Tuple4D::vector(1e-3, -2e-3, 5e-4)] {
        assert!(feq(v.normalize().magnitude(), 1.0));
    }
}

#[test]
fn dot_and_cross() {
    let a = Tuple4D::vector(1.0, 2.0, 3.0);
    let b = Tuple4D::vector(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Tuple4D::vector(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), -a.cross(&b));
}

#[test]
fn reflecting_vectors() {
    let up = Tuple4D::vector(0.0, 1.0, 0.0);
    assert_eq!(Tuple4D::vector(1.0, -1.0, 0.0).reflect(&up), Tuple4D::vector(1.0, 1.0, 0.0));

    let k = 2.0f64.sqrt() / 2.0;
    let slanted = Tuple4D::vector(k, k, 0.0);
    assert_eq!(Tuple4D::vector(0.0, -1.0, 0.0).reflect(&slanted),
        Tuple4D::vector(1.0, 0.0, 0.0));
}

#[test]
fn per_axis_extremes_keep_w() {
    let a = Tuple4D::point(1.0, -2.0, 3.0);
    let b = Tuple4D::vector(-1.0, 5.0, 3.0);

    assert_eq!(a.min_by_axis(&b), Tuple4D::point(-1.0, -2.0, 3.0));
    assert_eq!(a.max_by_axis(&b), Tuple4D::point(1.0, 5.0, 3.0));
}

#[test]
fn finiteness_ignores_w() {
    assert!(Tuple4D::point(1.0, 2.0, 3.0).is_finite());
    assert!(!Tuple4D::point(f64::INFINITY, 0.0, 0.0).is_finite());
    assert!(!Tuple4D::vector(0.0, f64::NAN, 0.0).is_finite());
}

#[test]
fn infinities_compare_equal() {
    let inf = f64::INFINITY;

    assert_eq!(Tuple4D::point(inf, -inf, 0.0), Tuple4D::point(inf, -inf, 0.0));
    assert_ne!(Tuple4D::point(inf, 0.0, 0.0), Tuple4D::point(-inf, 0.0, 0.0));
}

#[test]
fn index_by_axis() {
    let mut p = Tuple4D::point(1.0, 2.0, 3.0);
    p[1] = 5.0;

    assert_eq!([p[0], p[1], p[2], p[3]], [1.0, 5.0, 3.0, 1.0]);
}
