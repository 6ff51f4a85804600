use crate::consts::FEQ_EPSILON;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

const INF: f64 = std::f64::INFINITY;

/// An axis-aligned bounding box.
///
/// Boxes start out `EMPTY`, with their minimum at `+inf` and their maximum at
/// `-inf`. Adding any point to an empty box snaps both corners to that point.
///
/// ```
/// # use glint::bounds::BoundingBox;
/// # use glint::tuple::Tuple4D;
/// let mut b = BoundingBox::EMPTY;
/// b.add_point(Tuple4D::point(-5.0, 2.0, 0.0));
/// b.add_point(Tuple4D::point(7.0, 0.0, -3.0));
///
/// assert_eq!(b.minimum, Tuple4D::point(-5.0, 0.0, -3.0));
/// assert_eq!(b.maximum, Tuple4D::point(7.0, 2.0, 0.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub minimum: Tuple4D,
    pub maximum: Tuple4D,
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox::EMPTY
    }
}

impl BoundingBox {
    /// A box which contains nothing and is never intersected.
    pub const EMPTY: BoundingBox = BoundingBox {
        minimum: Tuple4D { x: INF, y: INF, z: INF, w: 1.0 },
        maximum: Tuple4D { x: -INF, y: -INF, z: -INF, w: 1.0 },
    };

    /// A box which contains everything.
    pub const INFINITE: BoundingBox = BoundingBox {
        minimum: Tuple4D { x: -INF, y: -INF, z: -INF, w: 1.0 },
        maximum: Tuple4D { x: INF, y: INF, z: INF, w: 1.0 },
    };

    pub fn new(minimum: Tuple4D, maximum: Tuple4D) -> BoundingBox {
        BoundingBox { minimum, maximum }
    }

    /// True if the box has not had anything added to it.
    pub fn is_empty(&self) -> bool {
        self.minimum.x > self.maximum.x
            || self.minimum.y > self.maximum.y
            || self.minimum.z > self.maximum.z
    }

    /// Grows the box to include `p`.
    pub fn add_point(&mut self, p: Tuple4D) {
        self.minimum = self.minimum.min_by_axis(&p);
        self.maximum = self.maximum.max_by_axis(&p);
    }

    /// Grows the box to include another box. Adding an empty box is a no-op.
    pub fn add_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }

        self.add_point(other.minimum);
        self.add_point(other.maximum);
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: Tuple4D) -> bool {
        (self.minimum.x..=self.maximum.x).contains(&p.x)
            && (self.minimum.y..=self.maximum.y).contains(&p.y)
            && (self.minimum.z..=self.maximum.z).contains(&p.z)
    }

    /// True if `other` lies entirely within this box. Everything contains the
    /// empty box.
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.is_empty()
            || (self.contains_point(other.minimum)
                && self.contains_point(other.maximum))
    }

    /// Transforms the box, returning a new axis-aligned box around the
    /// transformed corners.
    ///
    /// The result encloses the transformed box, but isn't tight for rotations.
    /// Boxes with an infinite extent become the infinite box, since the
    /// corners can't be transformed without producing NaNs.
    pub fn transform(&self, m: &Matrix4D) -> BoundingBox {
        if self.is_empty() {
            return BoundingBox::EMPTY;
        }

        if !(self.minimum.is_finite() && self.maximum.is_finite()) {
            return BoundingBox::INFINITE;
        }

        let mut out = BoundingBox::EMPTY;
        for &x in &[self.minimum.x, self.maximum.x] {
            for &y in &[self.minimum.y, self.maximum.y] {
                for &z in &[self.minimum.z, self.maximum.z] {
                    out.add_point(*m * Tuple4D::point(x, y, z));
                }
            }
        }

        out
    }

    /// Slab test between a ray and the box.
    ///
    /// Misses if the entry along some axis comes after the exit along another,
    /// or if the whole box lies behind the ray origin.
    pub fn intersects(&self, ray: &Ray4D) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut tmin = -INF;
        let mut tmax = INF;

        for axis in 0..3 {
            let (amin, amax) = check_axis(
                self.minimum[axis], self.maximum[axis],
                ray.origin[axis], ray.direction[axis],
            );

            tmin = tmin.max(amin);
            tmax = tmax.min(amax);
        }

        !(tmin > tmax || (tmin <= 0.0 && tmax <= 0.0))
    }

    /// Splits the box in half along its longest axis.
    ///
    /// Ties prefer X, then Y.
    ///
    /// ```
    /// # use glint::bounds::BoundingBox;
    /// # use glint::tuple::Tuple4D;
    /// let b = BoundingBox::new(Tuple4D::point(-1.0, -4.0, -5.0),
    ///                          Tuple4D::point(9.0, 6.0, 5.0));
    /// let (left, right) = b.split();
    ///
    /// assert_eq!(left.maximum, Tuple4D::point(4.0, 6.0, 5.0));
    /// assert_eq!(right.minimum, Tuple4D::point(4.0, -4.0, -5.0));
    /// ```
    pub fn split(&self) -> (BoundingBox, BoundingBox) {
        let dx = self.maximum.x - self.minimum.x;
        let dy = self.maximum.y - self.minimum.y;
        let dz = self.maximum.z - self.minimum.z;

        let greatest = dx.max(dy).max(dz);
        let axis = if greatest == dx {
            0
        } else if greatest == dy {
            1
        } else {
            2
        };

        let mid = self.minimum[axis] + (self.maximum[axis] - self.minimum[axis]) / 2.0;

        let mut mid_max = self.maximum;
        mid_max[axis] = mid;

        let mut mid_min = self.minimum;
        mid_min[axis] = mid;

        (BoundingBox::new(self.minimum, mid_max),
         BoundingBox::new(mid_min, self.maximum))
    }
}

/// Gets the entry and exit offsets of a ray along one axis of a slab.
///
/// The smaller `t` is first in the tuple. Direction components within
/// `FEQ_EPSILON` of zero produce infinite offsets instead of dividing.
pub fn check_axis(min: f64, max: f64, origin: f64, direction: f64) -> (f64, f64) {
    let tmin_numerator = min - origin;
    let tmax_numerator = max - origin;

    let (tmin, tmax) = if direction.abs() >= FEQ_EPSILON {
        (tmin_numerator / direction, tmax_numerator / direction)
    } else {
        (tmin_numerator * INF, tmax_numerator * INF)
    };

    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

#[test]
fn empty_box() {
    let b = BoundingBox::default();

    assert!(b.is_empty());
    assert!(!b.contains_point(Tuple4D::origin()));
    assert!(!b.intersects(&Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0))));
    assert!(b.transform(&Matrix4D::scaling(2.0, 2.0, 2.0)).is_empty());
}

#[test]
fn adding_points_is_idempotent() {
    let mut b = BoundingBox::EMPTY;
    b.add_point(Tuple4D::point(1.0, 2.0, 3.0));
    b.add_point(Tuple4D::point(-1.0, 0.0, 5.0));
    let once = b;

    b.add_point(Tuple4D::point(-1.0, 0.0, 5.0));
    b.add_point(Tuple4D::point(0.0, 1.0, 4.0));

    assert_eq!(b, once);
}

#[test]
fn adding_boxes() {
    let mut b1 = BoundingBox::new(Tuple4D::point(-5.0, -2.0, 0.0),
                                  Tuple4D::point(7.0, 4.0, 4.0));
    let b2 = BoundingBox::new(Tuple4D::point(8.0, -7.0, -2.0),
                              Tuple4D::point(14.0, 2.0, 8.0));
    b1.add_box(&b2);
    b1.add_box(&BoundingBox::EMPTY);

    assert_eq!(b1.minimum, Tuple4D::point(-5.0, -7.0, -2.0));
    assert_eq!(b1.maximum, Tuple4D::point(14.0, 4.0, 8.0));
}

#[test]
fn box_contains_point() {
    let b = BoundingBox::new(Tuple4D::point(5.0, -2.0, 0.0),
                             Tuple4D::point(11.0, 4.0, 7.0));

    let cases = [
        (Tuple4D::point(5.0, -2.0, 0.0), true),
        (Tuple4D::point(11.0, 4.0, 7.0), true),
        (Tuple4D::point(8.0, 1.0, 3.0), true),
        (Tuple4D::point(3.0, 0.0, 3.0), false),
        (Tuple4D::point(8.0, -4.0, 3.0), false),
        (Tuple4D::point(8.0, 1.0, -1.0), false),
        (Tuple4D::point(13.0, 1.0, 3.0), false),
        (Tuple4D::point(8.0, 5.0, 3.0), false),
        (Tuple4D::point(8.0, 1.0, 8.0), false),
    ];

    for (p, expected) in cases.iter() {
        assert_eq!(b.contains_point(*p), *expected);
    }
}

#[test]
fn box_contains_box() {
    let b = BoundingBox::new(Tuple4D::point(5.0, -2.0, 0.0),
                             Tuple4D::point(11.0, 4.0, 7.0));

    let cases = [
        (Tuple4D::point(5.0, -2.0, 0.0), Tuple4D::point(11.0, 4.0, 7.0), true),
        (Tuple4D::point(6.0, -1.0, 1.0), Tuple4D::point(10.0, 3.0, 6.0), true),
        (Tuple4D::point(4.0, -3.0, -1.0), Tuple4D::point(10.0, 3.0, 6.0), false),
        (Tuple4D::point(6.0, -1.0, 1.0), Tuple4D::point(12.0, 5.0, 8.0), false),
    ];

    for (min, max, expected) in cases.iter() {
        assert_eq!(b.contains_box(&BoundingBox::new(*min, *max)), *expected);
    }
    assert!(b.contains_box(&BoundingBox::EMPTY));
}

#[test]
fn transforming_a_box() {
    let b = BoundingBox::new(Tuple4D::point(-1.0, -1.0, -1.0),
                             Tuple4D::point(1.0, 1.0, 1.0));
    let m = Matrix4D::rotation_x(std::f64::consts::PI / 4.0)
        * Matrix4D::rotation_y(std::f64::consts::PI / 4.0);
    let t = b.transform(&m);

    assert_eq!(t.minimum, Tuple4D::point(-1.41421, -1.70711, -1.70711));
    assert_eq!(t.maximum, Tuple4D::point(1.41421, 1.70711, 1.70711));
}

#[test]
fn transforming_an_infinite_box() {
    let b = BoundingBox::new(Tuple4D::point(-INF, 0.0, -INF),
                             Tuple4D::point(INF, 0.0, INF));
    let t = b.transform(&Matrix4D::translation(0.0, 1.0, 0.0));

    assert_eq!(t, BoundingBox::INFINITE);
}

#[test]
fn ray_intersects_cube_box() {
    let b = BoundingBox::new(Tuple4D::point(-1.0, -1.0, -1.0),
                             Tuple4D::point(1.0, 1.0, 1.0));

    let cases = [
        (Tuple4D::point(5.0, 0.5, 0.0), Tuple4D::vector(-1.0, 0.0, 0.0), true),
        (Tuple4D::point(-5.0, 0.5, 0.0), Tuple4D::vector(1.0, 0.0, 0.0), true),
        (Tuple4D::point(0.5, 5.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0), true),
        (Tuple4D::point(0.0, 0.5, 0.0), Tuple4D::vector(0.0, 0.0, 1.0), true),
        (Tuple4D::point(-2.0, 0.0, 0.0), Tuple4D::vector(2.0, 4.0, 6.0), false),
        (Tuple4D::point(0.0, -2.0, 0.0), Tuple4D::vector(6.0, 2.0, 4.0), false),
        (Tuple4D::point(2.0, 0.0, 2.0), Tuple4D::vector(0.0, 0.0, -1.0), false),
        (Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0), false),
    ];

    for (origin, direction, expected) in cases.iter() {
        let r = Ray4D::new(*origin, direction.normalize());
        assert_eq!(b.intersects(&r), *expected);
    }
}

#[test]
fn ray_intersects_non_cubic_box() {
    let b = BoundingBox::new(Tuple4D::point(5.0, -2.0, 0.0),
                             Tuple4D::point(11.0, 4.0, 7.0));

    let cases = [
        (Tuple4D::point(15.0, 1.0, 2.0), Tuple4D::vector(-1.0, 0.0, 0.0), true),
        (Tuple4D::point(8.0, 2.0, 12.0), Tuple4D::vector(0.0, 0.0, -1.0), true),
        (Tuple4D::point(9.0, -1.0, -8.0), Tuple4D::vector(2.0, 4.0, 6.0), false),
        (Tuple4D::point(8.0, 2.0, -12.0), Tuple4D::vector(0.0, 0.0, -1.0), false),
    ];

    for (origin, direction, expected) in cases.iter() {
        let r = Ray4D::new(*origin, direction.normalize());
        assert_eq!(b.intersects(&r), *expected);
    }
}

#[test]
fn splitting_a_perfect_cube() {
    let b = BoundingBox::new(Tuple4D::point(-1.0, -4.0, -5.0),
                             Tuple4D::point(9.0, 6.0, 5.0));
    let (left, right) = b.split();

    assert_eq!(left.minimum, Tuple4D::point(-1.0, -4.0, -5.0));
    assert_eq!(left.maximum, Tuple4D::point(4.0, 6.0, 5.0));
    assert_eq!(right.minimum, Tuple4D::point(4.0, -4.0, -5.0));
    assert_eq!(right.maximum, Tuple4D::point(9.0, 6.0, 5.0));
}

#[test]
fn splitting_along_each_axis() {
    let b = BoundingBox::new(Tuple4D::point(-1.0, -2.0, -3.0),
                             Tuple4D::point(9.0, 5.5, 3.0));
    let (left, right) = b.split();
    assert_eq!(left.maximum, Tuple4D::point(4.0, 5.5, 3.0));
    assert_eq!(right.minimum, Tuple4D::point(4.0, -2.0, -3.0));

    let b = BoundingBox::new(Tuple4D::point(-1.0, -2.0, -3.0),
                             Tuple4D::point(5.0, 8.0, 3.0));
    let (left, right) = b.split();
    assert_eq!(left.maximum, Tuple4D::point(5.0, 3.0, 3.0));
    assert_eq!(right.minimum, Tuple4D::point(-1.0, 3.0, -3.0));

    let b = BoundingBox::new(Tuple4D::point(-1.0, -2.0, -3.0),
                             Tuple4D::point(5.0, 3.0, 7.0));
    let (left, right) = b.split();
    assert_eq!(left.maximum, Tuple4D::point(5.0, 3.0, 2.0));
    assert_eq!(right.minimum, Tuple4D::point(-1.0, -2.0, 2.0));
}

#[test]
fn split_halves_cover_the_whole_box() {
    let b = BoundingBox::new(Tuple4D::point(-3.0, 0.0, 1.0),
                             Tuple4D::point(5.0, 2.0, 4.0));
    let (left, right) = b.split();
    let mut joined = left;
    joined.add_box(&right);

    assert_eq!(joined, b);
}
