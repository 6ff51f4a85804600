use crate::matrix::Matrix4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

/// A half-line with an origin point and a direction vector.
///
/// Directions aren't required to be unit length; intersection `t` values are
/// measured in multiples of the direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    /// Creates a ray. The origin is forced to be a point and the direction a
    /// vector.
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        origin.w = 1.0;
        direction.w = 0.0;

        Ray4D { origin, direction }
    }

    /// A unit-speed ray from `origin` aimed at `target`, along with the
    /// distance between the two.
    pub fn towards(origin: Tuple4D, target: Tuple4D) -> (Ray4D, f64) {
        let v = target - origin;
        let distance = v.magnitude();

        (Ray4D::new(origin, v.normalize()), distance)
    }

    pub fn position(&self, t: f64) -> Tuple4D {
        self.origin + (t * self.direction)
    }

    pub fn transform(&self, m: &Matrix4D) -> Ray4D {
        Ray4D {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }

    /// Carries the ray into the space a transformation maps out of.
    ///
    /// The direction is not renormalised, so `t` values found in that space
    /// hold for the original ray too.
    pub fn to_object_space(&self, t: &Transform) -> Ray4D {
        self.transform(&t.inverse())
    }
}

#[test]
fn points_along_a_ray() {
    let r = Ray4D::new(Tuple4D::point(2.0, 3.0, 4.0), Tuple4D::vector(1.0, 0.0, 0.0));

    for (t, x) in [(0.0, 2.0), (1.0, 3.0), (-1.0, 1.0), (2.5, 4.5)] {
        assert_eq!(r.position(t), Tuple4D::point(x, 3.0, 4.0));
    }
}

#[test]
fn new_ray_fixes_homogeneous_components() {
    let r = Ray4D::new(Tuple4D::tuple(1.0, 2.0, 3.0, 0.0), Tuple4D::tuple(0.0, 0.0, 1.0, 1.0));

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}

#[test]
fn ray_towards_a_target() {
    let (r, distance) = Ray4D::towards(Tuple4D::point(1.0, 1.0, 1.0),
                                       Tuple4D::point(1.0, 4.0, 5.0));

    assert_eq!(distance, 5.0);
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.6, 0.8));
    assert_eq!(r.position(distance), Tuple4D::point(1.0, 4.0, 5.0));
}

#[test]
fn transforming_keeps_origin_and_direction_apart() {
    let r = Ray4D::new(Tuple4D::point(1.0, 2.0, 3.0), Tuple4D::vector(0.0, 1.0, 0.0));

    // Translation moves the origin only
    let moved = r.transform(&Matrix4D::translation(3.0, 4.0, 5.0));
    assert_eq!(moved.origin, Tuple4D::point(4.0, 6.0, 8.0));
    assert_eq!(moved.direction, r.direction);

    let scaled = r.transform(&Matrix4D::scaling(2.0, 3.0, 4.0));
    assert_eq!(scaled.origin, Tuple4D::point(2.0, 6.0, 12.0));
    assert_eq!(scaled.direction, Tuple4D::vector(0.0, 3.0, 0.0));
}

#[test]
fn object_space_ray_preserves_hit_distances() {
    let transform = Transform::new(Matrix4D::scaling(2.0, 2.0, 2.0));
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let local = r.to_object_space(&transform);
    assert_eq!(local.origin, Tuple4D::point(0.0, 0.0, -2.5));
    assert_eq!(local.direction, Tuple4D::vector(0.0, 0.0, 0.5));

    // The unit sphere's near side in object space is the scaled sphere's in
    // world space
    let t = 3.0;
    assert_eq!(local.position(t), Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(r.position(t), Tuple4D::point(0.0, 0.0, -2.0));
}
