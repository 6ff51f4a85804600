//! Object-space intersection and normal math for the primitive shapes.
//!
//! Every function here assumes the ray (or point) has already been carried
//! into the primitive's object space. Intersections are returned as bare `t`
//! offsets; `ShapeArena` attaches them to the shape that produced them.

use crate::bounds::{ BoundingBox, check_axis };
use crate::consts::FEQ_EPSILON;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// The Y extent of a cylinder or cone, and whether its ends are capped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadialBounds {
    pub minimum: f64,
    pub maximum: f64,
    pub closed: bool,
}

/// Unbounded and open.
impl Default for RadialBounds {
    fn default() -> RadialBounds {
        RadialBounds {
            minimum: -std::f64::INFINITY,
            maximum: std::f64::INFINITY,
            closed: false,
        }
    }
}

impl RadialBounds {
    pub fn new(minimum: f64, maximum: f64, closed: bool) -> RadialBounds {
        RadialBounds { minimum, maximum, closed }
    }

    /// True if `y` lies strictly between the minimum and maximum.
    fn within(&self, y: f64) -> bool {
        self.minimum < y && y < self.maximum
    }
}

/// Triangle vertices with the edge vectors and face normal precomputed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleInfo {
    pub p1: Tuple4D,
    pub p2: Tuple4D,
    pub p3: Tuple4D,

    pub e1: Tuple4D,
    pub e2: Tuple4D,
    pub normal: Tuple4D,
}

impl TriangleInfo {
    pub fn new(p1: Tuple4D, p2: Tuple4D, p3: Tuple4D) -> TriangleInfo {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = e2.cross(&e1).normalize();

        TriangleInfo { p1, p2, p3, e1, e2, normal }
    }

    pub fn bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::EMPTY;
        b.add_point(self.p1);
        b.add_point(self.p2);
        b.add_point(self.p3);
        b
    }

    /// Möller–Trumbore ray/triangle intersection.
    ///
    /// Returns `(t, u, v)` where `u` and `v` are the barycentric coordinates
    /// of the hit relative to `p2` and `p3`. Hits with `u` within
    /// `FEQ_EPSILON` of the `p1`-`p3` edge are rejected.
    pub fn intersect(&self, ray: &Ray4D) -> Option<(f64, f64, f64)> {
        let dir_cross_e2 = ray.direction.cross(&self.e2);
        let determinant = self.e1.dot(&dir_cross_e2);

        // Parallel to the triangle's plane
        if determinant.abs() < FEQ_EPSILON {
            return None;
        }

        let f = 1.0 / determinant;
        let p1_to_origin = ray.origin - self.p1;
        let u = f * p1_to_origin.dot(&dir_cross_e2);
        if u <= FEQ_EPSILON || u > 1.0 {
            return None;
        }

        let origin_cross_e1 = p1_to_origin.cross(&self.e1);
        let v = f * ray.direction.dot(&origin_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.e2.dot(&origin_cross_e1);
        Some((t, u, v))
    }
}

/// A triangle with a normal at each vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothTriangleInfo {
    pub triangle: TriangleInfo,

    pub n1: Tuple4D,
    pub n2: Tuple4D,
    pub n3: Tuple4D,
}

impl SmoothTriangleInfo {
    pub fn new(p1: Tuple4D, p2: Tuple4D, p3: Tuple4D,
        n1: Tuple4D, n2: Tuple4D, n3: Tuple4D) -> SmoothTriangleInfo {
        SmoothTriangleInfo {
            triangle: TriangleInfo::new(p1, p2, p3),
            n1, n2, n3,
        }
    }

    /// Interpolates the vertex normals by the barycentric coordinates of a
    /// hit. Without coordinates, the face normal is used.
    pub fn normal_at(&self, uv: Option<(f64, f64)>) -> Tuple4D {
        match uv {
            Some((u, v)) => self.n2 * u + self.n3 * v + self.n1 * (1.0 - u - v),
            None => self.triangle.normal,
        }
    }
}

/// Intersects a ray with a unit sphere centered at the origin.
///
/// A tangent ray produces two equal roots.
pub fn intersect_sphere(ray: &Ray4D) -> Vec<f64> {
    let sphere_to_ray = ray.origin - Tuple4D::origin();

    let a = ray.direction.dot(&ray.direction);
    let b = 2.0 * ray.direction.dot(&sphere_to_ray);
    let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

    let discriminant = b.powi(2) - (4.0 * a * c);
    if discriminant < 0.0 {
        return Vec::new();
    }

    let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
    let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
    vec![t1, t2]
}

pub fn normal_at_sphere(at: &Tuple4D) -> Tuple4D {
    Tuple4D { w: 0.0, ..*at }
}

/// Intersects a ray with the XZ plane.
pub fn intersect_plane(ray: &Ray4D) -> Vec<f64> {
    // Parallel or coplanar rays never hit
    if ray.direction.y.abs() < FEQ_EPSILON {
        return Vec::new();
    }

    vec![-ray.origin.y / ray.direction.y]
}

pub fn normal_at_plane() -> Tuple4D {
    Tuple4D::vector(0.0, 1.0, 0.0)
}

/// Intersects a ray with the cube spanning `[-1, 1]` on every axis.
pub fn intersect_cube(ray: &Ray4D) -> Vec<f64> {
    let (xtmin, xtmax) = check_axis(-1.0, 1.0, ray.origin.x, ray.direction.x);
    let (ytmin, ytmax) = check_axis(-1.0, 1.0, ray.origin.y, ray.direction.y);
    let (ztmin, ztmax) = check_axis(-1.0, 1.0, ray.origin.z, ray.direction.z);

    let tmin = xtmin.max(ytmin).max(ztmin);
    let tmax = xtmax.min(ytmax).min(ztmax);

    if tmin > tmax {
        return Vec::new();
    }

    vec![tmin, tmax]
}

/// The normal of the face with the largest coordinate.
pub fn normal_at_cube(p: &Tuple4D) -> Tuple4D {
    let xa = p.x.abs();
    let ya = p.y.abs();
    let za = p.z.abs();

    let max_component = xa.max(ya).max(za);
    if max_component == xa {
        Tuple4D::vector(p.x, 0.0, 0.0)
    } else if max_component == ya {
        Tuple4D::vector(0.0, p.y, 0.0)
    } else {
        Tuple4D::vector(0.0, 0.0, p.z)
    }
}

/// Intersects a ray with a unit-radius cylinder around the Y axis.
pub fn intersect_cylinder(rb: &RadialBounds, ray: &Ray4D) -> Vec<f64> {
    let mut xs = Vec::new();

    let a = ray.direction.x.powi(2) + ray.direction.z.powi(2);

    // Rays parallel to the Y axis can only hit the caps.
    if a.abs() >= FEQ_EPSILON {
        let b = 2.0 * ray.origin.x * ray.direction.x
              + 2.0 * ray.origin.z * ray.direction.z;
        let c = ray.origin.x.powi(2) + ray.origin.z.powi(2) - 1.0;

        let disc = b.powi(2) - 4.0 * a * c;
        if disc >= 0.0 {
            push_body_roots(rb, ray, a, b, disc, &mut xs);
        }
    }

    intersect_caps(rb, ray, &mut xs, |_| 1.0);
    xs
}

pub fn normal_at_cylinder(rb: &RadialBounds, at: &Tuple4D) -> Tuple4D {
    // Square of the distance from the Y axis
    let dist = at.x.powi(2) + at.z.powi(2);

    if dist < 1.0 && at.y >= rb.maximum - FEQ_EPSILON {
        Tuple4D::vector(0.0, 1.0, 0.0)
    } else if dist < 1.0 && at.y <= rb.minimum + FEQ_EPSILON {
        Tuple4D::vector(0.0, -1.0, 0.0)
    } else {
        Tuple4D::vector(at.x, 0.0, at.z)
    }
}

/// Intersects a ray with a double-napped cone around the Y axis, apex at the
/// origin.
pub fn intersect_cone(rb: &RadialBounds, ray: &Ray4D) -> Vec<f64> {
    let mut xs = Vec::new();

    let a = ray.direction.x.powi(2)
          - ray.direction.y.powi(2)
          + ray.direction.z.powi(2);

    let b = 2.0 * ray.origin.x * ray.direction.x
          - 2.0 * ray.origin.y * ray.direction.y
          + 2.0 * ray.origin.z * ray.direction.z;

    let c = ray.origin.x.powi(2)
          - ray.origin.y.powi(2)
          + ray.origin.z.powi(2);

    if a.abs() < FEQ_EPSILON {
        // Parallel to one nappe: a single root, unless b vanishes too.
        if b.abs() >= FEQ_EPSILON {
            let t = -c / (2.0 * b);
            if rb.within(ray.origin.y + t * ray.direction.y) {
                xs.push(t);
            }
        }
    } else {
        let disc = b.powi(2) - 4.0 * a * c;
        if disc >= 0.0 {
            push_body_roots(rb, ray, a, b, disc, &mut xs);
        }
    }

    intersect_caps(rb, ray, &mut xs, |y| y.abs());
    xs
}

pub fn normal_at_cone(rb: &RadialBounds, at: &Tuple4D) -> Tuple4D {
    let dist = at.x.powi(2) + at.z.powi(2);

    if dist < rb.maximum.powi(2) && at.y >= rb.maximum - FEQ_EPSILON {
        Tuple4D::vector(0.0, 1.0, 0.0)
    } else if dist < rb.minimum.powi(2) && at.y <= rb.minimum + FEQ_EPSILON {
        Tuple4D::vector(0.0, -1.0, 0.0)
    } else {
        let mut y = dist.sqrt();
        if at.y > 0.0 {
            y = -y;
        }

        Tuple4D::vector(at.x, y, at.z)
    }
}

/// Pushes the quadratic roots whose Y coordinate falls within the bounds.
fn push_body_roots(rb: &RadialBounds, ray: &Ray4D, a: f64, b: f64, disc: f64,
    xs: &mut Vec<f64>) {
    let mut t0 = (-b - disc.sqrt()) / (2.0 * a);
    let mut t1 = (-b + disc.sqrt()) / (2.0 * a);

    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    for t in [t0, t1] {
        if rb.within(ray.origin.y + t * ray.direction.y) {
            xs.push(t);
        }
    }
}

/// Intersects the end caps of a closed cylinder or cone.
///
/// `radius` gives the cap radius at a cap's Y coordinate.
fn intersect_caps<F>(rb: &RadialBounds, ray: &Ray4D, xs: &mut Vec<f64>, radius: F)
    where F: Fn(f64) -> f64 {
    if !rb.closed || ray.direction.y.abs() < FEQ_EPSILON {
        return;
    }

    for y in [rb.minimum, rb.maximum] {
        let t = (y - ray.origin.y) / ray.direction.y;
        let x = ray.origin.x + t * ray.direction.x;
        let z = ray.origin.z + t * ray.direction.z;

        if x.powi(2) + z.powi(2) <= radius(y).powi(2) {
            xs.push(t);
        }
    }
}

#[cfg(test)]
fn ray(origin: Tuple4D, direction: Tuple4D) -> Ray4D {
    Ray4D::new(origin, direction.normalize())
}

#[test]
fn ray_pierces_sphere() {
    let xs = intersect_sphere(&ray(Tuple4D::point(0.0, 0.0, -5.0),
                                   Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(xs, vec![4.0, 6.0]);
}

#[test]
fn sphere_tangent_inside_and_behind() {
    let tangent = intersect_sphere(&ray(Tuple4D::point(0.0, 1.0, -5.0),
                                        Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(tangent, vec![5.0, 5.0]);

    let inside = intersect_sphere(&ray(Tuple4D::origin(),
                                       Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(inside, vec![-1.0, 1.0]);

    let behind = intersect_sphere(&ray(Tuple4D::point(0.0, 0.0, 5.0),
                                       Tuple4D::vector(0.0, 0.0, 1.0)));
    assert_eq!(behind, vec![-6.0, -4.0]);

    let miss = intersect_sphere(&ray(Tuple4D::point(0.0, 2.0, -5.0),
                                     Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(miss.is_empty());
}

#[test]
fn plane_parallel_coplanar_and_crossing() {
    assert!(intersect_plane(&ray(Tuple4D::point(0.0, 10.0, 0.0),
                                 Tuple4D::vector(0.0, 0.0, 1.0))).is_empty());
    assert!(intersect_plane(&ray(Tuple4D::origin(),
                                 Tuple4D::vector(0.0, 0.0, 1.0))).is_empty());

    assert_eq!(intersect_plane(&ray(Tuple4D::point(0.0, 1.0, 0.0),
                                    Tuple4D::vector(0.0, -1.0, 0.0))), vec![1.0]);
    assert_eq!(intersect_plane(&ray(Tuple4D::point(0.0, -1.0, 0.0),
                                    Tuple4D::vector(0.0, 1.0, 0.0))), vec![1.0]);
}

#[test]
fn ray_intersects_cube() {
    let cases = [
        (Tuple4D::point( 5.0,  0.5,  0.0), Tuple4D::vector(-1.0,  0.0,  0.0),  4.0, 6.0),
        (Tuple4D::point(-5.0,  0.5,  0.0), Tuple4D::vector( 1.0,  0.0,  0.0),  4.0, 6.0),
        (Tuple4D::point( 0.5,  5.0,  0.0), Tuple4D::vector( 0.0, -1.0,  0.0),  4.0, 6.0),
        (Tuple4D::point( 0.5, -5.0,  0.0), Tuple4D::vector( 0.0,  1.0,  0.0),  4.0, 6.0),
        (Tuple4D::point( 0.5,  0.0,  5.0), Tuple4D::vector( 0.0,  0.0, -1.0),  4.0, 6.0),
        (Tuple4D::point( 0.5,  0.0, -5.0), Tuple4D::vector( 0.0,  0.0,  1.0),  4.0, 6.0),
        (Tuple4D::point( 0.0,  0.5,  0.0), Tuple4D::vector( 0.0,  0.0,  1.0), -1.0, 1.0),
    ];

    for (origin, direction, t1, t2) in cases.iter() {
        let xs = intersect_cube(&Ray4D::new(*origin, *direction));
        assert_eq!(xs, vec![*t1, *t2]);
    }
}

#[test]
fn ray_misses_cube() {
    let cases = [
        (Tuple4D::point(-2.0, 0.0, 0.0), Tuple4D::vector(0.2673, 0.5345, 0.8018)),
        (Tuple4D::point(0.0, -2.0, 0.0), Tuple4D::vector(0.8018, 0.2673, 0.5345)),
        (Tuple4D::point(0.0, 0.0, -2.0), Tuple4D::vector(0.5345, 0.8018, 0.2673)),
        (Tuple4D::point(2.0, 0.0, 2.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(0.0, 2.0, 2.0), Tuple4D::vector(0.0, -1.0, 0.0)),
        (Tuple4D::point(2.0, 2.0, 0.0), Tuple4D::vector(-1.0, 0.0, 0.0)),
    ];

    for (origin, direction) in cases.iter() {
        assert!(intersect_cube(&Ray4D::new(*origin, *direction)).is_empty());
    }
}

#[test]
fn normal_on_cube_surface() {
    let cases = [
        (Tuple4D::point(1.0, 0.5, -0.8), Tuple4D::vector(1.0, 0.0, 0.0)),
        (Tuple4D::point(-1.0, -0.2, 0.9), Tuple4D::vector(-1.0, 0.0, 0.0)),
        (Tuple4D::point(-0.4, 1.0, -0.1), Tuple4D::vector(0.0, 1.0, 0.0)),
        (Tuple4D::point(0.3, -1.0, -0.7), Tuple4D::vector(0.0, -1.0, 0.0)),
        (Tuple4D::point(-0.6, 0.3, 1.0), Tuple4D::vector(0.0, 0.0, 1.0)),
        (Tuple4D::point(0.4, 0.4, -1.0), Tuple4D::vector(0.0, 0.0, -1.0)),
        (Tuple4D::point(1.0, 1.0, 1.0), Tuple4D::vector(1.0, 0.0, 0.0)),
    ];

    for (p, n) in cases.iter() {
        assert_eq!(normal_at_cube(p), *n);
    }
}

#[test]
fn ray_misses_cylinder() {
    let rb = RadialBounds::default();
    let cases = [
        (Tuple4D::point(1.0, 0.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0)),
        (Tuple4D::point(0.0, 0.0, 0.0), Tuple4D::vector(0.0, 1.0, 0.0)),
        (Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(1.0, 1.0, 1.0)),
    ];

    for (origin, direction) in cases.iter() {
        assert!(intersect_cylinder(&rb, &ray(*origin, *direction)).is_empty());
    }
}

#[test]
fn ray_strikes_cylinder() {
    let rb = RadialBounds::default();
    let cases = [
        (Tuple4D::point(1.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 5.0, 5.0),
        (Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 4.0, 6.0),
        (Tuple4D::point(0.5, 0.0, -5.0), Tuple4D::vector(0.1, 1.0, 1.0), 6.80798, 7.08872),
    ];

    for (origin, direction, t0, t1) in cases.iter() {
        let xs = intersect_cylinder(&rb, &ray(*origin, *direction));
        assert_eq!(xs.len(), 2);
        assert!(crate::feq(xs[0], *t0));
        assert!(crate::feq(xs[1], *t1));
    }
}

#[test]
fn intersecting_constrained_cylinder() {
    let rb = RadialBounds::new(1.0, 2.0, false);
    let cases = [
        (Tuple4D::point(0.0, 1.5, 0.0), Tuple4D::vector(0.1, 1.0, 0.0), 0),
        (Tuple4D::point(0.0, 3.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 0),
        (Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 0),
        (Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 0),
        (Tuple4D::point(0.0, 1.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 0),
        (Tuple4D::point(0.0, 1.5, -2.0), Tuple4D::vector(0.0, 0.0, 1.0), 2),
    ];

    for (origin, direction, count) in cases.iter() {
        assert_eq!(intersect_cylinder(&rb, &ray(*origin, *direction)).len(), *count);
    }
}

#[test]
fn intersecting_cylinder_caps() {
    let rb = RadialBounds::new(1.0, 2.0, true);
    let cases = [
        (Tuple4D::point(0.0, 3.0, 0.0), Tuple4D::vector(0.0, -1.0, 0.0), 2),
        (Tuple4D::point(0.0, 3.0, -2.0), Tuple4D::vector(0.0, -1.0, 2.0), 2),
        (Tuple4D::point(0.0, 4.0, -2.0), Tuple4D::vector(0.0, -1.0, 1.0), 2),
        (Tuple4D::point(0.0, 0.0, -2.0), Tuple4D::vector(0.0, 1.0, 2.0), 2),
        (Tuple4D::point(0.0, -1.0, -2.0), Tuple4D::vector(0.0, 1.0, 1.0), 2),
    ];

    for (origin, direction, count) in cases.iter() {
        assert_eq!(intersect_cylinder(&rb, &ray(*origin, *direction)).len(), *count);
    }
}

#[test]
fn normal_on_cylinder() {
    let rb = RadialBounds::default();
    assert_eq!(normal_at_cylinder(&rb, &Tuple4D::point(1.0, 0.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(normal_at_cylinder(&rb, &Tuple4D::point(0.0, 5.0, -1.0)),
        Tuple4D::vector(0.0, 0.0, -1.0));

    let rb = RadialBounds::new(1.0, 2.0, true);
    assert_eq!(normal_at_cylinder(&rb, &Tuple4D::point(0.5, 1.0, 0.0)),
        Tuple4D::vector(0.0, -1.0, 0.0));
    assert_eq!(normal_at_cylinder(&rb, &Tuple4D::point(0.0, 2.0, 0.5)),
        Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn ray_strikes_cone() {
    let rb = RadialBounds::default();
    let cases = [
        (Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0), 5.0, 5.0),
        (Tuple4D::point(1.0, 1.0, -5.0), Tuple4D::vector(-0.5, -1.0, 1.0), 4.55006, 49.44994),
    ];

    for (origin, direction, t0, t1) in cases.iter() {
        let xs = intersect_cone(&rb, &ray(*origin, *direction));
        assert_eq!(xs.len(), 2);
        assert!((xs[0] - t0).abs() < 1e-4);
        assert!((xs[1] - t1).abs() < 1e-4);
    }
}

#[test]
fn ray_parallel_to_cone_half() {
    let rb = RadialBounds::default();
    let xs = intersect_cone(&rb, &ray(Tuple4D::point(0.0, 0.0, -1.0),
                                      Tuple4D::vector(0.0, 1.0, 1.0)));

    assert_eq!(xs.len(), 1);
    assert!(crate::feq(xs[0], 0.35355));
}

#[test]
fn intersecting_cone_caps() {
    let rb = RadialBounds::new(-0.5, 0.5, true);
    let cases = [
        (Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 1.0, 0.0), 0),
        (Tuple4D::point(0.0, 0.0, -0.25), Tuple4D::vector(0.0, 1.0, 1.0), 2),
        (Tuple4D::point(0.0, 0.0, -0.25), Tuple4D::vector(0.0, 1.0, 0.0), 4),
    ];

    for (origin, direction, count) in cases.iter() {
        assert_eq!(intersect_cone(&rb, &ray(*origin, *direction)).len(), *count);
    }
}

#[test]
fn open_cone_ignores_caps() {
    let rb = RadialBounds::new(-0.5, 0.5, false);
    let xs = intersect_cone(&rb, &ray(Tuple4D::point(0.0, 0.0, -0.25),
                                      Tuple4D::vector(0.0, 1.0, 0.0)));

    assert_eq!(xs.len(), 2);
}

#[test]
fn normal_on_cone() {
    let rb = RadialBounds::default();

    assert_eq!(normal_at_cone(&rb, &Tuple4D::point(0.0, 0.0, 0.0)),
        Tuple4D::vector(0.0, 0.0, 0.0));
    assert_eq!(normal_at_cone(&rb, &Tuple4D::point(1.0, 1.0, 1.0)),
        Tuple4D::vector(1.0, -(2.0f64.sqrt()), 1.0));
    assert_eq!(normal_at_cone(&rb, &Tuple4D::point(-1.0, -1.0, 0.0)),
        Tuple4D::vector(-1.0, 1.0, 0.0));
}

#[cfg(test)]
fn upright_triangle() -> TriangleInfo {
    TriangleInfo::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0),
        Tuple4D::point(1.0, 0.0, 0.0),
    )
}

#[test]
fn constructing_a_triangle() {
    let t = upright_triangle();

    assert_eq!(t.e1, Tuple4D::vector(-1.0, -1.0, 0.0));
    assert_eq!(t.e2, Tuple4D::vector(1.0, -1.0, 0.0));
    assert_eq!(t.normal, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(t.bounds().minimum, Tuple4D::point(-1.0, 0.0, 0.0));
    assert_eq!(t.bounds().maximum, Tuple4D::point(1.0, 1.0, 0.0));
}

#[test]
fn triangle_misses() {
    let t = upright_triangle();
    let cases = [
        // parallel
        (Tuple4D::point(0.0, -1.0, -2.0), Tuple4D::vector(0.0, 1.0, 0.0)),
        // p1-p3 edge
        (Tuple4D::point(1.0, 1.0, -2.0), Tuple4D::vector(0.0, 0.0, 1.0)),
        // p1-p2 edge
        (Tuple4D::point(-1.0, 1.0, -2.0), Tuple4D::vector(0.0, 0.0, 1.0)),
        // p2-p3 edge
        (Tuple4D::point(0.0, -1.0, -2.0), Tuple4D::vector(0.0, 0.0, 1.0)),
    ];

    for (origin, direction) in cases.iter() {
        assert!(t.intersect(&Ray4D::new(*origin, *direction)).is_none());
    }
}

#[test]
fn ray_strikes_triangle() {
    let t = upright_triangle();
    let hit = t.intersect(&Ray4D::new(Tuple4D::point(0.0, 0.5, -2.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0)));

    let (t, u, v) = hit.unwrap();
    assert_eq!(t, 2.0);
    assert!(crate::feq(u, 0.25));
    assert!(crate::feq(v, 0.25));
}

#[test]
fn ray_just_inside_triangle_edge_hits() {
    let t = upright_triangle();
    let hit = t.intersect(&Ray4D::new(Tuple4D::point(0.4999, 0.5, -2.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0)));

    let (_, u, _) = hit.unwrap();
    assert!((u - 0.00005).abs() < 1e-9);
}

#[test]
fn smooth_triangle_interpolates_normal() {
    let st = SmoothTriangleInfo::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0),
        Tuple4D::point(1.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
        Tuple4D::vector(-1.0, 0.0, 0.0),
        Tuple4D::vector(1.0, 0.0, 0.0),
    );

    let (_, u, v) = st.triangle.intersect(
        &Ray4D::new(Tuple4D::point(-0.2, 0.3, -2.0), Tuple4D::vector(0.0, 0.0, 1.0))
    ).unwrap();
    assert!(crate::feq(u, 0.45));
    assert!(crate::feq(v, 0.25));

    assert_eq!(st.normal_at(Some((0.45, 0.25))).normalize(),
        Tuple4D::vector(-0.5547, 0.83205, 0.0));
    assert_eq!(st.normal_at(None), Tuple4D::vector(0.0, 0.0, -1.0));
}
