use std::ops::Index;

use crate::consts::{ FEQ_EPSILON, VACUUM_RI };
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::shape::{ ShapeArena, ShapeId };

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is analogous to `t` for a ray (the offset from the ray origin).
///
/// `object` is the handle of the primitive which was hit (never a group or
/// CSG node). Triangles also record the barycentric coordinates `uv` of the
/// hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: f64,
    pub uv: Option<(f64, f64)>,
    pub object: ShapeId,
}

impl Intersection {
    pub fn new(t: f64, object: ShapeId) -> Intersection {
        Intersection { t, uv: None, object }
    }

    pub fn with_uv(t: f64, object: ShapeId, u: f64, v: f64) -> Intersection {
        Intersection { t, uv: Some((u, v)), object }
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` objects. Ordering is by `t`
/// only, and only after `sort` has been called.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections {
    pub intersections: Vec<Intersection>,
}

impl From<Vec<Intersection>> for Intersections {
    fn from(intersections: Vec<Intersection>) -> Intersections {
        Intersections { intersections }
    }
}

impl Index<usize> for Intersections {
    type Output = Intersection;

    fn index(&self, i: usize) -> &Intersection {
        &self.intersections[i]
    }
}

impl Intersections {
    pub fn new() -> Intersections {
        Intersections { intersections: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.intersections.iter()
    }

    /// Merges several collections into one, sorted by `t`.
    pub fn aggregate(all: Vec<Intersections>) -> Intersections {
        let mut merged = Intersections {
            intersections: all.into_iter()
                .flat_map(|is| is.intersections)
                .collect(),
        };

        merged.sort();
        merged
    }

    /// The visible intersection: the one with the smallest non-negative `t`.
    ///
    /// Doesn't require the collection to be sorted. If several intersections
    /// share the smallest `t`, the first one is returned.
    pub fn hit(&self) -> Option<Intersection> {
        self.intersections.iter()
            .filter(|i| i.t >= 0.0)
            .fold(None, |best: Option<&Intersection>, i| match best {
                Some(b) if b.t <= i.t => Some(b),
                _ => Some(i),
            })
            .copied()
    }

    /// Sorts the intersections by `t`, ignoring `f64` semantics.
    pub fn sort(&mut self) {
        self.intersections.sort_by(|a, b|
            a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal)
        );
    }
}

/// A record for computations associated with an `Intersection`.
///
/// Mostly a superset of an `Intersection`.
#[derive(Clone, Debug)]
pub struct IntersectionComputation {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The object being intersected.
    pub object: ShapeId,

    /// The point where the intersection occurs.
    pub point: Tuple4D,

    /// A point slightly above the intersected surface. Used to prevent an
    /// object from shadowing itself (this causes "acne").
    pub over_point: Tuple4D,

    /// A point slightly below the intersected surface. Used as the origin of
    /// refracted rays.
    pub under_point: Tuple4D,

    /// The eye vector for the intersection.
    pub eyev: Tuple4D,

    /// The normal vector of the object being intersected, facing the eye.
    pub normalv: Tuple4D,

    /// The intersection ray, reflected across the normal.
    pub reflectv: Tuple4D,

    /// Whether the intersection occurs within the object or not.
    pub inside: bool,

    /// The refractive index of the material being exited.
    pub n1: f64,

    /// The refractive index of the material being entered.
    pub n2: f64,
}

impl IntersectionComputation {
    /// Creates a new intersection computation, given a ray and intersection.
    ///
    /// The `is` parameter is the full (sorted) collection the hit came from.
    /// If provided, refractive indices will be calculated; otherwise both are
    /// those of a vacuum.
    pub fn new(r: &Ray4D, hit: &Intersection, shapes: &ShapeArena,
        is: Option<&Intersections>) -> IntersectionComputation {
        let t = hit.t;
        let object = hit.object;
        let point = r.position(t);
        let eyev = -r.direction;
        let mut normalv = shapes.normal_at(object, point, hit);

        let inside = if normalv.dot(&eyev) < 0.0 {
            normalv = -normalv;
            true
        } else {
            false
        };

        let over_point = point + normalv * FEQ_EPSILON;
        let under_point = point - normalv * FEQ_EPSILON;

        let reflectv = r.direction.reflect(&normalv);
        let (n1, n2) = match is {
            Some(xs) => Self::refractive_indices(hit, xs, shapes),
            None => (VACUUM_RI, VACUUM_RI),
        };

        IntersectionComputation {
            t, object,
            point, over_point, under_point,
            eyev, normalv, reflectv,
            inside,
            n1, n2,
        }
    }

    /// Replays the intersections in order, tracking which objects the ray is
    /// inside of, to find the media on either side of `hit`.
    fn refractive_indices(hit: &Intersection, is: &Intersections,
        shapes: &ShapeArena) -> (f64, f64) {
        let index_of = |containers: &[ShapeId]| {
            containers.last()
                .map(|&id| shapes[id].material.refractive_index)
                .unwrap_or(VACUUM_RI)
        };

        let mut containers: Vec<ShapeId> = Vec::new();

        for i in is.iter() {
            let at_hit = i == hit;
            let n1 = index_of(&containers);

            match containers.iter().position(|&x| x == i.object) {
                Some(j) => { containers.remove(j); },
                None => containers.push(i.object),
            }

            if at_hit {
                return (n1, index_of(&containers));
            }
        }

        (VACUUM_RI, VACUUM_RI)
    }

    /// Calculates the reflectance of a hit with Schlick's approximation.
    ///
    /// The reflectance is a number between 0 and 1, representing what fraction
    /// of the light is reflected for the hit.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eyev.dot(&self.normalv);

        // Total internal reflection can only occur if n1 > n2.
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1.0 - cos.powi(2));

            if sin2_t > 1.0 {
                return 1.0
            }

            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

#[cfg(test)]
mod fixtures {
    use crate::light::Material;
    use crate::matrix::Matrix4D;
    use crate::shape::{ Shape, ShapeArena, ShapeId };

    pub fn glass_sphere(shapes: &mut ShapeArena, m: Matrix4D, ri: f64) -> ShapeId {
        shapes.add(Shape::sphere()
            .with_transform(m)
            .with_material(Material {
                transparency: 1.0,
                refractive_index: ri,
                ..Default::default()
            }))
    }
}

#[cfg(test)]
use crate::shape::Shape;

#[test]
fn hit_with_all_positive() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let i1 = Intersection::new(1.0, s);
    let i2 = Intersection::new(2.0, s);
    let is = Intersections::from(vec![i2, i1]);

    assert_eq!(is.hit(), Some(i1));
}

#[test]
fn hit_with_some_negative() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let i1 = Intersection::new(-1.0, s);
    let i2 = Intersection::new(1.0, s);
    let is = Intersections::from(vec![i2, i1]);

    assert_eq!(is.hit(), Some(i2));
}

#[test]
fn hit_with_all_negative() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let is = Intersections::from(vec![
        Intersection::new(-2.0, s),
        Intersection::new(-1.0, s),
    ]);

    assert_eq!(is.hit(), None);
    assert_eq!(Intersections::new().hit(), None);
}

#[test]
fn hit_multiple() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let i4 = Intersection::new(2.0, s);
    let is = Intersections::from(vec![
        Intersection::new(5.0, s),
        Intersection::new(7.0, s),
        Intersection::new(-3.0, s),
        i4,
    ]);

    assert_eq!(is.hit(), Some(i4));
}

#[test]
fn hit_prefers_first_on_ties() {
    let mut shapes = ShapeArena::new();
    let a = shapes.add(Shape::sphere());
    let b = shapes.add(Shape::sphere());
    let is = Intersections::from(vec![
        Intersection::new(3.0, a),
        Intersection::new(3.0, b),
    ]);

    assert_eq!(is.hit().map(|i| i.object), Some(a));
}

#[test]
fn aggregate_sorts_by_t() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let xs = Intersections::aggregate(vec![
        Intersections::from(vec![Intersection::new(4.0, s), Intersection::new(-1.0, s)]),
        Intersections::from(vec![Intersection::new(2.5, s)]),
    ]);

    let ts: Vec<f64> = xs.iter().map(|i| i.t).collect();
    assert_eq!(ts, vec![-1.0, 2.5, 4.0]);
    assert_eq!(xs.len(), 3);
    assert_eq!(xs[1].t, 2.5);
}

#[test]
fn precompute_intersection_state() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, s);

    let comps = IntersectionComputation::new(&r, &i, &shapes, None);

    assert_eq!(comps.object, s);
    assert_eq!(comps.t, i.t);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, -1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
    assert!(!comps.inside);
}

#[test]
fn precompute_inside_intersection() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(1.0, s);

    let comps = IntersectionComputation::new(&r, &i, &shapes, None);

    assert!(comps.inside);
    assert_eq!(comps.point, Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(comps.eyev, Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(comps.normalv, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn precompute_reflection_vector() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::plane());
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, -1.0),
        Tuple4D::vector(0.0, -(2.0f64.sqrt()) / 2.0, 2.0f64.sqrt() / 2.0),
    );
    let i = Intersection::new(2.0f64.sqrt(), s);

    let comps = IntersectionComputation::new(&r, &i, &shapes, None);
    assert_eq!(comps.reflectv,
        Tuple4D::vector(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn hit_should_offset_point() {
    use crate::matrix::Matrix4D;

    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 1.0)));
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(5.0, s);

    let comps = IntersectionComputation::new(&r, &i, &shapes, None);

    assert!(comps.over_point.z < -FEQ_EPSILON / 2.0);
    assert!(comps.point.z > comps.over_point.z);
    assert!(comps.under_point.z > FEQ_EPSILON / 2.0);
    assert!(comps.point.z < comps.under_point.z);
}

#[test]
fn refractive_indices_at_each_intersection() {
    use crate::matrix::Matrix4D;

    let mut shapes = ShapeArena::new();
    let a = fixtures::glass_sphere(&mut shapes, Matrix4D::scaling(2.0, 2.0, 2.0), 1.5);
    let b = fixtures::glass_sphere(&mut shapes, Matrix4D::translation(0.0, 0.0, -0.25), 2.0);
    let c = fixtures::glass_sphere(&mut shapes, Matrix4D::translation(0.0, 0.0, 0.25), 2.5);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -4.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = Intersections::from(vec![
        Intersection::new(2.0, a),
        Intersection::new(2.75, b),
        Intersection::new(3.25, c),
        Intersection::new(4.75, b),
        Intersection::new(5.25, c),
        Intersection::new(6.0, a),
    ]);

    let expected = [
        (1.0, 1.5), (1.5, 2.0), (2.0, 2.5),
        (2.5, 2.5), (2.5, 1.5), (1.5, 1.0),
    ];

    for (i, (n1, n2)) in expected.iter().enumerate() {
        let comps = IntersectionComputation::new(&r, &xs[i], &shapes, Some(&xs));
        assert_eq!(comps.n1, *n1);
        assert_eq!(comps.n2, *n2);
    }
}

#[test]
fn schlick_under_total_internal_reflection() {
    use crate::matrix::Matrix4D;

    let mut shapes = ShapeArena::new();
    let s = fixtures::glass_sphere(&mut shapes, Matrix4D::identity(), 1.5);
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, 2.0f64.sqrt() / 2.0),
                       Tuple4D::vector(0.0, 1.0, 0.0));
    let xs = Intersections::from(vec![
        Intersection::new(-(2.0f64.sqrt()) / 2.0, s),
        Intersection::new(2.0f64.sqrt() / 2.0, s),
    ]);

    let comps = IntersectionComputation::new(&r, &xs[1], &shapes, Some(&xs));
    assert_eq!(comps.schlick(), 1.0);
}

#[test]
fn schlick_with_perpendicular_and_small_angle() {
    use crate::matrix::Matrix4D;

    let mut shapes = ShapeArena::new();
    let s = fixtures::glass_sphere(&mut shapes, Matrix4D::identity(), 1.5);

    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 1.0, 0.0));
    let xs = Intersections::from(vec![
        Intersection::new(-1.0, s),
        Intersection::new(1.0, s),
    ]);
    let comps = IntersectionComputation::new(&r, &xs[1], &shapes, Some(&xs));
    assert!(crate::feq(comps.schlick(), 0.04));

    let r = Ray4D::new(Tuple4D::point(0.0, 0.99, -2.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = Intersections::from(vec![Intersection::new(1.8589, s)]);
    let comps = IntersectionComputation::new(&r, &xs[0], &shapes, Some(&xs));
    assert!((comps.schlick() - 0.48873).abs() < 1e-4);
}
