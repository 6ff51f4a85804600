use crate::bounds::BoundingBox;
use crate::intersect::Intersections;
use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeArena, ShapeId, ShapeKind };

/// A set operation over two solids.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Difference,
}

/// The operands of a CSG node and the bounds enclosing both.
#[derive(Clone, Debug, PartialEq)]
pub struct CsgInfo {
    pub op: CsgOp,

    left: ShapeId,
    right: ShapeId,
    pub(crate) bounds: BoundingBox,
}

impl CsgInfo {
    pub fn left(&self) -> ShapeId {
        self.left
    }

    pub fn right(&self) -> ShapeId {
        self.right
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

/// Decides whether a surface crossing belongs to the combined solid.
///
/// `lhit` is true if the crossing is on the left operand; `inl` and `inr`
/// tell whether the ray is currently inside the left and right operands.
pub fn intersection_allowed(op: CsgOp, lhit: bool, inl: bool, inr: bool) -> bool {
    match op {
        CsgOp::Union => (lhit && !inr) || (!lhit && !inl),
        CsgOp::Intersection => (lhit && inr) || (!lhit && inl),
        CsgOp::Difference => (lhit && !inr) || (!lhit && inl),
    }
}

impl ShapeArena {
    /// Combines `left` and `right` with a set operation, returning the new
    /// node.
    ///
    /// # Panics
    ///
    /// Panics if either operand already has a parent, or if both operands are
    /// the same shape.
    pub fn csg(&mut self, op: CsgOp, left: ShapeId, right: ShapeId) -> ShapeId {
        assert!(self.parent(left).is_none() && self.parent(right).is_none(),
            "CSG operands can't already have a parent");
        assert_ne!(left, right, "CSG operands must be distinct");

        let mut bounds = self.parent_space_bounds(left);
        bounds.add_box(&self.parent_space_bounds(right));

        let id = self.push(Shape::new(ShapeKind::Csg(CsgInfo { op, left, right, bounds })));
        self.set_parent(left, Some(id));
        self.set_parent(right, Some(id));
        id
    }

    /// Keeps the intersections which lie on the surface of the combined
    /// solid.
    ///
    /// `xs` must be sorted. Each intersection's object is located in the
    /// left or right operand, then the crossing is admitted or dropped by
    /// `intersection_allowed`.
    pub fn filter_intersections(&self, id: ShapeId, xs: &Intersections) -> Intersections {
        let ci = match self[id].kind {
            ShapeKind::Csg(ref ci) => ci,
            _ => return xs.clone(),
        };

        let mut inl = false;
        let mut inr = false;
        let mut kept = Vec::new();

        for i in xs.iter() {
            let lhit = self.includes(ci.left, i.object);

            if intersection_allowed(ci.op, lhit, inl, inr) {
                kept.push(*i);
            }

            if lhit {
                inl = !inl;
            } else {
                inr = !inr;
            }
        }

        kept.into()
    }

    /// Intersects an object-space ray with a CSG node.
    pub(crate) fn intersect_csg(&self, id: ShapeId, ray: &Ray4D) -> Intersections {
        let (left, right, bounds) = match self[id].kind {
            ShapeKind::Csg(ref ci) => (ci.left, ci.right, ci.bounds),
            _ => unreachable!(),
        };

        if !bounds.intersects(ray) {
            return Intersections::new();
        }

        let xs = Intersections::aggregate(vec![
            self.intersect(left, ray),
            self.intersect(right, ray),
        ]);

        self.filter_intersections(id, &xs)
    }
}

#[cfg(test)]
use crate::{ intersect::Intersection, matrix::Matrix4D, tuple::Tuple4D };

#[test]
fn csg_is_created_with_operation_and_operands() {
    let mut shapes = ShapeArena::new();
    let s1 = shapes.add(Shape::sphere());
    let s2 = shapes.add(Shape::cube());

    let c = shapes.csg(CsgOp::Union, s1, s2);

    match shapes[c].kind {
        ShapeKind::Csg(ref ci) => {
            assert_eq!(ci.op, CsgOp::Union);
            assert_eq!(ci.left(), s1);
            assert_eq!(ci.right(), s2);
        },
        _ => panic!("expected a CSG node"),
    }
    assert_eq!(shapes.parent(s1), Some(c));
    assert_eq!(shapes.parent(s2), Some(c));
}

#[test]
fn evaluating_rules_for_csg_operations() {
    use CsgOp::*;

    // (op, lhit, inl, inr, allowed)
    let table = [
        (Union, true, true, true, false),
        (Union, true, true, false, true),
        (Union, true, false, true, false),
        (Union, true, false, false, true),
        (Union, false, true, true, false),
        (Union, false, true, false, false),
        (Union, false, false, true, true),
        (Union, false, false, false, true),
        (Intersection, true, true, true, true),
        (Intersection, true, true, false, false),
        (Intersection, true, false, true, true),
        (Intersection, true, false, false, false),
        (Intersection, false, true, true, true),
        (Intersection, false, true, false, true),
        (Intersection, false, false, true, false),
        (Intersection, false, false, false, false),
        (Difference, true, true, true, false),
        (Difference, true, true, false, true),
        (Difference, true, false, true, false),
        (Difference, true, false, false, true),
        (Difference, false, true, true, true),
        (Difference, false, true, false, true),
        (Difference, false, false, true, false),
        (Difference, false, false, false, false),
    ];

    for (op, lhit, inl, inr, allowed) in table {
        assert_eq!(intersection_allowed(op, lhit, inl, inr), allowed,
            "{:?} lhit={} inl={} inr={}", op, lhit, inl, inr);
    }
}

#[test]
fn filtering_a_list_of_intersections() {
    let cases = [
        (CsgOp::Union, [0, 3]),
        (CsgOp::Intersection, [1, 2]),
        (CsgOp::Difference, [0, 1]),
    ];

    for (op, expected) in cases {
        let mut shapes = ShapeArena::new();
        let s1 = shapes.add(Shape::sphere());
        let s2 = shapes.add(Shape::cube());
        let c = shapes.csg(op, s1, s2);

        let xs: Intersections = vec![
            Intersection::new(1.0, s1),
            Intersection::new(2.0, s2),
            Intersection::new(3.0, s1),
            Intersection::new(4.0, s2),
        ].into();

        let result = shapes.filter_intersections(c, &xs);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0], xs[expected[0]]);
        assert_eq!(result[1], xs[expected[1]]);
    }
}

#[test]
fn filtering_finds_operands_inside_groups() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s1 = shapes.add(Shape::sphere());
    shapes.add_child(g, s1);
    let s2 = shapes.add(Shape::cube());
    let c = shapes.csg(CsgOp::Difference, g, s2);

    let xs: Intersections = vec![
        Intersection::new(1.0, s1),
        Intersection::new(2.0, s2),
        Intersection::new(3.0, s1),
        Intersection::new(4.0, s2),
    ].into();

    let result = shapes.filter_intersections(c, &xs);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].t, 1.0);
    assert_eq!(result[1].t, 2.0);
}

#[test]
fn ray_misses_csg_object() {
    let mut shapes = ShapeArena::new();
    let s1 = shapes.add(Shape::sphere());
    let s2 = shapes.add(Shape::cube());
    let c = shapes.csg(CsgOp::Union, s1, s2);

    let r = Ray4D::new(Tuple4D::point(0.0, 2.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(shapes.local_intersect(c, &r).is_empty());
}

#[test]
fn ray_hits_csg_object() {
    let mut shapes = ShapeArena::new();
    let s1 = shapes.add(Shape::sphere());
    let s2 = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 0.5)));
    let c = shapes.csg(CsgOp::Union, s1, s2);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = shapes.local_intersect(c, &r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 4.0);
    assert_eq!(xs[0].object, s1);
    assert_eq!(xs[1].t, 6.5);
    assert_eq!(xs[1].object, s2);
}

#[test]
fn csg_bounds_enclose_both_operands() {
    let mut shapes = ShapeArena::new();
    let s1 = shapes.add(Shape::sphere());
    let s2 = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::translation(2.0, 3.0, 4.0)));
    let c = shapes.csg(CsgOp::Difference, s1, s2);

    let b = shapes.bounds(c);
    assert_eq!(b.minimum, Tuple4D::point(-1.0, -1.0, -1.0));
    assert_eq!(b.maximum, Tuple4D::point(3.0, 4.0, 5.0));
}

#[test]
fn dividing_csg_divides_operands() {
    let mut shapes = ShapeArena::new();
    let left = shapes.add(Shape::group());
    for x in [-2.0, 2.0] {
        let s = shapes.add(Shape::sphere()
            .with_transform(Matrix4D::translation(x, 0.0, 0.0)));
        shapes.add_child(left, s);
    }
    let right = shapes.add(Shape::cube());
    let c = shapes.csg(CsgOp::Union, left, right);

    shapes.divide(c, 1);

    assert_eq!(shapes.children(left).len(), 2);
    for &sub in shapes.children(left) {
        assert!(shapes[sub].is_group());
        assert_eq!(shapes.children(sub).len(), 1);
    }
}
