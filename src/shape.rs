use std::ops::Index;

use crate::bounds::BoundingBox;
use crate::csg::CsgInfo;
use crate::geometry::{ self, RadialBounds, TriangleInfo, SmoothTriangleInfo };
use crate::group::GroupInfo;
use crate::intersect::{ Intersection, Intersections };
use crate::light::Material;
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

/// A handle to a shape stored in a `ShapeArena`.
///
/// Handles are only meaningful for the arena which issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// The XZ plane, with its normal pointing up the Y axis.
    Plane,

    /// A cube spanning -1 to 1 on every axis.
    Cube,

    /// A unit-radius cylinder around the Y axis.
    Cylinder(RadialBounds),

    /// A double-napped cone around the Y axis, apex at the origin.
    Cone(RadialBounds),

    /// A triangle. See `TriangleInfo` for further explanation.
    Triangle(TriangleInfo),

    /// A triangle with per-vertex normals.
    SmoothTriangle(SmoothTriangleInfo),

    /// A group of shapes. Can include other groups of shapes.
    Group(GroupInfo),

    /// A set operation over two shapes.
    Csg(CsgInfo),
}

/// A shape: its geometry, transformation and material.
///
/// Shapes are built with the constructors below, then handed to a
/// `ShapeArena`. Once inside an arena, transforms and materials must be
/// changed through the arena (`set_transform`, `set_material`) so that
/// container bounds stay up to date.
///
/// ```
/// # use glint::matrix::Matrix4D;
/// # use glint::shape::{ Shape, ShapeArena };
/// let mut shapes = ShapeArena::new();
/// let g = shapes.add(Shape::group());
/// let s = shapes.add(Shape::sphere()
///     .with_transform(Matrix4D::translation(5.0, 0.0, 0.0)));
///
/// shapes.add_child(g, s);
/// assert!(shapes.includes(g, s));
/// assert_eq!(shapes.parent(s), Some(g));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub transform: Transform,
    pub material: Material,

    parent: Option<ShapeId>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Shape {
        Shape {
            kind,
            transform: Transform::default(),
            material: Material::default(),
            parent: None,
        }
    }

    pub fn sphere() -> Shape {
        Shape::new(ShapeKind::Sphere)
    }

    pub fn plane() -> Shape {
        Shape::new(ShapeKind::Plane)
    }

    pub fn cube() -> Shape {
        Shape::new(ShapeKind::Cube)
    }

    /// An infinitely long, open cylinder.
    pub fn cylinder() -> Shape {
        Shape::new(ShapeKind::Cylinder(RadialBounds::default()))
    }

    /// A cylinder cut off at `minimum` and `maximum`, with open ends.
    pub fn bounded_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::new(ShapeKind::Cylinder(RadialBounds::new(minimum, maximum, false)))
    }

    /// A cylinder cut off at `minimum` and `maximum`, with capped ends.
    pub fn capped_cylinder(minimum: f64, maximum: f64) -> Shape {
        Shape::new(ShapeKind::Cylinder(RadialBounds::new(minimum, maximum, true)))
    }

    /// An infinite, open double cone.
    pub fn cone() -> Shape {
        Shape::new(ShapeKind::Cone(RadialBounds::default()))
    }

    pub fn bounded_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::new(ShapeKind::Cone(RadialBounds::new(minimum, maximum, false)))
    }

    pub fn capped_cone(minimum: f64, maximum: f64) -> Shape {
        Shape::new(ShapeKind::Cone(RadialBounds::new(minimum, maximum, true)))
    }

    pub fn triangle(p1: Tuple4D, p2: Tuple4D, p3: Tuple4D) -> Shape {
        Shape::new(ShapeKind::Triangle(TriangleInfo::new(p1, p2, p3)))
    }

    pub fn smooth_triangle(p1: Tuple4D, p2: Tuple4D, p3: Tuple4D,
        n1: Tuple4D, n2: Tuple4D, n3: Tuple4D) -> Shape {
        Shape::new(ShapeKind::SmoothTriangle(
            SmoothTriangleInfo::new(p1, p2, p3, n1, n2, n3)
        ))
    }

    /// An empty group. Children are added with `ShapeArena::add_child`.
    pub fn group() -> Shape {
        Shape::new(ShapeKind::Group(GroupInfo::default()))
    }

    pub fn with_transform(mut self, m: Matrix4D) -> Shape {
        self.transform = m.into();
        self
    }

    pub fn with_material(mut self, material: Material) -> Shape {
        self.material = material;
        self
    }

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group(_))
    }

    /// The object-space bounds of the shape.
    ///
    /// Groups and CSG nodes report the bounds cached as children were added.
    pub fn bounds(&self) -> BoundingBox {
        let inf = std::f64::INFINITY;

        match self.kind {
            ShapeKind::Sphere | ShapeKind::Cube => BoundingBox::new(
                Tuple4D::point(-1.0, -1.0, -1.0),
                Tuple4D::point(1.0, 1.0, 1.0),
            ),
            ShapeKind::Plane => BoundingBox::new(
                Tuple4D::point(-inf, 0.0, -inf),
                Tuple4D::point(inf, 0.0, inf),
            ),
            ShapeKind::Cylinder(ref rb) => BoundingBox::new(
                Tuple4D::point(-1.0, rb.minimum, -1.0),
                Tuple4D::point(1.0, rb.maximum, 1.0),
            ),
            ShapeKind::Cone(ref rb) => {
                let r = rb.minimum.abs().max(rb.maximum.abs());
                BoundingBox::new(
                    Tuple4D::point(-r, rb.minimum, -r),
                    Tuple4D::point(r, rb.maximum, r),
                )
            },
            ShapeKind::Triangle(ref ti) => ti.bounds(),
            ShapeKind::SmoothTriangle(ref sti) => sti.triangle.bounds(),
            ShapeKind::Group(ref gi) => gi.bounds(),
            ShapeKind::Csg(ref ci) => ci.bounds(),
        }
    }

    /// The bounds of the shape in its parent's space.
    pub fn parent_space_bounds(&self) -> BoundingBox {
        self.bounds().transform(&self.transform.matrix())
    }
}

/// Owner of every shape in a scene.
///
/// Parent and child relationships between shapes are stored as `ShapeId`
/// handles into the arena. Shapes are never removed.
#[derive(Clone, Debug, Default)]
pub struct ShapeArena {
    shapes: Vec<Shape>,
}

impl Index<ShapeId> for ShapeArena {
    type Output = Shape;

    fn index(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0]
    }
}

impl ShapeArena {
    pub fn new() -> ShapeArena {
        ShapeArena { shapes: Vec::new() }
    }

    /// Moves a shape into the arena, returning its handle.
    ///
    /// # Panics
    ///
    /// Panics if the shape is a group or CSG node which already has children;
    /// those are attached with `add_child` and `csg` instead.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let has_children = match shape.kind {
            ShapeKind::Group(ref gi) => !gi.children().is_empty(),
            ShapeKind::Csg(_) => true,
            _ => false,
        };
        assert!(!has_children, "containers must be filled through the arena");

        self.push(shape)
    }

    pub(crate) fn push(&mut self, shape: Shape) -> ShapeId {
        self.shapes.push(Shape { parent: None, ..shape });
        ShapeId(self.shapes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ShapeId) -> &mut Shape {
        &mut self.shapes[id.0]
    }

    pub(crate) fn set_parent(&mut self, id: ShapeId, parent: Option<ShapeId>) {
        self.shapes[id.0].parent = parent;
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self[id].parent
    }

    /// Iterates over the handles of every shape in the arena.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> {
        (0..self.shapes.len()).map(ShapeId)
    }

    pub fn bounds(&self, id: ShapeId) -> BoundingBox {
        self[id].bounds()
    }

    pub fn parent_space_bounds(&self, id: ShapeId) -> BoundingBox {
        self[id].parent_space_bounds()
    }

    /// Replaces a shape's transformation, refreshing the cached bounds of
    /// every container above it.
    pub fn set_transform(&mut self, id: ShapeId, m: Matrix4D) {
        self.get_mut(id).transform = m.into();

        if let Some(parent) = self.parent(id) {
            self.refresh_bounds(parent);
        }
    }

    /// Replaces a shape's material. Groups pass the material on to every
    /// member; CSG nodes keep it to themselves.
    pub fn set_material(&mut self, id: ShapeId, material: Material) {
        let children: Vec<ShapeId> = match self[id].kind {
            ShapeKind::Group(ref gi) => gi.children().to_vec(),
            _ => Vec::new(),
        };

        for child in children {
            self.set_material(child, material.clone());
        }

        self.get_mut(id).material = material;
    }

    /// Converts a world-space point to the object space of a shape.
    ///
    /// Every ancestor's transformation is undone, outermost first.
    pub fn world_to_object(&self, id: ShapeId, point: Tuple4D) -> Tuple4D {
        let point = match self.parent(id) {
            Some(parent) => self.world_to_object(parent, point),
            None => point,
        };

        self[id].transform.inverse() * point
    }

    /// Converts an object-space normal of a shape to world space.
    pub fn normal_to_world(&self, id: ShapeId, normal: Tuple4D) -> Tuple4D {
        let mut normal = self[id].transform.inverse_transpose() * normal;
        normal.w = 0.0;
        let normal = normal.normalize();

        match self.parent(id) {
            Some(parent) => self.normal_to_world(parent, normal),
            None => normal,
        }
    }

    /// The world-space normal of a shape at a world-space point.
    ///
    /// `hit` is the intersection which produced the point; smooth triangles
    /// interpolate their normal from it.
    pub fn normal_at(&self, id: ShapeId, world_point: Tuple4D,
        hit: &Intersection) -> Tuple4D {
        let local_point = self.world_to_object(id, world_point);
        let local_normal = self.local_normal_at(id, &local_point, hit);
        self.normal_to_world(id, local_normal)
    }

    /// Intersects a world-space (or parent-space) ray with a shape.
    ///
    /// The ray is carried into the shape's object space before intersecting.
    pub fn intersect(&self, id: ShapeId, ray: &Ray4D) -> Intersections {
        let local_ray = ray.to_object_space(&self[id].transform);
        self.local_intersect(id, &local_ray)
    }

    /// Intersects an object-space ray with a shape.
    pub fn local_intersect(&self, id: ShapeId, ray: &Ray4D) -> Intersections {
        let wrap = |ts: Vec<f64>| -> Intersections {
            ts.into_iter().map(|t| Intersection::new(t, id)).collect::<Vec<_>>().into()
        };

        match self[id].kind {
            ShapeKind::Sphere => wrap(geometry::intersect_sphere(ray)),
            ShapeKind::Plane => wrap(geometry::intersect_plane(ray)),
            ShapeKind::Cube => wrap(geometry::intersect_cube(ray)),
            ShapeKind::Cylinder(ref rb) => wrap(geometry::intersect_cylinder(rb, ray)),
            ShapeKind::Cone(ref rb) => wrap(geometry::intersect_cone(rb, ray)),
            ShapeKind::Triangle(ref ti) => triangle_hit(id, ti, ray),
            ShapeKind::SmoothTriangle(ref sti) => triangle_hit(id, &sti.triangle, ray),
            ShapeKind::Group(_) => self.intersect_group(id, ray),
            ShapeKind::Csg(_) => self.intersect_csg(id, ray),
        }
    }

    /// The object-space normal of a primitive at an object-space point.
    ///
    /// # Panics
    ///
    /// Groups and CSG nodes have no surface of their own; intersections
    /// always refer to the primitives inside them.
    pub fn local_normal_at(&self, id: ShapeId, at: &Tuple4D,
        hit: &Intersection) -> Tuple4D {
        match self[id].kind {
            ShapeKind::Sphere => geometry::normal_at_sphere(at),
            ShapeKind::Plane => geometry::normal_at_plane(),
            ShapeKind::Cube => geometry::normal_at_cube(at),
            ShapeKind::Cylinder(ref rb) => geometry::normal_at_cylinder(rb, at),
            ShapeKind::Cone(ref rb) => geometry::normal_at_cone(rb, at),
            ShapeKind::Triangle(ref ti) => ti.normal,
            ShapeKind::SmoothTriangle(ref sti) => sti.normal_at(hit.uv),
            ShapeKind::Group(_) | ShapeKind::Csg(_) =>
                unreachable!("normal requested on a group or CSG node"),
        }
    }
}

fn triangle_hit(id: ShapeId, ti: &TriangleInfo, ray: &Ray4D) -> Intersections {
    match ti.intersect(ray) {
        Some((t, u, v)) => vec![Intersection::with_uv(t, id, u, v)].into(),
        None => Intersections::new(),
    }
}

#[cfg(test)]
fn ray(origin: Tuple4D, direction: Tuple4D) -> Ray4D {
    Ray4D::new(origin, direction)
}

#[test]
fn ray_hits_scaled_sphere() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0)));

    let xs = shapes.intersect(s, &ray(Tuple4D::point(0.0, 0.0, -5.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0)));

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 3.0);
    assert_eq!(xs[1].t, 7.0);
    assert_eq!(xs[0].object, s);
}

#[test]
fn ray_misses_translated_sphere() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::translation(5.0, 0.0, 0.0)));

    let xs = shapes.intersect(s, &ray(Tuple4D::point(0.0, 0.0, -5.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0)));
    assert!(xs.is_empty());
}

#[test]
fn normal_on_sphere() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let hit = Intersection::new(0.0, s);
    let k = 3.0f64.sqrt() / 3.0;

    assert_eq!(shapes.normal_at(s, Tuple4D::point(1.0, 0.0, 0.0), &hit),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(shapes.normal_at(s, Tuple4D::point(0.0, 1.0, 0.0), &hit),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(shapes.normal_at(s, Tuple4D::point(k, k, k), &hit),
        Tuple4D::vector(k, k, k));
    assert_eq!(shapes.normal_at(s, Tuple4D::point(k, k, k), &hit).magnitude(), 1.0);
}

#[test]
fn normal_on_sphere_translated() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0)));
    let hit = Intersection::new(0.0, s);

    let n = shapes.normal_at(s, Tuple4D::point(0.0, 1.70711, -0.70711), &hit);
    assert_eq!(n, Tuple4D::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_sphere_transformed() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
            * Matrix4D::rotation_z(std::f64::consts::PI / 5.0)));
    let hit = Intersection::new(0.0, s);

    let n = shapes.normal_at(s,
        Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, -(2.0f64.sqrt() / 2.0)), &hit);
    assert_eq!(n, Tuple4D::vector(0.0, 0.97014, -0.24254));
}

#[test]
fn normal_on_plane_is_constant() {
    let mut shapes = ShapeArena::new();
    let p = shapes.add(Shape::plane());
    let hit = Intersection::new(0.0, p);

    for point in [Tuple4D::origin(),
                  Tuple4D::point(10.0, 0.0, -10.0),
                  Tuple4D::point(-5.0, 0.0, 150.0)] {
        assert_eq!(shapes.normal_at(p, point, &hit), Tuple4D::vector(0.0, 1.0, 0.0));
    }
}

#[test]
fn plane_hit_is_tagged_with_plane() {
    let mut shapes = ShapeArena::new();
    let p = shapes.add(Shape::plane());

    let xs = shapes.intersect(p, &ray(Tuple4D::point(0.0, 1.0, 0.0),
                                      Tuple4D::vector(0.0, -1.0, 0.0)));
    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].t, 1.0);
    assert_eq!(xs[0].object, p);
}

#[test]
fn smooth_triangle_records_uv() {
    let mut shapes = ShapeArena::new();
    let t = shapes.add(Shape::smooth_triangle(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::point(-1.0, 0.0, 0.0),
        Tuple4D::point(1.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0),
        Tuple4D::vector(-1.0, 0.0, 0.0),
        Tuple4D::vector(1.0, 0.0, 0.0),
    ));

    let xs = shapes.intersect(t, &ray(Tuple4D::point(-0.2, 0.3, -2.0),
                                      Tuple4D::vector(0.0, 0.0, 1.0)));
    let (u, v) = xs[0].uv.unwrap();
    assert!(crate::feq(u, 0.45));
    assert!(crate::feq(v, 0.25));

    let hit = Intersection::with_uv(1.0, t, 0.45, 0.25);
    assert_eq!(shapes.normal_at(t, Tuple4D::origin(), &hit),
        Tuple4D::vector(-0.5547, 0.83205, 0.0));
}

#[test]
fn primitive_bounds() {
    let inf = std::f64::INFINITY;

    let b = Shape::plane().bounds();
    assert_eq!(b.minimum, Tuple4D::point(-inf, 0.0, -inf));
    assert_eq!(b.maximum, Tuple4D::point(inf, 0.0, inf));

    let b = Shape::bounded_cylinder(-5.0, 3.0).bounds();
    assert_eq!(b.minimum, Tuple4D::point(-1.0, -5.0, -1.0));
    assert_eq!(b.maximum, Tuple4D::point(1.0, 3.0, 1.0));

    let b = Shape::bounded_cone(-5.0, 3.0).bounds();
    assert_eq!(b.minimum, Tuple4D::point(-5.0, -5.0, -5.0));
    assert_eq!(b.maximum, Tuple4D::point(5.0, 3.0, 5.0));

    let b = Shape::cone().bounds();
    assert_eq!(b.minimum, Tuple4D::point(-inf, -inf, -inf));
    assert_eq!(b.maximum, Tuple4D::point(inf, inf, inf));

    let b = Shape::sphere()
        .with_transform(Matrix4D::scaling(0.5, 2.0, 4.0).translate(1.0, -3.0, 5.0))
        .parent_space_bounds();
    assert_eq!(b.minimum, Tuple4D::point(0.5, -5.0, 1.0));
    assert_eq!(b.maximum, Tuple4D::point(1.5, -1.0, 9.0));
}

#[test]
fn setting_material_after_insertion() {
    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere());
    let m = Material { ambient: 1.0, ..Default::default() };

    shapes.set_material(s, m.clone());
    assert_eq!(shapes[s].material, m);
}

#[test]
#[should_panic]
fn normal_on_group_is_unreachable() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    shapes.local_normal_at(g, &Tuple4D::origin(), &Intersection::new(0.0, g));
}
