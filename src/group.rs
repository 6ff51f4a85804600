use log::{ debug, trace };

use crate::bounds::BoundingBox;
use crate::intersect::Intersections;
use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeArena, ShapeId, ShapeKind };

/// The members of a group and the bounds enclosing them.
///
/// The bounds are accumulated in the group's object space as members are
/// added, so checking a ray against the whole group costs a single box test.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupInfo {
    pub(crate) children: Vec<ShapeId>,
    pub(crate) bounds: BoundingBox,
}

impl GroupInfo {
    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

impl ShapeArena {
    /// The members of a group. Other shapes have none.
    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        match self[id].kind {
            ShapeKind::Group(ref gi) => gi.children(),
            _ => &[],
        }
    }

    /// Adds `child` to `group`.
    ///
    /// The child takes on the group's material and the group's bounds grow to
    /// enclose it, along with the bounds of every container above the group.
    ///
    /// # Panics
    ///
    /// Panics if `group` isn't a group, or if `child` already has a parent.
    pub fn add_child(&mut self, group: ShapeId, child: ShapeId) {
        let material = self[group].material.clone();
        self.set_material(child, material);
        self.attach(group, child);
    }

    /// Links `child` under `group` and grows the cached bounds, leaving the
    /// child's material alone.
    pub(crate) fn attach(&mut self, group: ShapeId, child: ShapeId) {
        assert!(self[group].is_group(), "shapes can only be added to groups");
        assert!(self.parent(child).is_none(), "shape already has a parent");
        assert_ne!(group, child, "a group can't contain itself");

        self.set_parent(child, Some(group));
        let child_bounds = self.parent_space_bounds(child);

        if let ShapeKind::Group(ref mut gi) = self.get_mut(group).kind {
            gi.children.push(child);
            gi.bounds.add_box(&child_bounds);
        }

        self.grow_ancestor_bounds(group);
    }

    /// True if `target` is `container` or lies anywhere beneath it.
    pub fn includes(&self, container: ShapeId, target: ShapeId) -> bool {
        let mut current = Some(target);

        while let Some(id) = current {
            if id == container {
                return true;
            }
            current = self.parent(id);
        }

        false
    }

    /// The cached bounds of a group or CSG node.
    fn container_bounds_mut(&mut self, id: ShapeId) -> Option<&mut BoundingBox> {
        match self.get_mut(id).kind {
            ShapeKind::Group(ref mut gi) => Some(&mut gi.bounds),
            ShapeKind::Csg(ref mut ci) => Some(&mut ci.bounds),
            _ => None,
        }
    }

    /// Extends every container above `id` to enclose it.
    pub(crate) fn grow_ancestor_bounds(&mut self, id: ShapeId) {
        let mut current = id;

        while let Some(parent) = self.parent(current) {
            let b = self.parent_space_bounds(current);
            if let Some(bounds) = self.container_bounds_mut(parent) {
                bounds.add_box(&b);
            }
            current = parent;
        }
    }

    /// Recomputes the cached bounds of `id` from its members, then does the
    /// same for every container above it.
    pub(crate) fn refresh_bounds(&mut self, id: ShapeId) {
        let mut current = Some(id);

        while let Some(container) = current {
            let members: Vec<ShapeId> = match self[container].kind {
                ShapeKind::Group(ref gi) => gi.children.clone(),
                ShapeKind::Csg(ref ci) => vec![ci.left(), ci.right()],
                _ => Vec::new(),
            };

            let mut fresh = BoundingBox::EMPTY;
            for m in members {
                fresh.add_box(&self.parent_space_bounds(m));
            }

            if let Some(bounds) = self.container_bounds_mut(container) {
                *bounds = fresh;
            }

            current = self.parent(container);
        }
    }

    /// Intersects an object-space ray with the members of a group.
    pub(crate) fn intersect_group(&self, id: ShapeId, ray: &Ray4D) -> Intersections {
        let gi = match self[id].kind {
            ShapeKind::Group(ref gi) => gi,
            _ => unreachable!(),
        };

        if !gi.bounds.intersects(ray) {
            return Intersections::new();
        }

        Intersections::aggregate(
            gi.children.iter().map(|&child| self.intersect(child, ray)).collect()
        )
    }

    /// Splits a group's members by the halves of its bounds.
    ///
    /// Members that fit entirely in the left or right half are removed from
    /// the group and returned; members straddling the split stay. Removed
    /// members are detached and must be added somewhere again. If every
    /// member would land in the same half, nothing is removed.
    pub fn partition_children(&mut self, group: ShapeId) -> (Vec<ShapeId>, Vec<ShapeId>) {
        let (children, bounds) = match self[group].kind {
            ShapeKind::Group(ref gi) => (gi.children.clone(), gi.bounds),
            _ => return (Vec::new(), Vec::new()),
        };

        let (left_bounds, right_bounds) = bounds.split();
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut kept = Vec::new();

        for child in children.iter().copied() {
            let b = self.parent_space_bounds(child);
            if left_bounds.contains_box(&b) {
                left.push(child);
            } else if right_bounds.contains_box(&b) {
                right.push(child);
            } else {
                kept.push(child);
            }
        }

        if left.len() == children.len() || right.len() == children.len() {
            return (Vec::new(), Vec::new());
        }

        for &child in left.iter().chain(right.iter()) {
            self.set_parent(child, None);
        }

        if let ShapeKind::Group(ref mut gi) = self.get_mut(group).kind {
            gi.children = kept;
        }

        (left, right)
    }

    /// Wraps `members` in a new group and adds it to `group`.
    ///
    /// The members keep their own materials; the new group takes its parent's.
    pub fn make_subgroup(&mut self, group: ShapeId, members: &[ShapeId]) -> ShapeId {
        let material = self[group].material.clone();
        let sub = self.add(Shape::group().with_material(material));

        for &m in members {
            self.attach(sub, m);
        }

        self.attach(group, sub);
        sub
    }

    /// Builds a bounding volume hierarchy below `id`.
    ///
    /// Groups with at least `threshold` members are partitioned into
    /// subgroups; the division then recurses into every member. CSG nodes
    /// divide both of their operands.
    pub fn divide(&mut self, id: ShapeId, threshold: usize) {
        match self[id].kind {
            ShapeKind::Group(ref gi) => {
                if gi.children.len() >= threshold {
                    let (left, right) = self.partition_children(id);
                    trace!("partitioned group {} into {} + {} members",
                        id.index(), left.len(), right.len());

                    if !left.is_empty() {
                        self.make_subgroup(id, &left);
                    }
                    if !right.is_empty() {
                        self.make_subgroup(id, &right);
                    }
                }

                for child in self.children(id).to_vec() {
                    self.divide(child, threshold);
                }
            },
            ShapeKind::Csg(ref ci) => {
                let (left, right) = (ci.left(), ci.right());
                self.divide(left, threshold);
                self.divide(right, threshold);
            },
            _ => (),
        }
    }

    /// Divides every group below `root` and logs the resulting shape count.
    pub fn build_bvh(&mut self, root: ShapeId, threshold: usize) {
        let before = self.len();
        self.divide(root, threshold);
        debug!("bvh under shape {}: threshold {}, {} subgroups created",
            root.index(), threshold, self.len() - before);
    }
}

#[cfg(test)]
use crate::{ matrix::Matrix4D, tuple::Tuple4D, light::Material, color::Color };

#[cfg(test)]
fn sphere_at(shapes: &mut ShapeArena, x: f64, y: f64, z: f64) -> ShapeId {
    shapes.add(Shape::sphere().with_transform(Matrix4D::translation(x, y, z)))
}

#[test]
fn adding_a_child_to_a_group() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s = shapes.add(Shape::sphere());

    assert!(shapes.children(g).is_empty());
    shapes.add_child(g, s);

    assert_eq!(shapes.children(g), &[s]);
    assert_eq!(shapes.parent(s), Some(g));
}

#[test]
fn group_propagates_material() {
    let mut shapes = ShapeArena::new();
    let red = Material { color: Color::red(), ..Default::default() };
    let g = shapes.add(Shape::group().with_material(red.clone()));
    let inner = shapes.add(Shape::group());
    let s = shapes.add(Shape::sphere());

    shapes.add_child(inner, s);
    shapes.add_child(g, inner);
    assert_eq!(shapes[s].material, red);

    let blue = Material { color: Color::blue(), ..Default::default() };
    shapes.set_material(g, blue.clone());
    assert_eq!(shapes[inner].material, blue);
    assert_eq!(shapes[s].material, blue);
}

#[test]
#[should_panic]
fn adding_a_child_twice_panics() {
    let mut shapes = ShapeArena::new();
    let g1 = shapes.add(Shape::group());
    let g2 = shapes.add(Shape::group());
    let s = shapes.add(Shape::sphere());

    shapes.add_child(g1, s);
    shapes.add_child(g2, s);
}

#[test]
fn intersecting_ray_with_empty_group() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let r = Ray4D::new(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));

    assert!(shapes.local_intersect(g, &r).is_empty());
}

#[test]
fn intersecting_ray_with_nonempty_group() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s1 = shapes.add(Shape::sphere());
    let s2 = sphere_at(&mut shapes, 0.0, 0.0, -3.0);
    let s3 = sphere_at(&mut shapes, 5.0, 0.0, 0.0);
    shapes.add_child(g, s1);
    shapes.add_child(g, s2);
    shapes.add_child(g, s3);

    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = shapes.local_intersect(g, &r);

    let objects: Vec<ShapeId> = xs.iter().map(|i| i.object).collect();
    assert_eq!(objects, vec![s2, s2, s1, s1]);
}

#[test]
fn intersecting_a_transformed_group() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group()
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0)));
    let s = sphere_at(&mut shapes, 5.0, 0.0, 0.0);
    shapes.add_child(g, s);

    let r = Ray4D::new(Tuple4D::point(10.0, 0.0, -10.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert_eq!(shapes.intersect(g, &r).len(), 2);
}

#[test]
fn converting_between_world_and_object_space() {
    let mut shapes = ShapeArena::new();
    let g1 = shapes.add(Shape::group()
        .with_transform(Matrix4D::rotation_y(std::f64::consts::PI / 2.0)));
    let g2 = shapes.add(Shape::group()
        .with_transform(Matrix4D::scaling(1.0, 2.0, 3.0)));
    let s = sphere_at(&mut shapes, 5.0, 0.0, 0.0);
    shapes.add_child(g2, s);
    shapes.add_child(g1, g2);

    assert_eq!(shapes.world_to_object(s, Tuple4D::point(-2.0, 0.0, -10.0)),
        Tuple4D::point(0.0, 0.0, -1.0));

    let k = 3.0f64.sqrt() / 3.0;
    assert_eq!(shapes.normal_to_world(s, Tuple4D::vector(k, k, k)),
        Tuple4D::vector(0.28571, 0.42857, -0.85714));
}

#[test]
fn normal_on_child_object() {
    use crate::intersect::Intersection;

    let mut shapes = ShapeArena::new();
    let g1 = shapes.add(Shape::group()
        .with_transform(Matrix4D::rotation_y(std::f64::consts::PI / 2.0)));
    let g2 = shapes.add(Shape::group()
        .with_transform(Matrix4D::scaling(1.0, 2.0, 3.0)));
    let s = sphere_at(&mut shapes, 5.0, 0.0, 0.0);
    shapes.add_child(g2, s);
    shapes.add_child(g1, g2);

    let n = shapes.normal_at(s, Tuple4D::point(1.7321, 1.1547, -5.5774),
        &Intersection::new(0.0, s));
    assert_eq!(n, Tuple4D::vector(0.28570, 0.42854, -0.85716));
}

#[test]
fn group_bounds_contain_children() {
    let mut shapes = ShapeArena::new();
    let outer = shapes.add(Shape::group());
    let inner = shapes.add(Shape::group()
        .with_transform(Matrix4D::translation(0.0, 10.0, 0.0)));
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0).translate(2.0, 5.0, -3.0)));
    let c = shapes.add(Shape::bounded_cylinder(-2.0, 2.0)
        .with_transform(Matrix4D::scaling(0.5, 1.0, 0.5).translate(-4.0, -1.0, 4.0)));
    shapes.add_child(outer, inner);
    shapes.add_child(inner, s);
    shapes.add_child(outer, c);

    let b = shapes.bounds(outer);
    assert_eq!(b.minimum, Tuple4D::point(-4.5, -3.0, -5.0));
    assert_eq!(b.maximum, Tuple4D::point(4.0, 17.0, 4.5));

    for id in [inner, c] {
        assert!(b.contains_box(&shapes.parent_space_bounds(id)));
    }
}

#[test]
fn moving_a_child_refreshes_bounds() {
    let mut shapes = ShapeArena::new();
    let outer = shapes.add(Shape::group());
    let inner = shapes.add(Shape::group());
    let s = shapes.add(Shape::sphere());
    shapes.add_child(inner, s);
    shapes.add_child(outer, inner);

    shapes.set_transform(s, Matrix4D::translation(10.0, 0.0, 0.0));

    assert_eq!(shapes.bounds(outer).minimum, Tuple4D::point(9.0, -1.0, -1.0));
    assert_eq!(shapes.bounds(outer).maximum, Tuple4D::point(11.0, 1.0, 1.0));
}

#[test]
fn group_includes_descendants() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let sub = shapes.add(Shape::group());
    let s = shapes.add(Shape::sphere());
    let other = shapes.add(Shape::sphere());
    shapes.add_child(sub, s);
    shapes.add_child(g, sub);

    assert!(shapes.includes(g, s));
    assert!(shapes.includes(sub, s));
    assert!(shapes.includes(s, s));
    assert!(!shapes.includes(g, other));
    assert!(!shapes.includes(s, g));
}

#[test]
fn ray_misses_group_bounds() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s = sphere_at(&mut shapes, 0.0, 0.0, 0.0);
    shapes.add_child(g, s);

    let r = Ray4D::new(Tuple4D::point(0.0, 5.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(shapes.local_intersect(g, &r).is_empty());
}

#[test]
fn partitioning_a_groups_children() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s1 = sphere_at(&mut shapes, -2.0, 0.0, 0.0);
    let s2 = sphere_at(&mut shapes, 2.0, 0.0, 0.0);
    let s3 = shapes.add(Shape::sphere());
    for s in [s1, s2, s3] {
        shapes.add_child(g, s);
    }

    let (left, right) = shapes.partition_children(g);

    assert_eq!(shapes.children(g), &[s3]);
    assert_eq!(left, vec![s1]);
    assert_eq!(right, vec![s2]);
    assert_eq!(shapes.parent(s1), None);
}

#[test]
fn creating_a_subgroup() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let s1 = shapes.add(Shape::sphere());
    let s2 = shapes.add(Shape::sphere());

    let sub = shapes.make_subgroup(g, &[s1, s2]);

    assert_eq!(shapes.children(g), &[sub]);
    assert_eq!(shapes.children(sub), &[s1, s2]);
}

#[test]
fn subgroups_keep_member_materials() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    let red = Material { color: Color::red(), ..Default::default() };
    let s1 = shapes.add(Shape::sphere().with_material(red.clone()));

    let sub = shapes.make_subgroup(g, &[s1]);

    assert_eq!(shapes[s1].material, red);
    assert_eq!(shapes[sub].material, Material::default());
}

#[test]
fn subdividing_a_group() {
    let mut shapes = ShapeArena::new();
    let s1 = sphere_at(&mut shapes, -2.0, -2.0, 0.0);
    let s2 = sphere_at(&mut shapes, -2.0, 2.0, 0.0);
    let s3 = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(4.0, 4.0, 4.0)));
    let g = shapes.add(Shape::group());
    for s in [s1, s2, s3] {
        shapes.add_child(g, s);
    }

    shapes.divide(g, 1);

    let children = shapes.children(g).to_vec();
    assert_eq!(children[0], s3);

    let sub = children[1];
    let grandchildren = shapes.children(sub).to_vec();
    assert_eq!(grandchildren.len(), 2);
    assert_eq!(shapes.children(grandchildren[0]), &[s1]);
    assert_eq!(shapes.children(grandchildren[1]), &[s2]);
}

#[test]
fn subdividing_a_group_with_too_few_children() {
    let mut shapes = ShapeArena::new();
    let s1 = sphere_at(&mut shapes, -2.0, 0.0, 0.0);
    let s2 = sphere_at(&mut shapes, 2.0, 1.0, 0.0);
    let s3 = sphere_at(&mut shapes, 2.0, -1.0, 0.0);
    let sub = shapes.add(Shape::group());
    for s in [s1, s2, s3] {
        shapes.add_child(sub, s);
    }
    let s4 = shapes.add(Shape::sphere());
    let g = shapes.add(Shape::group());
    shapes.add_child(g, sub);
    shapes.add_child(g, s4);

    shapes.divide(g, 3);

    assert_eq!(shapes.children(g), &[sub, s4]);
    let parts = shapes.children(sub).to_vec();
    assert_eq!(parts.len(), 2);
    assert_eq!(shapes.children(parts[0]), &[s1]);
    assert_eq!(shapes.children(parts[1]), &[s2, s3]);
}

#[test]
fn divided_group_intersects_like_the_undivided_one() {
    let mut shapes = ShapeArena::new();
    let g = shapes.add(Shape::group());
    for i in 0..8 {
        let s = sphere_at(&mut shapes, (i as f64) * 3.0 - 10.0, 0.0, 0.0);
        shapes.add_child(g, s);
    }

    let r = Ray4D::new(Tuple4D::point(-20.0, 0.0, 0.0), Tuple4D::vector(1.0, 0.0, 0.0));
    let before: Vec<f64> = shapes.intersect(g, &r).iter().map(|i| i.t).collect();

    shapes.build_bvh(g, 2);
    let after: Vec<f64> = shapes.intersect(g, &r).iter().map(|i| i.t).collect();

    assert_eq!(before.len(), 16);
    assert_eq!(before, after);
    assert!(shapes.children(g).len() < 8);
}
