use log::trace;

use crate::color::Color;
use crate::intersect::{ Intersections, IntersectionComputation };
use crate::light::{ PointLight, Material, lighting };
use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeArena, ShapeId };
use crate::tuple::Tuple4D;

/// A world with objects and light.
///
/// The world owns every shape through its `ShapeArena`; `objects` lists the
/// top-level shapes which rays are tested against. Members of groups and CSG
/// nodes are reached through their containers.
///
/// Worlds collect all objects as well as light for rendering. Most shading
/// logic is performed within worlds.
#[derive(Clone, Debug)]
pub struct World {
    pub shapes: ShapeArena,
    pub objects: Vec<ShapeId>,
    pub light: Option<PointLight>,
}

impl Default for World {
    fn default() -> World {
        let light = PointLight::new(
            Color::white(),
            Tuple4D::point(-10.0, 10.0, -10.0)
        );

        let mut w = World { light: Some(light), ..World::empty() };

        w.add_shape(Shape::sphere().with_material(Material {
            color: Color::rgb(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        }));
        w.add_shape(Shape::sphere()
            .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5)));

        w
    }
}

impl World {
    /// Creates the default world: two concentric spheres and one light.
    pub fn new() -> World {
        Default::default()
    }

    /// Creates an empty world with no objects and no light.
    pub fn empty() -> World {
        World { shapes: ShapeArena::new(), objects: Vec::new(), light: None }
    }

    /// Marks a shape already in the arena as a top-level object.
    pub fn add(&mut self, id: ShapeId) {
        self.objects.push(id);
    }

    /// Moves a shape into the arena and marks it as a top-level object.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = self.shapes.add(shape);
        self.add(id);
        id
    }

    /// Intersects a ray against all objects in a world, sorted by `t`.
    pub fn intersect(&self, r: &Ray4D) -> Intersections {
        Intersections::aggregate(
            self.objects.iter().map(|&id| self.shapes.intersect(id, r)).collect()
        )
    }

    /// Determines whether a point is shadowed from the light.
    ///
    /// The nearest hit along the way to the light only shadows the point if
    /// its material casts shadows. Without a light, nothing is shadowed.
    pub fn is_shadowed(&self, p: Tuple4D) -> bool {
        let light = match self.light {
            Some(ref l) => l,
            None => return false,
        };

        let (r, distance) = Ray4D::towards(p, light.position);

        match self.intersect(&r).hit() {
            Some(i) => i.t < distance && self.shapes[i.object].material.casts_shadow,
            None => false,
        }
    }

    /// Calculates the color for a hit, based on shadows, light, reflection
    /// and refraction.
    ///
    /// `remaining` bounds how many more reflected or refracted rays may be
    /// spawned.
    pub fn shade_hit(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let surface = match self.light {
            Some(ref light) => lighting(&self.shapes, comps.object, light,
                comps.over_point, comps.eyev, comps.normalv,
                self.is_shadowed(comps.over_point)),
            None => Color::black(),
        };

        let reflected = self.reflected_color(comps, remaining);
        let refracted = self.refracted_color(comps, remaining);

        let m = &self.shapes[comps.object].material;
        if m.reflective > 0.0 && m.transparency > 0.0 {
            let reflectance = comps.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    /// Determines the color seen along a ray.
    pub fn color_at(&self, r: &Ray4D, remaining: usize) -> Color {
        let xs = self.intersect(r);

        // If at least one object is hit, return the color, else return black
        match xs.hit() {
            None => Color::black(),
            Some(hit) => {
                let comps = IntersectionComputation::new(r, &hit, &self.shapes, Some(&xs));
                self.shade_hit(&comps, remaining)
            },
        }
    }

    /// The color contributed by reflection at a hit.
    pub fn reflected_color(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let reflective = self.shapes[comps.object].material.reflective;

        if reflective == 0.0 || remaining == 0 {
            return Color::black();
        }

        trace!("reflection ray, {} remaining", remaining);
        let r = Ray4D::new(comps.over_point, comps.reflectv);
        self.color_at(&r, remaining - 1) * reflective
    }

    /// The color contributed by refraction at a hit.
    ///
    /// Black under total internal reflection.
    pub fn refracted_color(&self, comps: &IntersectionComputation, remaining: usize) -> Color {
        let transparency = self.shapes[comps.object].material.transparency;

        if transparency == 0.0 || remaining == 0 {
            return Color::black();
        }

        // Snell's law
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio.powi(2) * (1.0 - cos_i.powi(2));

        if sin2_t > 1.0 {
            return Color::black();
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t) - comps.eyev * n_ratio;

        let r = Ray4D::new(comps.under_point, direction);
        self.color_at(&r, remaining - 1) * transparency
    }
}

#[cfg(test)]
use crate::{ consts::RECURSION_DEPTH, intersect::Intersection };

#[cfg(test)]
fn ray(origin: Tuple4D, direction: Tuple4D) -> Ray4D {
    Ray4D::new(origin, direction)
}

#[test]
fn creating_the_default_world() {
    let w = World::new();
    let light = w.light.unwrap();

    assert_eq!(light.position, Tuple4D::point(-10.0, 10.0, -10.0));
    assert_eq!(light.intensity, Color::white());
    assert_eq!(w.objects.len(), 2);
    assert_eq!(w.shapes[w.objects[0]].material.color, Color::rgb(0.8, 1.0, 0.6));
    assert_eq!(w.shapes[w.objects[1]].transform.matrix(),
        Matrix4D::scaling(0.5, 0.5, 0.5));
}

#[test]
fn intersect_default_world_with_ray() {
    let w = World::new();
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    let xs = w.intersect(&r);

    assert_eq!(xs.len(), 4);
    assert_eq!(xs[0].t, 4.0);
    assert_eq!(xs[1].t, 4.5);
    assert_eq!(xs[2].t, 5.5);
    assert_eq!(xs[3].t, 6.0);
}

#[test]
fn shade_intersection_from_outside() {
    let w = World::new();
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, w.objects[0]);

    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);
    let c = w.shade_hit(&comps, RECURSION_DEPTH);

    assert_eq!(c, Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shade_intersection_from_inside() {
    let mut w = World::new();
    w.light = Some(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.25, 0.0)));
    let r = ray(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(0.5, w.objects[1]);

    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);
    let c = w.shade_hit(&comps, RECURSION_DEPTH);

    assert_eq!(c, Color::rgb(0.90498, 0.90498, 0.90498));
}

#[test]
fn shade_intersection_in_shadow() {
    let mut w = World::empty();
    w.light = Some(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0)));
    w.add_shape(Shape::sphere());
    let s2 = w.add_shape(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 10.0)));

    let r = ray(Tuple4D::point(0.0, 0.0, 5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(4.0, s2);
    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shading_without_light_is_black() {
    let mut w = World::new();
    w.light = None;
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::black());
}

#[test]
fn color_ray_miss() {
    let w = World::new();
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 1.0, 0.0));

    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::black());
}

#[test]
fn color_ray_hit() {
    let w = World::new();
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));

    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn color_behind_ray() {
    let mut w = World::new();
    let (outer, inner) = (w.objects[0], w.objects[1]);

    for id in [outer, inner] {
        let m = Material { ambient: 1.0, ..w.shapes[id].material.clone() };
        w.shapes.set_material(id, m);
    }

    let r = ray(Tuple4D::point(0.0, 0.0, 0.75), Tuple4D::vector(0.0, 0.0, -1.0));
    assert_eq!(w.color_at(&r, RECURSION_DEPTH), w.shapes[inner].material.color);
}

#[test]
fn shadow_collinear_point_and_light() {
    let w = World::new();
    assert!(!w.is_shadowed(Tuple4D::point(0.0, 10.0, 0.0)));
}

#[test]
fn shadow_object_between_point_and_light() {
    let w = World::new();
    assert!(w.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn shadow_object_behind_light() {
    let w = World::new();
    assert!(!w.is_shadowed(Tuple4D::point(-20.0, 20.0, -20.0)));
}

#[test]
fn shadow_object_behind_point() {
    let w = World::new();
    assert!(!w.is_shadowed(Tuple4D::point(-2.0, 2.0, -2.0)));
}

#[test]
fn shadowless_shapes_do_not_shadow() {
    let mut w = World::new();
    for id in w.objects.clone() {
        let m = Material { casts_shadow: false, ..w.shapes[id].material.clone() };
        w.shapes.set_material(id, m);
    }

    assert!(!w.is_shadowed(Tuple4D::point(10.0, -10.0, 10.0)));
}

#[test]
fn nearest_blocker_decides_shadow() {
    let mut w = World::empty();
    w.light = Some(PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0)));
    let clear = w.add_shape(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, 5.0))
        .with_material(Material { casts_shadow: false, ..Default::default() }));
    w.add_shape(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, 0.0, -5.0)));

    // The shadowless sphere is hit first and lets the light through
    assert!(!w.is_shadowed(Tuple4D::point(0.0, 0.0, 10.0)));

    w.shapes.set_material(clear, Material::default());
    assert!(w.is_shadowed(Tuple4D::point(0.0, 0.0, 10.0)));
}

#[test]
fn reflected_color_for_nonreflective_material() {
    let mut w = World::new();
    let inner = w.objects[1];
    let m = Material { ambient: 1.0, ..Default::default() };
    w.shapes.set_material(inner, m);

    let r = ray(Tuple4D::origin(), Tuple4D::vector(0.0, 0.0, 1.0));
    let i = Intersection::new(1.0, inner);
    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);

    assert_eq!(w.reflected_color(&comps, RECURSION_DEPTH), Color::black());
}

#[cfg(test)]
fn with_reflective_floor(w: &mut World) -> ShapeId {
    w.add_shape(Shape::plane()
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .with_material(Material { reflective: 0.5, ..Default::default() }))
}

#[test]
fn reflected_color_for_reflective_material() {
    let mut w = World::new();
    let floor = with_reflective_floor(&mut w);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -k, k));
    let i = Intersection::new(2.0f64.sqrt(), floor);
    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);

    assert_eq!(w.reflected_color(&comps, RECURSION_DEPTH),
        Color::rgb(0.19033, 0.23792, 0.14275));
}

#[test]
fn shade_hit_with_reflective_material() {
    let mut w = World::new();
    let floor = with_reflective_floor(&mut w);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -k, k));
    let i = Intersection::new(2.0f64.sqrt(), floor);
    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);

    assert_eq!(w.shade_hit(&comps, RECURSION_DEPTH),
        Color::rgb(0.87676, 0.92434, 0.82917));
}

#[test]
fn mutually_reflective_surfaces_terminate() {
    let mut w = World::empty();
    w.light = Some(PointLight::new(Color::white(), Tuple4D::origin()));
    let mirror = Material { reflective: 1.0, ..Default::default() };
    w.add_shape(Shape::plane()
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .with_material(mirror.clone()));
    w.add_shape(Shape::plane()
        .with_transform(Matrix4D::translation(0.0, 1.0, 0.0))
        .with_material(mirror));

    let r = ray(Tuple4D::origin(), Tuple4D::vector(0.0, 1.0, 0.0));
    let c = w.color_at(&r, RECURSION_DEPTH);
    assert!(c.r > 0.0);
}

#[test]
fn reflected_color_at_maximum_recursion_depth() {
    let mut w = World::new();
    let floor = with_reflective_floor(&mut w);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -k, k));
    let i = Intersection::new(2.0f64.sqrt(), floor);
    let comps = IntersectionComputation::new(&r, &i, &w.shapes, None);

    assert_eq!(w.reflected_color(&comps, 0), Color::black());
}

#[test]
fn refracted_color_with_opaque_surface() {
    let w = World::new();
    let shape = w.objects[0];
    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![
        Intersection::new(4.0, shape),
        Intersection::new(6.0, shape),
    ].into();

    let comps = IntersectionComputation::new(&r, &xs[0], &w.shapes, Some(&xs));
    assert_eq!(w.refracted_color(&comps, 5), Color::black());
}

#[test]
fn refracted_color_at_maximum_recursion_depth() {
    let mut w = World::new();
    let shape = w.objects[0];
    let m = Material {
        transparency: 1.0,
        refractive_index: 1.5,
        ..w.shapes[shape].material.clone()
    };
    w.shapes.set_material(shape, m);

    let r = ray(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs: Intersections = vec![
        Intersection::new(4.0, shape),
        Intersection::new(6.0, shape),
    ].into();

    let comps = IntersectionComputation::new(&r, &xs[0], &w.shapes, Some(&xs));
    assert_eq!(w.refracted_color(&comps, 0), Color::black());
}

#[test]
fn refracted_color_under_total_internal_reflection() {
    let mut w = World::new();
    let shape = w.objects[0];
    let m = Material {
        transparency: 1.0,
        refractive_index: 1.5,
        ..w.shapes[shape].material.clone()
    };
    w.shapes.set_material(shape, m);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, k), Tuple4D::vector(0.0, 1.0, 0.0));
    let xs: Intersections = vec![
        Intersection::new(-k, shape),
        Intersection::new(k, shape),
    ].into();

    // Inside the sphere, so the second intersection is the one to look at
    let comps = IntersectionComputation::new(&r, &xs[1], &w.shapes, Some(&xs));
    assert_eq!(w.refracted_color(&comps, 5), Color::black());
}

#[cfg(test)]
fn with_glass_floor_and_ball(w: &mut World, reflective: f64) -> ShapeId {
    let floor = w.add_shape(Shape::plane()
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .with_material(Material {
            transparency: 0.5,
            reflective,
            refractive_index: 1.5,
            ..Default::default()
        }));

    w.add_shape(Shape::sphere()
        .with_transform(Matrix4D::translation(0.0, -3.5, -0.5))
        .with_material(Material {
            color: Color::rgb(1.0, 0.0, 0.0),
            ambient: 0.5,
            ..Default::default()
        }));

    floor
}

#[test]
fn shade_hit_with_transparent_material() {
    let mut w = World::new();
    let floor = with_glass_floor_and_ball(&mut w, 0.0);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -k, k));
    let xs: Intersections = vec![Intersection::new(2.0f64.sqrt(), floor)].into();

    let comps = IntersectionComputation::new(&r, &xs[0], &w.shapes, Some(&xs));
    assert_eq!(w.shade_hit(&comps, 5), Color::rgb(0.93642, 0.68642, 0.68642));
}

#[test]
fn shade_hit_with_reflective_transparent_material() {
    let mut w = World::new();
    let floor = with_glass_floor_and_ball(&mut w, 0.5);

    let k = 2.0f64.sqrt() / 2.0;
    let r = ray(Tuple4D::point(0.0, 0.0, -3.0), Tuple4D::vector(0.0, -k, k));
    let xs: Intersections = vec![Intersection::new(2.0f64.sqrt(), floor)].into();

    let comps = IntersectionComputation::new(&r, &xs[0], &w.shapes, Some(&xs));
    assert_eq!(w.shade_hit(&comps, 5), Color::rgb(0.93391, 0.69643, 0.69243));
}
