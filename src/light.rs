use crate::color::Color;
use crate::pattern::Pattern;
use crate::tuple::Tuple4D;
use crate::shape::{ ShapeArena, ShapeId };

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple4D,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Tuple4D) -> PointLight {
        position.w = 1.0;

        PointLight { intensity, position }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model; ambient, diffuse,
/// specular and shininess. A material owns its pattern, if it has one.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub pattern: Option<Pattern>,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub refractive_index: f64,
    pub transparency: f64,

    /// Whether the shape blocks light from reaching other surfaces.
    pub casts_shadow: bool,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::rgb(1.0, 1.0, 1.0),
            pattern: None,

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            refractive_index: 1.0,
            transparency: 0.0,

            casts_shadow: true,
        }
    }
}

/// Calculate the lighting of a point on a shape.
///
/// Takes the shape being shaded, a single light, a point, the eye vector and
/// the normal vector, and calculates how the light looks from the eye with
/// the Phong reflection model. The result is not clamped.
///
/// If this point is in a shadow (parameter `in_shadow`), only ambient light is
/// used.
pub fn lighting(shapes: &ShapeArena, id: ShapeId, light: &PointLight,
    point: Tuple4D, eyev: Tuple4D, normalv: Tuple4D, in_shadow: bool) -> Color {
    let m = &shapes[id].material;

    // Patterns are evaluated in the shape's own space
    let color = match m.pattern {
        Some(ref pat) => pat.pattern_at_object(shapes.world_to_object(id, point)),
        None => m.color,
    };

    let effective_color = color * light.intensity;
    let lightv = (light.position - point).normalize();
    let ambient = effective_color * m.ambient;

    if in_shadow {
        return ambient;
    }

    // A negative dot product means the light is on the other side of the
    // surface.
    let light_dot_normal = lightv.dot(&normalv);
    if light_dot_normal < 0.0 {
        return ambient;
    }

    let diffuse = effective_color * m.diffuse * light_dot_normal;

    let reflectv = (-lightv).reflect(&normalv);
    let reflect_dot_eye = reflectv.dot(&eyev);

    let specular = if reflect_dot_eye <= 0.0 {
        Color::black()
    } else {
        light.intensity * m.specular * reflect_dot_eye.powf(m.shininess)
    };

    ambient + diffuse + specular
}

#[cfg(test)]
fn lighting_fixture(material: Material) -> (ShapeArena, ShapeId) {
    use crate::shape::Shape;

    let mut shapes = ShapeArena::new();
    let id = shapes.add(Shape::sphere().with_material(material));
    (shapes, id)
}

#[test]
fn eye_between_light_and_surface() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_from_surface_offset_45() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 10.0, -10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.7364, 0.7364, 0.7364));
}

#[test]
fn eye_opposite_from_surface_in_reflection() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0., -(2.0f64.sqrt())/2., -(2.0f64.sqrt())/2.);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 10.0, -10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(1.6364, 1.6364, 1.6364));
}

#[test]
fn eye_across_surface_from_light() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, 10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, false);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn surface_in_shadow_is_ambient_only() {
    let (shapes, s) = lighting_fixture(Material::default());
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    let res = lighting(&shapes, s, &light, Tuple4D::origin(), eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn lighting_with_stripe_pattern() {
    // Only ambient light is included, as its color is predictable
    let m = Material {
        color: Color::rgb(0.5, 0.5, 0.5),
        pattern: Some(Pattern::stripe(Color::white(), Color::black())),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    };
    let (shapes, s) = lighting_fixture(m);

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    assert_eq!(
        Color::white(),
        lighting(&shapes, s, &light, Tuple4D::point(0.9, 0.0, 0.0),
            eyev, normalv, false)
    );

    assert_eq!(
        Color::black(),
        lighting(&shapes, s, &light, Tuple4D::point(1.1, 0.0, 0.0),
            eyev, normalv, false)
    );
}

#[test]
fn pattern_follows_object_transform() {
    use crate::matrix::Matrix4D;
    use crate::shape::Shape;

    let m = Material {
        pattern: Some(Pattern::stripe(Color::white(), Color::black())
            .with_transform(Matrix4D::translation(0.5, 0.0, 0.0))),
        ambient: 1.0,
        diffuse: 0.0,
        specular: 0.0,
        ..Default::default()
    };

    let mut shapes = ShapeArena::new();
    let s = shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0))
        .with_material(m));

    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Tuple4D::point(0.0, 0.0, -10.0));

    assert_eq!(
        Color::white(),
        lighting(&shapes, s, &light, Tuple4D::point(2.5, 0.0, 0.0),
            eyev, eyev, false)
    );
}
