//! JSON scene descriptions.
//!
//! A scene file describes a camera, an optional light and a list of shapes:
//!
//! ```json
//! {
//!     "camera": {
//!         "width": 320, "height": 200, "field_of_view": 1.0472,
//!         "from": [0, 1.5, -5], "to": [0, 1, 0], "up": [0, 1, 0]
//!     },
//!     "light": { "intensity": [1, 1, 1], "position": [-10, 10, -10] },
//!     "shapes": [
//!         { "type": "plane", "material": { "pattern": {
//!             "type": "checkers", "colors": [[1, 1, 1], [0, 0, 0]] } } },
//!         { "type": "sphere", "transform": [{ "translate": [0, 1, 0] }],
//!           "material": { "color": [1, 0.2, 0.2], "reflective": 0.3 } }
//!     ]
//! }
//! ```
//!
//! Transformations are lists of steps applied in order, so
//! `[{"scale": [2, 2, 2]}, {"translate": [0, 1, 0]}]` scales first. Groups
//! take a `children` list, CSG nodes an `operation` with `left` and `right`
//! operands, and `obj` shapes a `path` relative to the scene file.

use std::fs;
use std::path::{ Path, PathBuf };

use log::{ debug, info };
use serde::{ Deserialize, Serialize };

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ DEFAULT_BVH_THRESHOLD, FEQ_EPSILON };
use crate::csg::CsgOp;
use crate::error::{ Error, Result };
use crate::light::{ Material, PointLight };
use crate::matrix::Matrix4D;
use crate::obj;
use crate::pattern::{ Pattern, PatternKind };
use crate::shape::{ Shape, ShapeArena, ShapeId };
use crate::tuple::Tuple4D;
use crate::world::World;

/// A world and the camera to view it with.
#[derive(Clone, Debug)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// Loads a scene file. OBJ paths inside it are resolved relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Scene> {
        let json = fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        info!("loading scene {}", path.display());
        Scene::from_json(&json, base)
    }

    /// Builds a scene from JSON text, resolving OBJ paths against `base`.
    pub fn from_json(json: &str, base: &Path) -> Result<Scene> {
        let description: SceneDescription = serde_json::from_str(json)?;
        description.build(base)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,

    #[serde(default)]
    pub light: Option<LightDescription>,

    /// Groups with at least this many members are subdivided.
    #[serde(default)]
    pub bvh_threshold: Option<usize>,

    #[serde(default)]
    pub shapes: Vec<ShapeDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraDescription {
    pub width: usize,
    pub height: usize,
    pub field_of_view: f64,

    pub from: [f64; 3],
    pub to: [f64; 3],
    pub up: [f64; 3],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightDescription {
    pub intensity: [f64; 3],
    pub position: [f64; 3],
}

/// One step of a transformation.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStep {
    Translate([f64; 3]),
    Scale([f64; 3]),
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Shear([f64; 6]),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeDescription {
    #[serde(flatten)]
    pub geometry: GeometryDescription,

    #[serde(default)]
    pub transform: Vec<TransformStep>,

    #[serde(default)]
    pub material: Option<MaterialDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDescription {
    Sphere,
    Plane,
    Cube,
    Cylinder {
        #[serde(default = "negative_infinity")]
        minimum: f64,
        #[serde(default = "infinity")]
        maximum: f64,
        #[serde(default)]
        closed: bool,
    },
    Cone {
        #[serde(default = "negative_infinity")]
        minimum: f64,
        #[serde(default = "infinity")]
        maximum: f64,
        #[serde(default)]
        closed: bool,
    },
    Triangle {
        points: [[f64; 3]; 3],
    },
    SmoothTriangle {
        points: [[f64; 3]; 3],
        normals: [[f64; 3]; 3],
    },
    Group {
        #[serde(default)]
        children: Vec<ShapeDescription>,
    },
    Csg {
        operation: CsgOperation,
        left: Box<ShapeDescription>,
        right: Box<ShapeDescription>,
    },
    Obj {
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsgOperation {
    Union,
    Intersection,
    Difference,
}

impl From<CsgOperation> for CsgOp {
    fn from(op: CsgOperation) -> CsgOp {
        match op {
            CsgOperation::Union => CsgOp::Union,
            CsgOperation::Intersection => CsgOp::Intersection,
            CsgOperation::Difference => CsgOp::Difference,
        }
    }
}

/// Material overrides; anything left out keeps the default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    pub color: Option<[f64; 3]>,
    pub pattern: Option<PatternDescription>,

    pub ambient: Option<f64>,
    pub diffuse: Option<f64>,
    pub specular: Option<f64>,
    pub shininess: Option<f64>,

    pub reflective: Option<f64>,
    pub refractive_index: Option<f64>,
    pub transparency: Option<f64>,

    pub casts_shadow: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternDescription {
    #[serde(rename = "type")]
    pub kind: PatternType,
    pub colors: [[f64; 3]; 2],

    #[serde(default)]
    pub transform: Vec<TransformStep>,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Stripe,
    Ring,
    Gradient,
    Checkers,
}

fn infinity() -> f64 {
    f64::INFINITY
}

fn negative_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn point(p: [f64; 3]) -> Tuple4D {
    Tuple4D::point(p[0], p[1], p[2])
}

fn vector(v: [f64; 3]) -> Tuple4D {
    Tuple4D::vector(v[0], v[1], v[2])
}

/// Composes transformation steps, first step applied first.
///
/// Fails if the result can't be inverted.
pub fn compose(steps: &[TransformStep]) -> Result<Matrix4D> {
    let m = steps.iter().fold(Matrix4D::identity(), |m, step| match *step {
        TransformStep::Translate([x, y, z]) => m.translate(x, y, z),
        TransformStep::Scale([x, y, z]) => m.scale(x, y, z),
        TransformStep::RotateX(r) => m.rotate_x(r),
        TransformStep::RotateY(r) => m.rotate_y(r),
        TransformStep::RotateZ(r) => m.rotate_z(r),
        TransformStep::Shear([xy, xz, yx, yz, zx, zy]) => m.shear(xy, xz, yx, yz, zx, zy),
    });

    if !m.is_invertible() {
        return Err(Error::Scene(format!("transformation {:?} is not invertible", steps)));
    }

    Ok(m)
}

impl PatternDescription {
    pub fn build(&self) -> Result<Pattern> {
        let [a, b] = self.colors;
        let (a, b) = (Color::from(a), Color::from(b));

        let kind = match self.kind {
            PatternType::Stripe => PatternKind::Stripe(a, b),
            PatternType::Ring => PatternKind::Ring(a, b),
            PatternType::Gradient => PatternKind::Gradient(a, b),
            PatternType::Checkers => PatternKind::Checkers(a, b),
        };

        Ok(Pattern::new(kind).with_transform(compose(&self.transform)?))
    }
}

impl MaterialDescription {
    pub fn build(&self) -> Result<Material> {
        let d = Material::default();

        Ok(Material {
            color: self.color.map(Color::from).unwrap_or(d.color),
            pattern: self.pattern.as_ref().map(PatternDescription::build).transpose()?,

            ambient: self.ambient.unwrap_or(d.ambient),
            diffuse: self.diffuse.unwrap_or(d.diffuse),
            specular: self.specular.unwrap_or(d.specular),
            shininess: self.shininess.unwrap_or(d.shininess),

            reflective: self.reflective.unwrap_or(d.reflective),
            refractive_index: self.refractive_index.unwrap_or(d.refractive_index),
            transparency: self.transparency.unwrap_or(d.transparency),

            casts_shadow: self.casts_shadow.unwrap_or(d.casts_shadow),
        })
    }
}

impl ShapeDescription {
    /// Adds the described shape, and anything inside it, to `shapes`.
    pub fn build(&self, shapes: &mut ShapeArena, base: &Path) -> Result<ShapeId> {
        self.build_within(shapes, base, None)
    }

    /// Builds the shape inside a container whose material is `inherited`.
    ///
    /// A shape's own material wins over the inherited one, at every level of
    /// nesting.
    fn build_within(&self, shapes: &mut ShapeArena, base: &Path,
        inherited: Option<&Material>) -> Result<ShapeId> {
        let transform = compose(&self.transform)?;
        let material = match self.material {
            Some(ref m) => Some(m.build()?),
            None => inherited.cloned(),
        };

        let id = match self.geometry {
            GeometryDescription::Sphere => shapes.add(Shape::sphere()),
            GeometryDescription::Plane => shapes.add(Shape::plane()),
            GeometryDescription::Cube => shapes.add(Shape::cube()),
            GeometryDescription::Cylinder { minimum, maximum, closed } => {
                check_range(minimum, maximum)?;
                shapes.add(if closed {
                    Shape::capped_cylinder(minimum, maximum)
                } else {
                    Shape::bounded_cylinder(minimum, maximum)
                })
            },
            GeometryDescription::Cone { minimum, maximum, closed } => {
                check_range(minimum, maximum)?;
                shapes.add(if closed {
                    Shape::capped_cone(minimum, maximum)
                } else {
                    Shape::bounded_cone(minimum, maximum)
                })
            },
            GeometryDescription::Triangle { points: [p1, p2, p3] } =>
                shapes.add(Shape::triangle(point(p1), point(p2), point(p3))),
            GeometryDescription::SmoothTriangle { points: [p1, p2, p3], normals: [n1, n2, n3] } =>
                shapes.add(Shape::smooth_triangle(
                    point(p1), point(p2), point(p3),
                    vector(n1), vector(n2), vector(n3),
                )),
            GeometryDescription::Group { ref children } => {
                let group_material = material.clone().unwrap_or_default();
                let g = shapes.add(Shape::group().with_material(group_material.clone()));

                // Members arrive with their materials settled
                for child in children {
                    let c = child.build_within(shapes, base, Some(&group_material))?;
                    shapes.attach(g, c);
                }

                g
            },
            GeometryDescription::Csg { operation, ref left, ref right } => {
                let l = left.build_within(shapes, base, material.as_ref())?;
                let r = right.build_within(shapes, base, material.as_ref())?;
                shapes.csg(operation.into(), l, r)
            },
            GeometryDescription::Obj { ref path } => {
                let path = base.join(path);
                debug!("loading mesh {}", path.display());
                obj::load_obj(shapes, &path)?
            },
        };

        shapes.set_transform(id, transform);

        // Groups were created with their material, ahead of their members
        let is_group = matches!(self.geometry, GeometryDescription::Group { .. });
        if let (Some(m), false) = (material, is_group) {
            shapes.set_material(id, m);
        }

        Ok(id)
    }
}

fn check_range(minimum: f64, maximum: f64) -> Result<()> {
    if minimum > maximum {
        return Err(Error::Scene(format!(
            "minimum {} is greater than maximum {}", minimum, maximum)));
    }

    Ok(())
}

impl CameraDescription {
    pub fn build(&self) -> Result<Camera> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Scene("camera size must be positive".into()));
        }

        if !(self.field_of_view > 0.0 && self.field_of_view < std::f64::consts::PI) {
            return Err(Error::Scene(format!(
                "field of view {} must be between 0 and pi", self.field_of_view)));
        }

        let (from, to) = (point(self.from), point(self.to));
        if from == to {
            return Err(Error::Scene("camera `from` and `to` must differ".into()));
        }

        let up = vector(self.up);
        if up.magnitude() < FEQ_EPSILON {
            return Err(Error::Scene("camera `up` must not be a zero vector".into()));
        }

        let view = Matrix4D::view_transform(from, to, up);
        if !view.is_invertible() {
            return Err(Error::Scene("camera `up` is parallel to its view direction".into()));
        }

        Ok(Camera::new(self.width, self.height, self.field_of_view, view))
    }
}

impl SceneDescription {
    pub fn build(&self, base: &Path) -> Result<Scene> {
        let camera = self.camera.build()?;

        let mut world = World::empty();
        world.light = self.light.as_ref().map(|l|
            PointLight::new(Color::from(l.intensity), point(l.position)));

        for shape in self.shapes.iter() {
            let id = shape.build(&mut world.shapes, base)?;
            world.add(id);
        }

        let threshold = self.bvh_threshold.unwrap_or(DEFAULT_BVH_THRESHOLD);
        for id in world.objects.clone() {
            world.shapes.build_bvh(id, threshold);
        }

        info!("scene ready: {} top-level objects, {} shapes in total",
            world.objects.len(), world.shapes.len());
        Ok(Scene { world, camera })
    }
}

#[cfg(test)]
use crate::shape::ShapeKind;

#[cfg(test)]
const CAMERA: &str = r#""camera": {
    "width": 11, "height": 11, "field_of_view": 1.5707963267948966,
    "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
}"#;

#[cfg(test)]
fn scene(body: &str) -> Result<Scene> {
    Scene::from_json(&format!("{{ {}, {} }}", CAMERA, body), Path::new("."))
}

#[test]
fn transform_steps_apply_in_order() {
    let m = compose(&[
        TransformStep::RotateX(std::f64::consts::PI / 2.0),
        TransformStep::Scale([5.0, 5.0, 5.0]),
        TransformStep::Translate([10.0, 5.0, 7.0]),
    ]).unwrap();

    assert_eq!(m * Tuple4D::point(1.0, 0.0, 1.0), Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn singular_transforms_are_rejected() {
    let err = compose(&[TransformStep::Scale([1.0, 0.0, 1.0])]);
    assert!(matches!(err, Err(Error::Scene(_))));
}

#[test]
fn loading_the_default_world() {
    let s = scene(r#""light": { "intensity": [1, 1, 1], "position": [-10, 10, -10] },
        "shapes": [
            { "type": "sphere",
              "material": { "color": [0.8, 1.0, 0.6], "diffuse": 0.7, "specular": 0.2 } },
            { "type": "sphere", "transform": [{ "scale": [0.5, 0.5, 0.5] }] }
        ]"#).unwrap();

    let image = s.camera.render_with_threads(&s.world, 2);
    assert_eq!(image.read_pixel(5, 5).unwrap(), Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn shape_types_are_parsed() {
    let s = scene(r#""shapes": [
        { "type": "cylinder", "minimum": 0, "maximum": 2, "closed": true },
        { "type": "cone" },
        { "type": "triangle", "points": [[0, 1, 0], [-1, 0, 0], [1, 0, 0]] },
        { "type": "csg", "operation": "difference",
          "left": { "type": "cube" }, "right": { "type": "sphere" } }
    ]"#).unwrap();

    let shapes = &s.world.shapes;
    let kinds: Vec<&ShapeKind> = s.world.objects.iter().map(|&id| &shapes[id].kind).collect();

    match kinds[0] {
        ShapeKind::Cylinder(rb) => {
            assert_eq!((rb.minimum, rb.maximum, rb.closed), (0.0, 2.0, true));
        },
        other => panic!("unexpected {:?}", other),
    }
    match kinds[1] {
        ShapeKind::Cone(rb) => assert_eq!(rb.minimum, f64::NEG_INFINITY),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(kinds[2], ShapeKind::Triangle(_)));
    match kinds[3] {
        ShapeKind::Csg(ci) => assert_eq!(ci.op, CsgOp::Difference),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn group_members_keep_their_own_materials() {
    let s = scene(r#""shapes": [
        { "type": "group", "material": { "ambient": 0.5 }, "children": [
            { "type": "sphere" },
            { "type": "sphere", "material": { "ambient": 1.0 } }
        ] }
    ]"#).unwrap();

    let shapes = &s.world.shapes;
    let children = shapes.children(s.world.objects[0]);
    assert_eq!(shapes[children[0]].material.ambient, 0.5);
    assert_eq!(shapes[children[1]].material.ambient, 1.0);
}

#[test]
fn nested_group_members_keep_their_own_materials() {
    let s = scene(r#""shapes": [
        { "type": "group", "children": [
            { "type": "group", "material": { "ambient": 0.3 }, "children": [
                { "type": "sphere", "material": { "ambient": 1.0 } },
                { "type": "cube" }
            ] }
        ] }
    ]"#).unwrap();

    let shapes = &s.world.shapes;
    let inner = shapes.children(s.world.objects[0])[0];
    let members = shapes.children(inner);
    assert_eq!(shapes[inner].material.ambient, 0.3);
    assert_eq!(shapes[members[0]].material.ambient, 1.0);
    assert_eq!(shapes[members[1]].material.ambient, 0.3);
}

#[test]
fn csg_operands_take_the_csg_material_unless_given_one() {
    let s = scene(r#""shapes": [
        { "type": "csg", "operation": "union", "material": { "ambient": 0.4 },
          "left": { "type": "cube" },
          "right": { "type": "sphere", "material": { "ambient": 0.9 } } }
    ]"#).unwrap();

    let shapes = &s.world.shapes;
    match shapes[s.world.objects[0]].kind {
        ShapeKind::Csg(ref ci) => {
            assert_eq!(shapes[ci.left()].material.ambient, 0.4);
            assert_eq!(shapes[ci.right()].material.ambient, 0.9);
        },
        ref other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn patterns_are_parsed() {
    let s = scene(r#""shapes": [
        { "type": "plane", "material": { "pattern": {
            "type": "stripe", "colors": [[1, 1, 1], [0, 0, 0]],
            "transform": [{ "scale": [0.5, 0.5, 0.5] }] } } }
    ]"#).unwrap();

    let m = &s.world.shapes[s.world.objects[0]].material;
    let pattern = m.pattern.as_ref().unwrap();
    assert_eq!(pattern.kind, PatternKind::Stripe(Color::white(), Color::black()));
    assert_eq!(pattern.transform.matrix(), Matrix4D::scaling(0.5, 0.5, 0.5));
}

#[test]
fn unknown_shape_types_are_errors() {
    assert!(matches!(scene(r#""shapes": [{ "type": "torus" }]"#), Err(Error::Json(_))));
}

#[test]
fn degenerate_cameras_are_errors() {
    let json = r#"{ "camera": { "width": 0, "height": 10, "field_of_view": 1.0,
        "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0] } }"#;

    assert!(matches!(Scene::from_json(json, Path::new(".")), Err(Error::Scene(_))));

    let json = r#"{ "camera": { "width": 10, "height": 10, "field_of_view": 1.0,
        "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 0, 0] } }"#;
    assert!(matches!(Scene::from_json(json, Path::new(".")), Err(Error::Scene(_))));
}

#[test]
fn large_groups_are_subdivided() {
    let spheres: Vec<String> = (0..8)
        .map(|i| format!(r#"{{ "type": "sphere", "transform": [{{ "translate": [{}, 0, 0] }}] }}"#,
            i * 3))
        .collect();
    let s = scene(&format!(r#""bvh_threshold": 2, "shapes": [
        {{ "type": "group", "children": [{}] }}
    ]"#, spheres.join(","))).unwrap();

    let g = s.world.objects[0];
    assert!(s.world.shapes.children(g).len() < 8);
}
