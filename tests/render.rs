use glint::camera::Camera;
use glint::color::Color;
use glint::consts::RECURSION_DEPTH;
use glint::csg::CsgOp;
use glint::light::{ Material, PointLight };
use glint::matrix::Matrix4D;
use glint::obj::ObjParser;
use glint::ray::Ray4D;
use glint::shape::Shape;
use glint::tuple::Tuple4D;
use glint::world::World;

fn looking_down_z(size: usize) -> Camera {
    Camera::new(size, size, std::f64::consts::PI / 3.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::origin(),
            Tuple4D::vector(0.0, 1.0, 0.0),
        ))
}

fn lit_world() -> World {
    let mut w = World::empty();
    w.light = Some(PointLight::new(Color::white(), Tuple4D::point(-10.0, 10.0, -10.0)));
    w
}

#[test]
fn sphere_in_the_middle_of_the_frame() {
    let mut w = lit_world();
    w.add_shape(Shape::sphere().with_material(Material {
        color: Color::red(),
        ..Default::default()
    }));

    let image = looking_down_z(21).render_with_threads(&w, 3);

    let center = image.read_pixel(10, 10).unwrap();
    assert!(center.r > 0.1);
    assert!(center.g < 0.01);
    assert_eq!(image.read_pixel(0, 0).unwrap(), Color::black());
}

#[test]
fn grouped_shapes_render_like_loose_shapes() {
    let mut loose = lit_world();
    let mut grouped = lit_world();
    let g = grouped.add_shape(Shape::group());

    for x in [-1.5, 0.0, 1.5] {
        let s = Shape::sphere()
            .with_transform(Matrix4D::scaling(0.5, 0.5, 0.5).translate(x, 0.0, 0.0));
        loose.add_shape(s.clone());
        let id = grouped.shapes.add(s);
        grouped.shapes.add_child(g, id);
    }
    grouped.shapes.build_bvh(g, 2);

    let camera = looking_down_z(15);
    assert_eq!(camera.render_with_threads(&loose, 2), camera.render_with_threads(&grouped, 2));
}

#[test]
fn csg_difference_cuts_a_hole() {
    let mut w = lit_world();
    let cube = w.shapes.add(Shape::cube());
    let hole = w.shapes.add(Shape::capped_cylinder(-2.0, 2.0)
        .with_transform(Matrix4D::scaling(0.5, 1.0, 0.5).rotate_x(std::f64::consts::PI / 2.0)));
    let c = w.shapes.csg(CsgOp::Difference, cube, hole);
    w.add(c);

    // Straight through the hole along its axis
    let r = Ray4D::new(Tuple4D::point(0.0, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    assert!(w.intersect(&r).is_empty());
    assert_eq!(w.color_at(&r, RECURSION_DEPTH), Color::black());

    // Through the solid part of the cube
    let r = Ray4D::new(Tuple4D::point(0.75, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let xs = w.intersect(&r);
    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 4.0);
    assert_eq!(xs[0].object, cube);
}

#[test]
fn obj_mesh_renders_through_a_group() {
    let mut w = lit_world();
    let mut parser = ObjParser::new();
    parser.parse(&mut w.shapes, "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3 4\n").unwrap();
    let mesh = parser.into_group(&mut w.shapes);
    w.add(mesh);

    let r = Ray4D::new(Tuple4D::point(0.2, 0.3, -5.0), Tuple4D::vector(0.0, 0.0, 1.0));
    let hit = w.intersect(&r).hit().unwrap();
    assert!(glint::feq(hit.t, 5.0));
    assert!(w.shapes.includes(mesh, hit.object));
}

#[test]
fn ppm_output_has_one_triple_per_pixel() {
    let w = World::new();
    let image = looking_down_z(4).render(&w);
    let ppm = image.to_ppm();

    let values: Vec<&str> = ppm.lines().skip(3).flat_map(|l| l.split(' ')).collect();
    assert_eq!(values.len(), 4 * 4 * 3);
    assert!(values.iter().all(|v| v.parse::<u8>().is_ok()));
}
