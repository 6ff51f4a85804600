use std::fs;
use std::path::PathBuf;

use glint::color::Color;
use glint::error::Error;
use glint::scene::Scene;
use glint::shape::ShapeKind;

/// A fresh directory under the system temp dir for one test.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("glint-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SCENE: &str = r#"{
    "camera": {
        "width": 11, "height": 11, "field_of_view": 1.5707963267948966,
        "from": [0, 0, -5], "to": [0, 0, 0], "up": [0, 1, 0]
    },
    "light": { "intensity": [1, 1, 1], "position": [-10, 10, -10] },
    "shapes": [
        { "type": "obj", "path": "meshes/quad.obj",
          "transform": [{ "translate": [0, 0, -3] }],
          "material": { "color": [0.2, 0.4, 0.8], "casts_shadow": false } }
    ]
}"#;

const QUAD: &str = "# a unit quad\nv -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nf 1 2 3 4\n";

#[test]
fn scene_file_with_relative_mesh() {
    let dir = scratch_dir("mesh");
    fs::create_dir_all(dir.join("meshes")).unwrap();
    fs::write(dir.join("meshes/quad.obj"), QUAD).unwrap();
    fs::write(dir.join("scene.json"), SCENE).unwrap();

    let scene = Scene::load(&dir.join("scene.json")).unwrap();
    let shapes = &scene.world.shapes;
    let mesh = scene.world.objects[0];

    let triangles: Vec<_> = shapes.ids()
        .filter(|&id| matches!(shapes[id].kind, ShapeKind::Triangle(_)))
        .collect();
    assert_eq!(triangles.len(), 2);
    for &t in triangles.iter() {
        assert!(shapes.includes(mesh, t));
        assert_eq!(shapes[t].material.color, Color::rgb(0.2, 0.4, 0.8));
        assert!(!shapes[t].material.casts_shadow);
    }

    let image = scene.camera.render_with_threads(&scene.world, 2);
    assert_ne!(image.read_pixel(4, 5).unwrap(), Color::black());

    let out = dir.join("out.ppm");
    image.save(&out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().starts_with("P3\n11 11\n255\n"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_mesh_is_an_io_error() {
    let dir = scratch_dir("missing");
    fs::write(dir.join("scene.json"), SCENE).unwrap();

    let err = Scene::load(&dir.join("scene.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_mesh_reports_its_line() {
    let dir = scratch_dir("malformed");
    fs::create_dir_all(dir.join("meshes")).unwrap();
    fs::write(dir.join("meshes/quad.obj"), "v 0 0 0\nv 1 0 0\nf 1 2 9\n").unwrap();
    fs::write(dir.join("scene.json"), SCENE).unwrap();

    match Scene::load(&dir.join("scene.json")) {
        Err(Error::Obj { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected result {:?}", other.map(|_| ())),
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_scene_file_is_an_io_error() {
    let err = Scene::load(&scratch_dir("nothing").join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
