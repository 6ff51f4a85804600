use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{ ArgEnum, Parser };
use log::{ info, LevelFilter };

use glint::camera::Camera;
use glint::color::Color;
use glint::csg::CsgOp;
use glint::light::{ Material, PointLight };
use glint::matrix::Matrix4D;
use glint::parallel;
use glint::pattern::Pattern;
use glint::scene::Scene;
use glint::shape::Shape;
use glint::tuple::Tuple4D;
use glint::world::World;

#[derive(Clone, Debug, ArgEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> LevelFilter {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Renders a scene to a PPM image.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene file; a built-in demo scene is rendered when omitted
    scene: Option<PathBuf>,

    /// Where to write the PPM image
    #[clap(short, long, default_value = "out.ppm")]
    output: PathBuf,

    /// Render threads (defaults to the hardware concurrency)
    #[clap(short, long)]
    threads: Option<usize>,

    /// Override the image width in pixels
    #[clap(long)]
    width: Option<usize>,

    /// Override the image height in pixels
    #[clap(long)]
    height: Option<usize>,

    #[clap(long, arg_enum, default_value = "info")]
    log_level: LogLevel,
}

/// The demo scene: a checkered mirror floor, a glass ball, a capped cone and
/// a cube with a spherical bite taken out of it.
fn demo_scene() -> Scene {
    let mut world = World::empty();
    world.light = Some(PointLight::new(Color::white(), Tuple4D::point(-10.0, 10.0, -10.0)));

    world.add_shape(Shape::plane().with_material(Material {
        color: Color::rgb(0.5, 0.5, 0.5),
        specular: 0.0,
        reflective: 0.5,
        pattern: Some(Pattern::checkers(Color::white(), Color::black())),
        ..Default::default()
    }));

    world.add_shape(Shape::sphere()
        .with_transform(Matrix4D::translation(-0.5, 1.0, 0.5))
        .with_material(Material {
            color: Color::rgb(1.0, 0.4666, 0.2666),
            diffuse: 0.7,
            specular: 0.3,
            transparency: 0.5,
            reflective: 0.5,
            refractive_index: 1.5,
            ..Default::default()
        }));

    world.add_shape(Shape::capped_cone(-1.0, 0.0)
        .with_transform(Matrix4D::identity()
            .rotate_y(std::f64::consts::PI / 8.0)
            .scale(0.5, 1.0, 0.5)
            .translate(1.5, 1.0, -0.5))
        .with_material(Material {
            color: Color::rgb(1.0, 0.6666, 0.2666),
            diffuse: 0.7,
            specular: 0.3,
            reflective: 0.3,
            ..Default::default()
        }));

    let red = Material {
        color: Color::rgb(0.8666, 0.2, 0.2),
        diffuse: 0.7,
        specular: 0.3,
        ..Default::default()
    };
    let cube = world.shapes.add(Shape::cube().with_material(red.clone()));
    let bite = world.shapes.add(Shape::sphere()
        .with_transform(Matrix4D::scaling(1.3, 1.3, 1.3).translate(-0.6, 0.6, -0.6))
        .with_material(red));
    let bitten = world.shapes.csg(CsgOp::Difference, cube, bite);
    world.shapes.set_transform(bitten, Matrix4D::identity()
        .rotate_y(std::f64::consts::PI / 4.0)
        .scale(0.4, 0.4, 0.4)
        .translate(-1.8, 0.4, -1.2));
    world.add(bitten);

    let camera = Camera::new(640, 360, std::f64::consts::PI / 3.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 1.5, -5.0),
            Tuple4D::point(0.0, 1.0, 0.0),
            Tuple4D::vector(0.0, 1.0, 0.0),
        ));

    Scene { world, camera }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.clone().into())
        .init();

    let mut scene = match args.scene {
        Some(ref path) => Scene::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            info!("no scene given, rendering the demo scene");
            demo_scene()
        },
    };

    if args.width.is_some() || args.height.is_some() {
        let c = &scene.camera;
        scene.camera = Camera::new(
            args.width.unwrap_or(c.hsize),
            args.height.unwrap_or(c.vsize),
            c.field_of_view,
            c.transform.matrix(),
        );
    }

    if scene.camera.hsize == 0 || scene.camera.vsize == 0 {
        anyhow::bail!("image size must be positive");
    }

    let threads = args.threads.unwrap_or_else(parallel::default_threads).max(1);
    info!("rendering {}x{} with {} threads",
        scene.camera.hsize, scene.camera.vsize, threads);

    let start = Instant::now();
    let canvas = scene.camera.render_with_threads(&scene.world, threads);
    info!("rendered in {:.2?}", start.elapsed());

    canvas.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("saved render to {}", args.output.display());

    Ok(())
}
