use log::info;

use crate::canvas::Canvas;
use crate::consts::RECURSION_DEPTH;
use crate::matrix::Matrix4D;
use crate::parallel;
use crate::ray::Ray4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;
use crate::world::World;

/// A camera record for generating a canvas.
///
/// This record gives a "frame" of the world. Based on camera parameters,
/// different perspectives can be produced.
///
/// ```
/// # use glint::camera::Camera;
/// # use glint::matrix::Matrix4D;
/// # use glint::tuple::Tuple4D;
/// let c = Camera::new(160, 120, std::f64::consts::PI / 2.0,
///     Matrix4D::view_transform(
///         Tuple4D::point(0.0, 0.0, -5.0),
///         Tuple4D::origin(),
///         Tuple4D::vector(0.0, 1.0, 0.0),
///     ));
///
/// assert_eq!(c.ray_for_pixel(80, 60).origin, Tuple4D::point(0.0, 0.0, -5.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    pub half_width: f64,
    pub half_height: f64,
    pub pixel_size: f64,

    /// The angle describing "how much" the camera can see.
    pub field_of_view: f64,

    /// How the world is oriented relative to the camera (typically a view
    /// transformation).
    pub transform: Transform,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64,
        transform: Matrix4D) -> Camera {
        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        let pixel_size = half_width * 2.0 / (hsize as f64);
        Camera {
            hsize,
            vsize,
            half_width,
            half_height,
            pixel_size,
            field_of_view,
            transform: transform.into(),
        }
    }

    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray4D {
        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The untransformed coordinates of the pixel in camera space
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        let tr_inv = self.transform.inverse();
        let pixel = tr_inv * Tuple4D::point(world_x, world_y, -1.0);
        let origin = tr_inv * Tuple4D::origin();

        Ray4D::towards(origin, pixel).0
    }

    /// Renders a world using every available thread.
    pub fn render(&self, w: &World) -> Canvas {
        self.render_with_threads(w, parallel::default_threads())
    }

    /// Renders a world, splitting rows over `threads` threads.
    pub fn render_with_threads(&self, w: &World, threads: usize) -> Canvas {
        let mut image = Canvas::new(self.hsize, self.vsize);

        info!("rendering {}x{} image of {} objects", self.hsize, self.vsize, w.objects.len());
        parallel::render_rows(&mut image, threads, |x, y| {
            w.color_at(&self.ray_for_pixel(x, y), RECURSION_DEPTH)
        });

        image
    }
}

#[test]
fn pixel_size_for_horizontal_canvas() {
    let c = Camera::new(200, 125, std::f64::consts::PI / 2.0, Matrix4D::identity());
    assert!(crate::feq(c.pixel_size, 0.01));
}

#[test]
fn pixel_size_for_vertical_canvas() {
    let c = Camera::new(125, 200, std::f64::consts::PI / 2.0, Matrix4D::identity());
    assert!(crate::feq(c.pixel_size, 0.01));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity());
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::origin());
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::identity());
    let r = c.ray_for_pixel(0, 0);

    assert_eq!(r.origin, Tuple4D::origin());
    assert_eq!(r.direction, Tuple4D::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0,
        Matrix4D::rotation_y(std::f64::consts::PI / 4.0)
            * Matrix4D::translation(0.0, -2.0, 5.0));
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction,
        Tuple4D::vector(2.0f64.sqrt() / 2.0, 0.0, -(2.0f64.sqrt() / 2.0)));
}

#[test]
fn render_world_with_camera() {
    use crate::color::Color;

    let w = World::new();
    let c = Camera::new(11, 11, std::f64::consts::PI / 2.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::origin(),
            Tuple4D::vector(0.0, 1.0, 0.0),
        ));

    let image = c.render(&w);
    assert_eq!(image.read_pixel(5, 5).unwrap(),
        Color::rgb(0.38066, 0.47583, 0.2855));
}

#[test]
fn thread_count_does_not_change_the_image() {
    let w = World::new();
    let c = Camera::new(9, 7, std::f64::consts::PI / 2.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::origin(),
            Tuple4D::vector(0.0, 1.0, 0.0),
        ));

    assert_eq!(c.render_with_threads(&w, 1), c.render_with_threads(&w, 4));
}
