use std::fs;
use std::path::Path;

use crate::color::Color;
use crate::error::Result;

/// Longest line allowed in a PPM file.
const PPM_LINE_WIDTH: usize = 70;

/// A canvas for drawing pixels.
///
/// This structure mostly stores the results of the ray tracer. Once the user
/// specifies the desired image width and height, the `Camera` generates rays
/// which are cast into a `World`.
///
/// The canvas stores the resultant colors for each pixel ray, unclamped. Once
/// rendering finishes, the `Canvas` can be saved as a PPM image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, row by row.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new, black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel and `x`
    /// the column, both zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use glint::color::Color;
    /// # use glint::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` if the
    /// location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Serializes the canvas as a plain PPM (`P3`) image.
    ///
    /// Channels are scaled to 0-255 (rounding up) and clamped. Pixel data
    /// lines never exceed 70 columns; a value that would cross the limit
    /// starts a new line, even in the middle of a pixel.
    pub fn to_ppm(&self) -> String {
        let mut out = format!("P3\n{} {}\n255\n", self.width, self.height);

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut line = String::new();

            for value in row.iter().flat_map(|p| p.to_bytes()) {
                let value = value.to_string();

                if !line.is_empty() && line.len() + 1 + value.len() > PPM_LINE_WIDTH {
                    out.push_str(&line);
                    out.push('\n');
                    line.clear();
                }

                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }

            out.push_str(&line);
            out.push('\n');
        }

        out
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_ppm())?;
        Ok(())
    }
}

#[test]
fn creating_a_canvas() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert_eq!(c.read_pixel(9, 19), Some(Color::black()));
    assert_eq!(c.read_pixel(10, 0), None);
}

#[test]
fn writing_out_of_bounds_is_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::red());

    assert!(c.pixels.iter().all(|&p| p == Color::black()));
}

#[test]
fn ppm_header() {
    let c = Canvas::new(5, 3);
    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().take(3).collect();

    assert_eq!(lines, vec!["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixel_data() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255",
    ]);
}

#[test]
fn ppm_long_lines_are_split() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
    ]);
    assert!(lines.iter().all(|l| l.len() <= 70));
}

#[test]
fn ppm_ends_with_newline() {
    assert!(Canvas::new(5, 3).to_ppm().ends_with('\n'));
}
