use std::thread;

use log::debug;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::consts::DEFAULT_THREADS;

/// The number of render threads to use when none is requested.
///
/// This is the hardware concurrency, or `DEFAULT_THREADS` if it can't be
/// detected.
pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(DEFAULT_THREADS)
}

/// Fills every pixel of a canvas with `shade(x, y)`, spread over `threads`
/// threads.
///
/// The rows are split into contiguous bands, one per thread, so each pixel is
/// written by exactly one thread. All threads are joined before returning.
pub fn render_rows<F>(canvas: &mut Canvas, threads: usize, shade: F)
where
    F: Fn(usize, usize) -> Color + Sync,
{
    let width = canvas.width;
    let height = canvas.height;

    if width == 0 || height == 0 {
        return;
    }

    let threads = threads.clamp(1, height);
    let rows_per_band = (height + threads - 1) / threads;
    debug!("rendering {}x{} on {} threads, {} rows each",
        width, height, threads, rows_per_band);

    let shade = &shade;
    thread::scope(|s| {
        for (band, pixels) in canvas.pixels_mut().chunks_mut(rows_per_band * width).enumerate() {
            let first_row = band * rows_per_band;

            s.spawn(move || {
                for (i, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = shade(i % width, first_row + i / width);
                }
            });
        }
    });
}

#[test]
fn every_pixel_is_shaded_once() {
    let mut canvas = Canvas::new(7, 5);

    render_rows(&mut canvas, 3, |x, y| Color::rgb(x as f64, y as f64, 1.0));

    for y in 0..5 {
        for x in 0..7 {
            assert_eq!(canvas.read_pixel(x, y),
                Some(Color::rgb(x as f64, y as f64, 1.0)));
        }
    }
}

#[test]
fn more_threads_than_rows() {
    let mut canvas = Canvas::new(2, 2);

    render_rows(&mut canvas, 64, |_, _| Color::white());

    assert_eq!(canvas.read_pixel(1, 1), Some(Color::white()));
}

#[test]
fn default_thread_count_is_positive() {
    assert!(default_threads() > 0);
}
