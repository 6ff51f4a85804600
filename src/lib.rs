pub mod consts;
pub mod error;

pub mod tuple;
pub mod matrix;
pub mod transform;
pub mod ray;
pub mod bounds;

pub mod color;
pub mod pattern;
pub mod light;

pub mod geometry;
pub mod shape;
pub mod group;
pub mod csg;
pub mod intersect;

pub mod world;
pub mod camera;
pub mod canvas;
pub mod parallel;

pub mod obj;
pub mod scene;

use consts::FEQ_EPSILON;

/// Approximate floating point equality.
///
/// Identical values (including matching infinities) are always equal.
pub fn feq(left: f64, right: f64) -> bool {
    left == right || (left - right).abs() < FEQ_EPSILON
}
