use std::sync::OnceLock;

use crate::matrix::Matrix4D;
use crate::tuple::Tuple4D;

/// A transformation matrix with its inverse and inverse-transpose cached.
///
/// Shapes, patterns and cameras hold their transformations in a `Transform`.
/// Rendering reads the inverse of every transformation once per ray, so the
/// inverse is computed on first use and memoized. The caches are `OnceLock`s,
/// which keeps a `Transform` safe to share between render threads.
///
/// ```
/// # use glint::matrix::Matrix4D;
/// # use glint::transform::Transform;
/// # use glint::tuple::Tuple4D;
/// let t = Transform::new(Matrix4D::translation(5.0, -3.0, 2.0));
/// let p = Tuple4D::point(2.0, 1.0, 7.0);
/// assert_eq!(t.inverse() * p, Tuple4D::point(-3.0, 4.0, 5.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Transform {
    matrix: Matrix4D,
    inverse: OnceLock<Matrix4D>,
    inverse_transpose: OnceLock<Matrix4D>,
}

impl Transform {
    pub fn new(matrix: Matrix4D) -> Transform {
        Transform {
            matrix,
            inverse: OnceLock::new(),
            inverse_transpose: OnceLock::new(),
        }
    }

    pub fn matrix(&self) -> Matrix4D {
        self.matrix
    }

    /// The inverse of the transformation.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is singular. A scene with a singular transform is
    /// malformed; there is no sensible image to produce from it.
    pub fn inverse(&self) -> Matrix4D {
        *self.inverse.get_or_init(|| {
            self.matrix.inverse()
                .expect("transform matrix should be invertible")
        })
    }

    /// The transpose of the inverse, used to carry normals out of object space.
    pub fn inverse_transpose(&self) -> Matrix4D {
        *self.inverse_transpose.get_or_init(|| self.inverse().transposition())
    }

    /// Maps a point or vector through the transformation.
    pub fn apply(&self, t: Tuple4D) -> Tuple4D {
        self.matrix * t
    }
}

impl From<Matrix4D> for Transform {
    fn from(matrix: Matrix4D) -> Transform {
        Transform::new(matrix)
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Transform) -> bool {
        self.matrix == other.matrix
    }
}

#[test]
fn default_is_identity() {
    let t = Transform::default();

    assert_eq!(t.matrix(), Matrix4D::identity());
    assert_eq!(t.inverse(), Matrix4D::identity());
}

#[test]
fn cached_inverse_is_stable() {
    let t: Transform = Matrix4D::scaling(2.0, 4.0, 8.0).into();

    assert_eq!(t.inverse(), Matrix4D::scaling(0.5, 0.25, 0.125));
    assert_eq!(t.inverse(), Matrix4D::scaling(0.5, 0.25, 0.125));
    assert_eq!(t.inverse_transpose(), Matrix4D::scaling(0.5, 0.25, 0.125));
}

#[test]
fn clone_keeps_matrix() {
    let t: Transform = Matrix4D::translation(1.0, 2.0, 3.0).into();
    let _ = t.inverse();
    let u = t.clone();

    assert_eq!(t, u);
    assert_eq!(u.apply(Tuple4D::origin()), Tuple4D::point(1.0, 2.0, 3.0));
}

#[test]
fn inverse_is_shared_across_threads() {
    let t: Transform = Matrix4D::rotation_y(0.5).translate(1.0, 0.0, 0.0).into();
    let expected = t.matrix().inverse().unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| assert_eq!(t.inverse(), expected));
        }
    });
}

#[test]
#[should_panic]
fn singular_transform_panics() {
    let t: Transform = Matrix4D::scaling(0.0, 1.0, 1.0).into();
    t.inverse();
}
