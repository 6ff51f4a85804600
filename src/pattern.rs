use crate::color::Color;
use crate::matrix::Matrix4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

/// The procedural functions a pattern can evaluate.
///
/// Each variant carries its two colors; the first color is used where the
/// function is "even" (or at the start of a gradient).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates along X: `floor(x) mod 2`.
    Stripe(Color, Color),

    /// Concentric rings around the Y axis: `floor(sqrt(x² + z²)) mod 2`.
    Ring(Color, Color),

    /// Blends linearly between the colors by the fractional part of X.
    Gradient(Color, Color),

    /// A 3D checkerboard: `floor(x) + floor(y) + floor(z) mod 2`.
    Checkers(Color, Color),
}

/// A procedural pattern owned by a `Material`.
///
/// Patterns are evaluated in pattern space. A world point is first mapped into
/// the space of the shape being shaded, then through the inverse of the
/// pattern's own `transform`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub transform: Transform,
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern { kind, transform: Transform::default() }
    }

    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Stripe(a, b))
    }

    pub fn ring(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Ring(a, b))
    }

    pub fn gradient(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Gradient(a, b))
    }

    pub fn checkers(a: Color, b: Color) -> Pattern {
        Pattern::new(PatternKind::Checkers(a, b))
    }

    /// Replaces the pattern's transformation.
    pub fn with_transform(mut self, m: Matrix4D) -> Pattern {
        self.transform = m.into();
        self
    }

    /// Evaluates the pattern at a point already in pattern space.
    pub fn pattern_at(&self, p: Tuple4D) -> Color {
        fn even(n: f64) -> bool {
            n.rem_euclid(2.0) == 0.0
        }

        match self.kind {
            PatternKind::Stripe(a, b) => {
                if even(p.x.floor()) { a } else { b }
            },
            PatternKind::Ring(a, b) => {
                if even((p.x.powi(2) + p.z.powi(2)).sqrt().floor()) { a } else { b }
            },
            PatternKind::Gradient(a, b) => {
                a + (b - a) * (p.x - p.x.floor())
            },
            PatternKind::Checkers(a, b) => {
                if even(p.x.floor() + p.y.floor() + p.z.floor()) { a } else { b }
            },
        }
    }

    /// Evaluates the pattern at a point in the object space of the shape
    /// being shaded.
    pub fn pattern_at_object(&self, object_point: Tuple4D) -> Color {
        self.pattern_at(self.transform.inverse() * object_point)
    }
}

#[test]
fn stripe_pattern_is_constant_along_y_and_z() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    for i in 0..3 {
        let i = i as f64;
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, i, 0.0)), Color::white());
        assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, i)), Color::white());
    }
}

#[test]
fn stripe_pattern_alternates_along_x() {
    let pattern = Pattern::stripe(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 0.9, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point( 1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-0.1, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(-1.1, 0.0, 0.0)),
        Color::white());
}

#[test]
fn gradient_interpolates_between_colors() {
    let pattern = Pattern::gradient(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.25, 0.0, 0.0)),
        Color::rgb(0.75, 0.75, 0.75));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.5, 0.0, 0.0)),
        Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.75, 0.0, 0.0)),
        Color::rgb(0.25, 0.25, 0.25));
}

#[test]
fn ring_extends_in_x_and_z() {
    let pattern = Pattern::ring(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.708, 0.0, 0.708)),
        Color::black());
}

#[test]
fn checkers_repeat_in_each_dimension() {
    let pattern = Pattern::checkers(Color::white(), Color::black());

    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.99, 0.0, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(1.01, 0.0, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.99, 0.0)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 1.01, 0.0)), Color::black());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 0.99)), Color::white());
    assert_eq!(pattern.pattern_at(Tuple4D::point(0.0, 0.0, 1.01)), Color::black());
}

#[test]
fn pattern_transform_is_applied() {
    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::scaling(2.0, 2.0, 2.0));

    assert_eq!(pattern.pattern_at_object(Tuple4D::point(1.5, 0.0, 0.0)),
        Color::white());

    let pattern = Pattern::stripe(Color::white(), Color::black())
        .with_transform(Matrix4D::translation(0.5, 0.0, 0.0));

    assert_eq!(pattern.pattern_at_object(Tuple4D::point(2.5, 0.0, 0.0)),
        Color::white());
}
