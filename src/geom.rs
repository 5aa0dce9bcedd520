use crate::{Point, Rect, Transform, Vector};

/// `|scaleX * scaleY - skewX * skewY|`, the quantity that decides invertibility.
pub fn determinant(t: &Transform) -> f32 {
    t.m11 * t.m22 - t.m21 * t.m12
}

pub fn is_degenerate(t: &Transform) -> bool {
    determinant(t).abs() <= f32::EPSILON
}

/// Inverse of `t`, or `None` when `t` is degenerate.
pub fn invert(t: &Transform) -> Option<Transform> {
    if is_degenerate(t) {
        return None;
    }
    t.inverse()
}

/// A paint matrix made safe to invert.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeInverse {
    /// The matrix to paint with. Equal to the input unless `degenerate`.
    pub matrix: Transform,
    pub inverse: Transform,
    /// Set when scale and shear were dropped and only the translation kept.
    pub degenerate: bool,
}

/// Inverts a paint-space matrix. A degenerate matrix is replaced by its
/// translation component before inverting.
pub fn safe_invert(m: &Transform) -> SafeInverse {
    if let Some(inverse) = invert(m) {
        return SafeInverse { matrix: *m, inverse, degenerate: false };
    }
    SafeInverse {
        matrix: Transform::translation(m.m31, m.m32),
        inverse: Transform::translation(-m.m31, -m.m32),
        degenerate: true,
    }
}

/// Bounding box of `rect` after mapping its corners through `t`.
pub fn transform_rect(t: &Transform, rect: &Rect) -> Rect {
    let corners = [
        rect.min,
        Point::new(rect.max.x, rect.min.y),
        rect.max,
        Point::new(rect.min.x, rect.max.y),
    ];
    let first = t.transform_point(corners[0]);
    let mut out = Rect::new(first, first);
    for c in &corners[1..] {
        let p = t.transform_point(*c);
        out.min.x = out.min.x.min(p.x);
        out.min.y = out.min.y.min(p.y);
        out.max.x = out.max.x.max(p.x);
        out.max.y = out.max.y.max(p.y);
    }
    out
}

/// Geometric mean of the axis scales; used to carry flattening tolerances
/// between coordinate spaces.
pub fn average_scale(t: &Transform) -> f32 {
    determinant(t).abs().sqrt()
}

/// Appends points of the elliptical arc `center + u*cos(a) + v*sin(a)` for
/// `a` in `0..=sweep`, with enough segments to stay within `tolerance`.
pub fn arc_points(center: Point, u: Vector, v: Vector, sweep: f32, tolerance: f32, out: &mut Vec<Point>) {
    let radius = u.length().max(v.length());
    let segments = if radius > tolerance && tolerance > 0. {
        let step = 2. * (1. - tolerance / radius).acos();
        (sweep.abs() / step).ceil().clamp(1., 1024.) as usize
    } else {
        4
    };
    for i in 0..=segments {
        let a = sweep * i as f32 / segments as f32;
        let (sin, cos) = a.sin_cos();
        out.push(center + u * cos + v * sin);
    }
}
