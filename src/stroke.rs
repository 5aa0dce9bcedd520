use crate::geom::{arc_points, average_scale, invert, transform_rect};
use crate::path_builder::{Path, PathBuilder, PathOp, Winding};
use crate::{Point, Rect, Transform, Vector};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            width: 1.,
            cap: LineCap::Square,
            join: LineJoin::Miter,
            miter_limit: 10.,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Square,
    Butt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Round,
    Miter,
    Bevel,
}

/// Which axis scale of the stroke space multiplies a line's thickness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleMode {
    None,
    Horizontal,
    Vertical,
    Normal,
}

impl ScaleMode {
    pub fn factor(self, scale_x: f32, scale_y: f32) -> f32 {
        match self {
            ScaleMode::None => 1.,
            ScaleMode::Horizontal => scale_x,
            ScaleMode::Vertical => scale_y,
            ScaleMode::Normal => scale_x.max(scale_y),
        }
    }
}

/// The axis-aligned scale that `transform` applies to `bounds`, as a
/// transform. An axis with no extent keeps a scale of 1.
pub fn stroke_space(bounds: &Rect, transform: &Transform) -> Transform {
    let transformed = transform_rect(transform, bounds);
    let ratio = |before: f32, after: f32| if before == 0. { 1. } else { after / before };
    Transform::scale(
        ratio(bounds.max.x - bounds.min.x, transformed.max.x - transformed.min.x),
        ratio(bounds.max.y - bounds.min.y, transformed.max.y - transformed.min.y),
    )
}

fn compute_normal(p0: Point, p1: Point) -> Vector {
    let ux = p1.x - p0.x;
    let uy = p1.y - p0.y;
    // callers never pass coincident points
    let ulen = ux.hypot(uy);
    // the normal is perpendicular to the *unit* vector
    Vector::new(-uy / ulen, ux / ulen)
}

fn flip(v: Vector) -> Vector {
    Vector::new(-v.x, -v.y)
}

/* given a normal rotate the vector 90 degrees to the right clockwise
 * This function has a period of 4. e.g. swap(swap(swap(swap(x) == x */
fn swap(a: Vector) -> Vector {
    /* one of these needs to be negative. We choose a.x so that we rotate to the right instead of negating */
    Vector::new(a.y, -a.x)
}

fn unperp(a: Vector) -> Vector {
    swap(a)
}

fn perp(v: Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

/// Emits a closed polygon with positive signed area so that overlapping
/// pieces of one outline accumulate under the non-zero rule.
fn polygon(dest: &mut PathBuilder, points: &[Point]) {
    if points.len() < 3 {
        return;
    }
    let mut area = 0.;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        area += p.x * q.y - q.x * p.y;
    }
    let mut emit = |p: &Point, first: bool| if first { dest.move_to(p.x, p.y) } else { dest.line_to(p.x, p.y) };
    if area < 0. {
        for (i, p) in points.iter().rev().enumerate() {
            emit(p, i == 0);
        }
    } else {
        for (i, p) in points.iter().enumerate() {
            emit(p, i == 0);
        }
    }
    dest.close();
}

fn circle(dest: &mut PathBuilder, center: Point, radius: f32, tolerance: f32) {
    let mut points = Vec::new();
    arc_points(center, Vector::new(radius, 0.), Vector::new(0., radius), 2. * std::f32::consts::PI, tolerance, &mut points);
    points.pop();
    polygon(dest, &points);
}

fn cap_line(dest: &mut PathBuilder, style: &StrokeStyle, pt: Point, normal: Vector, tolerance: f32) {
    let offset = style.width / 2.;
    match style.cap {
        LineCap::Butt => { /* nothing to do */ }
        LineCap::Round => {
            let mut points = Vec::new();
            // the direction the cap extends in
            let v = swap(normal);
            arc_points(pt, normal * offset, v * offset, std::f32::consts::PI, tolerance, &mut points);
            polygon(dest, &points);
        }
        LineCap::Square => {
            // parallel vector
            let v = swap(normal);
            let end = pt + v * offset;
            polygon(dest, &[
                pt + normal * offset,
                end + normal * offset,
                end - normal * offset,
                pt - normal * offset,
            ]);
        }
    }
}

fn bevel(dest: &mut PathBuilder, style: &StrokeStyle, pt: Point, s1_normal: Vector, s2_normal: Vector) {
    let offset = style.width / 2.;
    polygon(dest, &[pt + s1_normal * offset, pt + s2_normal * offset, pt]);
}

/* Finds the intersection of two lines each defined by a point and a normal.
   From "Example 2: Find the interesection of two lines" of
   "The Pleasures of "Perp Dot" Products"
   F. S. Hill, Jr. */
fn line_intersection(a_point: Point, a_perp: Vector, b_point: Point, b_perp: Vector) -> Option<Point> {
    let a = unperp(a_perp);
    let c = b_point - a_point;
    let denom = b_perp.dot(a);
    if denom == 0.0 {
        return None;
    }
    let t = b_perp.dot(c) / denom;
    Some(a_point + a * t)
}

fn is_interior_angle(a: Vector, b: Vector) -> bool {
    /* angles of 180 and 0 degress will evaluate to 0, however
     * we to treat 180 as an interior angle and 180 as an exterior angle */
    perp(a).dot(b) > 0. || a == b /* 0 degrees is interior */
}

fn join_line(dest: &mut PathBuilder, style: &StrokeStyle, pt: Point, mut s1_normal: Vector, mut s2_normal: Vector, tolerance: f32) {
    if is_interior_angle(s1_normal, s2_normal) {
        s2_normal = flip(s2_normal);
        s1_normal = flip(s1_normal);
        std::mem::swap(&mut s1_normal, &mut s2_normal);
    }

    let offset = style.width / 2.;
    match style.join {
        LineJoin::Round => circle(dest, pt, offset, tolerance),
        LineJoin::Miter => {
            let in_dot_out = -s1_normal.x * s2_normal.x + -s1_normal.y * s2_normal.y;
            let start = pt + s1_normal * offset;
            let end = pt + s2_normal * offset;
            let intersection = if 2. <= style.miter_limit * style.miter_limit * (1. - in_dot_out) {
                line_intersection(start, s1_normal, end, s2_normal)
            } else {
                None
            };
            match intersection {
                Some(intersection) => polygon(dest, &[start, intersection, end, pt]),
                None => bevel(dest, style, pt, s1_normal, s2_normal),
            }
        }
        LineJoin::Bevel => bevel(dest, style, pt, s1_normal, s2_normal),
    }
}

/// Splits a flattened path into subpaths of distinct consecutive points
/// plus a closed flag.
fn subpaths(path: &Path) -> Vec<(Vec<Point>, bool)> {
    fn push_point(points: &mut Vec<Point>, p: Point) {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }

    let mut result = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for op in &path.ops {
        match *op {
            PathOp::MoveTo(p) => {
                if !current.is_empty() {
                    result.push((std::mem::take(&mut current), false));
                }
                current.push(p);
            }
            PathOp::LineTo(p) | PathOp::QuadTo(_, p) => push_point(&mut current, p),
            PathOp::Close => {
                if current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                if !current.is_empty() {
                    result.push((std::mem::take(&mut current), true));
                }
            }
        }
    }
    if !current.is_empty() {
        result.push((current, false));
    }
    result
}

/// Converts `path` into the outline that its stroke covers. The outline is
/// made of overlapping pieces and is meant to be filled non-zero.
pub fn stroke_to_path(path: &Path, style: &StrokeStyle, tolerance: f32) -> Path {
    let mut stroked_path = PathBuilder::with_winding(Winding::NonZero);
    let half_width = style.width / 2.;
    let flat = path.flatten(tolerance);

    for (points, closed) in subpaths(&flat) {
        if points.len() == 1 {
            // a lone point only shows up through its caps
            let pt = points[0];
            match style.cap {
                LineCap::Butt => {}
                LineCap::Round => circle(&mut stroked_path, pt, half_width, tolerance),
                LineCap::Square => {
                    stroked_path.rect(pt.x - half_width, pt.y - half_width, style.width, style.width)
                }
            }
            continue;
        }

        let segment_count = if closed { points.len() } else { points.len() - 1 };
        let mut normals = Vec::with_capacity(segment_count);
        for i in 0..segment_count {
            let (p0, p1) = (points[i], points[(i + 1) % points.len()]);
            let normal = compute_normal(p0, p1);
            polygon(&mut stroked_path, &[
                p0 + normal * half_width,
                p1 + normal * half_width,
                p1 - normal * half_width,
                p0 - normal * half_width,
            ]);
            normals.push(normal);
        }

        for i in 1..segment_count {
            join_line(&mut stroked_path, style, points[i], normals[i - 1], normals[i], tolerance);
        }
        if closed {
            join_line(&mut stroked_path, style, points[0], normals[segment_count - 1], normals[0], tolerance);
        } else {
            // cap end
            cap_line(&mut stroked_path, style, points[points.len() - 1], normals[segment_count - 1], tolerance);
            // cap beginning
            cap_line(&mut stroked_path, style, points[0], flip(normals[0]), tolerance);
        }
    }
    stroked_path.finish()
}

/// Strokes `path` as seen through `transform` and maps the outline back, so
/// that thickness follows the transform's distortion instead of the path's.
/// A transform that cannot be inverted is ignored. `tolerance` is in the
/// units of `path`.
pub fn stroke_outline(path: &Path, style: &StrokeStyle, transform: &Transform, tolerance: f32) -> Path {
    match invert(transform) {
        Some(inverse) => {
            let distorted = path.clone().transform(transform);
            stroke_to_path(&distorted, style, tolerance * average_scale(transform)).transform(&inverse)
        }
        None => stroke_to_path(path, style, tolerance),
    }
}
