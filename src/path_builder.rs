use lyon_geom::QuadraticBezierSegment;

use crate::{Point, Rect, Transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    EvenOdd,
    NonZero,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Control point, then end point.
    QuadTo(Point, Point),
    Close,
}

impl PathOp {
    fn transform(self, xform: &Transform) -> PathOp {
        match self {
            PathOp::MoveTo(p) => PathOp::MoveTo(xform.transform_point(p)),
            PathOp::LineTo(p) => PathOp::LineTo(xform.transform_point(p)),
            PathOp::QuadTo(c, p) => PathOp::QuadTo(xform.transform_point(c), xform.transform_point(p)),
            PathOp::Close => PathOp::Close,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub ops: Vec<PathOp>,
    pub winding: Winding,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn transform(self, transform: &Transform) -> Path {
        let Path { ops, winding } = self;
        Path { ops: ops.into_iter().map(|op| op.transform(transform)).collect(), winding }
    }

    /// Replaces quadratic segments with line segments no further than
    /// `tolerance` from the curve.
    pub fn flatten(&self, tolerance: f32) -> Path {
        let mut ops = Vec::with_capacity(self.ops.len());
        let mut cur = Point::origin();
        let mut start = Point::origin();
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => {
                    cur = p;
                    start = p;
                    ops.push(*op);
                }
                PathOp::LineTo(p) => {
                    cur = p;
                    ops.push(*op);
                }
                PathOp::QuadTo(ctrl, to) => {
                    let finite = [cur, ctrl, to].iter().all(|p| p.x.is_finite() && p.y.is_finite());
                    if finite {
                        let quad = QuadraticBezierSegment { from: cur, ctrl, to };
                        ops.extend(quad.flattened(tolerance).map(PathOp::LineTo));
                    } else {
                        ops.push(PathOp::LineTo(to));
                    }
                    cur = to;
                }
                PathOp::Close => {
                    cur = start;
                    ops.push(*op);
                }
            }
        }
        Path { ops, winding: self.winding }
    }

    /// Bounds of every point in the path, control points included.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.ops.iter().flat_map(|op| match *op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => [Some(p), None],
            PathOp::QuadTo(c, p) => [Some(c), Some(p)],
            PathOp::Close => [None, None],
        }).flatten();
        let first = points.next()?;
        let mut rect = Rect::new(first, first);
        for p in points {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }
}

/// Accumulates path segments. Drawing commands issued before any `move_to`
/// start from the origin, and after a `close` they continue from the start
/// of the closed subpath.
pub struct PathBuilder {
    path: Path,
    current_point: Option<Point>,
    first_point: Point,
}

impl Default for PathBuilder {
    fn default() -> Self {
        PathBuilder::new()
    }
}

impl PathBuilder {
    pub fn new() -> PathBuilder {
        PathBuilder::with_winding(Winding::NonZero)
    }

    pub fn with_winding(winding: Winding) -> PathBuilder {
        PathBuilder {
            path: Path { ops: Vec::new(), winding },
            current_point: None,
            first_point: Point::origin(),
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = Point::new(x, y);
        self.path.ops.push(PathOp::MoveTo(p));
        self.current_point = Some(p);
        self.first_point = p;
    }

    fn ensure_subpath(&mut self) {
        if self.current_point.is_none() {
            let p = self.first_point;
            self.path.ops.push(PathOp::MoveTo(p));
            self.current_point = Some(p);
        }
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.ensure_subpath();
        let p = Point::new(x, y);
        self.path.ops.push(PathOp::LineTo(p));
        self.current_point = Some(p);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.ensure_subpath();
        let p = Point::new(x, y);
        self.path.ops.push(PathOp::QuadTo(Point::new(cx, cy), p));
        self.current_point = Some(p);
    }

    pub fn close(&mut self) {
        if self.current_point.is_some() {
            self.path.ops.push(PathOp::Close);
            self.current_point = None;
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    pub fn is_empty(&self) -> bool {
        self.path.ops.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discards every segment, keeping the winding rule.
    pub fn reset(&mut self) {
        self.path.ops.clear();
        self.current_point = None;
        self.first_point = Point::origin();
    }

    /// Hands out the accumulated path and leaves the builder empty.
    pub fn take(&mut self) -> Path {
        let winding = self.path.winding;
        let path = std::mem::replace(&mut self.path, Path { ops: Vec::new(), winding });
        self.reset();
        path
    }

    pub fn finish(self) -> Path {
        self.path
    }
}
