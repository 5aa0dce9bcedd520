use log::trace;

use crate::diagnostics::Diagnostics;
use crate::draw_target::{DrawTarget, Source};
use crate::events::ShapeExporter;
use crate::geom::average_scale;
use crate::paint_space::paint_geometry;
use crate::path_builder::{Path, PathBuilder, Winding};
use crate::stroke::{stroke_outline, stroke_to_path, StrokeStyle};
use crate::style::{BitmapFill, GradientFill, LineStroke, LineStyle, Paint, StyleResolver};
use crate::types::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    PathOpen,
    Flushing,
}

/// Accumulates path segments per style segment and paints them onto the
/// target whenever the style changes.
pub struct Compositor<'a> {
    target: &'a mut DrawTarget,
    resolver: StyleResolver<'a>,
    diagnostics: &'a mut dyn Diagnostics,
    path: PathBuilder,
    fill_paint: Paint,
    line_paint: Paint,
    line_color: Option<Color>,
    line_stroke: Option<LineStroke>,
    state: State,
}

impl<'a> Compositor<'a> {
    pub fn new(target: &'a mut DrawTarget, resolver: StyleResolver<'a>, diagnostics: &'a mut dyn Diagnostics) -> Compositor<'a> {
        Compositor {
            target,
            resolver,
            diagnostics,
            path: PathBuilder::with_winding(Winding::EvenOdd),
            fill_paint: Paint::None,
            line_paint: Paint::None,
            line_color: None,
            line_stroke: None,
            state: State::Idle,
        }
    }

    /// Paints whatever is still pending.
    pub fn finish(&mut self) {
        if self.state == State::PathOpen {
            self.flush();
        }
    }

    /// Flattening tolerance in shape units for the current device transform.
    fn shape_tolerance(&self) -> f32 {
        let scale = average_scale(self.target.get_transform());
        if scale > 0. && scale.is_finite() {
            self.target.tolerance() / scale
        } else {
            self.target.tolerance()
        }
    }

    fn flush(&mut self) {
        assert!(self.state != State::Flushing, "flush re-entered while already flushing");
        self.state = State::Flushing;

        let path = self.path.take();
        if !path.is_empty() {
            trace!("flushing {} path ops, fill {:?}", path.ops.len(), !self.fill_paint.is_none());
            self.paint(&path);
        }

        self.line_color = None;
        self.line_stroke = None;
        self.fill_paint = Paint::None;
        self.state = State::Idle;
    }

    fn paint(&mut self, path: &Path) {
        let tolerance = self.shape_tolerance();

        if !self.fill_paint.is_none() {
            paint_geometry(self.target, path, &self.fill_paint, &mut *self.diagnostics);
        }

        match (&self.line_paint, &self.line_stroke) {
            (paint, Some(stroke)) if !paint.is_none() => {
                let outline = stroke_outline(path, &stroke.style, &stroke.space, tolerance);
                paint_geometry(self.target, &outline, paint, &mut *self.diagnostics);
            }
            _ => {
                if let Some(color) = self.line_color {
                    let outline = match &self.line_stroke {
                        Some(stroke) => stroke_outline(path, &stroke.style, &stroke.space, tolerance),
                        None => stroke_to_path(path, &StrokeStyle::default(), tolerance),
                    };
                    self.target.fill(&outline, &Source::Solid(color));
                }
            }
        }
    }

    fn open(&mut self) {
        self.state = State::PathOpen;
    }
}

impl<'a> ShapeExporter for Compositor<'a> {
    fn end_shape(&mut self) {
        self.flush();
    }

    fn end_lines(&mut self, close: bool) {
        if close {
            self.path.close();
        }
        self.flush();
    }

    fn begin_fill(&mut self, color: Option<Color>) {
        self.flush();
        self.fill_paint = self.resolver.solid(color);
    }

    fn begin_gradient_fill(&mut self, fill: &GradientFill) {
        self.flush();
        self.fill_paint = self.resolver.gradient(fill, &mut *self.diagnostics);
    }

    fn begin_bitmap_fill(&mut self, fill: &BitmapFill) {
        self.flush();
        self.fill_paint = self.resolver.bitmap(fill, &mut *self.diagnostics);
    }

    fn end_fill(&mut self) {
        self.flush();
        self.fill_paint = Paint::None;
    }

    fn line_style(&mut self, style: &LineStyle) {
        self.flush();
        self.line_paint = Paint::None;
        let (color, stroke) = self.resolver.line(style, &mut *self.diagnostics);
        self.line_color = color;
        self.line_stroke = Some(stroke);
    }

    fn line_gradient_style(&mut self, fill: &GradientFill) {
        self.line_paint = self.resolver.gradient(fill, &mut *self.diagnostics);
    }

    fn line_bitmap_style(&mut self, fill: &BitmapFill) {
        self.line_paint = self.resolver.bitmap(fill, &mut *self.diagnostics);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.open();
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.open();
        self.path.line_to(x, y);
    }

    fn curve_to(&mut self, control_x: f32, control_y: f32, anchor_x: f32, anchor_y: f32) {
        self.open();
        self.path.quad_to(control_x, control_y, anchor_x, anchor_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IgnoreDiagnostics;
    use crate::events::NoBitmaps;
    use crate::Transform;

    #[test]
    #[should_panic(expected = "flush re-entered")]
    fn reentrant_flush_panics() {
        let mut dt = DrawTarget::new(4, 4);
        let mut diagnostics = IgnoreDiagnostics;
        let resolver = StyleResolver::new(Color::BLACK, true, Transform::identity(), &NoBitmaps);
        let mut compositor = Compositor::new(&mut dt, resolver, &mut diagnostics);
        compositor.state = State::Flushing;
        compositor.end_fill();
    }

    #[test]
    fn flush_resets_pending_state() {
        let mut dt = DrawTarget::new(4, 4);
        let mut diagnostics = IgnoreDiagnostics;
        let resolver = StyleResolver::new(Color::BLACK, true, Transform::identity(), &NoBitmaps);
        let mut compositor = Compositor::new(&mut dt, resolver, &mut diagnostics);
        compositor.begin_fill(None);
        compositor.line_style(&LineStyle::default());
        compositor.move_to(0., 0.);
        compositor.line_to(2., 2.);
        assert_eq!(compositor.state, State::PathOpen);
        compositor.end_shape();
        assert_eq!(compositor.state, State::Idle);
        assert!(compositor.fill_paint.is_none());
        assert!(compositor.line_color.is_none());
        assert!(compositor.line_stroke.is_none());
        assert!(compositor.path.is_empty());
    }
}
