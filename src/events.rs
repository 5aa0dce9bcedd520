use std::collections::HashMap;

use log::debug;

use crate::compositor::Compositor;
use crate::diagnostics::Diagnostics;
use crate::draw_target::{DrawTarget, DEFAULT_TOLERANCE};
use crate::stroke::stroke_space;
use crate::style::{BitmapFill, GradientFill, LineStyle, StyleResolver};
use crate::types::{Color, ColorTransform, Image};
use crate::{Rect, Transform};

/// One drawing command from a decoded shape record.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeEvent {
    BeginShape,
    EndShape,
    BeginFills,
    EndFills,
    BeginLines,
    EndLines { close: bool },
    BeginFill(Option<Color>),
    BeginGradientFill(GradientFill),
    BeginBitmapFill(BitmapFill),
    EndFill,
    LineStyle(LineStyle),
    LineGradientStyle(GradientFill),
    LineBitmapStyle(BitmapFill),
    MoveTo(f32, f32),
    LineTo(f32, f32),
    /// Control point, then anchor point.
    CurveTo(f32, f32, f32, f32),
}

impl ShapeEvent {
    pub fn dispatch<E: ShapeExporter + ?Sized>(&self, exporter: &mut E) {
        match self {
            ShapeEvent::BeginShape => exporter.begin_shape(),
            ShapeEvent::EndShape => exporter.end_shape(),
            ShapeEvent::BeginFills => exporter.begin_fills(),
            ShapeEvent::EndFills => exporter.end_fills(),
            ShapeEvent::BeginLines => exporter.begin_lines(),
            ShapeEvent::EndLines { close } => exporter.end_lines(*close),
            ShapeEvent::BeginFill(color) => exporter.begin_fill(*color),
            ShapeEvent::BeginGradientFill(fill) => exporter.begin_gradient_fill(fill),
            ShapeEvent::BeginBitmapFill(fill) => exporter.begin_bitmap_fill(fill),
            ShapeEvent::EndFill => exporter.end_fill(),
            ShapeEvent::LineStyle(style) => exporter.line_style(style),
            ShapeEvent::LineGradientStyle(fill) => exporter.line_gradient_style(fill),
            ShapeEvent::LineBitmapStyle(fill) => exporter.line_bitmap_style(fill),
            ShapeEvent::MoveTo(x, y) => exporter.move_to(*x, *y),
            ShapeEvent::LineTo(x, y) => exporter.line_to(*x, *y),
            ShapeEvent::CurveTo(cx, cy, ax, ay) => exporter.curve_to(*cx, *cy, *ax, *ay),
        }
    }
}

/// Receives shape drawing commands in record order.
pub trait ShapeExporter {
    fn begin_shape(&mut self) {}
    fn end_shape(&mut self) {}
    fn begin_fills(&mut self) {}
    fn end_fills(&mut self) {}
    fn begin_lines(&mut self) {}
    fn end_lines(&mut self, close: bool);
    fn begin_fill(&mut self, color: Option<Color>);
    fn begin_gradient_fill(&mut self, fill: &GradientFill);
    fn begin_bitmap_fill(&mut self, fill: &BitmapFill);
    fn end_fill(&mut self);
    fn line_style(&mut self, style: &LineStyle);
    fn line_gradient_style(&mut self, fill: &GradientFill);
    fn line_bitmap_style(&mut self, fill: &BitmapFill);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn curve_to(&mut self, control_x: f32, control_y: f32, anchor_x: f32, anchor_y: f32);
}

/// Supplies decoded bitmaps for bitmap fills and lines.
pub trait BitmapResolver {
    fn resolve_bitmap(&self, bitmap_id: u16) -> Option<Image>;

    fn apply_color_transform(&self, image: &Image, transform: &ColorTransform) -> Image {
        transform.apply_to_image(image)
    }
}

/// Resolves nothing; every bitmap fill renders with the error color.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBitmaps;

impl BitmapResolver for NoBitmaps {
    fn resolve_bitmap(&self, _bitmap_id: u16) -> Option<Image> {
        None
    }
}

impl BitmapResolver for HashMap<u16, Image> {
    fn resolve_bitmap(&self, bitmap_id: u16) -> Option<Image> {
        self.get(&bitmap_id).cloned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    /// Fill color for solid fill records that carry no color.
    pub default_color: Color,
    /// Multiply line thickness by the stroke transform's scale according to
    /// each line's scale mode.
    pub scale_strokes: bool,
    /// Shape coordinates per device pixel.
    pub unit_divisor: f32,
    /// Curve flattening tolerance in device pixels.
    pub tolerance: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            default_color: Color::BLACK,
            scale_strokes: true,
            unit_divisor: 20.,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Renders `events` onto `target`.
///
/// `bounds` are the shape bounds in shape units. `render_transform` places
/// the shape; the device transform is `render_transform` followed by a
/// division by `options.unit_divisor`. `stroke_transform` decides how line
/// thickness scales. The target's transform and tolerance are left as they
/// were found.
#[allow(clippy::too_many_arguments)]
pub fn render<'e, I>(
    events: I,
    target: &mut DrawTarget,
    bounds: &Rect,
    render_transform: &Transform,
    stroke_transform: &Transform,
    options: &RenderOptions,
    bitmaps: &dyn BitmapResolver,
    diagnostics: &mut dyn Diagnostics,
) where
    I: IntoIterator<Item = &'e ShapeEvent>,
{
    let saved = *target.get_transform();
    let saved_tolerance = target.tolerance();
    target.set_tolerance(options.tolerance);
    let divisor = 1. / options.unit_divisor;
    target.set_transform(&render_transform.then(&Transform::scale(divisor, divisor)));

    let stroke_space = stroke_space(bounds, stroke_transform);
    debug!("rendering shape {:?} with stroke space {:?}", bounds, stroke_space);
    let resolver = StyleResolver::new(options.default_color, options.scale_strokes, stroke_space, bitmaps);
    {
        let mut compositor = Compositor::new(target, resolver, diagnostics);
        for event in events {
            event.dispatch(&mut compositor);
        }
        compositor.finish();
    }
    target.set_transform(&saved);
    target.set_tolerance(saved_tolerance);
}
