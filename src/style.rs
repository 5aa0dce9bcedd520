//! Turns fill and line style records into [`Paint`]s and stroke styles.

use log::debug;

use crate::diagnostics::{Diagnostics, Warning};
use crate::events::BitmapResolver;
use crate::geom::is_degenerate;
use crate::gradient::{ColorSpace, ColorStop, GradientRamp, RampResult, SpreadMode};
use crate::stroke::{LineCap, LineJoin, ScaleMode, StrokeStyle};
use crate::types::{Color, ColorTransform, Image};
use crate::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientKind {
    Linear,
    Radial,
    /// Radial with the focus moved along the x axis.
    Focal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientFill {
    pub kind: GradientKind,
    pub stops: Vec<ColorStop>,
    /// Maps gradient space into shape space.
    pub matrix: Transform,
    pub spread: SpreadMode,
    pub interpolation: ColorSpace,
    /// Only used by `GradientKind::Focal`, in `-1..=1`.
    pub focal_ratio: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BitmapFill {
    pub bitmap_id: u16,
    /// Maps bitmap pixels into shape space.
    pub matrix: Transform,
    pub repeat: bool,
    pub smooth: bool,
    pub color_transform: Option<ColorTransform>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub thickness: f32,
    pub color: Option<Color>,
    /// Accepted for completeness; output is never hinted.
    pub pixel_hinting: bool,
    pub scale_mode: ScaleMode,
    pub start_cap: LineCap,
    /// Ignored: a stroke has one cap style, taken from `start_cap`.
    pub end_cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            thickness: 20.,
            color: Some(Color::BLACK),
            pixel_hinting: false,
            scale_mode: ScaleMode::Normal,
            start_cap: LineCap::Round,
            end_cap: LineCap::Round,
            join: LineJoin::Round,
            miter_limit: 3.,
        }
    }
}

/// A resolved fill or line paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    None,
    Solid(Color),
    LinearGradient { ramp: GradientRamp, transform: Transform },
    RadialGradient { ramp: GradientRamp, focal_ratio: f32, transform: Transform },
    Texture { image: Image, repeat: bool, smooth: bool, transform: Transform },
}

impl Paint {
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }
}

/// A line's stroke together with the space it is stroked in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStroke {
    pub style: StrokeStyle,
    pub space: Transform,
}

pub struct StyleResolver<'a> {
    default_color: Color,
    scale_strokes: bool,
    stroke_space: Transform,
    bitmaps: &'a dyn BitmapResolver,
}

impl<'a> StyleResolver<'a> {
    pub fn new(default_color: Color, scale_strokes: bool, stroke_space: Transform, bitmaps: &'a dyn BitmapResolver) -> StyleResolver<'a> {
        StyleResolver { default_color, scale_strokes, stroke_space, bitmaps }
    }

    /// A solid fill; records without a color use the default color.
    pub fn solid(&self, color: Option<Color>) -> Paint {
        Paint::Solid(color.unwrap_or(self.default_color))
    }

    pub fn gradient(&self, fill: &GradientFill, diagnostics: &mut dyn Diagnostics) -> Paint {
        let ramp = match GradientRamp::new(&fill.stops, fill.spread, fill.interpolation) {
            RampResult::Ramp(ramp) => ramp,
            degraded => {
                // count what survived dedup, which is what gets drawn
                let (count, paint) = match degraded {
                    RampResult::Single(color) => (1, Paint::Solid(color)),
                    _ => (0, Paint::None),
                };
                diagnostics.warn(Warning::TooFewGradientStops { kind: fill.kind, count });
                return paint;
            }
        };
        match fill.kind {
            GradientKind::Linear => Paint::LinearGradient { ramp, transform: fill.matrix },
            GradientKind::Radial => Paint::RadialGradient { ramp, focal_ratio: 0., transform: fill.matrix },
            GradientKind::Focal => Paint::RadialGradient { ramp, focal_ratio: fill.focal_ratio, transform: fill.matrix },
        }
    }

    /// A bitmap paint, or opaque red when the bitmap cannot be resolved.
    pub fn bitmap(&self, fill: &BitmapFill, diagnostics: &mut dyn Diagnostics) -> Paint {
        let image = match self.bitmaps.resolve_bitmap(fill.bitmap_id) {
            Some(image) => image,
            None => {
                diagnostics.warn(Warning::MissingBitmap { bitmap_id: fill.bitmap_id });
                return Paint::Solid(Color::RED);
            }
        };
        let image = match &fill.color_transform {
            Some(cx) => self.bitmaps.apply_color_transform(&image, cx),
            None => image,
        };
        Paint::Texture { image, repeat: fill.repeat, smooth: fill.smooth, transform: fill.matrix }
    }

    /// The line color and the stroke to draw it with.
    pub fn line(&self, style: &LineStyle, diagnostics: &mut dyn Diagnostics) -> (Option<Color>, LineStroke) {
        let mut width = style.thickness;
        if self.scale_strokes {
            width *= style.scale_mode.factor(self.stroke_space.m11, self.stroke_space.m22);
        }
        let stroke = StrokeStyle {
            width: width.abs(),
            cap: style.start_cap,
            join: style.join,
            miter_limit: style.miter_limit,
        };
        if is_degenerate(&self.stroke_space) {
            diagnostics.warn(Warning::NonInvertibleStrokeTransform);
        }
        debug!("line style {:?} resolved to {:?}", style, stroke);
        (style.color, LineStroke { style: stroke, space: self.stroke_space })
    }
}
