//! Color-stop ramps shared by gradient fills and gradient lines.
//!
//! Gradients live in a fixed logical space: linear gradients run from
//! `(-GRADIENT_RADIUS, 0)` to `(GRADIENT_RADIUS, 0)` and radial gradients
//! have their outer circle of radius `GRADIENT_RADIUS` at the origin. Callers
//! scale that space onto the shape with the gradient matrix.

use sw_composite::{Gradient, GradientStop, MatrixFixedPoint, Spread};

use crate::types::Color;

/// Half-width of the linear ramp and radius of radial gradients.
pub const GRADIENT_RADIUS: f32 = 16384.;

const LUT_SIZE: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub ratio: f32,
    pub color: Color,
}

impl ColorStop {
    pub fn new(ratio: f32, color: Color) -> ColorStop {
        ColorStop { ratio, color }
    }

    /// A stop from a shape record, whose ratios are stored as 0..=255.
    pub fn from_record(ratio: u8, color: Color) -> ColorStop {
        ColorStop { ratio: ratio as f32 / 255., color }
    }
}

/// What happens to the ramp outside `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpreadMode {
    /// Clamp to the edge colors.
    Pad,
    /// Mirror every other period.
    Reflect,
    /// Wrap around.
    Repeat,
}

impl SpreadMode {
    /// Maps a ramp position into `0..=1`.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            SpreadMode::Pad => t.clamp(0., 1.),
            SpreadMode::Repeat => t - t.floor(),
            SpreadMode::Reflect => {
                let t = t.rem_euclid(2.);
                if t > 1. {
                    2. - t
                } else {
                    t
                }
            }
        }
    }
}

impl From<SpreadMode> for Spread {
    fn from(spread: SpreadMode) -> Spread {
        match spread {
            SpreadMode::Pad => Spread::Pad,
            SpreadMode::Reflect => Spread::Reflect,
            SpreadMode::Repeat => Spread::Repeat,
        }
    }
}

/// Space in which neighbouring stop colors are interpolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Srgb,
    LinearRgb,
}

/// Keeps stops whose ratio is greater than that of the last kept stop, so
/// the first of a run of equal ratios wins.
pub fn dedup_stops(stops: &[ColorStop]) -> Vec<ColorStop> {
    let mut kept: Vec<ColorStop> = Vec::with_capacity(stops.len());
    for stop in stops {
        match kept.last() {
            Some(last) if !(stop.ratio > last.ratio) => continue,
            _ => kept.push(*stop),
        }
    }
    kept
}

#[derive(Clone, Debug, PartialEq)]
pub enum RampResult {
    /// No stops survived.
    Empty,
    /// One stop survived; the gradient is a flat color.
    Single(Color),
    Ramp(GradientRamp),
}

/// A deduplicated stop list ready for sampling.
#[derive(Clone, Debug)]
pub struct GradientRamp {
    stops: Vec<ColorStop>,
    spread: SpreadMode,
    color_space: ColorSpace,
    gradient: Gradient,
}

impl PartialEq for GradientRamp {
    fn eq(&self, other: &GradientRamp) -> bool {
        // `gradient` is derived from the other fields
        self.stops == other.stops && self.spread == other.spread && self.color_space == other.color_space
    }
}

impl GradientRamp {
    pub fn new(stops: &[ColorStop], spread: SpreadMode, color_space: ColorSpace) -> RampResult {
        let stops = dedup_stops(stops);
        match stops.len() {
            0 => RampResult::Empty,
            1 => RampResult::Single(stops[0].color),
            _ => {
                let gradient = build_gradient(&stops, color_space);
                RampResult::Ramp(GradientRamp { stops, spread, color_space, gradient })
            }
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn ratios(&self) -> Vec<f32> {
        self.stops.iter().map(|s| s.ratio).collect()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.stops.iter().map(|s| s.color).collect()
    }

    pub fn spread(&self) -> SpreadMode {
        self.spread
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// The sRGB stop list handed to the compositor.
    pub(crate) fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    /// Premultiplied ARGB samples of the ramp at `i / 256`.
    pub fn lookup_table(&self) -> [u32; LUT_SIZE] {
        // one table entry per device pixel along x
        let step = MatrixFixedPoint { xx: 1 << 8, xy: 0, yx: 0, yy: 0, x0: 0, y0: 0 };
        let source = self.gradient.make_source(&step, 0xff);
        let mut lut = [0; LUT_SIZE];
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = source.linear_gradient_eval(i as u16, 0, Spread::Pad);
        }
        lut
    }
}

fn to_stop(ratio: f32, c: Color) -> GradientStop {
    GradientStop { position: ratio, color: sw_composite::Color::new(c.a, c.r, c.g, c.b) }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1. / 2.4) - 0.055
    }
}

fn interpolate_linear_rgb(a: Color, b: Color, t: f32) -> Color {
    let lerp = |x: f32, y: f32| x + (y - x) * t;
    let channel = |x: u8, y: u8| -> u8 {
        let v = linear_to_srgb(lerp(srgb_to_linear(x as f32 / 255.), srgb_to_linear(y as f32 / 255.)));
        (v * 255. + 0.5).clamp(0., 255.) as u8
    };
    Color {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
        a: (lerp(a.a as f32, b.a as f32) + 0.5).clamp(0., 255.) as u8,
    }
}

/// sw-composite interpolates in sRGB only. Linear-RGB ramps are expanded
/// into enough intermediate sRGB stops that every table entry between two
/// stops gets its own.
fn build_gradient(stops: &[ColorStop], color_space: ColorSpace) -> Gradient {
    let mut out = Vec::with_capacity(stops.len());
    for (i, stop) in stops.iter().enumerate() {
        if color_space == ColorSpace::LinearRgb && i > 0 {
            let prev = stops[i - 1];
            let steps = ((stop.ratio - prev.ratio) * (LUT_SIZE - 1) as f32).ceil().max(1.) as usize;
            for k in 1..steps {
                let t = k as f32 / steps as f32;
                let ratio = prev.ratio + (stop.ratio - prev.ratio) * t;
                out.push(to_stop(ratio, interpolate_linear_rgb(prev.color, stop.color, t)));
            }
        }
        out.push(to_stop(stop.ratio, stop.color));
    }
    Gradient { stops: out }
}
