use sw_composite::*;

use crate::draw_target::{ExtendMode, FilterMode};
use crate::gradient::{GradientRamp, GRADIENT_RADIUS};
use crate::rasterizer::{MASK, SHIFT};
use crate::types::Image;
use crate::{IntRect, Transform};

pub trait Blitter {
    fn blit_span(&mut self, y: i32, x1: i32, x2: i32);
}

/// Accumulates super-sampled spans into an 8-bit coverage mask.
pub struct MaskSuperBlitter {
    width: i32,
    pub buf: Vec<u8>,
    dirty: Option<IntRect>,
}

fn coverage_to_partial_alpha(aa: i32) -> u8 {
    (aa << (8 - 2 * SHIFT)) as u8
}

impl MaskSuperBlitter {
    pub fn new(width: i32, height: i32) -> MaskSuperBlitter {
        MaskSuperBlitter {
            width,
            // a span ending on the right edge touches one byte past the end
            // of its row, so keep one byte of padding after the last row
            buf: vec![0; (width * height) as usize + 1],
            dirty: None,
        }
    }

    /// Pixel bounds of everything blitted so far.
    pub fn bounds(&self) -> Option<IntRect> {
        self.dirty
    }

    fn mark_dirty(&mut self, y: i32, x1: i32, x2: i32) {
        let (min_x, max_x, y) = (x1 >> SHIFT, (x2 + MASK) >> SHIFT, y >> SHIFT);
        let rect = self.dirty.get_or_insert(IntRect::new((min_x, y).into(), (max_x, y + 1).into()));
        rect.min.x = rect.min.x.min(min_x);
        rect.min.y = rect.min.y.min(y);
        rect.max.x = rect.max.x.max(max_x);
        rect.max.y = rect.max.y.max(y + 1);
    }
}

impl Blitter for MaskSuperBlitter {
    fn blit_span(&mut self, y: i32, x1: i32, x2: i32) {
        self.mark_dirty(y, x1, x2);
        // four full rows add up to 255 rather than overflowing to 256
        let max: u8 = ((1 << (8 - SHIFT)) - (((y & MASK) + 1) >> SHIFT)) as u8;
        let mut i = ((y >> SHIFT) * self.width + (x1 >> SHIFT)) as usize;

        let fb = x1 & MASK;
        let fe = x2 & MASK;
        let mut n = (x2 >> SHIFT) - (x1 >> SHIFT) - 1;

        if n < 0 {
            self.buf[i] = self.buf[i].saturating_add(coverage_to_partial_alpha(fe - fb));
        } else {
            self.buf[i] = self.buf[i].saturating_add(coverage_to_partial_alpha((1 << SHIFT) - fb));
            i += 1;
            while n != 0 {
                self.buf[i] = self.buf[i].saturating_add(max);
                i += 1;
                n -= 1;
            }
            self.buf[i] = self.buf[i].saturating_add(coverage_to_partial_alpha(fe));
        }
    }
}

pub trait Shader {
    fn shade_span(&self, x: i32, y: i32, dest: &mut [u32], count: usize);
}

fn transform_to_fixed(transform: &Transform) -> MatrixFixedPoint {
    MatrixFixedPoint {
        xx: float_to_fixed(transform.m11),
        xy: float_to_fixed(transform.m21),
        yx: float_to_fixed(transform.m12),
        yy: float_to_fixed(transform.m22),
        x0: float_to_fixed(transform.m31),
        y0: float_to_fixed(transform.m32),
    }
}

// Shaders are evaluated at integer pixel coordinates; sample the centers.
fn from_pixel_centers(transform: &Transform) -> Transform {
    Transform::translation(0.5, 0.5).then(transform)
}

pub struct SolidShader {
    pub color: u32,
}

impl Shader for SolidShader {
    fn shade_span(&self, _x: i32, _y: i32, dest: &mut [u32], count: usize) {
        for d in &mut dest[..count] {
            *d = self.color;
        }
    }
}

/// Shades the fixed linear ramp. `transform` maps device pixels into
/// gradient space.
pub struct LinearGradientShader {
    source: Box<GradientSource>,
    spread: Spread,
}

impl LinearGradientShader {
    pub fn new(ramp: &GradientRamp, transform: &Transform) -> LinearGradientShader {
        // -GRADIENT_RADIUS..GRADIENT_RADIUS onto the 0..1 ramp
        let scale = 1. / (2. * GRADIENT_RADIUS);
        let to_ramp = from_pixel_centers(transform)
            .then_translate((GRADIENT_RADIUS, 0.).into())
            .then_scale(scale, scale);
        let source = ramp.gradient().make_source(&transform_to_fixed(&to_ramp), 0xff);
        LinearGradientShader { source, spread: ramp.spread().into() }
    }
}

impl Shader for LinearGradientShader {
    fn shade_span(&self, x: i32, y: i32, dest: &mut [u32], count: usize) {
        for (i, d) in dest[..count].iter_mut().enumerate() {
            *d = self.source.linear_gradient_eval((x + i as i32) as u16, y as u16, self.spread);
        }
    }
}

// Keeps the focus strictly inside the circle so every ray from it meets
// the circle exactly once.
const MAX_FOCAL_RATIO: f32 = 0.99;

enum RadialSource {
    Centered(Box<GradientSource>),
    Focal(Box<TwoCircleRadialGradientSource>),
}

/// Shades a radial ramp centered on the origin, optionally with its focus
/// moved to `(focal_ratio * GRADIENT_RADIUS, 0)`.
pub struct RadialGradientShader {
    source: RadialSource,
    spread: Spread,
}

impl RadialGradientShader {
    pub fn new(ramp: &GradientRamp, focal_ratio: f32, transform: &Transform) -> RadialGradientShader {
        let scale = 1. / GRADIENT_RADIUS;
        let to_unit = transform_to_fixed(&from_pixel_centers(transform).then_scale(scale, scale));
        let focal_ratio = focal_ratio.clamp(-MAX_FOCAL_RATIO, MAX_FOCAL_RATIO);
        let source = if focal_ratio == 0. {
            RadialSource::Centered(ramp.gradient().make_source(&to_unit, 0xff))
        } else {
            // a zero-radius circle at the focus growing into the unit circle
            RadialSource::Focal(ramp.gradient().make_two_circle_source(focal_ratio, 0., 0., 0., 0., 1., &to_unit, 0xff))
        };
        RadialGradientShader { source, spread: ramp.spread().into() }
    }
}

impl Shader for RadialGradientShader {
    fn shade_span(&self, x: i32, y: i32, dest: &mut [u32], count: usize) {
        for (i, d) in dest[..count].iter_mut().enumerate() {
            let (x, y) = ((x + i as i32) as u16, y as u16);
            *d = match &self.source {
                RadialSource::Centered(source) => source.radial_gradient_eval(x, y, self.spread),
                RadialSource::Focal(source) => source.eval(x, y, self.spread),
            };
        }
    }
}

pub struct ImageShader<'a> {
    image: sw_composite::Image<'a>,
    xfm: MatrixFixedPoint,
    extend: ExtendMode,
    filter: FilterMode,
}

impl<'a> ImageShader<'a> {
    pub fn new(image: &'a Image, transform: &Transform, extend: ExtendMode, filter: FilterMode) -> ImageShader<'a> {
        // texel centers sit on integer fixed-point coordinates
        let to_texels = from_pixel_centers(transform).then_translate((-0.5, -0.5).into());
        ImageShader {
            image: sw_composite::Image { width: image.width(), height: image.height(), data: image.data() },
            xfm: transform_to_fixed(&to_texels),
            extend,
            filter,
        }
    }

    fn fetch(&self, x: i32, y: i32) -> u32 {
        let p = self.xfm.transform(x as u16, y as u16);
        match (self.extend, self.filter) {
            (ExtendMode::Pad, FilterMode::Nearest) => fetch_nearest::<PadFetch>(&self.image, p.x, p.y),
            (ExtendMode::Pad, FilterMode::Bilinear) => fetch_bilinear::<PadFetch>(&self.image, p.x, p.y),
            (ExtendMode::Repeat, FilterMode::Nearest) => fetch_nearest::<RepeatFetch>(&self.image, p.x, p.y),
            (ExtendMode::Repeat, FilterMode::Bilinear) => fetch_bilinear::<RepeatFetch>(&self.image, p.x, p.y),
        }
    }
}

impl<'a> Shader for ImageShader<'a> {
    fn shade_span(&self, x: i32, y: i32, dest: &mut [u32], count: usize) {
        for (i, d) in dest[..count].iter_mut().enumerate() {
            *d = self.fetch(x + i as i32, y);
        }
    }
}

/// Composites shaded spans source-over through a coverage mask and an
/// optional clip mask.
pub struct ShaderMaskBlitter<'a> {
    pub shader: &'a dyn Shader,
    pub tmp: Vec<u32>,
    pub dest: &'a mut [u32],
    pub dest_stride: i32,
    pub mask: &'a [u8],
    pub clip: Option<&'a [u8]>,
}

impl<'a> Blitter for ShaderMaskBlitter<'a> {
    fn blit_span(&mut self, y: i32, x1: i32, x2: i32) {
        let row = (y * self.dest_stride) as usize;
        let count = (x2 - x1) as usize;
        if self.tmp.len() < count {
            self.tmp.resize(count, 0);
        }
        self.shader.shade_span(x1, y, &mut self.tmp[..], count);
        for i in 0..count {
            let offset = row + x1 as usize + i;
            let mask = self.mask[offset] as u32;
            if mask == 0 {
                continue;
            }
            let dst = self.dest[offset];
            self.dest[offset] = match self.clip {
                Some(clip) => over_in_in(self.tmp[i], dst, mask, clip[offset] as u32),
                None => over_in(self.tmp[i], dst, mask),
            };
        }
    }
}
