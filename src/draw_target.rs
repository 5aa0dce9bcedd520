use sw_composite::muldiv255;

use crate::blitter::*;
use crate::error::{Error, Result};
use crate::gradient::GradientRamp;
use crate::path_builder::{Path, PathBuilder};
use crate::rasterizer::Rasterizer;
use crate::types::{Color, Image};
use crate::{IntRect, Transform};

/// Device-space flattening tolerance, in pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtendMode {
    Pad,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    Bilinear,
    Nearest,
}

/// What to paint with. Transforms map user space (the space the path is
/// given in) into the source's own space.
pub enum Source<'a> {
    Solid(Color),
    Image(&'a Image, ExtendMode, FilterMode, Transform),
    LinearGradient(&'a GradientRamp, Transform),
    /// Ramp, focal ratio and transform.
    RadialGradient(&'a GradientRamp, f32, Transform),
}

struct Clip {
    mask: Vec<u8>,
}

/// A premultiplied ARGB surface with a current transform and a clip stack.
pub struct DrawTarget {
    width: i32,
    height: i32,
    rasterizer: Rasterizer,
    buf: Vec<u32>,
    clip_stack: Vec<Clip>,
    transform: Transform,
    tolerance: f32,
}

impl DrawTarget {
    pub fn new(width: i32, height: i32) -> DrawTarget {
        let (width, height) = (width.max(0), height.max(0));
        DrawTarget {
            width,
            height,
            rasterizer: Rasterizer::new(width, height),
            buf: vec![0; (width * height) as usize],
            clip_stack: Vec::new(),
            transform: Transform::identity(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Wraps an existing premultiplied ARGB buffer.
    pub fn from_vec(width: i32, height: i32, buf: Vec<u32>) -> Result<DrawTarget> {
        if width < 0 || height < 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if buf.len() != expected {
            return Err(Error::BufferSize { expected, actual: buf.len() });
        }
        let mut dt = DrawTarget::new(width, height);
        dt.buf = buf;
        Ok(dt)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set_transform(&mut self, transform: &Transform) {
        self.transform = *transform;
    }

    pub fn get_transform(&self) -> &Transform {
        &self.transform
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Sets the flattening tolerance in device pixels.
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance;
    }

    pub fn get_data(&self) -> &[u32] {
        &self.buf
    }

    pub fn get_data_mut(&mut self) -> &mut [u32] {
        &mut self.buf
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.buf
    }

    pub fn clear(&mut self, color: Color) {
        let pixel = color.to_premultiplied();
        for p in &mut self.buf {
            *p = pixel;
        }
    }

    /// Rasterizes `path` under the current transform into a coverage mask.
    fn rasterize(&mut self, path: &Path) -> MaskSuperBlitter {
        let device = path.clone().transform(&self.transform).flatten(self.tolerance);
        let mut blitter = MaskSuperBlitter::new(self.width, self.height);
        self.rasterizer.add_path(&device);
        self.rasterizer.rasterize(&mut blitter, path.winding);
        self.rasterizer.reset();
        blitter
    }

    /// Intersects the clip with `path` under the current transform.
    pub fn push_clip(&mut self, path: &Path) {
        let mut mask = self.rasterize(path).buf;
        mask.truncate((self.width * self.height) as usize);
        if let Some(prev) = self.clip_stack.last() {
            for (m, p) in mask.iter_mut().zip(&prev.mask) {
                *m = muldiv255(*m as u32, *p as u32) as u8;
            }
        }
        self.clip_stack.push(Clip { mask });
    }

    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    pub fn fill(&mut self, path: &Path, src: &Source) {
        let blitter = self.rasterize(path);
        if let Some(bounds) = blitter.bounds() {
            self.composite(src, &blitter.buf, bounds);
        }
    }

    /// Draws `image` with its top-left corner at `(x, y)` in user space.
    pub fn draw_image_at(&mut self, x: f32, y: f32, image: &Image, filter: FilterMode) {
        let mut pb = PathBuilder::new();
        pb.rect(x, y, image.width() as f32, image.height() as f32);
        let source = Source::Image(image, ExtendMode::Pad, filter, Transform::translation(-x, -y));
        self.fill(&pb.finish(), &source);
    }

    fn composite(&mut self, src: &Source, mask: &[u8], bounds: IntRect) {
        // device pixels back to user space, then into the source's space
        let device_to_user = match self.transform.inverse() {
            Some(inverse) => inverse,
            // nothing visible can come from a collapsed transform
            None if !matches!(src, Source::Solid(_)) => return,
            None => Transform::identity(),
        };
        let shader: Box<dyn Shader + '_> = match src {
            Source::Solid(color) => Box::new(SolidShader { color: color.to_premultiplied() }),
            Source::Image(image, extend, filter, transform) => {
                if image.width() <= 0 || image.height() <= 0 {
                    return;
                }
                Box::new(ImageShader::new(image, &device_to_user.then(transform), *extend, *filter))
            }
            Source::LinearGradient(ramp, transform) => {
                Box::new(LinearGradientShader::new(ramp, &device_to_user.then(transform)))
            }
            Source::RadialGradient(ramp, focal_ratio, transform) => {
                Box::new(RadialGradientShader::new(ramp, *focal_ratio, &device_to_user.then(transform)))
            }
        };

        let min_x = bounds.min.x.clamp(0, self.width);
        let max_x = bounds.max.x.clamp(0, self.width);
        let mut blitter = ShaderMaskBlitter {
            shader: &*shader,
            tmp: vec![0; (max_x - min_x).max(0) as usize],
            dest: &mut self.buf,
            dest_stride: self.width,
            mask,
            clip: self.clip_stack.last().map(|c| &c.mask[..]),
        };
        for y in bounds.min.y.max(0)..bounds.max.y.min(self.height) {
            if max_x > min_x {
                blitter.blit_span(y, min_x, max_x);
            }
        }
    }

    /// Encodes the surface as an 8-bit RGBA PNG.
    #[cfg(feature = "png")]
    pub fn write_png<W: std::io::Write>(&self, w: W) -> Result<()> {
        let mut encoder = png::Encoder::new(w, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        let mut output = Vec::with_capacity(self.buf.len() * 4);
        for pixel in &self.buf {
            let c = Color::from_premultiplied(*pixel);
            output.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        writer.write_image_data(&output)?;
        Ok(())
    }
}
