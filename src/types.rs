use sw_composite::muldiv255;

use crate::error::{Error, Result};

/// An unpremultiplied RGBA color, as stored in shape records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 0xff);
    /// Stand-in for paints whose source could not be resolved.
    pub const RED: Color = Color::new(0xff, 0, 0, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    /// Packs the color into the premultiplied ARGB layout used by `DrawTarget`.
    pub fn to_premultiplied(self) -> u32 {
        let a = self.a as u32;
        let r = muldiv255(self.r as u32, a);
        let g = muldiv255(self.g as u32, a);
        let b = muldiv255(self.b as u32, a);
        (a << 24) | (r << 16) | (g << 8) | b
    }

    pub fn from_premultiplied(pixel: u32) -> Color {
        let a = pixel >> 24;
        let unmul = |c: u32| if a == 0 { 0 } else { ((c * 255 + a / 2) / a).min(255) as u8 };
        Color {
            r: unmul((pixel >> 16) & 0xff),
            g: unmul((pixel >> 8) & 0xff),
            b: unmul(pixel & 0xff),
            a: a as u8,
        }
    }
}

/// A decoded bitmap: `width * height` premultiplied ARGB pixels, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: i32,
    height: i32,
    data: Vec<u32>,
}

impl Image {
    pub fn new(width: i32, height: i32, data: Vec<u32>) -> Result<Image> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::BufferSize { expected, actual: data.len() });
        }
        Ok(Image { width, height, data })
    }

    pub fn filled(width: i32, height: i32, color: Color) -> Result<Image> {
        let len = width.max(0) as usize * height.max(0) as usize;
        Image::new(width, height, vec![color.to_premultiplied(); len])
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }
}

/// Per-channel multiply and add terms applied to bitmap sources.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransform {
    pub red_mult: f32,
    pub green_mult: f32,
    pub blue_mult: f32,
    pub alpha_mult: f32,
    pub red_add: i32,
    pub green_add: i32,
    pub blue_add: i32,
    pub alpha_add: i32,
}

impl Default for ColorTransform {
    fn default() -> Self {
        ColorTransform {
            red_mult: 1.,
            green_mult: 1.,
            blue_mult: 1.,
            alpha_mult: 1.,
            red_add: 0,
            green_add: 0,
            blue_add: 0,
            alpha_add: 0,
        }
    }
}

impl ColorTransform {
    pub fn apply(&self, c: Color) -> Color {
        fn channel(v: u8, mult: f32, add: i32) -> u8 {
            (v as f32 * mult + add as f32).round().clamp(0., 255.) as u8
        }
        Color {
            r: channel(c.r, self.red_mult, self.red_add),
            g: channel(c.g, self.green_mult, self.green_add),
            b: channel(c.b, self.blue_mult, self.blue_add),
            a: channel(c.a, self.alpha_mult, self.alpha_add),
        }
    }

    pub fn apply_to_image(&self, image: &Image) -> Image {
        Image {
            width: image.width,
            height: image.height,
            data: image
                .data
                .iter()
                .map(|&p| self.apply(Color::from_premultiplied(p)).to_premultiplied())
                .collect(),
        }
    }
}
