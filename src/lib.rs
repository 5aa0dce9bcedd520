//! A software rasterizer for declarative vector shapes.
//!
//! Shapes arrive as a stream of [`ShapeEvent`]s (fill and line style
//! changes interleaved with path segments) and are painted onto a
//! premultiplied ARGB [`DrawTarget`] with solid colors, linear and radial
//! gradients, and bitmap fills.
//!
//! ```
//! use shape_raster::*;
//!
//! let events = [
//!     ShapeEvent::BeginFill(Some(Color::rgb(0xff, 0, 0))),
//!     ShapeEvent::MoveTo(0., 0.),
//!     ShapeEvent::LineTo(200., 0.),
//!     ShapeEvent::LineTo(200., 200.),
//!     ShapeEvent::LineTo(0., 200.),
//!     ShapeEvent::LineTo(0., 0.),
//!     ShapeEvent::EndFill,
//! ];
//! let mut dt = DrawTarget::new(10, 10);
//! let bounds = Rect::new(Point::new(0., 0.), Point::new(200., 200.));
//! render(
//!     &events,
//!     &mut dt,
//!     &bounds,
//!     &Transform::identity(),
//!     &Transform::identity(),
//!     &RenderOptions::default(),
//!     &NoBitmaps,
//!     &mut IgnoreDiagnostics,
//! );
//! assert_eq!(dt.get_data()[55], 0xffff0000);
//! ```

mod blitter;
mod compositor;
mod diagnostics;
mod draw_target;
mod error;
mod events;
mod geom;
mod gradient;
mod paint_space;
mod rasterizer;
mod stroke;
mod style;
mod types;

mod path_builder;
pub use path_builder::*;

pub use crate::compositor::Compositor;
pub use crate::diagnostics::{Diagnostics, IgnoreDiagnostics, LogDiagnostics, Warning, WarningKind};
pub use crate::draw_target::{DrawTarget, ExtendMode, FilterMode, Source, DEFAULT_TOLERANCE};
pub use crate::error::{Error, Result};
pub use crate::events::{render, BitmapResolver, NoBitmaps, RenderOptions, ShapeEvent, ShapeExporter};
pub use crate::geom::{safe_invert, SafeInverse};
pub use crate::gradient::{dedup_stops, ColorSpace, ColorStop, GradientRamp, RampResult, SpreadMode, GRADIENT_RADIUS};
pub use crate::paint_space::paint_geometry;
pub use crate::stroke::*;
pub use crate::style::{BitmapFill, GradientFill, GradientKind, LineStroke, LineStyle, Paint, StyleResolver};
pub use crate::types::{Color, ColorTransform, Image};

pub type IntRect = euclid::default::Box2D<i32>;
pub type Rect = euclid::default::Box2D<f32>;
pub type Point = euclid::default::Point2D<f32>;
pub type Transform = euclid::default::Transform2D<f32>;
pub type Vector = euclid::default::Vector2D<f32>;
