//! Paints gradients and bitmaps that are defined in their own coordinate
//! space onto a piece of shape geometry.
//!
//! The geometry becomes a clip, the paint's matrix is folded into the
//! device transform, and a rectangle covering the geometry in paint space
//! is filled. Non-repeating bitmaps are drawn once at the paint origin
//! instead of filling the rectangle.

use log::trace;

use crate::diagnostics::{Diagnostics, Warning};
use crate::draw_target::{DrawTarget, ExtendMode, FilterMode, Source};
use crate::geom::{safe_invert, transform_rect};
use crate::path_builder::{Path, PathBuilder};
use crate::style::Paint;
use crate::Transform;

/// Paints `geometry` (in the target's current user space) with `paint`.
pub fn paint_geometry(dt: &mut DrawTarget, geometry: &Path, paint: &Paint, diagnostics: &mut dyn Diagnostics) {
    let identity = Transform::identity();
    match paint {
        Paint::None => {}
        Paint::Solid(color) => dt.fill(geometry, &Source::Solid(*color)),
        Paint::LinearGradient { ramp, transform } => {
            let source = Source::LinearGradient(ramp, identity);
            fill_mapped(dt, geometry, transform, |dt, rect| dt.fill(rect, &source), diagnostics);
        }
        Paint::RadialGradient { ramp, focal_ratio, transform } => {
            let source = Source::RadialGradient(ramp, *focal_ratio, identity);
            fill_mapped(dt, geometry, transform, |dt, rect| dt.fill(rect, &source), diagnostics);
        }
        Paint::Texture { image, repeat, smooth, transform } => {
            let filter = if *smooth { FilterMode::Bilinear } else { FilterMode::Nearest };
            if *repeat {
                let source = Source::Image(image, ExtendMode::Repeat, filter, identity);
                fill_mapped(dt, geometry, transform, |dt, rect| dt.fill(rect, &source), diagnostics);
            } else {
                fill_mapped(dt, geometry, transform, |dt, _| dt.draw_image_at(0., 0., image, filter), diagnostics);
            }
        }
    }
}

/// Runs `draw` with the target clipped to `geometry` and transformed into
/// the paint space of `matrix`. `draw` receives the geometry's bounding
/// rectangle expressed in paint space.
fn fill_mapped<F>(dt: &mut DrawTarget, geometry: &Path, matrix: &Transform, draw: F, diagnostics: &mut dyn Diagnostics)
where
    F: FnOnce(&mut DrawTarget, &Path),
{
    let bounds = match geometry.bounds() {
        Some(bounds) => bounds,
        None => return,
    };

    let saved = *dt.get_transform();
    dt.push_clip(geometry);

    let safe = safe_invert(matrix);
    if safe.degenerate {
        diagnostics.warn(Warning::DegeneratePaintMatrix);
    }
    dt.set_transform(&safe.matrix.then(&saved));

    // integer rectangle, truncated towards zero
    let mapped = transform_rect(&safe.inverse, &bounds);
    let (x, y) = (mapped.min.x as i32, mapped.min.y as i32);
    let (w, h) = ((mapped.max.x - mapped.min.x) as i32, (mapped.max.y - mapped.min.y) as i32);
    trace!("paint-space rect {},{} {}x{} for bounds {:?}", x, y, w, h, bounds);
    let mut pb = PathBuilder::new();
    pb.rect(x as f32, y as f32, w as f32, h as f32);
    draw(dt, &pb.finish());

    dt.set_transform(&saved);
    dt.pop_clip();
}
