/* Copyright 2013 Jeff Muizelaar
 *
 * Use of this source code is governed by a MIT-style license that can be
 * found in the LICENSE file.
 *
 * Portions Copyright 2006 The Android Open Source Project
 *
 * Use of that source code is governed by a BSD-style license that can be
 * found in the LICENSE.skia file.
 */

// Paths reach the rasterizer already flattened to lines in device space, so
// an edge is just a starting x and a slope. Edges live in a flat Vec sorted
// by their first scanline; the active list is re-sorted by x every scanline.
// The active list is usually almost sorted already, which makes the
// insertion sort done by `sort_active` close to linear.

use crate::blitter::Blitter;
use crate::path_builder::{Path, PathOp, Winding};
use crate::Point;

pub const SHIFT: i32 = 2;
pub const SCALE: i32 = 1 << SHIFT;
pub const MASK: i32 = SCALE - 1;
const SAMPLE_SIZE: f32 = SCALE as f32;

#[derive(Clone, Copy, Debug)]
struct Edge {
    // first and one-past-last super-sampled scanline
    top: i32,
    bottom: i32,
    // x in super-sampled units at the center of the current scanline
    x: f32,
    slope_x: f32,
    winding: i8,
}

pub struct Rasterizer {
    // dimensions in super-sampled units
    width: i32,
    height: i32,
    edges: Vec<Edge>,
    active: Vec<Edge>,
}

impl Rasterizer {
    pub fn new(width: i32, height: i32) -> Rasterizer {
        Rasterizer {
            width: width * SCALE,
            height: height * SCALE,
            edges: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, mut start: Point, mut end: Point) {
        if !(start.x.is_finite() && start.y.is_finite() && end.x.is_finite() && end.y.is_finite()) {
            return;
        }
        // order the points from top to bottom
        let winding = if end.y < start.y {
            std::mem::swap(&mut start, &mut end);
            -1
        } else {
            1
        };
        let (x1, y1) = (start.x * SAMPLE_SIZE, start.y * SAMPLE_SIZE);
        let (x2, y2) = (end.x * SAMPLE_SIZE, end.y * SAMPLE_SIZE);

        // a scanline is crossed when its center lies in [y1, y2)
        let top = (y1 - 0.5).ceil() as i32;
        let bottom = (y2 - 0.5).ceil() as i32;

        // drop horizontal edges and those completely above or below
        if top >= bottom || bottom <= 0 || top >= self.height {
            return;
        }

        let slope_x = (x2 - x1) / (y2 - y1);
        // edges that begin above the bitmap are stepped into view
        let top_clamped = top.max(0);
        let x = x1 + (top_clamped as f32 + 0.5 - y1) * slope_x;
        self.edges.push(Edge {
            top: top_clamped,
            bottom: bottom.min(self.height),
            x,
            slope_x,
            winding,
        });
    }

    /// Adds every edge of a flattened path. Open subpaths are closed
    /// implicitly.
    pub fn add_path(&mut self, path: &Path) {
        let mut start = Point::origin();
        let mut cur = Point::origin();
        for op in &path.ops {
            match *op {
                PathOp::MoveTo(p) => {
                    self.add_edge(cur, start);
                    start = p;
                    cur = p;
                }
                PathOp::LineTo(p) => {
                    self.add_edge(cur, p);
                    cur = p;
                }
                PathOp::QuadTo(_, p) => {
                    // callers flatten first; an unflattened curve degrades to its chord
                    self.add_edge(cur, p);
                    cur = p;
                }
                PathOp::Close => {
                    self.add_edge(cur, start);
                    cur = start;
                }
            }
        }
        self.add_edge(cur, start);
    }

    fn sort_active(&mut self) {
        for i in 1..self.active.len() {
            let mut j = i;
            while j > 0 && self.active[j - 1].x > self.active[j].x {
                self.active.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    fn scan_edges(&self, y: i32, blitter: &mut dyn Blitter, winding_mode: Winding) {
        let mut winding = 0i32;
        for pair in self.active.windows(2) {
            winding += pair[0].winding as i32;
            let inside = match winding_mode {
                Winding::EvenOdd => winding & 1 != 0,
                Winding::NonZero => winding != 0,
            };
            if !inside {
                continue;
            }
            // a sample is covered when its center lies in [x1, x2)
            let x1 = (pair[0].x - 0.5).ceil().clamp(0., self.width as f32) as i32;
            let x2 = (pair[1].x - 0.5).ceil().clamp(0., self.width as f32) as i32;
            if x2 > x1 {
                blitter.blit_span(y, x1, x2);
            }
        }
    }

    pub fn rasterize(&mut self, blitter: &mut dyn Blitter, winding_mode: Winding) {
        self.edges.sort_by_key(|e| e.top);
        self.active.clear();
        let mut next = 0;
        let mut y = match self.edges.first() {
            Some(e) => e.top,
            None => return,
        };
        while y < self.height {
            // insert the new edges
            while next < self.edges.len() && self.edges[next].top <= y {
                self.active.push(self.edges[next]);
                next += 1;
            }
            if self.active.is_empty() {
                match self.edges.get(next) {
                    Some(e) => {
                        y = e.top;
                        continue;
                    }
                    None => break,
                }
            }
            self.sort_active();
            self.scan_edges(y, blitter, winding_mode);
            // step to the next scanline, dropping the edges that end
            for e in &mut self.active {
                e.x += e.slope_x;
            }
            self.active.retain(|e| y + 1 < e.bottom);
            y += 1;
        }
    }

    pub fn reset(&mut self) {
        self.edges.clear();
        self.active.clear();
    }
}
