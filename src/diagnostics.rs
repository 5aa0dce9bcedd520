//! Reporting for inputs that were rendered with a fallback.
//!
//! Nothing here affects pixels. The renderer hands every condition to a
//! caller-supplied [`Diagnostics`] sink, which decides what to keep.

use std::collections::HashSet;
use std::fmt;

use log::warn;

use crate::style::GradientKind;

#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A gradient had fewer than two distinct stops and was degraded to a
    /// flat color or to no paint.
    TooFewGradientStops { kind: GradientKind, count: usize },
    /// A bitmap fill referenced a bitmap the resolver could not supply.
    MissingBitmap { bitmap_id: u16 },
    /// A paint matrix could not be inverted; only its translation was used.
    DegeneratePaintMatrix,
    /// A stroke-space transform could not be inverted; lines are stroked
    /// without it.
    NonInvertibleStrokeTransform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarningKind {
    TooFewGradientStops,
    MissingBitmap,
    DegeneratePaintMatrix,
    NonInvertibleStrokeTransform,
}

impl Warning {
    pub fn kind(&self) -> WarningKind {
        match self {
            Warning::TooFewGradientStops { .. } => WarningKind::TooFewGradientStops,
            Warning::MissingBitmap { .. } => WarningKind::MissingBitmap,
            Warning::DegeneratePaintMatrix => WarningKind::DegeneratePaintMatrix,
            Warning::NonInvertibleStrokeTransform => WarningKind::NonInvertibleStrokeTransform,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TooFewGradientStops { kind, count } => {
                write!(f, "{:?} gradient should have at least 2 gradient records, found {}", kind, count)
            }
            Warning::MissingBitmap { bitmap_id } => {
                write!(f, "bitmap {} is unavailable, filling with the error color", bitmap_id)
            }
            Warning::DegeneratePaintMatrix => {
                write!(f, "paint matrix is not invertible, using its translation only")
            }
            Warning::NonInvertibleStrokeTransform => {
                write!(f, "stroke transform is not invertible, stroking untransformed")
            }
        }
    }
}

pub trait Diagnostics {
    fn warn(&mut self, warning: Warning);
}

/// Forwards each kind of warning to the `log` facade the first time it is
/// seen. Keep one instance alive for as long as warnings should stay
/// deduplicated.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    seen: HashSet<WarningKind>,
}

impl LogDiagnostics {
    pub fn new() -> LogDiagnostics {
        LogDiagnostics::default()
    }

    pub fn has_reported(&self, kind: WarningKind) -> bool {
        self.seen.contains(&kind)
    }
}

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, warning: Warning) {
        if self.seen.insert(warning.kind()) {
            warn!("{}", warning);
        }
    }
}

/// Keeps every warning, in order.
impl Diagnostics for Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreDiagnostics;

impl Diagnostics for IgnoreDiagnostics {
    fn warn(&mut self, _warning: Warning) {}
}
