#![forbid(unsafe_code)]

//! Input events delivered to presented popups.

use crate::geometry::Point;

/// An input event in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Event {
    /// A completed single tap.
    Tap { location: Point },
}

impl Event {
    /// Convenience constructor for a tap.
    pub fn tap(x: f64, y: f64) -> Self {
        Self::Tap {
            location: Point::new(x, y),
        }
    }

    /// Location of pointer-style events.
    pub fn location(&self) -> Option<Point> {
        match self {
            Self::Tap { location } => Some(*location),
        }
    }
}
