#![forbid(unsafe_code)]

//! Headless primitives for popkit.
//!
//! - [`geometry`]: points, sizes, rectangles, insets.
//! - [`color`]: packed RGBA colors.
//! - [`view`]: the retained view tree with z-order, hit testing, and draw
//!   flattening.
//! - [`layout`]: the layout binding capability and its constraint solver.
//! - [`clock`]: frame deltas and one-shot countdowns.
//! - [`event`]: input events.

pub mod clock;
pub mod color;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod view;
