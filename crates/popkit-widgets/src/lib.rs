#![forbid(unsafe_code)]

//! Popup widgets for popkit.
//!
//! - [`modal`]: popups, alert/dialogue/picker presets, and the popup host.
//! - [`text`]: fonts and the text measuring seam used by sizing code.

pub mod modal;
pub mod text;

pub use modal::{
    AlertController, AlertStyle, Appearance, DatePicker, Dialogue, OptionPicker, Popup,
    PopupHost, PopupId, PresentationError, PresentationPhase,
};
pub use text::{ApproxMeasure, Font, TextMeasure};
