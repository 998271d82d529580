#![forbid(unsafe_code)]

//! popkit public facade.
//!
//! Re-exports the headless primitives ([`core`]) and the popup widgets
//! ([`widgets`]). Most applications only need the [`prelude`].
//!
//! # Example
//!
//! ```ignore
//! use popkit::prelude::*;
//!
//! let mut host = PopupHost::new(Size::new(320.0, 480.0));
//! let sheet = AlertController::action_sheet("Share", None, Some("Cancel"), ["Mail", "Messages"])
//!     .on_confirmed(|index, title| tracing::info!(index, %title, "share target"));
//! host.pop_up(sheet.into_popup(), None)?;
//! ```

pub use popkit_core as core;
pub use popkit_widgets as widgets;

pub use popkit_widgets::modal;

/// Common imports for building and presenting popups.
pub mod prelude {
    pub use popkit_core::color::PackedRgba;
    pub use popkit_core::event::Event;
    pub use popkit_core::geometry::{Insets, Point, Rect, Size};
    pub use popkit_core::view::{DrawCommand, ViewId, ViewNode, ViewTree};

    pub use popkit_widgets::modal::{
        AlertController, AlertStyle, Appearance, AttachedPosition, ContentKind, ContentView,
        DatePicker, DatePickerMode, Dialogue, HostEvent, OptionPicker, Popup, PopupHost, PopupId,
        PopupInfo, PresentationError, PresentationPhase, TransitionDirection, TransitionStyle,
    };
    pub use popkit_widgets::text::{Font, TextMeasure};
}
