#![forbid(unsafe_code)]

//! Modal popups: the base popup, its presets, and the presenting host.
//!
//! # Lifecycle
//!
//! Every popup walks the same phases:
//!
//! `Idle -> TransitioningIn -> Presented -> TransitioningOut -> Dismissed`
//!
//! [`Popup`] owns the view hierarchy (dimming cover, touch receiver,
//! container, content) and the [`PresentationManager`] that drives the
//! transitions. Presets build a configured popup:
//!
//! - [`AlertController`]: alert views and action sheets.
//! - [`Dialogue`]: content under a navigation bar with cancel/confirm.
//! - [`DatePicker`] and [`OptionPicker`]: dialogues around picker content.
//!
//! [`PopupHost`] stands in for the presenting screen: it stacks popups,
//! forwards input to the top one, and reports completions.
//!
//! # Example
//!
//! ```ignore
//! use popkit_widgets::modal::{AlertController, PopupHost};
//!
//! let alert = AlertController::alert_view("Saved", Some("All changes stored."), Some("OK"))
//!     .on_canceled(|| tracing::info!("closed"));
//! let mut host = PopupHost::new(Size::new(320.0, 480.0));
//! host.pop_up(alert.into_popup(), None)?;
//! ```

mod alert;
pub mod animation;
pub mod appearance;
mod container;
pub mod content;
mod dialogue;
mod host;
mod picker;
pub mod placement;
mod popup;
pub mod presentation;

pub use alert::{
    ACTION_SHEET_BOTTOM_PADDING, ACTION_SHEET_WIDTH_FRACTION, ALERT_VIEW_WIDTH, AlertButton,
    AlertButtonStyle, AlertController, AlertStyle, ButtonLayout, ButtonLayoutPolicy,
    PairedButtons, SEPARATOR_THICKNESS, StackedButtons, alert_buttons,
};
pub use animation::{
    AnimationKind, AnimationStatus, Curve, PopupAnimation, TransitionContext, TransitionFrames,
};
pub use appearance::{
    AlertAppearance, AnimationAppearance, Appearance, AttachedPosition, ButtonAppearance,
    DialogueAppearance, PopupAppearance, TransitionDirection, TransitionStyle,
};
pub use container::{ContainerKind, PopupContainer};
pub use content::{
    ContentAdapter, ContentView, InstallContext, PopupCommand, PopupInfo, SolidView, ViewContent,
};
pub use dialogue::{
    ConfirmedDataProvider, ContentKind, DEFAULT_CANCEL_TEXT, DEFAULT_CONFIRM_TEXT, Dialogue,
};
pub use host::{HostEvent, PopupHost, PopupId};
pub use picker::{DateField, DatePicker, DatePickerMode, OptionPicker, ROW_HEIGHT};
pub use popup::{Popup, PopupAction};
pub use presentation::{
    CoverLayer, PresentationError, PresentationManager, PresentationPhase, TransitionScene,
};
