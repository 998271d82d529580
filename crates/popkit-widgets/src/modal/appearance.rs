#![forbid(unsafe_code)]

//! Popup appearance model.
//!
//! Pure configuration data: where the container is anchored, how big it is,
//! how it is decorated, and how it transitions. Every field is public and
//! unvalidated; the values below are the library defaults.
//!
//! # Process-wide default
//!
//! [`Appearance::current`] returns a snapshot of the process-wide default.
//! Popups copy the snapshot at construction and never look at the global
//! again, so [`Appearance::set_default`] only affects popups created
//! afterwards.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use arc_swap::ArcSwap;
use popkit_core::color::PackedRgba;
use popkit_core::geometry::{Insets, Point, Size};
use popkit_core::view::{Layer, Shadow};

use crate::text::Font;

/// Anchor of the container relative to the host bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachedPosition {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

/// Named transition animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionStyle {
    Plain,
    Zoom,
    #[default]
    Fade,
    Bounce,
    /// Reserved extension point; animates like [`TransitionStyle::Fade`].
    Custom,
}

/// Where the popup comes from and where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    Center,
    /// Enters from the left and leaves to the left.
    LeftReverse,
    /// Enters from the right and leaves to the right.
    RightReverse,
}

/// Geometry and decoration of one popup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopupAppearance {
    /// Dimming cover color.
    pub popup_background_color: PackedRgba,
    pub enable_touch_outside_to_dismiss: bool,
    pub view_attached_position: AttachedPosition,
    /// Used only for edge anchors.
    pub container_padding: Insets,
    /// Fraction of the host width in `(0, 1]`.
    pub width_multiplier: f64,
    /// Fraction of the host height in `(0, 1]`.
    pub height_multiplier: f64,
    /// Overrides `width_multiplier` when nonzero.
    pub fixed_width: f64,
    /// Overrides `height_multiplier` when nonzero.
    pub fixed_height: f64,
    pub corner_radius: f64,
    pub container_background_color: PackedRgba,
    pub border_width: f64,
    pub border_color: PackedRgba,
    pub enable_shadow: bool,
    pub shadow_radius: f64,
    pub shadow_opacity: f32,
    pub shadow_offset: Point,
    pub shadow_color: PackedRgba,
    /// Extra top offset for the `Top` anchor.
    pub status_bar_inset: f64,
    /// Delay between an action callback and the dismissal it triggers.
    pub action_dismiss_delay: Duration,
}

impl Default for PopupAppearance {
    fn default() -> Self {
        Self {
            popup_background_color: PackedRgba::white(0.0, 0.5),
            enable_touch_outside_to_dismiss: true,
            view_attached_position: AttachedPosition::Center,
            container_padding: Insets::ZERO,
            width_multiplier: 0.8,
            height_multiplier: 0.8,
            fixed_width: 0.0,
            fixed_height: 0.0,
            corner_radius: 8.0,
            container_background_color: PackedRgba::WHITE,
            border_width: 0.0,
            border_color: PackedRgba::white(0.9, 1.0),
            enable_shadow: true,
            shadow_radius: 3.0,
            shadow_opacity: 0.4,
            shadow_offset: Point::new(0.5, 0.5),
            shadow_color: PackedRgba::DARK_GRAY,
            status_bar_inset: 20.0,
            action_dismiss_delay: Duration::from_millis(150),
        }
    }
}

impl PopupAppearance {
    /// Container width for a host of `host_width`.
    pub fn popup_width(&self, host_width: f64) -> f64 {
        self.width_multiplier * host_width
    }

    /// Container height for a host of `host_height`.
    pub fn popup_height(&self, host_height: f64) -> f64 {
        self.height_multiplier * host_height
    }

    /// Store `width` as a multiplier of `host_width`.
    ///
    /// Returns `false`, keeping the previous multiplier, when the host is
    /// empty or the result would exceed the host.
    pub fn set_popup_width(&mut self, width: f64, host_width: f64) -> bool {
        Self::store_multiplier(&mut self.width_multiplier, width, host_width, "width")
    }

    /// Store `height` as a multiplier of `host_height`. See [`Self::set_popup_width`].
    pub fn set_popup_height(&mut self, height: f64, host_height: f64) -> bool {
        Self::store_multiplier(&mut self.height_multiplier, height, host_height, "height")
    }

    fn store_multiplier(slot: &mut f64, value: f64, host: f64, axis: &'static str) -> bool {
        if host <= 0.0 || !value.is_finite() {
            tracing::debug!(axis, value, host, "ignoring size against empty host");
            return false;
        }
        let multiplier = value / host;
        if multiplier > 1.0 {
            tracing::debug!(axis, multiplier, kept = *slot, "rejected multiplier beyond host");
            return false;
        }
        *slot = multiplier;
        true
    }

    /// Convert nonzero fixed sizes into multipliers against `host`.
    pub fn apply_fixed_size(&mut self, host: Size) {
        if self.fixed_width != 0.0 {
            self.set_popup_width(self.fixed_width, host.width);
        }
        if self.fixed_height != 0.0 {
            self.set_popup_height(self.fixed_height, host.height);
        }
    }

    /// Recompute multipliers so the container keeps its absolute size when
    /// the host changes from `old` to `new`.
    ///
    /// Fixed sizes win; otherwise the old absolute size is carried over.
    /// Multipliers that would exceed the new host are rejected.
    pub fn adapt_to_host_size(&mut self, old: Size, new: Size) {
        let width = if self.fixed_width == 0.0 {
            self.popup_width(old.width)
        } else {
            self.fixed_width
        };
        let height = if self.fixed_height == 0.0 {
            self.popup_height(old.height)
        } else {
            self.fixed_height
        };
        self.set_popup_width(width, new.width);
        self.set_popup_height(height, new.height);
    }

    /// Layer decoration of the content container.
    pub fn container_layer(&self) -> Layer {
        Layer {
            corner_radius: self.corner_radius,
            border_width: self.border_width,
            border_color: self.border_color,
            shadow: None,
        }
    }

    /// Shadow of the outer container, if enabled.
    pub fn shadow(&self) -> Option<Shadow> {
        self.enable_shadow.then_some(Shadow {
            radius: self.shadow_radius,
            opacity: self.shadow_opacity,
            offset: self.shadow_offset,
            color: self.shadow_color,
        })
    }
}

/// Transition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationAppearance {
    pub transition_style: TransitionStyle,
    pub transition_direction: TransitionDirection,
    pub transition_in_duration: Duration,
    pub transition_out_duration: Duration,
}

impl Default for AnimationAppearance {
    fn default() -> Self {
        Self {
            transition_style: TransitionStyle::Fade,
            transition_direction: TransitionDirection::LeftToRight,
            transition_in_duration: Duration::from_millis(400),
            transition_out_duration: Duration::from_millis(200),
        }
    }
}

/// Button look for one alert button style.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonAppearance {
    pub font: Font,
    pub title_color: PackedRgba,
    pub background_color: PackedRgba,
}

/// Typography and spacing of alert views and action sheets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlertAppearance {
    pub title_font: Font,
    pub title_color: PackedRgba,
    pub message_font: Font,
    pub message_color: PackedRgba,
    pub horizontal_space: f64,
    /// Between the container top and the title.
    pub vertical_space_title_top: f64,
    /// Between the title and the message.
    pub vertical_space_title_message: f64,
    /// Between the message (or title) and the buttons.
    pub vertical_space_message_buttons: f64,
    pub alert_button_height: f64,
    pub plain_button: ButtonAppearance,
    pub cancel_button: ButtonAppearance,
    pub enable_button_separator: bool,
    pub separator_color: PackedRgba,
}

impl Default for AlertAppearance {
    fn default() -> Self {
        Self {
            title_font: Font::bold(18.0),
            title_color: PackedRgba::BLACK,
            message_font: Font::regular(14.0),
            message_color: PackedRgba::BLACK,
            horizontal_space: 16.0,
            vertical_space_title_top: 18.0,
            vertical_space_title_message: 8.0,
            vertical_space_message_buttons: 12.0,
            alert_button_height: 44.0,
            plain_button: ButtonAppearance {
                font: Font::regular(14.0),
                title_color: PackedRgba::from_unit(0.25, 0.53, 0.91, 1.0),
                background_color: PackedRgba::WHITE,
            },
            cancel_button: ButtonAppearance {
                font: Font::bold(14.0),
                title_color: PackedRgba::white(0.4, 1.0),
                background_color: PackedRgba::WHITE,
            },
            enable_button_separator: true,
            separator_color: PackedRgba::white(0.9, 1.0),
        }
    }
}

/// Navigation bar look of dialogues.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialogueAppearance {
    pub nav_bar_background_color: PackedRgba,
    pub title_font: Font,
    pub title_color: PackedRgba,
    pub button_font: Font,
    pub cancel_title_color: PackedRgba,
    pub confirm_title_color: PackedRgba,
    pub separator_color: PackedRgba,
    pub nav_bar_height: f64,
    /// Fraction of the bar width taken by each of the two buttons.
    pub button_width_fraction: f64,
}

impl Default for DialogueAppearance {
    fn default() -> Self {
        Self {
            nav_bar_background_color: PackedRgba::white(0.97, 1.0),
            title_font: Font::bold(18.0),
            title_color: PackedRgba::BLACK,
            button_font: Font::regular(14.0),
            cancel_title_color: PackedRgba::white(0.4, 1.0),
            confirm_title_color: PackedRgba::from_unit(0.25, 0.53, 0.91, 1.0),
            separator_color: PackedRgba::white(0.8, 1.0),
            nav_bar_height: 44.0,
            button_width_fraction: 0.25,
        }
    }
}

/// Everything a popup reads at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Appearance {
    pub popup: PopupAppearance,
    pub animation: AnimationAppearance,
    pub alert: AlertAppearance,
    pub dialogue: DialogueAppearance,
}

static DEFAULT_APPEARANCE: LazyLock<ArcSwap<Appearance>> =
    LazyLock::new(|| ArcSwap::from_pointee(Appearance::default()));

impl Appearance {
    /// Snapshot of the process-wide default.
    pub fn current() -> Arc<Appearance> {
        DEFAULT_APPEARANCE.load_full()
    }

    /// Replace the process-wide default.
    pub fn set_default(appearance: Appearance) {
        tracing::debug!("replacing default popup appearance");
        DEFAULT_APPEARANCE.store(Arc::new(appearance));
    }

    /// Edit the process-wide default in place.
    pub fn update_default(edit: impl Fn(&mut Appearance)) {
        DEFAULT_APPEARANCE.rcu(|current| {
            let mut next = **current;
            edit(&mut next);
            next
        });
    }

    /// Restore the library defaults.
    pub fn reset_default() {
        Self::set_default(Appearance::default());
    }
}
