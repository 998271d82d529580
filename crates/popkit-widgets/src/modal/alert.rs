#![forbid(unsafe_code)]

//! Alert views and action sheets.
//!
//! [`AlertController`] builds a title, an optional message, and one button
//! per option (cancel first) inside a popup container. The container height
//! is derived from the measured text and the button layout before the first
//! layout pass, unless a fixed height is already configured.
//!
//! # Button layouts
//!
//! - [`StackedButtons`]: full-width rows stacked bottom-to-top in button
//!   order, so the cancel button sits at the bottom.
//! - [`PairedButtons`]: one cancel and one confirm button sharing a single
//!   row. Only used by alert views with exactly those two buttons.
//!
//! # Invariants
//!
//! - `has_cancel_button() == cancel_title().is_some()`.
//! - `alert_buttons().len() == item_options().len() + has_cancel_button() as usize`.

use std::fmt;

use popkit_core::color::PackedRgba;
use popkit_core::geometry::Size;
use popkit_core::layout::{Attribute, Constraint, LayoutBinding};
use popkit_core::view::{TextAlign, TextContent, ViewId, ViewNode, ViewTree};

use super::appearance::{
    AlertAppearance, AnimationAppearance, Appearance, AttachedPosition, PopupAppearance,
    TransitionDirection, TransitionStyle,
};
use super::content::{ContentAdapter, InstallContext, PopupCommand, PopupInfo};
use super::popup::Popup;
use crate::text::{ApproxMeasure, Font, TextMeasure};

/// Fixed container width of alert views.
pub const ALERT_VIEW_WIDTH: f64 = 275.0;

/// Action sheet width as a fraction of the host's shorter side.
pub const ACTION_SHEET_WIDTH_FRACTION: f64 = 0.95;

/// Gap between an action sheet and the bottom edge of the host.
pub const ACTION_SHEET_BOTTOM_PADDING: f64 = 8.0;

/// Thickness of button separators.
pub const SEPARATOR_THICKNESS: f64 = 1.0;

/// Presentation style of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertStyle {
    /// Centered box that zooms in.
    AlertView,
    /// Bottom-anchored sheet that slides up.
    ActionSheet,
}

/// Role of an alert button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertButtonStyle {
    Plain,
    Cancel,
}

/// One alert button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertButton {
    pub style: AlertButtonStyle,
    pub title: String,
    /// Position in the option list; `None` for the cancel button.
    pub option_index: Option<usize>,
}

impl AlertButton {
    pub fn cancel(title: impl Into<String>) -> Self {
        Self {
            style: AlertButtonStyle::Cancel,
            title: title.into(),
            option_index: None,
        }
    }

    pub fn option(index: usize, title: impl Into<String>) -> Self {
        Self {
            style: AlertButtonStyle::Plain,
            title: title.into(),
            option_index: Some(index),
        }
    }

    #[inline]
    pub fn is_cancel(&self) -> bool {
        self.style == AlertButtonStyle::Cancel
    }
}

/// Build the button list: cancel first, then one plain button per option.
pub fn alert_buttons(cancel_title: Option<&str>, options: &[String]) -> Vec<AlertButton> {
    cancel_title
        .map(AlertButton::cancel)
        .into_iter()
        .chain(
            options
                .iter()
                .enumerate()
                .map(|(i, title)| AlertButton::option(i, title.as_str())),
        )
        .collect()
}

/// Places alert buttons inside the content area.
pub trait ButtonLayoutPolicy {
    /// Total height taken by `count` buttons of `button_height`.
    fn buttons_height(&self, count: usize, button_height: f64) -> f64;

    /// Bind frames for `buttons` (in button order) inside `parent`.
    fn bind(
        &self,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
        buttons: &[ViewId],
        button_height: f64,
    );

    /// Whether the button at `index` draws a separator on its trailing edge.
    fn trailing_separator(&self, _index: usize, _count: usize) -> bool {
        false
    }
}

/// Full-width rows, bottom-to-top.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackedButtons;

impl ButtonLayoutPolicy for StackedButtons {
    fn buttons_height(&self, count: usize, button_height: f64) -> f64 {
        count as f64 * button_height
    }

    fn bind(
        &self,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
        buttons: &[ViewId],
        button_height: f64,
    ) {
        for (i, &button) in buttons.iter().enumerate() {
            layout.bind(Constraint::equal(button, Attribute::Leading, parent));
            layout.bind(Constraint::equal(button, Attribute::Trailing, parent));
            layout.bind(
                Constraint::equal(button, Attribute::Bottom, parent)
                    .constant(-(i as f64) * button_height),
            );
            layout.bind(Constraint::fixed(button, Attribute::Height, button_height));
        }
    }
}

/// Cancel and confirm side by side in one row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairedButtons;

impl ButtonLayoutPolicy for PairedButtons {
    fn buttons_height(&self, count: usize, button_height: f64) -> f64 {
        if count == 0 { 0.0 } else { button_height }
    }

    fn bind(
        &self,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
        buttons: &[ViewId],
        button_height: f64,
    ) {
        let Some((&anchor, rest)) = buttons.split_first() else {
            return;
        };
        layout.bind(Constraint::equal(anchor, Attribute::Leading, parent));
        layout.bind(Constraint::equal(anchor, Attribute::Bottom, parent));
        layout.bind(Constraint::equal(anchor, Attribute::Width, parent).multiplier(0.5));
        layout.bind(Constraint::fixed(anchor, Attribute::Height, button_height));
        for &button in rest {
            layout.bind(Constraint::new(
                button,
                Attribute::Leading,
                anchor,
                Attribute::Trailing,
            ));
            layout.bind(Constraint::equal(button, Attribute::Trailing, parent));
            layout.bind(Constraint::equal(button, Attribute::Bottom, parent));
            layout.bind(Constraint::fixed(button, Attribute::Height, button_height));
        }
    }

    fn trailing_separator(&self, index: usize, count: usize) -> bool {
        index == 0 && count > 1
    }
}

/// Which [`ButtonLayoutPolicy`] an alert uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonLayout {
    Stacked,
    Paired,
}

impl ButtonLayout {
    /// Paired only for an alert view with a cancel and exactly one option.
    pub fn select(style: AlertStyle, has_cancel: bool, count: usize) -> Self {
        if style == AlertStyle::AlertView && has_cancel && count == 2 {
            Self::Paired
        } else {
            Self::Stacked
        }
    }

    pub fn policy(self) -> &'static dyn ButtonLayoutPolicy {
        match self {
            Self::Stacked => &StackedButtons,
            Self::Paired => &PairedButtons,
        }
    }
}

/// Text, buttons, and measurement shared by the controller and its content.
struct AlertBody {
    style: AlertStyle,
    title: String,
    message: Option<String>,
    buttons: Vec<AlertButton>,
    alert: AlertAppearance,
    measure: Box<dyn TextMeasure>,
}

impl AlertBody {
    fn has_cancel(&self) -> bool {
        self.buttons.first().is_some_and(AlertButton::is_cancel)
    }

    fn button_layout(&self) -> ButtonLayout {
        ButtonLayout::select(self.style, self.has_cancel(), self.buttons.len())
    }

    fn buttons_height(&self) -> f64 {
        self.button_layout()
            .policy()
            .buttons_height(self.buttons.len(), self.alert.alert_button_height)
    }

    /// Apply host-dependent sizing. Action sheets take their width from the
    /// host's shorter side.
    fn fit(&self, appearance: &mut PopupAppearance, host: Size) {
        if self.style == AlertStyle::ActionSheet {
            appearance.fixed_width = ACTION_SHEET_WIDTH_FRACTION * host.min_dimension();
        }
    }

    /// Width available to text once fixed sizes that fit the host apply.
    fn text_width(&self, appearance: &PopupAppearance, host: Size) -> f64 {
        let mut resolved = *appearance;
        resolved.apply_fixed_size(host);
        (resolved.popup_width(host.width) - 2.0 * self.alert.horizontal_space).max(0.0)
    }

    fn title_height(&self, width: f64) -> f64 {
        self.measure
            .measure(&self.title, self.alert.title_font, width)
            .height
    }

    fn message_height(&self, width: f64) -> Option<f64> {
        self.message
            .as_deref()
            .map(|m| self.measure.measure(m, self.alert.message_font, width).height)
    }

    fn required_height(&self, appearance: &PopupAppearance, host: Size) -> f64 {
        let a = &self.alert;
        let width = self.text_width(appearance, host);
        let message = self
            .message_height(width)
            .map_or(0.0, |h| a.vertical_space_title_message + h);
        a.vertical_space_title_top
            + self.title_height(width)
            + message
            + a.vertical_space_message_buttons
            + self.buttons_height()
    }
}

fn label(text: &str, font: Font, color: PackedRgba) -> TextContent {
    TextContent {
        text: text.to_owned(),
        font_size: font.size,
        bold: font.bold,
        color,
        align: TextAlign::Center,
    }
}

/// Alert views installed into a popup container.
struct AlertContent {
    body: AlertBody,
    button_views: Vec<ViewId>,
}

impl AlertContent {
    fn install_separator(
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        button: ViewId,
        alert: &AlertAppearance,
        trailing: bool,
    ) {
        let node = ViewNode::new("alert.separator").background(alert.separator_color);
        let Some(separator) = tree.add_subview(button, node) else {
            return;
        };
        if trailing {
            layout.bind(Constraint::equal(separator, Attribute::Trailing, button));
            layout.bind(Constraint::equal(separator, Attribute::Top, button));
            layout.bind(Constraint::equal(separator, Attribute::Bottom, button));
            layout.bind(Constraint::fixed(separator, Attribute::Width, SEPARATOR_THICKNESS));
        } else {
            layout.bind(Constraint::equal(separator, Attribute::Leading, button));
            layout.bind(Constraint::equal(separator, Attribute::Trailing, button));
            layout.bind(Constraint::equal(separator, Attribute::Top, button));
            layout.bind(Constraint::fixed(separator, Attribute::Height, SEPARATOR_THICKNESS));
        }
    }
}

impl ContentAdapter for AlertContent {
    fn install(&mut self, ctx: InstallContext<'_>) {
        let InstallContext {
            tree,
            layout,
            parent,
            host_size,
            appearance,
        } = ctx;
        let body = &self.body;
        let a = body.alert;
        body.fit(appearance, host_size);
        let width = body.text_width(appearance, host_size);

        let title_height = body.title_height(width);
        let title_node = ViewNode::new("alert.title").text(label(&body.title, a.title_font, a.title_color));
        let Some(title) = tree.add_subview(parent, title_node) else {
            return;
        };
        layout.bind(Constraint::equal(title, Attribute::Leading, parent).constant(a.horizontal_space));
        layout.bind(Constraint::equal(title, Attribute::Trailing, parent).constant(-a.horizontal_space));
        layout.bind(Constraint::equal(title, Attribute::Top, parent).constant(a.vertical_space_title_top));
        layout.bind(Constraint::fixed(title, Attribute::Height, title_height));

        if let (Some(text), Some(height)) = (body.message.as_deref(), body.message_height(width)) {
            let node = ViewNode::new("alert.message").text(label(text, a.message_font, a.message_color));
            if let Some(message) = tree.add_subview(parent, node) {
                layout.bind(Constraint::equal(message, Attribute::Leading, parent).constant(a.horizontal_space));
                layout.bind(Constraint::equal(message, Attribute::Trailing, parent).constant(-a.horizontal_space));
                layout.bind(
                    Constraint::new(message, Attribute::Top, title, Attribute::Bottom)
                        .constant(a.vertical_space_title_message),
                );
                layout.bind(Constraint::fixed(message, Attribute::Height, height));
            }
        }

        let policy = body.button_layout().policy();
        let count = body.buttons.len();
        self.button_views.clear();
        for (index, button) in body.buttons.iter().enumerate() {
            let look = if button.is_cancel() { a.cancel_button } else { a.plain_button };
            let node = ViewNode::new("alert.button")
                .background(look.background_color)
                .interactive()
                .text(label(&button.title, look.font, look.title_color));
            let Some(view) = tree.add_subview(parent, node) else {
                continue;
            };
            if a.enable_button_separator {
                Self::install_separator(tree, layout, view, &a, false);
                if policy.trailing_separator(index, count) {
                    Self::install_separator(tree, layout, view, &a, true);
                }
            }
            self.button_views.push(view);
        }
        policy.bind(layout, parent, &self.button_views, a.alert_button_height);

        if appearance.fixed_height == 0.0 {
            appearance.fixed_height = body.required_height(appearance, host_size);
        }
        tracing::debug!(
            style = ?body.style,
            buttons = count,
            layout = ?body.button_layout(),
            width = appearance.fixed_width,
            height = appearance.fixed_height,
            "alert content installed"
        );
    }

    fn tap(&mut self, _tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand> {
        let index = self.button_views.iter().position(|&v| v == view)?;
        let button = self.body.buttons.get(index)?;
        match (button.style, button.option_index) {
            (AlertButtonStyle::Cancel, _) | (AlertButtonStyle::Plain, None) => {
                Some(PopupCommand::Negative(None))
            }
            (AlertButtonStyle::Plain, Some(index)) => {
                Some(PopupCommand::Positive(Some(PopupInfo::Selection {
                    index,
                    title: button.title.clone(),
                })))
            }
        }
    }
}

/// Alert view or action sheet builder.
pub struct AlertController {
    body: AlertBody,
    cancel_title: Option<String>,
    item_options: Vec<String>,
    appearance: PopupAppearance,
    animation: AnimationAppearance,
    canceled_action: Option<Box<dyn FnOnce()>>,
    confirmed_action: Option<Box<dyn FnOnce(usize, String)>>,
}

impl fmt::Debug for AlertController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertController")
            .field("style", &self.body.style)
            .field("title", &self.body.title)
            .field("message", &self.body.message)
            .field("cancel_title", &self.cancel_title)
            .field("item_options", &self.item_options)
            .finish_non_exhaustive()
    }
}

impl AlertController {
    /// Alert with the process-wide default appearance.
    pub fn new<I>(
        style: AlertStyle,
        title: impl Into<String>,
        message: Option<&str>,
        dismiss: Option<&str>,
        options: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::with_appearance(&Appearance::current(), style, title, message, dismiss, options)
    }

    /// Alert with an explicit appearance. Style-specific geometry and
    /// transition settings override the corresponding fields.
    pub fn with_appearance<I>(
        appearance: &Appearance,
        style: AlertStyle,
        title: impl Into<String>,
        message: Option<&str>,
        dismiss: Option<&str>,
        options: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut popup = appearance.popup;
        let mut animation = appearance.animation;
        let mut alert = appearance.alert;
        match style {
            AlertStyle::AlertView => {
                popup.view_attached_position = AttachedPosition::Center;
                popup.fixed_width = ALERT_VIEW_WIDTH;
                animation.transition_style = TransitionStyle::Zoom;
                animation.transition_direction = TransitionDirection::Center;
            }
            AlertStyle::ActionSheet => {
                popup.view_attached_position = AttachedPosition::Bottom;
                popup.container_padding.bottom = ACTION_SHEET_BOTTOM_PADDING;
                alert.message_font = Font::regular(12.0);
                animation.transition_style = TransitionStyle::Plain;
                animation.transition_direction = TransitionDirection::BottomToTop;
                animation.transition_in_duration = std::time::Duration::from_millis(300);
                animation.transition_out_duration = std::time::Duration::from_millis(150);
            }
        }
        let item_options: Vec<String> = options.into_iter().map(Into::into).collect();
        let cancel_title = dismiss.map(str::to_owned);
        let buttons = alert_buttons(cancel_title.as_deref(), &item_options);
        Self {
            body: AlertBody {
                style,
                title: title.into(),
                message: message.map(str::to_owned),
                buttons,
                alert,
                measure: Box::new(ApproxMeasure),
            },
            cancel_title,
            item_options,
            appearance: popup,
            animation,
            canceled_action: None,
            confirmed_action: None,
        }
    }

    /// Alert view with a single dismiss button.
    pub fn alert_view(title: impl Into<String>, message: Option<&str>, dismiss: Option<&str>) -> Self {
        Self::new(AlertStyle::AlertView, title, message, dismiss, Vec::<String>::new())
    }

    /// Alert view with cancel and confirm side by side.
    pub fn alert_view_confirm(
        title: impl Into<String>,
        message: Option<&str>,
        cancel: &str,
        confirm: &str,
    ) -> Self {
        Self::new(AlertStyle::AlertView, title, message, Some(cancel), [confirm])
    }

    /// Bottom action sheet.
    pub fn action_sheet<I>(
        title: impl Into<String>,
        message: Option<&str>,
        dismiss: Option<&str>,
        options: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(AlertStyle::ActionSheet, title, message, dismiss, options)
    }

    /// Replace the text measurement used for auto-sizing.
    pub fn text_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.body.measure = Box::new(measure);
        self
    }

    /// Called when the cancel button (or a tap outside) dismisses the alert.
    pub fn on_canceled(mut self, action: impl FnOnce() + 'static) -> Self {
        self.canceled_action = Some(Box::new(action));
        self
    }

    /// Called with the option index and title of the tapped button.
    pub fn on_confirmed(mut self, action: impl FnOnce(usize, String) + 'static) -> Self {
        self.confirmed_action = Some(Box::new(action));
        self
    }

    pub fn appearance_mut(&mut self) -> &mut PopupAppearance {
        &mut self.appearance
    }

    pub fn animation_appearance_mut(&mut self) -> &mut AnimationAppearance {
        &mut self.animation
    }

    pub fn alert_appearance_mut(&mut self) -> &mut AlertAppearance {
        &mut self.body.alert
    }

    // --- Queries ---

    #[inline]
    pub fn style(&self) -> AlertStyle {
        self.body.style
    }

    pub fn title_text(&self) -> &str {
        &self.body.title
    }

    pub fn message_text(&self) -> Option<&str> {
        self.body.message.as_deref()
    }

    pub fn cancel_title(&self) -> Option<&str> {
        self.cancel_title.as_deref()
    }

    pub fn item_options(&self) -> &[String] {
        &self.item_options
    }

    pub fn alert_buttons(&self) -> &[AlertButton] {
        &self.body.buttons
    }

    pub fn has_cancel_button(&self) -> bool {
        self.body.has_cancel()
    }

    pub fn button_layout(&self) -> ButtonLayout {
        self.body.button_layout()
    }

    pub fn buttons_height(&self) -> f64 {
        self.body.buttons_height()
    }

    #[inline]
    pub fn appearance(&self) -> &PopupAppearance {
        &self.appearance
    }

    #[inline]
    pub fn animation_appearance(&self) -> &AnimationAppearance {
        &self.animation
    }

    #[inline]
    pub fn alert_appearance(&self) -> &AlertAppearance {
        &self.body.alert
    }

    /// Container height the alert needs in a host of `host` size.
    pub fn required_height(&self, host: Size) -> f64 {
        let mut appearance = self.appearance;
        self.body.fit(&mut appearance, host);
        self.body.required_height(&appearance, host)
    }

    /// Turn the alert into a presentable popup.
    pub fn into_popup(self) -> Popup {
        let Self {
            body,
            appearance,
            animation,
            canceled_action,
            confirmed_action,
            ..
        } = self;
        let content = AlertContent {
            body,
            button_views: Vec::new(),
        };
        Popup::from_parts(appearance, animation, Some(Box::new(content)))
            .negative_action(move |_info| {
                if let Some(action) = canceled_action {
                    action();
                }
            })
            .positive_action(move |info| {
                if let (Some(action), Some(PopupInfo::Selection { index, title })) =
                    (confirmed_action, info)
                {
                    action(index, title);
                }
            })
    }
}
