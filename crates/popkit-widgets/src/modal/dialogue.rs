#![forbid(unsafe_code)]

//! Dialogues: a navigation bar with cancel and confirm over a content view.
//!
//! ```text
//! ┌──────────┬──────────────────┬──────────┐
//! │ Cancel   │      Title       │  Choose  │  nav bar
//! ├──────────┴──────────────────┴──────────┤
//! │               content                  │
//! └────────────────────────────────────────┘
//! ```
//!
//! Confirm asks the content for its payload through a
//! [`ConfirmedDataProvider`] supplied at construction. Content without a
//! provider turns confirm into cancel.

use std::fmt;

use popkit_core::color::PackedRgba;
use popkit_core::layout::{Attribute, Constraint, LayoutBinding};
use popkit_core::view::{TextAlign, TextContent, ViewId, ViewNode, ViewTree};

use super::appearance::{AnimationAppearance, Appearance, DialogueAppearance, PopupAppearance};
use super::content::{ContentAdapter, ContentView, InstallContext, PopupCommand, PopupInfo};
use super::popup::{Popup, PopupAction};
use crate::text::Font;

/// Default cancel button text.
pub const DEFAULT_CANCEL_TEXT: &str = "Cancel";

/// Default confirm button text.
pub const DEFAULT_CONFIRM_TEXT: &str = "Choose";

/// Supplies the payload handed to the positive action on confirm.
pub trait ConfirmedDataProvider {
    fn prepare_confirmed_data(&self) -> Option<PopupInfo>;
}

impl<F> ConfirmedDataProvider for F
where
    F: Fn() -> Option<PopupInfo>,
{
    fn prepare_confirmed_data(&self) -> Option<PopupInfo> {
        self()
    }
}

/// Dialogue content and its optional confirm capability.
pub enum ContentKind {
    /// Content without a payload; confirm acts as cancel.
    Plain(Box<dyn ContentView>),
    /// Content that produces a payload on confirm.
    ConfirmCapable(Box<dyn ContentView>, Box<dyn ConfirmedDataProvider>),
}

impl fmt::Debug for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Plain(..)"),
            Self::ConfirmCapable(..) => f.write_str("ConfirmCapable(..)"),
        }
    }
}

impl ContentKind {
    pub fn plain(view: impl ContentView + 'static) -> Self {
        Self::Plain(Box::new(view))
    }

    pub fn confirm_capable(
        view: impl ContentView + 'static,
        provider: impl ConfirmedDataProvider + 'static,
    ) -> Self {
        Self::ConfirmCapable(Box::new(view), Box::new(provider))
    }

    fn view_mut(&mut self) -> &mut dyn ContentView {
        match self {
            Self::Plain(view) | Self::ConfirmCapable(view, _) => view.as_mut(),
        }
    }

    /// Command produced by the confirm button.
    pub fn confirm_command(&self) -> PopupCommand {
        match self {
            Self::ConfirmCapable(_, provider) => {
                PopupCommand::Positive(provider.prepare_confirmed_data())
            }
            Self::Plain(_) => PopupCommand::Negative(None),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct NavBarViews {
    bar: ViewId,
    cancel: ViewId,
    confirm: ViewId,
}

fn text(text: &str, font: Font, color: PackedRgba) -> TextContent {
    TextContent {
        text: text.to_owned(),
        font_size: font.size,
        bold: font.bold,
        color,
        align: TextAlign::Center,
    }
}

struct DialogueContent {
    title: String,
    cancel_text: String,
    confirm_text: String,
    look: DialogueAppearance,
    content: Option<ContentKind>,
    nav: Option<NavBarViews>,
}

impl DialogueContent {
    fn install_nav_bar(
        &self,
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
    ) -> Option<NavBarViews> {
        let look = &self.look;
        let bar = tree.add_subview(
            parent,
            ViewNode::new("dialogue.nav_bar").background(look.nav_bar_background_color),
        )?;
        layout.bind(Constraint::equal(bar, Attribute::Leading, parent));
        layout.bind(Constraint::equal(bar, Attribute::Trailing, parent));
        layout.bind(Constraint::equal(bar, Attribute::Top, parent));
        layout.bind(Constraint::fixed(bar, Attribute::Height, look.nav_bar_height));

        let cancel = tree.add_subview(
            bar,
            ViewNode::new("dialogue.cancel")
                .interactive()
                .text(text(&self.cancel_text, look.button_font, look.cancel_title_color)),
        )?;
        layout.bind(Constraint::equal(cancel, Attribute::Leading, bar));
        layout.bind(Constraint::equal(cancel, Attribute::Top, bar));
        layout.bind(Constraint::equal(cancel, Attribute::Bottom, bar));
        layout.bind(Constraint::equal(cancel, Attribute::Width, bar).multiplier(look.button_width_fraction));

        let confirm = tree.add_subview(
            bar,
            ViewNode::new("dialogue.confirm")
                .interactive()
                .text(text(&self.confirm_text, look.button_font, look.confirm_title_color)),
        )?;
        layout.bind(Constraint::equal(confirm, Attribute::Trailing, bar));
        layout.bind(Constraint::equal(confirm, Attribute::Top, bar));
        layout.bind(Constraint::equal(confirm, Attribute::Bottom, bar));
        layout.bind(Constraint::equal(confirm, Attribute::Width, bar).multiplier(look.button_width_fraction));

        let title = tree.add_subview(
            bar,
            ViewNode::new("dialogue.title").text(text(&self.title, look.title_font, look.title_color)),
        )?;
        layout.bind(Constraint::new(title, Attribute::Leading, cancel, Attribute::Trailing));
        layout.bind(Constraint::new(title, Attribute::Trailing, confirm, Attribute::Leading));
        layout.bind(Constraint::equal(title, Attribute::Top, bar));
        layout.bind(Constraint::equal(title, Attribute::Bottom, bar));

        let separator = tree.add_subview(
            bar,
            ViewNode::new("dialogue.separator").background(look.separator_color),
        )?;
        layout.bind(Constraint::equal(separator, Attribute::Leading, bar));
        layout.bind(Constraint::equal(separator, Attribute::Trailing, bar));
        layout.bind(Constraint::equal(separator, Attribute::Bottom, bar));
        layout.bind(Constraint::fixed(separator, Attribute::Height, 1.0));

        Some(NavBarViews {
            bar,
            cancel,
            confirm,
        })
    }
}

impl ContentAdapter for DialogueContent {
    fn install(&mut self, ctx: InstallContext<'_>) {
        let InstallContext {
            tree, layout, parent, ..
        } = ctx;
        self.nav = self.install_nav_bar(tree, layout, parent);
        let (Some(nav), Some(content)) = (self.nav, self.content.as_mut()) else {
            return;
        };
        if let Some(body) = content.view_mut().install(tree, layout, parent) {
            layout.bind(Constraint::equal(body, Attribute::Leading, parent));
            layout.bind(Constraint::equal(body, Attribute::Trailing, parent));
            layout.bind(Constraint::new(body, Attribute::Top, nav.bar, Attribute::Bottom));
            layout.bind(Constraint::equal(body, Attribute::Bottom, parent));
        }
    }

    fn tap(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand> {
        let nav = self.nav?;
        if view == nav.cancel {
            tracing::debug!(title = %self.title, "dialogue cancel");
            return Some(PopupCommand::Negative(None));
        }
        if view == nav.confirm {
            let command = match &self.content {
                Some(content) => content.confirm_command(),
                None => PopupCommand::Negative(None),
            };
            tracing::debug!(
                title = %self.title,
                positive = matches!(command, PopupCommand::Positive(_)),
                "dialogue confirm"
            );
            return Some(command);
        }
        self.content.as_mut()?.view_mut().tap(tree, view)
    }
}

/// Dialogue builder.
pub struct Dialogue {
    title: String,
    content: Option<ContentKind>,
    cancel_text: String,
    confirm_text: String,
    appearance: PopupAppearance,
    animation: AnimationAppearance,
    dialogue: DialogueAppearance,
    positive_action: Option<PopupAction>,
    negative_action: Option<PopupAction>,
}

impl fmt::Debug for Dialogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialogue")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("cancel_text", &self.cancel_text)
            .field("confirm_text", &self.confirm_text)
            .finish_non_exhaustive()
    }
}

impl Dialogue {
    /// Dialogue with the process-wide default appearance.
    pub fn new(title: impl Into<String>, content: Option<ContentKind>) -> Self {
        Self::with_appearance(&Appearance::current(), title, content)
    }

    pub fn with_appearance(
        appearance: &Appearance,
        title: impl Into<String>,
        content: Option<ContentKind>,
    ) -> Self {
        Self {
            title: title.into(),
            content,
            cancel_text: DEFAULT_CANCEL_TEXT.to_owned(),
            confirm_text: DEFAULT_CONFIRM_TEXT.to_owned(),
            appearance: appearance.popup,
            animation: appearance.animation,
            dialogue: appearance.dialogue,
            positive_action: None,
            negative_action: None,
        }
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn positive_action(mut self, action: impl FnOnce(Option<PopupInfo>) + 'static) -> Self {
        self.positive_action = Some(Box::new(action));
        self
    }

    pub fn negative_action(mut self, action: impl FnOnce(Option<PopupInfo>) + 'static) -> Self {
        self.negative_action = Some(Box::new(action));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn appearance_mut(&mut self) -> &mut PopupAppearance {
        &mut self.appearance
    }

    pub fn animation_appearance_mut(&mut self) -> &mut AnimationAppearance {
        &mut self.animation
    }

    pub fn dialogue_appearance_mut(&mut self) -> &mut DialogueAppearance {
        &mut self.dialogue
    }

    /// Turn the dialogue into a presentable popup.
    pub fn into_popup(self) -> Popup {
        let content = DialogueContent {
            title: self.title,
            cancel_text: self.cancel_text,
            confirm_text: self.confirm_text,
            look: self.dialogue,
            content: self.content,
            nav: None,
        };
        Popup::from_parts(self.appearance, self.animation, Some(Box::new(content)))
            .actions(self.positive_action, self.negative_action)
    }
}
