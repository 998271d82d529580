#![forbid(unsafe_code)]

//! Content plumbing between a popup and what it shows.
//!
//! Content never looks up its owning popup. Instead, a tap handler returns a
//! [`PopupCommand`] and the popup routes it into its negative or positive
//! action path.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use popkit_core::color::PackedRgba;
use popkit_core::geometry::{Insets, Size};
use popkit_core::layout::{LayoutBinding, bind_fill};
use popkit_core::view::{TextContent, ViewId, ViewNode, ViewTree};

use super::appearance::PopupAppearance;

/// Payload handed to action callbacks.
#[derive(Debug, Clone)]
pub enum PopupInfo {
    /// An alert option: its position in the option list and its title.
    Selection { index: usize, title: String },
    /// A picked date and time.
    Date(NaiveDateTime),
    /// One selected title per picker component.
    Options(Vec<String>),
    /// Free-form text.
    Text(String),
    /// Anything else.
    Custom(Rc<dyn Any>),
}

/// Request from content to its popup.
#[derive(Debug, Clone)]
pub enum PopupCommand {
    /// Route into the negative action path.
    Negative(Option<PopupInfo>),
    /// Route into the positive action path.
    Positive(Option<PopupInfo>),
}

/// Everything content needs while it builds its views.
pub struct InstallContext<'a> {
    pub tree: &'a mut ViewTree,
    pub layout: &'a mut dyn LayoutBinding,
    /// The plain container; content views go inside it.
    pub parent: ViewId,
    pub host_size: Size,
    /// The popup's appearance. Content may adjust sizing before first layout.
    pub appearance: &'a mut PopupAppearance,
}

impl fmt::Debug for InstallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallContext")
            .field("parent", &self.parent)
            .field("host_size", &self.host_size)
            .finish_non_exhaustive()
    }
}

/// Variant-specific content of a popup (alert buttons, dialogue nav bar, or
/// a plain view).
pub trait ContentAdapter {
    /// Build views inside `ctx.parent`.
    fn install(&mut self, ctx: InstallContext<'_>);

    /// React to a tap that landed on `view`.
    fn tap(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand>;
}

/// A caller-supplied view hierarchy.
pub trait ContentView {
    /// Create the view's root under `parent` and return it.
    ///
    /// The caller sizes the returned root; the implementation lays out
    /// anything below it.
    fn install(
        &mut self,
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
    ) -> Option<ViewId>;

    /// React to a tap on one of this view's descendants.
    fn tap(&mut self, _tree: &mut ViewTree, _view: ViewId) -> Option<PopupCommand> {
        None
    }
}

/// Adapts a [`ContentView`] into a popup by filling the container with it.
#[derive(Debug, Clone)]
pub struct ViewContent<V> {
    view: V,
    root: Option<ViewId>,
}

impl<V> ViewContent<V> {
    pub fn new(view: V) -> Self {
        Self { view, root: None }
    }

    /// Root view once installed.
    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn inner(&self) -> &V {
        &self.view
    }
}

impl<V: ContentView> ContentAdapter for ViewContent<V> {
    fn install(&mut self, ctx: InstallContext<'_>) {
        self.root = self.view.install(&mut *ctx.tree, &mut *ctx.layout, ctx.parent);
        if let Some(root) = self.root {
            bind_fill(ctx.layout, root, ctx.parent, Insets::ZERO);
        }
    }

    fn tap(&mut self, tree: &mut ViewTree, view: ViewId) -> Option<PopupCommand> {
        self.view.tap(tree, view)
    }
}

/// A solid-colored view with optional centered text.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidView {
    color: PackedRgba,
    text: Option<TextContent>,
}

impl SolidView {
    pub fn new(color: PackedRgba) -> Self {
        Self { color, text: None }
    }

    pub fn text(mut self, text: TextContent) -> Self {
        self.text = Some(text);
        self
    }
}

impl ContentView for SolidView {
    fn install(
        &mut self,
        tree: &mut ViewTree,
        _layout: &mut dyn LayoutBinding,
        parent: ViewId,
    ) -> Option<ViewId> {
        let mut node = ViewNode::new("content.solid").background(self.color);
        node.text = self.text.clone();
        tree.add_subview(parent, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popkit_core::geometry::Rect;
    use popkit_core::layout::ConstraintSet;

    #[test]
    fn view_content_fills_parent() {
        let mut tree = ViewTree::new();
        let parent = tree.create(ViewNode::new("parent").frame(Rect::new(0.0, 0.0, 100.0, 60.0)));
        let mut layout = ConstraintSet::new();
        let mut appearance = PopupAppearance::default();
        let mut content = ViewContent::new(SolidView::new(PackedRgba::BLACK));
        content.install(InstallContext {
            tree: &mut tree,
            layout: &mut layout,
            parent,
            host_size: Size::new(100.0, 60.0),
            appearance: &mut appearance,
        });
        let root = content.root().unwrap();
        layout.solve(&mut tree, parent);
        assert!(tree.get(root).unwrap().frame.approx_eq(Rect::new(0.0, 0.0, 100.0, 60.0)));
        assert_eq!(tree.get(root).unwrap().background, PackedRgba::BLACK);
        assert!(content.tap(&mut tree, root).is_none());
    }
}
