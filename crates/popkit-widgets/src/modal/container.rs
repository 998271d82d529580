#![forbid(unsafe_code)]

//! Popup container views.
//!
//! A popup draws its content inside two nested boxes:
//! 1) an outer *shadow* container that carries the drop shadow and is what
//!    placement constraints pin, then
//! 2) an inner *plain* container that fills it, paints the background,
//!    border, and rounded corners, and clips the content.
//!
//! Splitting the pair keeps the shadow from being clipped by the content
//! mask. The plain container is interactive so taps on its padding are
//! swallowed instead of reaching the touch receiver behind it.

use popkit_core::geometry::Insets;
use popkit_core::layout::{LayoutBinding, bind_fill};
use popkit_core::view::{Layer, ViewFlags, ViewId, ViewNode, ViewTree};

use super::appearance::PopupAppearance;

/// Which half of the container pair a view plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Outer box with the drop shadow.
    Shadow,
    /// Inner box with background, border, and clipping.
    Plain,
}

impl ContainerKind {
    /// Styled view node for this kind.
    pub fn node(self, appearance: &PopupAppearance) -> ViewNode {
        match self {
            Self::Shadow => ViewNode::new("popup.shadow_container").layer(Layer {
                corner_radius: appearance.corner_radius,
                shadow: appearance.shadow(),
                ..Layer::default()
            }),
            Self::Plain => ViewNode::new("popup.container")
                .background(appearance.container_background_color)
                .layer(appearance.container_layer())
                .flags(ViewFlags::CLIPS_TO_BOUNDS | ViewFlags::INTERACTIVE),
        }
    }
}

/// The installed shadow/plain container pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupContainer {
    shadow: ViewId,
    container: ViewId,
}

impl PopupContainer {
    /// Add the pair on top of `parent`'s children.
    ///
    /// Returns `None` if `parent` is not in `tree`.
    pub fn install(
        tree: &mut ViewTree,
        layout: &mut dyn LayoutBinding,
        parent: ViewId,
        appearance: &PopupAppearance,
    ) -> Option<Self> {
        let shadow = tree.add_subview(parent, ContainerKind::Shadow.node(appearance))?;
        let container = tree.add_subview(shadow, ContainerKind::Plain.node(appearance))?;
        bind_fill(layout, container, shadow, Insets::ZERO);
        Some(Self { shadow, container })
    }

    /// The outer view that placement constraints act on.
    #[inline]
    pub fn shadow(&self) -> ViewId {
        self.shadow
    }

    /// The inner view that hosts content.
    #[inline]
    pub fn container(&self) -> ViewId {
        self.container
    }

    /// Re-apply decoration after the appearance changed.
    pub fn restyle(&self, tree: &mut ViewTree, appearance: &PopupAppearance) {
        for (id, kind) in [(self.shadow, ContainerKind::Shadow), (self.container, ContainerKind::Plain)] {
            let styled = kind.node(appearance);
            if let Some(node) = tree.get_mut(id) {
                node.background = styled.background;
                node.layer = styled.layer;
                node.flags = styled.flags | (node.flags & ViewFlags::HIDDEN);
            }
        }
    }
}
