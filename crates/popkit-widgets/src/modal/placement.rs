#![forbid(unsafe_code)]

//! Container placement.
//!
//! Turns a [`PopupAppearance`] into the four constraints that pin the outer
//! (shadow) container inside the popup's full-screen view:
//!
//! | anchor | horizontal | vertical |
//! |---|---|---|
//! | `Center` | centerX | centerY |
//! | `Left` | leading + `padding.left` | centerY |
//! | `Right` | trailing - `padding.right` | centerY |
//! | `Top` | centerX | top + `padding.top` + status bar inset |
//! | `Bottom` | centerX | bottom - `padding.bottom` |
//!
//! Width and height are `multiplier * host`. Only the size pair is rebuilt
//! on host size changes; the anchor pair keeps its original constants.

use popkit_core::geometry::{Rect, Size};
use popkit_core::layout::{Attribute, Constraint, ConstraintId, LayoutBinding};
use popkit_core::view::ViewId;

use super::appearance::{AttachedPosition, PopupAppearance};

/// Horizontal anchor constraint for `container` inside `host`.
pub fn horizontal_constraint(container: ViewId, host: ViewId, appearance: &PopupAppearance) -> Constraint {
    match appearance.view_attached_position {
        AttachedPosition::Center | AttachedPosition::Top | AttachedPosition::Bottom => {
            Constraint::equal(container, Attribute::CenterX, host)
        }
        AttachedPosition::Left => Constraint::equal(container, Attribute::Leading, host)
            .constant(appearance.container_padding.left),
        AttachedPosition::Right => Constraint::equal(container, Attribute::Trailing, host)
            .constant(-appearance.container_padding.right),
    }
}

/// Vertical anchor constraint for `container` inside `host`.
pub fn vertical_constraint(container: ViewId, host: ViewId, appearance: &PopupAppearance) -> Constraint {
    match appearance.view_attached_position {
        AttachedPosition::Center | AttachedPosition::Left | AttachedPosition::Right => {
            Constraint::equal(container, Attribute::CenterY, host)
        }
        AttachedPosition::Top => Constraint::equal(container, Attribute::Top, host)
            .constant(appearance.container_padding.top + appearance.status_bar_inset),
        AttachedPosition::Bottom => Constraint::equal(container, Attribute::Bottom, host)
            .constant(-appearance.container_padding.bottom),
    }
}

pub fn width_constraint(container: ViewId, host: ViewId, appearance: &PopupAppearance) -> Constraint {
    Constraint::equal(container, Attribute::Width, host).multiplier(appearance.width_multiplier)
}

pub fn height_constraint(container: ViewId, host: ViewId, appearance: &PopupAppearance) -> Constraint {
    Constraint::equal(container, Attribute::Height, host).multiplier(appearance.height_multiplier)
}

/// Handles of the four bound placement constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConstraints {
    pub horizontal: ConstraintId,
    pub vertical: ConstraintId,
    pub width: ConstraintId,
    pub height: ConstraintId,
}

impl ContainerConstraints {
    /// Bind all four placement constraints.
    pub fn bind(
        layout: &mut dyn LayoutBinding,
        container: ViewId,
        host: ViewId,
        appearance: &PopupAppearance,
    ) -> Self {
        Self {
            horizontal: layout.bind(horizontal_constraint(container, host, appearance)),
            vertical: layout.bind(vertical_constraint(container, host, appearance)),
            width: layout.bind(width_constraint(container, host, appearance)),
            height: layout.bind(height_constraint(container, host, appearance)),
        }
    }

    /// Discard and rebuild the width and height constraints.
    pub fn rebind_size(
        &mut self,
        layout: &mut dyn LayoutBinding,
        container: ViewId,
        host: ViewId,
        appearance: &PopupAppearance,
    ) {
        layout.unbind(self.width);
        layout.unbind(self.height);
        self.width = layout.bind(width_constraint(container, host, appearance));
        self.height = layout.bind(height_constraint(container, host, appearance));
    }
}

/// Frame the constraints above resolve to for a host of `host` size.
pub fn resolve_frame(appearance: &PopupAppearance, host: Size) -> Rect {
    let width = appearance.popup_width(host.width);
    let height = appearance.popup_height(host.height);
    let pad = appearance.container_padding;
    let centered_x = (host.width - width) / 2.0;
    let centered_y = (host.height - height) / 2.0;
    let (x, y) = match appearance.view_attached_position {
        AttachedPosition::Center => (centered_x, centered_y),
        AttachedPosition::Left => (pad.left, centered_y),
        AttachedPosition::Right => (host.width - pad.right - width, centered_y),
        AttachedPosition::Top => (centered_x, pad.top + appearance.status_bar_inset),
        AttachedPosition::Bottom => (centered_x, host.height - pad.bottom - height),
    };
    Rect::new(x, y, width, height)
}
