#![forbid(unsafe_code)]

//! Retained view tree.
//!
//! Views live in an arena owned by [`ViewTree`] and are addressed by
//! [`ViewId`]. Each view's `frame` is expressed in its parent's coordinate
//! space. Children are kept in z-order: the last child is drawn last and is
//! hit-tested first.
//!
//! # Invariants
//!
//! - Ids are never reused within one tree; a removed id stays dead.
//! - A view has at most one parent, and appears exactly once in that
//!   parent's child list.
//! - `flatten` emits views in painter's order (parents before children,
//!   siblings in z-order).
//!
//! # Failure Modes
//!
//! - Operations on a dead or foreign id return `None`/`false` (no panic).
//! - Hidden views, and views with alpha below [`MIN_HIT_ALPHA`], are skipped
//!   by both hit testing and drawing of their subtree.

use bitflags::bitflags;

use crate::color::PackedRgba;
use crate::geometry::{Point, Rect};

/// Views more transparent than this ignore touches.
pub const MIN_HIT_ALPHA: f32 = 0.01;

bitflags! {
    /// Per-view behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ViewFlags: u8 {
        /// Not drawn and not hit-tested (subtree included).
        const HIDDEN = 0b0000_0001;
        /// Receives taps.
        const INTERACTIVE = 0b0000_0010;
        /// Children are clipped to this view's bounds.
        const CLIPS_TO_BOUNDS = 0b0000_0100;
    }
}

/// Handle to a view in a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u32);

impl ViewId {
    /// Raw arena index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Drop shadow drawn behind a view.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shadow {
    pub radius: f64,
    pub opacity: f32,
    pub offset: Point,
    pub color: PackedRgba,
}

/// Decoration of a view's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layer {
    pub corner_radius: f64,
    pub border_width: f64,
    pub border_color: PackedRgba,
    pub shadow: Option<Shadow>,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Leading,
    #[default]
    Center,
    Trailing,
}

/// Text drawn inside a view.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    pub color: PackedRgba,
    pub align: TextAlign,
}

/// A single view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub frame: Rect,
    pub alpha: f32,
    /// Uniform scale applied about the frame center (drawing only).
    pub scale: f64,
    pub background: PackedRgba,
    pub layer: Layer,
    pub flags: ViewFlags,
    pub text: Option<TextContent>,
    /// Free-form debugging name.
    pub name: &'static str,
}

impl Default for ViewNode {
    fn default() -> Self {
        Self {
            frame: Rect::ZERO,
            alpha: 1.0,
            scale: 1.0,
            background: PackedRgba::TRANSPARENT,
            layer: Layer::default(),
            flags: ViewFlags::empty(),
            text: None,
            name: "",
        }
    }
}

impl ViewNode {
    /// A blank, non-interactive view.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn background(mut self, color: PackedRgba) -> Self {
        self.background = color;
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn flags(mut self, flags: ViewFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn interactive(mut self) -> Self {
        self.flags.insert(ViewFlags::INTERACTIVE);
        self
    }

    pub fn text(mut self, text: TextContent) -> Self {
        self.text = Some(text);
        self
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ViewFlags::HIDDEN)
    }
}

/// One view flattened into absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub id: ViewId,
    /// Absolute frame after scale.
    pub frame: Rect,
    /// Alpha multiplied down the ancestor chain.
    pub alpha: f32,
    pub background: PackedRgba,
    pub layer: Layer,
    pub text: Option<TextContent>,
    /// Intersection of every clipping ancestor, if any.
    pub clip: Option<Rect>,
}

#[derive(Debug, Clone)]
struct Slot {
    node: ViewNode,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
}

/// Arena of views.
#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    slots: Vec<Option<Slot>>,
}

/// Maps local coordinates into absolute space: `abs = origin + scale * p`.
#[derive(Debug, Clone, Copy)]
struct Transform {
    origin: Point,
    scale: f64,
}

impl Transform {
    const IDENTITY: Self = Self {
        origin: Point::ZERO,
        scale: 1.0,
    };

    fn apply(self, r: Rect) -> Rect {
        Rect::new(
            self.origin.x + self.scale * r.x,
            self.origin.y + self.scale * r.y,
            self.scale * r.width,
            self.scale * r.height,
        )
    }

    /// Transform for the content of a child with `frame` and `scale`.
    fn child(self, frame: Rect, scale: f64) -> Self {
        let local = Point::new(
            frame.x + frame.width * (1.0 - scale) / 2.0,
            frame.y + frame.height * (1.0 - scale) / 2.0,
        );
        Self {
            origin: Point::new(
                self.origin.x + self.scale * local.x,
                self.origin.y + self.scale * local.y,
            ),
            scale: self.scale * scale,
        }
    }
}

impl ViewTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached view.
    pub fn create(&mut self, node: ViewNode) -> ViewId {
        let id = ViewId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            node,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    /// Create a view on top of `parent`'s existing children.
    pub fn add_subview(&mut self, parent: ViewId, node: ViewNode) -> Option<ViewId> {
        self.slot(parent)?;
        let id = self.create(node);
        self.attach(parent, id, None);
        Some(id)
    }

    /// Create a view directly below `sibling` in `sibling`'s parent.
    pub fn insert_subview_below(&mut self, sibling: ViewId, node: ViewNode) -> Option<ViewId> {
        let parent = self.slot(sibling)?.parent?;
        let index = self.slot(parent)?.children.iter().position(|&c| c == sibling)?;
        let id = self.create(node);
        self.attach(parent, id, Some(index));
        Some(id)
    }

    /// Create a view at z-index `index` within `parent` (clamped to the end).
    pub fn insert_subview_at(
        &mut self,
        parent: ViewId,
        index: usize,
        node: ViewNode,
    ) -> Option<ViewId> {
        let len = self.slot(parent)?.children.len();
        let id = self.create(node);
        self.attach(parent, id, Some(index.min(len)));
        Some(id)
    }

    fn attach(&mut self, parent: ViewId, child: ViewId, index: Option<usize>) {
        if let Some(Some(slot)) = self.slots.get_mut(child.0 as usize) {
            slot.parent = Some(parent);
        }
        if let Some(Some(slot)) = self.slots.get_mut(parent.0 as usize) {
            match index {
                Some(i) => slot.children.insert(i, child),
                None => slot.children.push(child),
            }
        }
    }

    /// Remove a view and its whole subtree. Returns `false` for a dead id.
    pub fn remove(&mut self, id: ViewId) -> bool {
        let Some(parent) = self.slot(id).map(|s| s.parent) else {
            return false;
        };
        if let Some(slot) = parent.and_then(|p| self.slots.get_mut(p.0 as usize)?.as_mut()) {
            slot.children.retain(|&c| c != id);
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(slot) = self.slots.get_mut(next.0 as usize).and_then(Option::take) {
                pending.extend(slot.children);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(view = id.0, "removed view subtree");
        true
    }

    /// Whether `id` refers to a live view.
    pub fn contains(&self, id: ViewId) -> bool {
        self.slot(id).is_some()
    }

    fn slot(&self, id: ViewId) -> Option<&Slot> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.slot(id).map(|s| &s.node)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.slots
            .get_mut(id.0 as usize)?
            .as_mut()
            .map(|s| &mut s.node)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.slot(id)?.parent
    }

    /// Children in z-order (bottom first). Empty for a dead id.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Frame in root coordinates, ignoring scale.
    pub fn absolute_frame(&self, id: ViewId) -> Option<Rect> {
        let mut frame = self.get(id)?.frame;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            let pf = self.get(p)?.frame;
            frame = frame.offset(pf.x, pf.y);
            cursor = self.parent(p);
        }
        Some(frame)
    }

    /// Topmost visible interactive view under `point`.
    ///
    /// `point` is in the coordinate space of `root`'s parent (the same space
    /// as `root.frame`). Scale is ignored.
    pub fn hit_test(&self, root: ViewId, point: Point) -> Option<ViewId> {
        let node = self.get(root)?;
        if node.is_hidden() || node.alpha < MIN_HIT_ALPHA || !node.frame.contains(point) {
            return None;
        }
        let local = point.offset(-node.frame.x, -node.frame.y);
        for &child in self.children(root).iter().rev() {
            if let Some(hit) = self.hit_test(child, local) {
                return Some(hit);
            }
        }
        node.flags.contains(ViewFlags::INTERACTIVE).then_some(root)
    }

    /// Flatten the subtree at `root` into absolute draw commands.
    pub fn flatten(&self, root: ViewId) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        self.flatten_into(root, Transform::IDENTITY, 1.0, None, &mut out);
        out
    }

    fn flatten_into(
        &self,
        id: ViewId,
        parent: Transform,
        parent_alpha: f32,
        clip: Option<Rect>,
        out: &mut Vec<DrawCommand>,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.is_hidden() {
            return;
        }
        let alpha = parent_alpha * node.alpha.clamp(0.0, 1.0);
        let frame = parent.apply(node.frame.scaled_about_center(node.scale));
        out.push(DrawCommand {
            id,
            frame,
            alpha,
            background: node.background,
            layer: node.layer,
            text: node.text.clone(),
            clip,
        });
        let child_clip = if node.flags.contains(ViewFlags::CLIPS_TO_BOUNDS) {
            match clip {
                Some(c) => Some(c.intersection(frame).unwrap_or(Rect::ZERO)),
                None => Some(frame),
            }
        } else {
            clip
        };
        let transform = parent.child(node.frame, node.scale);
        for &child in self.children(id) {
            self.flatten_into(child, transform, alpha, child_clip, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_root() -> (ViewTree, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.create(ViewNode::new("root").frame(Rect::new(0.0, 0.0, 100.0, 100.0)));
        (tree, root)
    }

    #[test]
    fn add_and_remove_subtree() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_subview(root, ViewNode::new("a")).unwrap();
        let b = tree.add_subview(a, ViewNode::new("b")).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.parent(b), Some(a));
        assert!(tree.remove(a));
        assert!(!tree.contains(b));
        assert!(tree.children(root).is_empty());
        assert!(!tree.remove(a));
    }

    #[test]
    fn insert_below_orders_children() {
        let (mut tree, root) = tree_with_root();
        let top = tree.add_subview(root, ViewNode::new("top")).unwrap();
        let below = tree.insert_subview_below(top, ViewNode::new("below")).unwrap();
        assert_eq!(tree.children(root), &[below, top]);
        let first = tree.insert_subview_at(root, 0, ViewNode::new("first")).unwrap();
        assert_eq!(tree.children(root), &[first, below, top]);
    }

    #[test]
    fn insert_below_detached_view_fails() {
        let mut tree = ViewTree::new();
        let lone = tree.create(ViewNode::new("lone"));
        assert!(tree.insert_subview_below(lone, ViewNode::new("x")).is_none());
    }

    #[test]
    fn hit_test_prefers_topmost_interactive() {
        let (mut tree, root) = tree_with_root();
        let back = tree
            .add_subview(root, ViewNode::new("back").frame(Rect::new(0.0, 0.0, 100.0, 100.0)).interactive())
            .unwrap();
        let card = tree
            .add_subview(root, ViewNode::new("card").frame(Rect::new(25.0, 25.0, 50.0, 50.0)).interactive())
            .unwrap();
        let label = tree
            .add_subview(card, ViewNode::new("label").frame(Rect::new(0.0, 0.0, 50.0, 10.0)))
            .unwrap();
        assert_eq!(tree.hit_test(root, Point::new(5.0, 5.0)), Some(back));
        assert_eq!(tree.hit_test(root, Point::new(50.0, 50.0)), Some(card));
        // Non-interactive label falls through to its interactive parent.
        assert_eq!(tree.hit_test(root, Point::new(30.0, 27.0)), Some(card));
        tree.get_mut(label).unwrap().flags.insert(ViewFlags::INTERACTIVE);
        assert_eq!(tree.hit_test(root, Point::new(30.0, 27.0)), Some(label));
    }

    #[test]
    fn hidden_and_transparent_views_ignore_taps() {
        let (mut tree, root) = tree_with_root();
        let v = tree
            .add_subview(root, ViewNode::new("v").frame(Rect::new(0.0, 0.0, 100.0, 100.0)).interactive())
            .unwrap();
        tree.get_mut(v).unwrap().alpha = 0.0;
        assert_eq!(tree.hit_test(root, Point::new(1.0, 1.0)), None);
        tree.get_mut(v).unwrap().alpha = 1.0;
        tree.get_mut(v).unwrap().flags.insert(ViewFlags::HIDDEN);
        assert_eq!(tree.hit_test(root, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn absolute_frame_accumulates_offsets() {
        let (mut tree, root) = tree_with_root();
        tree.get_mut(root).unwrap().frame = Rect::new(10.0, 10.0, 100.0, 100.0);
        let a = tree
            .add_subview(root, ViewNode::new("a").frame(Rect::new(5.0, 5.0, 50.0, 50.0)))
            .unwrap();
        let b = tree
            .add_subview(a, ViewNode::new("b").frame(Rect::new(1.0, 2.0, 3.0, 4.0)))
            .unwrap();
        assert_eq!(tree.absolute_frame(b), Some(Rect::new(16.0, 17.0, 3.0, 4.0)));
    }

    #[test]
    fn flatten_multiplies_alpha_and_applies_scale() {
        let (mut tree, root) = tree_with_root();
        let card = tree
            .add_subview(root, ViewNode::new("card").frame(Rect::new(0.0, 0.0, 40.0, 40.0)))
            .unwrap();
        let inner = tree
            .add_subview(card, ViewNode::new("inner").frame(Rect::new(0.0, 0.0, 40.0, 20.0)))
            .unwrap();
        {
            let node = tree.get_mut(card).unwrap();
            node.alpha = 0.5;
            node.scale = 0.5;
        }
        tree.get_mut(inner).unwrap().alpha = 0.5;
        let cmds = tree.flatten(root);
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].id, root);
        assert!(cmds[1].frame.approx_eq(Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(cmds[2].frame.approx_eq(Rect::new(10.0, 10.0, 20.0, 10.0)));
        assert!((cmds[2].alpha - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn flatten_skips_hidden_and_tracks_clip() {
        let (mut tree, root) = tree_with_root();
        tree.get_mut(root).unwrap().flags.insert(ViewFlags::CLIPS_TO_BOUNDS);
        let shown = tree.add_subview(root, ViewNode::new("shown")).unwrap();
        let hidden = tree
            .add_subview(root, ViewNode::new("hidden").flags(ViewFlags::HIDDEN))
            .unwrap();
        let cmds = tree.flatten(root);
        assert!(cmds.iter().any(|c| c.id == shown));
        assert!(cmds.iter().all(|c| c.id != hidden));
        let clip = cmds.iter().find(|c| c.id == shown).unwrap().clip;
        assert_eq!(clip, Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }
}
