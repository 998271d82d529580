#![forbid(unsafe_code)]

//! Layout binding.
//!
//! A [`Constraint`] states `item.attribute = to_item.to_attribute * multiplier
//! + constant`, or `item.attribute = constant` when `to_item` is `None`.
//! Constraints are bound into a [`LayoutBinding`] and stay in effect until
//! explicitly unbound, so callers can replace a subset (for example the size
//! constraints after a rotation) without touching the rest.
//!
//! [`ConstraintSet::solve`] resolves frames of every constrained view below a
//! root. References to the parent use the parent's bounds (origin at zero);
//! references to siblings use their already solved frames.
//!
//! # Failure Modes
//!
//! - A constraint whose `to_item` is dead, or is neither the item's parent
//!   nor a sibling, is ignored.
//! - Axes with no constraint keep the view's existing frame values.
//! - Conflicting constraints on the same attribute: the one bound last wins.

use ahash::AHashMap;

use crate::geometry::Rect;
use crate::view::{ViewId, ViewTree};

/// Number of solver passes over sibling constraints.
const MAX_PASSES: usize = 4;

/// A layout attribute of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Leading,
    Trailing,
    Top,
    Bottom,
    CenterX,
    CenterY,
    Width,
    Height,
    NotAnAttribute,
}

impl Attribute {
    /// Read this attribute from a frame.
    pub fn of(self, r: Rect) -> f64 {
        match self {
            Self::Leading => r.left(),
            Self::Trailing => r.right(),
            Self::Top => r.top(),
            Self::Bottom => r.bottom(),
            Self::CenterX => r.center().x,
            Self::CenterY => r.center().y,
            Self::Width => r.width,
            Self::Height => r.height,
            Self::NotAnAttribute => 0.0,
        }
    }
}

/// A linear relation between two view attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub item: ViewId,
    pub attribute: Attribute,
    pub to_item: Option<ViewId>,
    pub to_attribute: Attribute,
    pub multiplier: f64,
    pub constant: f64,
}

impl Constraint {
    /// `item.attribute = to_item.to_attribute`.
    pub fn new(item: ViewId, attribute: Attribute, to_item: ViewId, to_attribute: Attribute) -> Self {
        Self {
            item,
            attribute,
            to_item: Some(to_item),
            to_attribute,
            multiplier: 1.0,
            constant: 0.0,
        }
    }

    /// `item.attribute = to_item.attribute` (same attribute on both sides).
    pub fn equal(item: ViewId, attribute: Attribute, to_item: ViewId) -> Self {
        Self::new(item, attribute, to_item, attribute)
    }

    /// `item.attribute = constant`.
    pub fn fixed(item: ViewId, attribute: Attribute, constant: f64) -> Self {
        Self {
            item,
            attribute,
            to_item: None,
            to_attribute: Attribute::NotAnAttribute,
            multiplier: 1.0,
            constant,
        }
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }
}

/// Handle to a bound constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(u64);

/// Capability to bind and unbind persistent constraints.
pub trait LayoutBinding {
    /// Bind a constraint, returning a handle for later removal.
    fn bind(&mut self, constraint: Constraint) -> ConstraintId;

    /// Remove a constraint. Returns `false` if it was not bound.
    fn unbind(&mut self, id: ConstraintId) -> bool;

    /// Look up a bound constraint.
    fn constraint(&self, id: ConstraintId) -> Option<&Constraint>;
}

/// Pin all four edges of `item` to `to_item` inset by `insets`.
pub fn bind_fill(
    layout: &mut dyn LayoutBinding,
    item: ViewId,
    to_item: ViewId,
    insets: crate::geometry::Insets,
) -> [ConstraintId; 4] {
    [
        layout.bind(Constraint::equal(item, Attribute::Leading, to_item).constant(insets.left)),
        layout.bind(Constraint::equal(item, Attribute::Trailing, to_item).constant(-insets.right)),
        layout.bind(Constraint::equal(item, Attribute::Top, to_item).constant(insets.top)),
        layout.bind(Constraint::equal(item, Attribute::Bottom, to_item).constant(-insets.bottom)),
    ]
}

/// Ordered collection of constraints with an iterative solver.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<(ConstraintId, Constraint)>,
    next_id: u64,
}

/// Attribute values resolved for one view during a pass.
#[derive(Debug, Default, Clone, Copy)]
struct Resolved {
    leading: Option<f64>,
    trailing: Option<f64>,
    top: Option<f64>,
    bottom: Option<f64>,
    center_x: Option<f64>,
    center_y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

impl Resolved {
    fn set(&mut self, attribute: Attribute, value: f64) {
        let slot = match attribute {
            Attribute::Leading => &mut self.leading,
            Attribute::Trailing => &mut self.trailing,
            Attribute::Top => &mut self.top,
            Attribute::Bottom => &mut self.bottom,
            Attribute::CenterX => &mut self.center_x,
            Attribute::CenterY => &mut self.center_y,
            Attribute::Width => &mut self.width,
            Attribute::Height => &mut self.height,
            Attribute::NotAnAttribute => return,
        };
        *slot = Some(value);
    }

    /// Solve one axis from (start, end, center, size) with `current` as fallback.
    fn axis(
        start: Option<f64>,
        end: Option<f64>,
        center: Option<f64>,
        size: Option<f64>,
        current: (f64, f64),
    ) -> (f64, f64) {
        let size = size
            .or_else(|| Some(end? - start?))
            .or_else(|| Some((end? - center?) * 2.0))
            .or_else(|| Some((center? - start?) * 2.0))
            .unwrap_or(current.1)
            .max(0.0);
        let origin = start
            .or_else(|| end.map(|e| e - size))
            .or_else(|| center.map(|c| c - size / 2.0))
            .unwrap_or(current.0);
        (origin, size)
    }

    fn frame(&self, current: Rect) -> Rect {
        let (x, w) = Self::axis(
            self.leading,
            self.trailing,
            self.center_x,
            self.width,
            (current.x, current.width),
        );
        let (y, h) = Self::axis(
            self.top,
            self.bottom,
            self.center_y,
            self.height,
            (current.y, current.height),
        );
        Rect::new(x, y, w, h)
    }
}

impl ConstraintSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate bound constraints in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints.iter().map(|(id, c)| (*id, c))
    }

    /// Drop every constraint that mentions a view no longer in `tree`.
    pub fn prune(&mut self, tree: &ViewTree) {
        self.constraints.retain(|(_, c)| {
            tree.contains(c.item) && c.to_item.is_none_or(|t| tree.contains(t))
        });
    }

    /// Resolve frames for `root`'s descendants, parents before children.
    pub fn solve(&self, tree: &mut ViewTree, root: ViewId) {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            self.solve_children(tree, parent);
            stack.extend(tree.children(parent).iter().copied());
        }
    }

    fn solve_children(&self, tree: &mut ViewTree, parent: ViewId) {
        let Some(parent_bounds) = tree.get(parent).map(|n| Rect::from_size(n.frame.size())) else {
            return;
        };
        let children = tree.children(parent).to_vec();
        let applicable: Vec<&Constraint> = self
            .constraints
            .iter()
            .map(|(_, c)| c)
            .filter(|c| children.contains(&c.item))
            .collect();
        if applicable.is_empty() {
            return;
        }

        let passes = if applicable.iter().any(|c| c.to_item.is_some_and(|t| t != parent)) {
            MAX_PASSES
        } else {
            1
        };

        for _ in 0..passes {
            let mut resolved: AHashMap<ViewId, Resolved> = AHashMap::new();
            for c in &applicable {
                let reference = match c.to_item {
                    None => 0.0,
                    Some(t) if t == parent => c.to_attribute.of(parent_bounds),
                    Some(t) if children.contains(&t) => match tree.get(t) {
                        Some(n) => c.to_attribute.of(n.frame),
                        None => continue,
                    },
                    Some(_t) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(item = c.item.index(), to = _t.index(), "ignoring unrelated constraint");
                        continue;
                    }
                };
                resolved
                    .entry(c.item)
                    .or_default()
                    .set(c.attribute, reference * c.multiplier + c.constant);
            }
            for (item, values) in resolved {
                if let Some(node) = tree.get_mut(item) {
                    node.frame = values.frame(node.frame);
                }
            }
        }
    }
}

impl LayoutBinding for ConstraintSet {
    fn bind(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.next_id);
        self.next_id += 1;
        self.constraints.push((id, constraint));
        id
    }

    fn unbind(&mut self, id: ConstraintId) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|(cid, _)| *cid != id);
        self.constraints.len() != before
    }

    fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|(cid, _)| *cid == id).map(|(_, c)| c)
    }
}
