#![forbid(unsafe_code)]

//! Popup lifecycle core.
//!
//! A [`Popup`] owns its view hierarchy:
//!
//! ```text
//! popup.stage                  transition container, host bounds
//! ├── popup.cover              dimming layer (present only while shown)
//! └── popup.view               full-screen popup view, animated
//!     ├── popup.touch_receiver taps outside the container
//!     └── popup.shadow_container
//!         └── popup.container
//!             └── content
//! ```
//!
//! # Lifecycle
//!
//! 1. Construction snapshots the appearance and builds the presentation
//!    manager.
//! 2. [`Popup::show`] loads the views, binds placement constraints, inserts
//!    the touch receiver below the container, and starts the entrance.
//! 3. The first action (tap outside, content command, or an explicit
//!    `invoke_*_action`) fires its callback and schedules dismissal after
//!    `action_dismiss_delay`.
//! 4. When the exit transition completes the views are torn down and both
//!    callbacks are dropped.
//!
//! # Invariants
//!
//! - At most one action fires per popup. The first one takes both
//!   callbacks, so later invokes are no-ops.
//! - Dismissal requested during the entrance waits until `Presented`.
//! - Input is only routed while `Presented`.

use std::fmt;
use std::time::Duration;

use popkit_core::clock::Countdown;
use popkit_core::event::Event;
use popkit_core::geometry::{Insets, Rect, Size};
use popkit_core::layout::{ConstraintSet, bind_fill};
use popkit_core::view::{DrawCommand, ViewId, ViewNode, ViewTree};

use super::appearance::{AnimationAppearance, Appearance, PopupAppearance};
use super::container::PopupContainer;
use super::content::{
    ContentAdapter, ContentView, InstallContext, PopupCommand, PopupInfo, ViewContent,
};
use super::placement::ContainerConstraints;
use super::presentation::{
    PresentationError, PresentationManager, PresentationPhase, TransitionScene,
};

/// Callback receiving an optional payload.
pub type PopupAction = Box<dyn FnOnce(Option<PopupInfo>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PopupViews {
    stage: ViewId,
    view: ViewId,
    touch_receiver: Option<ViewId>,
    container: PopupContainer,
}

/// A modally presented floating view.
pub struct Popup {
    appearance: PopupAppearance,
    presentation: PresentationManager,
    content: Option<Box<dyn ContentAdapter>>,
    negative_action: Option<PopupAction>,
    positive_action: Option<PopupAction>,
    tree: ViewTree,
    layout: ConstraintSet,
    views: Option<PopupViews>,
    placement: Option<ContainerConstraints>,
    host_size: Size,
    dismiss_timer: Option<Countdown>,
    dismiss_pending: bool,
    action_taken: bool,
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("phase", &self.presentation.phase())
            .field("host_size", &self.host_size)
            .field("has_content", &self.content.is_some())
            .field("has_negative_action", &self.negative_action.is_some())
            .field("has_positive_action", &self.positive_action.is_some())
            .field("action_taken", &self.action_taken)
            .finish_non_exhaustive()
    }
}

impl Default for Popup {
    fn default() -> Self {
        Self::blank()
    }
}

impl Popup {
    /// Create a popup from the process-wide default appearance.
    pub fn new(content: Option<Box<dyn ContentAdapter>>) -> Self {
        Self::with_appearance(&Appearance::current(), content)
    }

    /// Create a popup with content and both callbacks at once.
    pub fn create(
        content: Option<Box<dyn ContentAdapter>>,
        positive_action: Option<PopupAction>,
        negative_action: Option<PopupAction>,
    ) -> Self {
        Self::new(content).actions(positive_action, negative_action)
    }

    /// Create a popup from an explicit appearance bundle.
    pub fn with_appearance(appearance: &Appearance, content: Option<Box<dyn ContentAdapter>>) -> Self {
        Self::from_parts(appearance.popup, appearance.animation, content)
    }

    /// Create a popup from its two appearance halves.
    pub fn from_parts(
        appearance: PopupAppearance,
        animation: AnimationAppearance,
        content: Option<Box<dyn ContentAdapter>>,
    ) -> Self {
        Self {
            presentation: PresentationManager::new(animation, appearance.popup_background_color),
            appearance,
            content,
            negative_action: None,
            positive_action: None,
            tree: ViewTree::new(),
            layout: ConstraintSet::new(),
            views: None,
            placement: None,
            host_size: Size::ZERO,
            dismiss_timer: None,
            dismiss_pending: false,
            action_taken: false,
        }
    }

    /// A popup with an empty container.
    pub fn blank() -> Self {
        Self::new(None)
    }

    /// A popup whose container is filled by `view`.
    pub fn with_content_view(view: impl ContentView + 'static) -> Self {
        Self::new(Some(Box::new(ViewContent::new(view))))
    }

    /// Set the callback for the positive action path.
    pub fn positive_action(mut self, action: impl FnOnce(Option<PopupInfo>) + 'static) -> Self {
        self.positive_action = Some(Box::new(action));
        self
    }

    /// Set the callback for the negative action path.
    pub fn negative_action(mut self, action: impl FnOnce(Option<PopupInfo>) + 'static) -> Self {
        self.negative_action = Some(Box::new(action));
        self
    }

    /// Replace both callbacks at once.
    pub fn actions(
        mut self,
        positive_action: Option<PopupAction>,
        negative_action: Option<PopupAction>,
    ) -> Self {
        self.positive_action = positive_action;
        self.negative_action = negative_action;
        self
    }

    pub fn has_positive_action(&self) -> bool {
        self.positive_action.is_some()
    }

    pub fn has_negative_action(&self) -> bool {
        self.negative_action.is_some()
    }

    // --- Configuration ---

    #[inline]
    pub fn appearance(&self) -> &PopupAppearance {
        &self.appearance
    }

    /// Edits after [`Popup::show`] only affect sizing on the next host size
    /// change.
    pub fn appearance_mut(&mut self) -> &mut PopupAppearance {
        &mut self.appearance
    }

    #[inline]
    pub fn animation_appearance(&self) -> &AnimationAppearance {
        self.presentation.animation_appearance()
    }

    /// Takes effect on the next transition.
    pub fn animation_appearance_mut(&mut self) -> &mut AnimationAppearance {
        self.presentation.animation_appearance_mut()
    }

    // --- State Queries ---

    #[inline]
    pub fn phase(&self) -> PresentationPhase {
        self.presentation.phase()
    }

    #[inline]
    pub fn presentation(&self) -> &PresentationManager {
        &self.presentation
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.views.is_some()
    }

    #[inline]
    pub fn host_size(&self) -> Size {
        self.host_size
    }

    #[inline]
    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// The full-screen popup view.
    pub fn view(&self) -> Option<ViewId> {
        self.views.map(|v| v.view)
    }

    /// The shadow/plain container pair.
    pub fn container(&self) -> Option<PopupContainer> {
        self.views.map(|v| v.container)
    }

    pub fn touch_receiver(&self) -> Option<ViewId> {
        self.views.and_then(|v| v.touch_receiver)
    }

    /// Resting frame of the outer container in host coordinates.
    ///
    /// Relative to the popup view, so it does not move with transitions.
    pub fn container_frame(&self) -> Option<Rect> {
        let views = self.views?;
        self.tree.get(views.container.shadow()).map(|n| n.frame)
    }

    /// Whether an action is waiting for its dismissal delay.
    pub fn is_dismiss_scheduled(&self) -> bool {
        self.dismiss_timer.is_some() || self.dismiss_pending
    }

    // --- Lifecycle ---

    /// Build the view hierarchy and bind placement. No effect once loaded.
    pub fn load_view(&mut self, host: Size) {
        if self.views.is_some() {
            return;
        }
        self.host_size = host;
        let bounds = Rect::from_size(host);
        let stage = self.tree.create(ViewNode::new("popup.stage").frame(bounds));
        let Some(view) = self
            .tree
            .add_subview(stage, ViewNode::new("popup.view").frame(bounds))
        else {
            return;
        };
        let Some(container) =
            PopupContainer::install(&mut self.tree, &mut self.layout, view, &self.appearance)
        else {
            return;
        };
        if let Some(content) = self.content.as_mut() {
            content.install(InstallContext {
                tree: &mut self.tree,
                layout: &mut self.layout,
                parent: container.container(),
                host_size: host,
                appearance: &mut self.appearance,
            });
        }
        self.appearance.apply_fixed_size(host);
        container.restyle(&mut self.tree, &self.appearance);
        self.placement = Some(ContainerConstraints::bind(
            &mut self.layout,
            container.shadow(),
            view,
            &self.appearance,
        ));
        self.views = Some(PopupViews {
            stage,
            view,
            touch_receiver: None,
            container,
        });
        self.layout.solve(&mut self.tree, stage);
        tracing::debug!(
            width = host.width,
            height = host.height,
            position = ?self.appearance.view_attached_position,
            width_multiplier = self.appearance.width_multiplier,
            height_multiplier = self.appearance.height_multiplier,
            "popup view loaded"
        );
    }

    /// Insert the full-bounds touch receiver directly below the container.
    pub fn will_appear(&mut self) {
        let Some(views) = self.views.as_mut() else {
            return;
        };
        if views.touch_receiver.is_some() {
            return;
        }
        let node = ViewNode::new("popup.touch_receiver").interactive();
        if let Some(receiver) = self.tree.insert_subview_below(views.container.shadow(), node) {
            bind_fill(&mut self.layout, receiver, views.view, Insets::ZERO);
            views.touch_receiver = Some(receiver);
        }
        self.layout.solve(&mut self.tree, views.stage);
    }

    /// Load, lay out, and start the entrance transition in a host of `host`
    /// size.
    pub fn show(&mut self, host: Size) -> Result<PresentationPhase, PresentationError> {
        match self.phase() {
            PresentationPhase::Idle => {}
            phase if phase.is_transitioning() => {
                return Err(PresentationError::TransitionInFlight { phase });
            }
            phase => {
                return Err(PresentationError::InvalidPhase {
                    request: "show",
                    phase,
                });
            }
        }
        self.load_view(host);
        self.will_appear();
        let views = self.views.ok_or(PresentationError::NotLoaded)?;
        let mut scene = TransitionScene::new(&mut self.tree, views.stage, views.view);
        let phase = self.presentation.present(&mut scene)?;
        self.after_transition_step(phase);
        Ok(phase)
    }

    /// Call the negative callback (if any) with `info`, then schedule dismissal.
    ///
    /// Returns `false` without doing anything if an action already fired or
    /// the popup is not on screen.
    pub fn invoke_negative_action(&mut self, info: Option<PopupInfo>) -> bool {
        self.invoke(false, info)
    }

    /// Call the positive callback (if any) with `info`, then schedule dismissal.
    ///
    /// Same no-op rules as [`Popup::invoke_negative_action`].
    pub fn invoke_positive_action(&mut self, info: Option<PopupInfo>) -> bool {
        self.invoke(true, info)
    }

    /// Route a content command into the matching action path.
    pub fn dispatch(&mut self, command: PopupCommand) -> bool {
        match command {
            PopupCommand::Negative(info) => self.invoke_negative_action(info),
            PopupCommand::Positive(info) => self.invoke_positive_action(info),
        }
    }

    /// Negative path without payload; what a tap outside the container does.
    pub fn tap_to_dismiss(&mut self) -> bool {
        self.invoke_negative_action(None)
    }

    fn invoke(&mut self, positive: bool, info: Option<PopupInfo>) -> bool {
        let phase = self.phase();
        if self.action_taken
            || !matches!(
                phase,
                PresentationPhase::TransitioningIn | PresentationPhase::Presented
            )
        {
            tracing::trace!(positive, ?phase, "ignoring action");
            return false;
        }
        self.action_taken = true;
        let negative_action = self.negative_action.take();
        let positive_action = self.positive_action.take();
        let action = if positive {
            positive_action
        } else {
            negative_action
        };
        tracing::debug!(positive, has_callback = action.is_some(), "popup action");
        if let Some(action) = action {
            action(info);
        }
        self.dismiss_timer = Some(Countdown::new(self.appearance.action_dismiss_delay));
        true
    }

    /// Route an input event. Returns `true` if the popup consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.phase() != PresentationPhase::Presented {
            return false;
        }
        let (Some(views), Some(location)) = (self.views, event.location()) else {
            return false;
        };
        let Some(hit) = self.tree.hit_test(views.stage, location) else {
            return false;
        };
        if Some(hit) == views.touch_receiver {
            if self.appearance.enable_touch_outside_to_dismiss {
                self.tap_to_dismiss();
            }
            return true;
        }
        let command = self
            .content
            .as_mut()
            .and_then(|content| content.tap(&mut self.tree, hit));
        if let Some(command) = command {
            self.dispatch(command);
        }
        true
    }

    /// Step animations and the dismissal delay by `dt`.
    ///
    /// Returns the phase after the step if it changed.
    pub fn advance(&mut self, dt: Duration) -> Option<PresentationPhase> {
        let before = self.phase();
        if let Some(views) = self.views {
            let mut scene = TransitionScene::new(&mut self.tree, views.stage, views.view);
            if let Some(phase) = self.presentation.advance(&mut scene, dt) {
                self.after_transition_step(phase);
            }
        }
        if self.dismiss_timer.as_mut().is_some_and(|t| t.advance(dt)) {
            self.dismiss_timer = None;
            self.dismiss_pending = true;
        }
        if self.dismiss_pending && self.phase() == PresentationPhase::Presented {
            self.dismiss_pending = false;
            if let Err(err) = self.dismiss() {
                tracing::debug!(%err, "scheduled dismissal skipped");
            }
        }
        let after = self.phase();
        (after != before).then_some(after)
    }

    /// Start the exit transition. Only valid while `Presented`.
    pub fn dismiss(&mut self) -> Result<PresentationPhase, PresentationError> {
        let views = self.views.ok_or(PresentationError::NotLoaded)?;
        let mut scene = TransitionScene::new(&mut self.tree, views.stage, views.view);
        let phase = self.presentation.dismiss(&mut scene)?;
        self.dismiss_timer = None;
        self.dismiss_pending = false;
        self.after_transition_step(phase);
        Ok(phase)
    }

    /// Lenient dismissal used by hosts.
    ///
    /// Dismisses now when presented, defers until presented while the
    /// entrance runs, and is a no-op (returning `false`) otherwise.
    pub fn request_dismiss(&mut self) -> bool {
        match self.phase() {
            PresentationPhase::Presented => self.dismiss().is_ok(),
            PresentationPhase::TransitioningIn => {
                self.dismiss_pending = true;
                true
            }
            PresentationPhase::Idle
            | PresentationPhase::TransitioningOut
            | PresentationPhase::Dismissed => false,
        }
    }

    /// Finish the running transition immediately.
    pub fn interrupt(&mut self) -> Option<PresentationPhase> {
        let views = self.views?;
        let mut scene = TransitionScene::new(&mut self.tree, views.stage, views.view);
        let phase = self.presentation.interrupt(&mut scene)?;
        self.after_transition_step(phase);
        Some(phase)
    }

    fn after_transition_step(&mut self, phase: PresentationPhase) {
        if phase == PresentationPhase::Dismissed {
            self.did_disappear();
        }
    }

    /// Tear down views and drop both callbacks.
    fn did_disappear(&mut self) {
        self.negative_action = None;
        self.positive_action = None;
        self.dismiss_timer = None;
        self.dismiss_pending = false;
        self.placement = None;
        if let Some(views) = self.views.take() {
            self.tree.remove(views.stage);
            self.layout.prune(&self.tree);
        }
        tracing::debug!("popup disappeared");
    }

    /// Follow a host size change (rotation).
    ///
    /// Width and height constraints are rebuilt from the adapted
    /// multipliers; the anchor constraints are kept.
    pub fn host_size_changed(&mut self, new_size: Size) {
        let old = self.host_size;
        if old == new_size {
            return;
        }
        self.host_size = new_size;
        self.appearance.adapt_to_host_size(old, new_size);
        tracing::debug!(
            old_width = old.width,
            old_height = old.height,
            width = new_size.width,
            height = new_size.height,
            width_multiplier = self.appearance.width_multiplier,
            height_multiplier = self.appearance.height_multiplier,
            "host size changed"
        );
        let Some(views) = self.views else {
            return;
        };
        let bounds = Rect::from_size(new_size);
        if let Some(stage) = self.tree.get_mut(views.stage) {
            stage.frame = bounds;
        }
        for child in self.tree.children(views.stage).to_vec() {
            if let Some(node) = self.tree.get_mut(child) {
                node.frame = bounds;
            }
        }
        if let Some(placement) = self.placement.as_mut() {
            placement.rebind_size(
                &mut self.layout,
                views.container.shadow(),
                views.view,
                &self.appearance,
            );
        }
        self.layout.solve(&mut self.tree, views.stage);
        let mut scene = TransitionScene::new(&mut self.tree, views.stage, views.view);
        self.presentation.host_size_changed(&mut scene);
    }

    /// Flatten the popup (cover first) into host-space draw commands.
    pub fn render(&self) -> Vec<DrawCommand> {
        self.views
            .map(|v| self.tree.flatten(v.stage))
            .unwrap_or_default()
    }
}
