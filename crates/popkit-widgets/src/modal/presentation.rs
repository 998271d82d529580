#![forbid(unsafe_code)]

//! Presentation state machine.
//!
//! ```text
//! Idle -> TransitioningIn -> Presented -> TransitioningOut -> Dismissed
//! ```
//!
//! [`PresentationManager`] owns the animation factory configuration and the
//! dimming cover. On `present` it inserts the cover beneath the presented
//! view and fades it in alongside the entrance animation; on `dismiss` it
//! fades it back out alongside the exit animation, then removes it.
//!
//! # Invariants
//!
//! - At most one transition is in flight; requests made mid-transition are
//!   rejected with [`PresentationError::TransitionInFlight`].
//! - Each transition ends with exactly one completion, and the phase only
//!   advances on that completion.
//! - `Dismissed` is terminal.

use std::time::Duration;

use popkit_core::color::PackedRgba;
use popkit_core::geometry::Rect;
use popkit_core::view::{ViewId, ViewNode, ViewTree};

use super::animation::{AnimationKind, AnimationStatus, PopupAnimation, TransitionContext};
use super::appearance::AnimationAppearance;

/// Lifecycle phase of one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationPhase {
    #[default]
    Idle,
    TransitioningIn,
    Presented,
    TransitioningOut,
    Dismissed,
}

impl PresentationPhase {
    /// Whether an animation is running.
    #[inline]
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::TransitioningIn | Self::TransitioningOut)
    }
}

/// Errors from presentation requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
    /// A present or dismiss was requested while a transition is running.
    #[error("cannot start a transition while {phase:?}")]
    TransitionInFlight { phase: PresentationPhase },
    /// The request does not apply to the current phase.
    #[error("cannot {request} a popup that is {phase:?}")]
    InvalidPhase {
        request: &'static str,
        phase: PresentationPhase,
    },
    /// The popup was never loaded into a scene.
    #[error("popup view is not loaded")]
    NotLoaded,
    /// A host operation named a popup that is not presented.
    #[error("no presented popup with id {0}")]
    UnknownPopup(u64),
}

/// Dimming layer drawn behind the presented view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverLayer {
    /// Cover color; its alpha is scaled by `opacity`.
    pub color: PackedRgba,
    /// Opacity in `[0.0, 1.0]` once fully presented.
    pub opacity: f32,
}

impl CoverLayer {
    pub fn new(color: PackedRgba) -> Self {
        Self { color, opacity: 1.0 }
    }

    pub fn color(mut self, color: PackedRgba) -> Self {
        self.color = color;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    fn node(&self, bounds: Rect) -> ViewNode {
        let mut node = ViewNode::new("popup.cover").frame(bounds).background(self.color);
        node.alpha = 0.0;
        node
    }
}

/// The views a transition operates on.
///
/// `container` is the transition container (host bounds); `view` is the
/// popup's full-screen view inside it.
pub struct TransitionScene<'a> {
    tree: &'a mut ViewTree,
    container: ViewId,
    view: ViewId,
    completion: Option<bool>,
}

impl<'a> TransitionScene<'a> {
    pub fn new(tree: &'a mut ViewTree, container: ViewId, view: ViewId) -> Self {
        Self {
            tree,
            container,
            view,
            completion: None,
        }
    }

    fn bounds(&self) -> Rect {
        self.tree
            .get(self.container)
            .map(|n| Rect::from_size(n.frame.size()))
            .unwrap_or_default()
    }
}

impl TransitionContext for TransitionScene<'_> {
    fn container_bounds(&self) -> Rect {
        self.bounds()
    }

    fn final_frame(&self) -> Rect {
        self.bounds()
    }

    fn presented_view(&mut self) -> Option<&mut ViewNode> {
        self.tree.get_mut(self.view)
    }

    fn complete_transition(&mut self, finished: bool) {
        self.completion = Some(finished);
    }
}

/// Drives present/dismiss transitions for one popup.
#[derive(Debug, Clone)]
pub struct PresentationManager {
    animation_appearance: AnimationAppearance,
    cover: CoverLayer,
    cover_view: Option<ViewId>,
    phase: PresentationPhase,
    animation: Option<PopupAnimation>,
    last_finished: Option<bool>,
}

impl PresentationManager {
    pub fn new(animation_appearance: AnimationAppearance, cover_color: PackedRgba) -> Self {
        Self {
            animation_appearance,
            cover: CoverLayer::new(cover_color),
            cover_view: None,
            phase: PresentationPhase::Idle,
            animation: None,
            last_finished: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    #[inline]
    pub fn animation_appearance(&self) -> &AnimationAppearance {
        &self.animation_appearance
    }

    /// Takes effect on the next transition.
    pub fn animation_appearance_mut(&mut self) -> &mut AnimationAppearance {
        &mut self.animation_appearance
    }

    #[inline]
    pub fn cover(&self) -> CoverLayer {
        self.cover
    }

    pub fn set_cover(&mut self, cover: CoverLayer) {
        self.cover = cover;
    }

    /// The running animation, if any.
    pub fn animation(&self) -> Option<&PopupAnimation> {
        self.animation.as_ref()
    }

    /// `finished` flag of the most recent completion.
    #[inline]
    pub fn last_finished(&self) -> Option<bool> {
        self.last_finished
    }

    /// Build the animation for `status` from the current configuration.
    pub fn animation_for(&self, status: AnimationStatus) -> PopupAnimation {
        let a = &self.animation_appearance;
        let duration = match status {
            AnimationStatus::TransitIn => a.transition_in_duration,
            AnimationStatus::TransitOut => a.transition_out_duration,
        };
        PopupAnimation::new(
            AnimationKind::from(a.transition_style),
            status,
            a.transition_direction,
            duration,
        )
    }

    /// `Idle -> TransitioningIn`.
    ///
    /// Returns the new phase, which is already `Presented` when the
    /// entrance duration is zero.
    pub fn present(
        &mut self,
        scene: &mut TransitionScene<'_>,
    ) -> Result<PresentationPhase, PresentationError> {
        match self.phase {
            PresentationPhase::Idle => {}
            phase if phase.is_transitioning() => {
                return Err(PresentationError::TransitionInFlight { phase });
            }
            phase => {
                return Err(PresentationError::InvalidPhase {
                    request: "present",
                    phase,
                });
            }
        }
        let bounds = scene.bounds();
        let cover_node = self.cover.node(bounds);
        self.cover_view = scene.tree.insert_subview_at(scene.container, 0, cover_node);
        self.begin(scene, AnimationStatus::TransitIn, PresentationPhase::TransitioningIn);
        Ok(self.phase)
    }

    /// `Presented -> TransitioningOut`.
    pub fn dismiss(
        &mut self,
        scene: &mut TransitionScene<'_>,
    ) -> Result<PresentationPhase, PresentationError> {
        match self.phase {
            PresentationPhase::Presented => {}
            phase if phase.is_transitioning() => {
                return Err(PresentationError::TransitionInFlight { phase });
            }
            phase => {
                return Err(PresentationError::InvalidPhase {
                    request: "dismiss",
                    phase,
                });
            }
        }
        self.begin(scene, AnimationStatus::TransitOut, PresentationPhase::TransitioningOut);
        Ok(self.phase)
    }

    fn begin(
        &mut self,
        scene: &mut TransitionScene<'_>,
        status: AnimationStatus,
        phase: PresentationPhase,
    ) {
        self.enter(phase);
        let mut animation = self.animation_for(status);
        animation.animate_transition(scene);
        self.animation = Some(animation);
        self.sync_cover(scene);
        self.settle(scene);
    }

    /// Step the running transition. Returns the new phase if it changed.
    pub fn advance(
        &mut self,
        scene: &mut TransitionScene<'_>,
        dt: Duration,
    ) -> Option<PresentationPhase> {
        let animation = self.animation.as_mut()?;
        animation.advance(scene, dt);
        self.sync_cover(scene);
        self.settle(scene)
    }

    /// Rebase a running transition on the scene's current bounds.
    pub fn host_size_changed(&mut self, scene: &mut TransitionScene<'_>) {
        let bounds = scene.bounds();
        if let Some(node) = self.cover_view.and_then(|id| scene.tree.get_mut(id)) {
            node.frame = bounds;
        }
        if let Some(animation) = self.animation.as_mut() {
            animation.rebase(scene);
        }
    }

    /// Finish the running transition immediately (`finished = false`).
    pub fn interrupt(&mut self, scene: &mut TransitionScene<'_>) -> Option<PresentationPhase> {
        let animation = self.animation.as_mut()?;
        animation.interrupt(scene);
        self.sync_cover(scene);
        self.settle(scene)
    }

    fn sync_cover(&self, scene: &mut TransitionScene<'_>) {
        let Some(animation) = self.animation.as_ref() else {
            return;
        };
        let p = animation.progress() as f32;
        let level = match animation.status() {
            AnimationStatus::TransitIn => p,
            AnimationStatus::TransitOut => 1.0 - p,
        };
        if let Some(node) = self.cover_view.and_then(|id| scene.tree.get_mut(id)) {
            node.alpha = self.cover.opacity * level;
        }
    }

    /// Consume a pending completion and advance the phase.
    fn settle(&mut self, scene: &mut TransitionScene<'_>) -> Option<PresentationPhase> {
        let finished = scene.completion.take()?;
        self.last_finished = Some(finished);
        self.animation = None;
        let next = match self.phase {
            PresentationPhase::TransitioningIn => PresentationPhase::Presented,
            PresentationPhase::TransitioningOut => {
                if let Some(cover) = self.cover_view.take() {
                    scene.tree.remove(cover);
                }
                PresentationPhase::Dismissed
            }
            other => other,
        };
        self.enter(next);
        Some(next)
    }

    fn enter(&mut self, next: PresentationPhase) {
        if next != self.phase {
            tracing::debug!(from = ?self.phase, to = ?next, "presentation phase");
            self.phase = next;
        }
    }
}
