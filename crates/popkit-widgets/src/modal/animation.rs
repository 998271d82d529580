#![forbid(unsafe_code)]

//! Transition animations.
//!
//! A [`PopupAnimation`] is created per transition (in or out), drives the
//! presented view from a start state to an end state, and then reports
//! completion to its [`TransitionContext`].
//!
//! # Invariants
//!
//! - `complete_transition` is called exactly once per `animate_transition`,
//!   on every path: normal end, zero duration, or [`PopupAnimation::interrupt`].
//! - Progress is monotonic in time; the view reaches the exact end state on
//!   the completing step, whatever the curve.
//!
//! # Strategies
//!
//! | style | in | out |
//! |---|---|---|
//! | plain | frame, linear | frame to out-final, linear |
//! | fade | frame + alpha 0 to original, linear | frame to out-final + alpha 0, linear |
//! | bounce | frame, spring (damping 0.6) | frame to out-final, ease-in |
//! | zoom | scale 0.1 to 1, spring (damping 0.6) | scale to 0.1 + alpha 0, ease-in |
//!
//! `custom` animates like `fade`.

use std::time::Duration;

use popkit_core::geometry::{Rect, Size};
use popkit_core::view::ViewNode;

use super::appearance::{TransitionDirection, TransitionStyle};

/// Damping ratio of the bounce and zoom springs.
pub const SPRING_DAMPING: f64 = 0.6;

/// Scale a zooming popup starts from and shrinks to.
pub const ZOOM_MIN_SCALE: f64 = 0.1;

/// Whether an animation presents or dismisses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationStatus {
    TransitIn,
    TransitOut,
}

/// Timing curve mapping linear time `t` in `[0, 1]` to progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring that settles at `t = 1`; may overshoot before that.
    Spring {
        damping_ratio: f64,
        initial_velocity: f64,
    },
}

impl Curve {
    /// Spring with zero initial velocity.
    pub const fn spring(damping_ratio: f64) -> Self {
        Self::Spring {
            damping_ratio,
            initial_velocity: 0.0,
        }
    }

    /// Progress at time `t`. Exactly `0` at `t <= 0` and `1` at `t >= 1`.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Spring {
                damping_ratio,
                initial_velocity,
            } => spring_step(damping_ratio, initial_velocity, t),
        }
    }
}

/// Unit step response of a damped spring, tuned so the envelope has decayed
/// to 0.1% at `t = 1`.
fn spring_step(zeta: f64, v0: f64, t: f64) -> f64 {
    let zeta = zeta.max(1e-3);
    let omega = 1000f64.ln() / zeta.min(1.0);
    if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        1.0 - envelope
            * ((omega_d * t).cos() + (zeta * omega - v0) / omega_d * (omega_d * t).sin())
    } else {
        1.0 - (-omega * t).exp() * (1.0 + (omega - v0) * t)
    }
}

/// The three frames a transition moves between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrames {
    pub start: Rect,
    pub final_frame: Rect,
    pub out_final: Rect,
}

impl TransitionFrames {
    /// Offset `final_frame` by the full host extent according to `direction`.
    pub fn compute(final_frame: Rect, host: Size, direction: TransitionDirection) -> Self {
        let (w, h) = (host.width, host.height);
        let (start, out) = match direction {
            TransitionDirection::LeftToRight => ((-w, 0.0), (w, 0.0)),
            TransitionDirection::RightToLeft => ((w, 0.0), (-w, 0.0)),
            TransitionDirection::TopToBottom => ((0.0, -h), (0.0, h)),
            TransitionDirection::BottomToTop => ((0.0, h), (0.0, h)),
            TransitionDirection::Center => ((0.0, 0.0), (0.0, 0.0)),
            TransitionDirection::LeftReverse => ((-w, 0.0), (-w, 0.0)),
            TransitionDirection::RightReverse => ((w, 0.0), (w, 0.0)),
        };
        Self {
            start: final_frame.offset(start.0, start.1),
            final_frame,
            out_final: final_frame.offset(out.0, out.1),
        }
    }
}

/// Concrete strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Plain,
    Fade,
    Bounce,
    Zoom,
}

impl From<TransitionStyle> for AnimationKind {
    fn from(style: TransitionStyle) -> Self {
        match style {
            TransitionStyle::Plain => Self::Plain,
            TransitionStyle::Fade | TransitionStyle::Custom => Self::Fade,
            TransitionStyle::Bounce => Self::Bounce,
            TransitionStyle::Zoom => Self::Zoom,
        }
    }
}

impl AnimationKind {
    fn curve(self, status: AnimationStatus) -> Curve {
        match (self, status) {
            (Self::Plain | Self::Fade, _) => Curve::Linear,
            (Self::Bounce | Self::Zoom, AnimationStatus::TransitIn) => Curve::spring(SPRING_DAMPING),
            (Self::Bounce | Self::Zoom, AnimationStatus::TransitOut) => Curve::EaseIn,
        }
    }
}

/// What the animation needs from the host's transition machinery.
pub trait TransitionContext {
    /// Bounds of the view the transition happens in.
    fn container_bounds(&self) -> Rect;

    /// Frame of the presented view once presented.
    fn final_frame(&self) -> Rect;

    /// The view being presented or dismissed.
    fn presented_view(&mut self) -> Option<&mut ViewNode>;

    /// Report the end of the transition. Must be called exactly once.
    fn complete_transition(&mut self, finished: bool);
}

/// Animated view properties.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    frame: Rect,
    alpha: f32,
    scale: f64,
}

impl Pose {
    fn of(node: &ViewNode) -> Self {
        Self {
            frame: node.frame,
            alpha: node.alpha,
            scale: node.scale,
        }
    }

    fn lerp(self, to: Self, p: f64) -> Self {
        Self {
            frame: self.frame.lerp(to.frame, p),
            alpha: (self.alpha + (to.alpha - self.alpha) * p as f32).clamp(0.0, 1.0),
            scale: self.scale + (to.scale - self.scale) * p,
        }
    }

    fn write(self, node: &mut ViewNode) {
        node.frame = self.frame;
        node.alpha = self.alpha;
        node.scale = self.scale;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Track {
    from: Pose,
    to: Pose,
    curve: Curve,
}

/// One running transition.
#[derive(Debug, Clone)]
pub struct PopupAnimation {
    kind: AnimationKind,
    status: AnimationStatus,
    direction: TransitionDirection,
    duration: Duration,
    elapsed: Duration,
    frames: Option<TransitionFrames>,
    track: Option<Track>,
    completed: bool,
}

impl PopupAnimation {
    pub fn new(
        kind: AnimationKind,
        status: AnimationStatus,
        direction: TransitionDirection,
        duration: Duration,
    ) -> Self {
        Self {
            kind,
            status,
            direction,
            duration,
            elapsed: Duration::ZERO,
            frames: None,
            track: None,
            completed: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    #[inline]
    pub fn status(&self) -> AnimationStatus {
        self.status
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Frames computed by [`Self::animate_transition`].
    #[inline]
    pub fn frames(&self) -> Option<TransitionFrames> {
        self.frames
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Linear time fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.completed || self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Compute frames, put the view in its start pose, and begin.
    ///
    /// A zero duration completes before returning. Calling this again after
    /// the first call has no effect.
    pub fn animate_transition(&mut self, ctx: &mut dyn TransitionContext) {
        if self.frames.is_some() || self.completed {
            return;
        }
        let frames = TransitionFrames::compute(
            ctx.final_frame(),
            ctx.container_bounds().size(),
            self.direction,
        );
        self.frames = Some(frames);
        if let Some(view) = ctx.presented_view() {
            let track = self.track_for(frames, Pose::of(view));
            track.from.write(view);
            self.track = Some(track);
        }
        tracing::trace!(
            kind = ?self.kind,
            status = ?self.status,
            direction = ?self.direction,
            duration_ms = self.duration.as_millis() as u64,
            "animation started"
        );
        if self.duration.is_zero() {
            self.finish(ctx, true);
        }
    }

    fn track_for(&self, frames: TransitionFrames, current: Pose) -> Track {
        let curve = self.kind.curve(self.status);
        let (from, to) = match self.status {
            AnimationStatus::TransitIn => {
                let rest = Pose {
                    frame: frames.final_frame,
                    alpha: current.alpha,
                    scale: 1.0,
                };
                let from = match self.kind {
                    AnimationKind::Plain | AnimationKind::Bounce => Pose {
                        frame: frames.start,
                        ..rest
                    },
                    AnimationKind::Fade => Pose {
                        frame: frames.start,
                        alpha: 0.0,
                        ..rest
                    },
                    AnimationKind::Zoom => Pose {
                        scale: ZOOM_MIN_SCALE,
                        ..rest
                    },
                };
                (from, rest)
            }
            AnimationStatus::TransitOut => {
                let to = match self.kind {
                    AnimationKind::Plain | AnimationKind::Bounce => Pose {
                        frame: frames.out_final,
                        ..current
                    },
                    AnimationKind::Fade => Pose {
                        frame: frames.out_final,
                        alpha: 0.0,
                        ..current
                    },
                    AnimationKind::Zoom => Pose {
                        alpha: 0.0,
                        scale: ZOOM_MIN_SCALE,
                        ..current
                    },
                };
                (current, to)
            }
        };
        Track { from, to, curve }
    }

    /// Step by `dt`. Returns `true` once the animation has completed.
    pub fn advance(&mut self, ctx: &mut dyn TransitionContext, dt: Duration) -> bool {
        if self.completed {
            return true;
        }
        if self.frames.is_none() {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        let t = self.progress();
        if t >= 1.0 {
            self.finish(ctx, true);
            return true;
        }
        if let (Some(track), Some(view)) = (self.track, ctx.presented_view()) {
            track.from.lerp(track.to, track.curve.apply(t)).write(view);
        }
        false
    }

    /// Jump to the end pose and complete with `finished = false`.
    ///
    /// No effect once completed.
    pub fn interrupt(&mut self, ctx: &mut dyn TransitionContext) {
        if !self.completed {
            tracing::debug!(kind = ?self.kind, status = ?self.status, "animation interrupted");
            self.finish(ctx, false);
        }
    }

    /// Recompute frames from the context's current bounds, keeping progress.
    ///
    /// Used when the host is resized mid-transition. No effect before the
    /// animation started or once completed.
    pub fn rebase(&mut self, ctx: &mut dyn TransitionContext) {
        if self.completed {
            return;
        }
        let Some(track) = self.track else {
            return;
        };
        let frames = TransitionFrames::compute(
            ctx.final_frame(),
            ctx.container_bounds().size(),
            self.direction,
        );
        self.frames = Some(frames);
        let resting = match self.status {
            AnimationStatus::TransitIn => track.to,
            AnimationStatus::TransitOut => track.from,
        };
        let rebased = self.track_for(
            frames,
            Pose {
                frame: frames.final_frame,
                ..resting
            },
        );
        self.track = Some(rebased);
        let p = rebased.curve.apply(self.progress());
        if let Some(view) = ctx.presented_view() {
            rebased.from.lerp(rebased.to, p).write(view);
        }
        tracing::trace!(kind = ?self.kind, status = ?self.status, "animation rebased");
    }

    fn finish(&mut self, ctx: &mut dyn TransitionContext, finished: bool) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.elapsed = self.duration;
        if let (Some(track), Some(view)) = (self.track, ctx.presented_view()) {
            track.to.write(view);
        }
        ctx.complete_transition(finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockContext {
        bounds: Rect,
        view: ViewNode,
        completions: Vec<bool>,
    }

    impl MockContext {
        fn new(width: f64, height: f64) -> Self {
            let bounds = Rect::new(0.0, 0.0, width, height);
            Self {
                bounds,
                view: ViewNode::new("presented").frame(bounds),
                completions: Vec::new(),
            }
        }
    }

    impl TransitionContext for MockContext {
        fn container_bounds(&self) -> Rect {
            self.bounds
        }

        fn final_frame(&self) -> Rect {
            self.bounds
        }

        fn presented_view(&mut self) -> Option<&mut ViewNode> {
            Some(&mut self.view)
        }

        fn complete_transition(&mut self, finished: bool) {
            self.completions.push(finished);
        }
    }

    const KINDS: [AnimationKind; 4] = [
        AnimationKind::Plain,
        AnimationKind::Fade,
        AnimationKind::Bounce,
        AnimationKind::Zoom,
    ];
    const STATUSES: [AnimationStatus; 2] = [AnimationStatus::TransitIn, AnimationStatus::TransitOut];

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn curves_hit_endpoints() {
        for curve in [
            Curve::Linear,
            Curve::EaseIn,
            Curve::EaseOut,
            Curve::EaseInOut,
            Curve::spring(0.6),
            Curve::spring(1.0),
        ] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
            assert_eq!(curve.apply(2.0), 1.0);
        }
        assert!(Curve::EaseIn.apply(0.5) < 0.5);
        assert!(Curve::EaseOut.apply(0.5) > 0.5);
        assert!((Curve::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn underdamped_spring_overshoots_then_settles() {
        let c = Curve::spring(0.6);
        let peak = (1..100).map(|i| c.apply(i as f64 / 100.0)).fold(0.0, f64::max);
        assert!(peak > 1.0);
        assert!((c.apply(0.99) - 1.0).abs() < 0.01);
    }

    #[test]
    fn left_to_right_offsets_by_host_width() {
        let final_frame = Rect::new(0.0, 0.0, 320.0, 480.0);
        let f = TransitionFrames::compute(final_frame, Size::new(320.0, 480.0), TransitionDirection::LeftToRight);
        assert_eq!(f.start.x, f.final_frame.x - 320.0);
        assert_eq!(f.out_final.x, f.final_frame.x + 320.0);
    }

    #[test]
    fn center_is_identity() {
        let final_frame = Rect::new(10.0, 20.0, 100.0, 50.0);
        let f = TransitionFrames::compute(final_frame, Size::new(320.0, 480.0), TransitionDirection::Center);
        assert_eq!(f.start, f.final_frame);
        assert_eq!(f.out_final, f.final_frame);
    }

    #[test]
    fn vertical_and_reverse_directions() {
        let r = Rect::new(0.0, 0.0, 320.0, 480.0);
        let host = Size::new(320.0, 480.0);
        let ttb = TransitionFrames::compute(r, host, TransitionDirection::TopToBottom);
        assert_eq!((ttb.start.y, ttb.out_final.y), (-480.0, 480.0));
        let btt = TransitionFrames::compute(r, host, TransitionDirection::BottomToTop);
        assert_eq!((btt.start.y, btt.out_final.y), (480.0, 480.0));
        let rtl = TransitionFrames::compute(r, host, TransitionDirection::RightToLeft);
        assert_eq!((rtl.start.x, rtl.out_final.x), (320.0, -320.0));
        let lr = TransitionFrames::compute(r, host, TransitionDirection::LeftReverse);
        assert_eq!((lr.start.x, lr.out_final.x), (-320.0, -320.0));
        let rr = TransitionFrames::compute(r, host, TransitionDirection::RightReverse);
        assert_eq!((rr.start.x, rr.out_final.x), (320.0, 320.0));
    }

    #[test]
    fn custom_style_falls_back_to_fade() {
        assert_eq!(AnimationKind::from(TransitionStyle::Custom), AnimationKind::Fade);
    }

    #[test]
    fn completion_exactly_once_when_run_to_end() {
        for kind in KINDS {
            for status in STATUSES {
                let mut ctx = MockContext::new(320.0, 480.0);
                let mut anim = PopupAnimation::new(kind, status, TransitionDirection::LeftToRight, ms(200));
                anim.animate_transition(&mut ctx);
                assert!(ctx.completions.is_empty());
                for _ in 0..20 {
                    anim.advance(&mut ctx, ms(16));
                }
                anim.interrupt(&mut ctx);
                anim.advance(&mut ctx, ms(16));
                assert_eq!(ctx.completions, vec![true], "{kind:?} {status:?}");
            }
        }
    }

    #[test]
    fn completion_exactly_once_when_interrupted() {
        for kind in KINDS {
            for status in STATUSES {
                let mut ctx = MockContext::new(320.0, 480.0);
                let mut anim = PopupAnimation::new(kind, status, TransitionDirection::TopToBottom, ms(400));
                anim.animate_transition(&mut ctx);
                anim.advance(&mut ctx, ms(50));
                anim.interrupt(&mut ctx);
                anim.interrupt(&mut ctx);
                assert!(anim.advance(&mut ctx, ms(500)));
                assert_eq!(ctx.completions, vec![false], "{kind:?} {status:?}");
            }
        }
    }

    #[test]
    fn zero_duration_completes_immediately() {
        for kind in KINDS {
            for status in STATUSES {
                let mut ctx = MockContext::new(320.0, 480.0);
                let mut anim = PopupAnimation::new(kind, status, TransitionDirection::Center, Duration::ZERO);
                anim.animate_transition(&mut ctx);
                anim.animate_transition(&mut ctx);
                assert_eq!(ctx.completions, vec![true]);
                assert!(anim.is_complete());
            }
        }
    }

    #[test]
    fn fade_in_starts_transparent_and_ends_opaque() {
        let mut ctx = MockContext::new(320.0, 480.0);
        let mut anim = PopupAnimation::new(
            AnimationKind::Fade,
            AnimationStatus::TransitIn,
            TransitionDirection::LeftToRight,
            ms(400),
        );
        anim.animate_transition(&mut ctx);
        assert_eq!(ctx.view.alpha, 0.0);
        assert_eq!(ctx.view.frame.x, -320.0);
        anim.advance(&mut ctx, ms(200));
        assert!((ctx.view.alpha - 0.5).abs() < 1e-6);
        assert!((ctx.view.frame.x + 160.0).abs() < 1e-9);
        anim.advance(&mut ctx, ms(200));
        assert_eq!(ctx.view.alpha, 1.0);
        assert_eq!(ctx.view.frame, ctx.bounds);
    }

    #[test]
    fn zoom_scales_in_place() {
        let mut ctx = MockContext::new(320.0, 480.0);
        let mut anim = PopupAnimation::new(
            AnimationKind::Zoom,
            AnimationStatus::TransitIn,
            TransitionDirection::Center,
            ms(400),
        );
        anim.animate_transition(&mut ctx);
        assert_eq!(ctx.view.scale, ZOOM_MIN_SCALE);
        assert_eq!(ctx.view.frame, ctx.bounds);
        anim.advance(&mut ctx, ms(400));
        assert_eq!(ctx.view.scale, 1.0);

        let mut out = PopupAnimation::new(
            AnimationKind::Zoom,
            AnimationStatus::TransitOut,
            TransitionDirection::Center,
            ms(200),
        );
        out.animate_transition(&mut ctx);
        out.advance(&mut ctx, ms(200));
        assert_eq!(ctx.view.scale, ZOOM_MIN_SCALE);
        assert_eq!(ctx.view.alpha, 0.0);
    }

    #[test]
    fn plain_out_moves_to_out_final() {
        let mut ctx = MockContext::new(320.0, 480.0);
        let mut anim = PopupAnimation::new(
            AnimationKind::Plain,
            AnimationStatus::TransitOut,
            TransitionDirection::BottomToTop,
            ms(150),
        );
        anim.animate_transition(&mut ctx);
        assert_eq!(ctx.view.frame, ctx.bounds);
        anim.advance(&mut ctx, ms(150));
        assert_eq!(ctx.view.frame.y, 480.0);
        assert_eq!(ctx.view.alpha, 1.0);
    }

    #[test]
    fn missing_view_still_completes() {
        struct Viewless(u32);
        impl TransitionContext for Viewless {
            fn container_bounds(&self) -> Rect {
                Rect::new(0.0, 0.0, 10.0, 10.0)
            }
            fn final_frame(&self) -> Rect {
                self.container_bounds()
            }
            fn presented_view(&mut self) -> Option<&mut ViewNode> {
                None
            }
            fn complete_transition(&mut self, _finished: bool) {
                self.0 += 1;
            }
        }
        let mut ctx = Viewless(0);
        let mut anim = PopupAnimation::new(
            AnimationKind::Bounce,
            AnimationStatus::TransitIn,
            TransitionDirection::LeftToRight,
            ms(100),
        );
        anim.animate_transition(&mut ctx);
        anim.advance(&mut ctx, ms(100));
        assert_eq!(ctx.0, 1);
    }

    #[test]
    fn rebase_moves_the_resting_frame_to_new_bounds() {
        for kind in KINDS {
            let mut ctx = MockContext::new(320.0, 480.0);
            let mut anim = PopupAnimation::new(
                kind,
                AnimationStatus::TransitIn,
                TransitionDirection::LeftToRight,
                ms(400),
            );
            anim.animate_transition(&mut ctx);
            anim.advance(&mut ctx, ms(100));
            ctx.bounds = Rect::new(0.0, 0.0, 480.0, 320.0);
            anim.rebase(&mut ctx);
            assert_eq!(anim.frames().unwrap().final_frame, ctx.bounds, "{kind:?}");
            assert!((anim.progress() - 0.25).abs() < 1e-9);
            anim.advance(&mut ctx, ms(300));
            assert!(ctx.view.frame.approx_eq(ctx.bounds), "{kind:?}");
            assert_eq!(ctx.completions, vec![true]);
        }
    }

    #[test]
    fn rebase_after_completion_is_ignored() {
        let mut ctx = MockContext::new(320.0, 480.0);
        let mut anim = PopupAnimation::new(
            AnimationKind::Plain,
            AnimationStatus::TransitIn,
            TransitionDirection::LeftToRight,
            ms(100),
        );
        anim.animate_transition(&mut ctx);
        anim.advance(&mut ctx, ms(100));
        ctx.bounds = Rect::new(0.0, 0.0, 480.0, 320.0);
        anim.rebase(&mut ctx);
        assert_eq!(ctx.view.frame, Rect::new(0.0, 0.0, 320.0, 480.0));
        assert_eq!(ctx.completions, vec![true]);
    }
}
