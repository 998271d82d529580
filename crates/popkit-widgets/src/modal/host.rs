#![forbid(unsafe_code)]

//! Presenting host for popups.
//!
//! `PopupHost` plays the role of the presenting screen: it owns the host
//! bounds and a LIFO stack of presented popups, drives their transitions
//! from a clock, and routes input to the topmost one.
//!
//! # Invariants
//!
//! - Z-order is strictly increasing: later popups are always on top.
//! - Only the top popup receives input events.
//! - A popup's completion runs exactly once, the first time it reaches
//!   `Presented`.
//! - Popups leave the stack on the tick that observes them `Dismissed`.
//!
//! # Failure Modes
//!
//! - `pop_up()` of a popup that is not `Idle` returns the presentation error
//!   and leaves the stack untouched.
//! - `dismiss()` for an unknown id returns [`PresentationError::UnknownPopup`].
//! - Repeated `dismiss()` while a dismissal is pending or running is a no-op.
//!
//! # Example
//!
//! ```ignore
//! let mut host = PopupHost::new(Size::new(320.0, 480.0));
//! let id = host.pop_up(AlertController::alert_view("Hi", None, Some("OK")).into_popup(), None)?;
//!
//! loop {
//!     for event in host.tick_wall() {
//!         // HostEvent::Presented(id) / HostEvent::Dismissed(id)
//!     }
//!     host.handle_event(&input);
//!     draw(host.render());
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use popkit_core::clock::FrameClock;
use popkit_core::event::Event;
use popkit_core::geometry::Size;
use popkit_core::view::DrawCommand;

use super::popup::Popup;
use super::presentation::{PresentationError, PresentationPhase};

/// Base z-index for the popup layer.
const BASE_POPUP_Z: u32 = 1000;

/// Z-index increment between popups.
const Z_INCREMENT: u32 = 10;

/// Global counter for unique popup IDs.
static POPUP_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a presented popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(u64);

impl PopupId {
    fn new() -> Self {
        Self(POPUP_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PopupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popup#{}", self.0)
    }
}

/// Lifecycle notifications produced by [`PopupHost::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The popup finished its entrance.
    Presented(PopupId),
    /// The popup finished its exit and left the stack.
    Dismissed(PopupId),
}

struct HostedPopup {
    id: PopupId,
    z_index: u32,
    popup: Popup,
    completion: Option<Box<dyn FnOnce()>>,
    presented_notified: bool,
}

/// Stack of presented popups with z-ordering and input routing.
pub struct PopupHost {
    size: Size,
    popups: Vec<HostedPopup>,
    next_z: u32,
    clock: FrameClock,
    pending: Vec<HostEvent>,
}

impl fmt::Debug for PopupHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupHost")
            .field("size", &self.size)
            .field("depth", &self.popups.len())
            .field("top_id", &self.top_id())
            .finish_non_exhaustive()
    }
}

impl PopupHost {
    /// Create an empty host with bounds of `size`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            popups: Vec::new(),
            next_z: 0,
            clock: FrameClock::new(),
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    // --- Stack Operations ---

    /// Present `popup` on top of the stack.
    ///
    /// `completion` runs once the entrance transition has finished.
    pub fn pop_up(
        &mut self,
        mut popup: Popup,
        completion: Option<Box<dyn FnOnce()>>,
    ) -> Result<PopupId, PresentationError> {
        popup.show(self.size)?;
        let id = PopupId::new();
        let z_index = BASE_POPUP_Z + self.next_z;
        self.next_z += Z_INCREMENT;
        tracing::debug!(popup = %id, z_index, depth = self.popups.len() + 1, "pop up");
        self.popups.push(HostedPopup {
            id,
            z_index,
            popup,
            completion,
            presented_notified: false,
        });
        self.collect();
        Ok(id)
    }

    /// Ask the popup `id` to leave.
    ///
    /// Returns `Ok(false)` when the request was a no-op (already leaving).
    pub fn dismiss(&mut self, id: PopupId) -> Result<bool, PresentationError> {
        let entry = self
            .popups
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PresentationError::UnknownPopup(id.0))?;
        let accepted = entry.popup.request_dismiss();
        tracing::debug!(popup = %id, accepted, phase = ?entry.popup.phase(), "dismiss requested");
        self.collect();
        Ok(accepted)
    }

    // --- State Queries ---

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.popups.len()
    }

    pub fn contains(&self, id: PopupId) -> bool {
        self.popups.iter().any(|p| p.id == id)
    }

    pub fn top_id(&self) -> Option<PopupId> {
        self.popups.last().map(|p| p.id)
    }

    pub fn phase(&self, id: PopupId) -> Option<PresentationPhase> {
        self.get(id).map(Popup::phase)
    }

    pub fn z_index(&self, id: PopupId) -> Option<u32> {
        self.popups.iter().find(|p| p.id == id).map(|p| p.z_index)
    }

    pub fn get(&self, id: PopupId) -> Option<&Popup> {
        self.popups.iter().find(|p| p.id == id).map(|p| &p.popup)
    }

    pub fn get_mut(&mut self, id: PopupId) -> Option<&mut Popup> {
        self.popups.iter_mut().find(|p| p.id == id).map(|p| &mut p.popup)
    }

    // --- Event Handling ---

    /// Route an event to the top popup only.
    ///
    /// Returns `true` whenever a popup is on screen: popups are modal, so
    /// nothing behind them sees the event.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let Some(top) = self.popups.last_mut() else {
            return false;
        };
        top.popup.handle_event(event);
        true
    }

    // --- Time ---

    /// Advance every popup by `dt` and report lifecycle changes.
    pub fn tick(&mut self, dt: Duration) -> Vec<HostEvent> {
        for entry in &mut self.popups {
            entry.popup.advance(dt);
        }
        self.collect();
        std::mem::take(&mut self.pending)
    }

    /// [`PopupHost::tick`] with the wall-clock time since the previous call.
    pub fn tick_wall(&mut self) -> Vec<HostEvent> {
        let dt = self.clock.tick();
        self.tick(dt)
    }

    /// Fire completions for newly presented popups and drop dismissed ones.
    fn collect(&mut self) {
        for entry in &mut self.popups {
            let phase = entry.popup.phase();
            let reached = matches!(
                phase,
                PresentationPhase::Presented
                    | PresentationPhase::TransitioningOut
                    | PresentationPhase::Dismissed
            );
            if reached && !entry.presented_notified {
                entry.presented_notified = true;
                if let Some(completion) = entry.completion.take() {
                    completion();
                }
                self.pending.push(HostEvent::Presented(entry.id));
            }
        }
        let pending = &mut self.pending;
        self.popups.retain(|entry| {
            let dismissed = entry.popup.phase() == PresentationPhase::Dismissed;
            if dismissed {
                tracing::debug!(popup = %entry.id, "popup removed");
                pending.push(HostEvent::Dismissed(entry.id));
            }
            !dismissed
        });
    }

    // --- Environment ---

    /// Follow a host size change, e.g. a rotation.
    pub fn resize(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        self.size = size;
        for entry in &mut self.popups {
            entry.popup.host_size_changed(size);
        }
    }

    // --- Rendering ---

    /// Draw commands of every popup, bottom to top.
    pub fn render(&self) -> Vec<DrawCommand> {
        self.popups.iter().flat_map(|p| p.popup.render()).collect()
    }
}
