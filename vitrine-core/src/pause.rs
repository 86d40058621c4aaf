//! Per-column pause state.
//!
//! A column auto-scrolls only while nothing asks it to hold still. Four
//! independent sources can pause it: pointer hover, the modal, a menu and
//! the cooldown after manual scrolling. The merged state is recomputed from
//! the current value of every source on each query, so the order in which
//! sources flip never matters.

use std::time::Duration;

use crate::signals::PauseReceivers;

/// Input device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Touch screens have no hover; a touch never pauses by itself.
    pub fn can_hover(self) -> bool {
        !matches!(self, PointerKind::Touch)
    }
}

/// Merged view of every pause source at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseState {
    pub hovering: bool,
    pub modal_open: bool,
    pub menu_open: bool,
    pub interacting: bool,
}

impl PauseState {
    pub fn is_paused(&self) -> bool {
        self.hovering || self.modal_open || self.menu_open || self.interacting
    }
}

#[derive(Debug, Clone)]
pub struct PauseCoordinator {
    /// Hover from a hover-capable pointer
    hovering: bool,
    /// Remaining interaction cooldown in simulated time
    cooldown_remaining: Duration,
    /// Cooldown restarted by every manual input
    cooldown: Duration,
    /// Modal/menu mirrors; `None` once detached
    signals: Option<PauseReceivers>,
}

impl PauseCoordinator {
    pub fn new(cooldown: Duration, signals: Option<PauseReceivers>) -> Self {
        Self {
            hovering: false,
            cooldown_remaining: Duration::ZERO,
            cooldown,
            signals,
        }
    }

    pub fn pointer_enter(&mut self, kind: PointerKind) {
        if kind.can_hover() {
            self.hovering = true;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hovering = false;
    }

    /// Restart the cooldown after a wheel or drag input.
    pub fn note_interaction(&mut self) {
        self.cooldown_remaining = self.cooldown;
    }

    /// Count the cooldown down by `dt` of tick time.
    pub fn advance(&mut self, dt: Duration) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(dt);
    }

    pub fn snapshot(&self) -> PauseState {
        let (modal_open, menu_open) = self
            .signals
            .as_ref()
            .map_or((false, false), |s| (s.modal_open(), s.menu_open()));
        PauseState {
            hovering: self.hovering,
            modal_open,
            menu_open,
            interacting: !self.cooldown_remaining.is_zero(),
        }
    }

    pub fn is_advancing(&self) -> bool {
        !self.snapshot().is_paused()
    }

    /// Direct manipulation is blocked only by the modal, never by hover.
    pub fn blocks_direct_input(&self) -> bool {
        self.signals.as_ref().is_some_and(PauseReceivers::modal_open)
    }

    /// Drop the signal receivers.
    pub fn detach(&mut self) {
        self.signals = None;
        self.hovering = false;
        self.cooldown_remaining = Duration::ZERO;
    }
}
