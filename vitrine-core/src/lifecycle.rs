//! Finite-feed lifecycle tracking.
//!
//! Every column of a deck layout moves `running -> entered end zone ->
//! completed` at most once per cycle. The feed has ended once every visible
//! column that has products is completed. A replay starts a new cycle of
//! the same layout and bumps the replay count, so
//! [`FeedLifecycle::cycle_token`] differs between cycles even when the
//! products are identical.
//!
//! State is keyed by [`DeckSignature`]. Switching to a new layout leaves
//! the previous layout's state behind untouched; reports that still carry
//! the old signature are ignored rather than leaking into the new layout.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{debug, trace};

use crate::deck::DeckSignature;

/// Upper bound on shadowed layouts kept around.
const MAX_SHADOWED_LAYOUTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPhase {
    Running,
    EnteredEndZone,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    EnteredEndZone,
    Completed,
}

/// A column milestone waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    pub signature: DeckSignature,
    pub column: usize,
    pub kind: ReportKind,
}

/// Observable outcome of a lifecycle change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    EnteredEndZone { column: usize },
    Completed { column: usize },
    /// Every visible non-empty column completed this cycle.
    DeckEnded { cycle_token: String },
    Replayed { cycle_token: String },
}

#[derive(Debug, Clone, Default)]
struct CycleState {
    end_zone: BTreeSet<usize>,
    completed: BTreeSet<usize>,
}

#[derive(Debug, Clone)]
pub struct FeedLifecycle {
    signature: DeckSignature,
    deck_lengths: Vec<usize>,
    visible_columns: usize,
    cycles: HashMap<DeckSignature, CycleState>,
    /// Signatures in the order they were last made current
    history: VecDeque<DeckSignature>,
    replay_count: u64,
    pending: Vec<LifecycleReport>,
    ended_announced: bool,
}

impl FeedLifecycle {
    pub fn new(signature: DeckSignature, deck_lengths: Vec<usize>) -> Self {
        let visible_columns = deck_lengths.len();
        let mut lifecycle = Self {
            signature: signature.clone(),
            deck_lengths,
            visible_columns,
            cycles: HashMap::new(),
            history: VecDeque::new(),
            replay_count: 0,
            pending: Vec::new(),
            ended_announced: false,
        };
        lifecycle.activate(signature);
        lifecycle
    }

    pub fn signature(&self) -> &DeckSignature {
        &self.signature
    }

    pub fn replay_count(&self) -> u64 {
        self.replay_count
    }

    /// Remount key for the current cycle: `"{signature}:{replay_count}"`.
    pub fn cycle_token(&self) -> String {
        format!("{}:{}", self.signature, self.replay_count)
    }

    /// Switch to a new deck layout. The old layout's state is shadowed and
    /// queued reports for it become stale.
    pub fn set_deck(
        &mut self,
        signature: DeckSignature,
        deck_lengths: Vec<usize>,
    ) {
        self.deck_lengths = deck_lengths;
        if signature == self.signature {
            return;
        }
        debug!(
            from = %self.signature,
            to = %signature,
            "deck layout changed; previous lifecycle state shadowed"
        );
        self.activate(signature);
        self.ended_announced = false;
    }

    /// Number of columns currently on screen. Returns `DeckEnded` if the
    /// change alone finishes the feed.
    pub fn set_visible_columns(
        &mut self,
        visible: usize,
    ) -> Option<LifecycleEvent> {
        self.visible_columns = visible;
        self.announce_end()
    }

    pub fn phase(&self, column: usize) -> ColumnPhase {
        let Some(cycle) = self.cycles.get(&self.signature) else {
            return ColumnPhase::Running;
        };
        if cycle.completed.contains(&column) {
            ColumnPhase::Completed
        } else if cycle.end_zone.contains(&column) {
            ColumnPhase::EnteredEndZone
        } else {
            ColumnPhase::Running
        }
    }

    /// True iff at least one visible column has products and every visible
    /// column with products is completed.
    pub fn deck_ended(&self) -> bool {
        let Some(cycle) = self.cycles.get(&self.signature) else {
            return false;
        };
        let mut non_empty = self
            .deck_lengths
            .iter()
            .take(self.visible_columns)
            .enumerate()
            .filter(|(_, len)| **len > 0)
            .map(|(column, _)| column)
            .peekable();

        non_empty.peek().is_some()
            && non_empty.all(|column| cycle.completed.contains(&column))
    }

    /// Buffer a report for the next [`FeedLifecycle::commit`].
    pub fn queue(&mut self, report: LifecycleReport) {
        self.pending.push(report);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply every buffered report in arrival order.
    pub fn commit(&mut self) -> Vec<LifecycleEvent> {
        let pending = std::mem::take(&mut self.pending);
        let mut events = Vec::new();
        for report in pending {
            self.apply(report, &mut events);
        }
        events.extend(self.announce_end());
        events
    }

    /// Mark `column` of the current layout as in its end zone.
    pub fn enter_end_zone(&mut self, column: usize) -> Vec<LifecycleEvent> {
        self.apply_now(column, ReportKind::EnteredEndZone)
    }

    /// Mark `column` of the current layout as completed.
    pub fn complete(&mut self, column: usize) -> Vec<LifecycleEvent> {
        self.apply_now(column, ReportKind::Completed)
    }

    /// Start a new cycle of the current layout.
    pub fn replay(&mut self) -> LifecycleEvent {
        if let Some(cycle) = self.cycles.get_mut(&self.signature) {
            cycle.end_zone.clear();
            cycle.completed.clear();
        }
        self.pending.clear();
        self.replay_count += 1;
        self.ended_announced = false;

        let cycle_token = self.cycle_token();
        debug!(%cycle_token, "feed replayed");
        LifecycleEvent::Replayed { cycle_token }
    }

    fn apply_now(
        &mut self,
        column: usize,
        kind: ReportKind,
    ) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();
        let report = LifecycleReport {
            signature: self.signature.clone(),
            column,
            kind,
        };
        self.apply(report, &mut events);
        events.extend(self.announce_end());
        events
    }

    fn apply(
        &mut self,
        report: LifecycleReport,
        events: &mut Vec<LifecycleEvent>,
    ) {
        if report.signature != self.signature {
            trace!(
                stale = %report.signature,
                current = %self.signature,
                column = report.column,
                "ignoring lifecycle report for a previous layout"
            );
            return;
        }
        if report.column >= self.deck_lengths.len() {
            return;
        }
        let column = report.column;
        let cycle = self.cycles.entry(self.signature.clone()).or_default();

        if cycle.end_zone.insert(column) {
            events.push(LifecycleEvent::EnteredEndZone { column });
        }
        if report.kind == ReportKind::Completed
            && cycle.completed.insert(column)
        {
            debug!(column, signature = %self.signature, "column completed");
            events.push(LifecycleEvent::Completed { column });
        }
    }

    fn announce_end(&mut self) -> Option<LifecycleEvent> {
        if !self.deck_ended() {
            self.ended_announced = false;
            return None;
        }
        if self.ended_announced {
            return None;
        }
        self.ended_announced = true;
        let cycle_token = self.cycle_token();
        debug!(%cycle_token, "deck ended");
        Some(LifecycleEvent::DeckEnded { cycle_token })
    }

    fn activate(&mut self, signature: DeckSignature) {
        // A layout coming back starts a fresh cycle.
        self.cycles.insert(signature.clone(), CycleState::default());
        self.history.retain(|s| s != &signature);
        self.history.push_back(signature.clone());
        while self.history.len() > MAX_SHADOWED_LAYOUTS + 1 {
            if let Some(oldest) = self.history.pop_front() {
                self.cycles.remove(&oldest);
            }
        }
        self.signature = signature;
    }
}
