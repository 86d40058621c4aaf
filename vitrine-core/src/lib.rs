//! Personalized multi-column feed engine.
//!
//! The pipeline runs in this order:
//!
//! 1. [`ranking`] reorders the catalog from the viewer's history and taste.
//! 2. [`query`] filters, sorts (stable) and interleaves sponsored products.
//! 3. [`deck`] splits the result round-robin into one deck per column.
//! 4. Each column scrolls with its own [`motion`] and [`pause`] state.
//! 5. [`lifecycle`] tracks finite-feed completion and replays.
//!
//! [`feed::Feed`] wires all of it together for one mount.

pub mod deck;
pub mod feed;
pub mod lifecycle;
pub mod motion;
pub mod pause;
pub mod query;
pub mod ranking;
pub mod signals;

pub use deck::{DeckSignature, build_decks, columns_for_width, deck_signature};
pub use feed::{Column, Feed, PointerEvent};
pub use lifecycle::{
    ColumnPhase, FeedLifecycle, LifecycleEvent, LifecycleReport, ReportKind,
};
pub use motion::{
    ColumnMotion, MotionEvent, MotionState, WheelDelta, WheelMode, normalize,
};
pub use pause::{PauseCoordinator, PauseState, PointerKind};
pub use query::FeedQuery;
pub use ranking::{RankOutcome, Ranked, Ranker, ScoringTerm};
pub use signals::{Menu, Modal, PauseSignal, PauseSignals, SignalReceiver};
