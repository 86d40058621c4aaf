//! The mounted feed: ranking, querying, deck layout and one scrolling
//! column per deck.
//!
//! All work happens on the caller's thread, driven by [`Feed::tick`]. Every
//! column advances from the state it settled in on the previous tick;
//! lifecycle milestones are buffered while the columns run and committed
//! once all of them have ticked.

use std::time::Duration;

use tracing::{debug, trace, warn};
use vitrine_config::{FeedConfig, SpeedMode};
use vitrine_model::{FeedSignals, Product, ProductId};

use crate::deck::{
    DeckSignature, build_decks, columns_for_width, deck_signature,
};
use crate::lifecycle::{
    FeedLifecycle, LifecycleEvent, LifecycleReport, ReportKind,
};
use crate::motion::{ColumnMotion, MotionEvent, WheelDelta};
use crate::pause::{PauseCoordinator, PointerKind};
use crate::query::FeedQuery;
use crate::ranking::{RankOutcome, Ranker};
use crate::signals::PauseSignals;

/// Pointer input routed to a single column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter(PointerKind),
    Leave,
    Down { y: f64 },
    Move { y: f64 },
    Up,
}

/// One deck on screen with its own motion and pause state.
#[derive(Debug, Clone)]
pub struct Column {
    deck_len: usize,
    motion: ColumnMotion,
    pause: PauseCoordinator,
}

impl Column {
    fn new(
        deck_len: usize,
        config: &FeedConfig,
        signals: &PauseSignals,
    ) -> Self {
        let motion =
            ColumnMotion::new(config.motion.clone(), &config.lifecycle);
        Self {
            deck_len,
            motion,
            pause: PauseCoordinator::new(
                config.motion.interaction_cooldown(),
                Some(signals.subscribe()),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.deck_len
    }

    pub fn is_empty(&self) -> bool {
        self.deck_len == 0
    }

    pub fn motion(&self) -> &ColumnMotion {
        &self.motion
    }

    pub fn pause(&self) -> &PauseCoordinator {
        &self.pause
    }

    pub fn is_advancing(&self) -> bool {
        self.pause.is_advancing()
    }
}

#[derive(Debug)]
pub struct Feed {
    config: FeedConfig,
    ranker: Ranker,
    catalog: Vec<Product>,
    signals: FeedSignals,
    query: FeedQuery,
    /// `None` once unmounted
    pause_signals: Option<PauseSignals>,
    viewport_width: f32,
    page_height: f64,
    rank_outcome: RankOutcome,
    ordered: Vec<Product>,
    decks: Vec<Vec<Product>>,
    columns: Vec<Column>,
    lifecycle: FeedLifecycle,
}

impl Feed {
    /// Rank, query and lay out `products` for the current viewport.
    ///
    /// A config that fails validation is replaced by the defaults.
    pub fn mount(
        products: Vec<Product>,
        signals: &FeedSignals,
        query: &FeedQuery,
        config: FeedConfig,
        viewport_width: f32,
        pause_signals: &PauseSignals,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(%err, "invalid feed config, using defaults");
                FeedConfig::default()
            }
        };
        let ranker = Ranker::new(config.scoring.clone());
        let column_count = columns_for_width(viewport_width, &config.layout);
        let (ordered, rank_outcome) =
            order_catalog(&ranker, &config, products.clone(), signals, query);
        let decks = build_decks(ordered.clone(), column_count);
        let signature = deck_signature(&decks);
        let columns = decks
            .iter()
            .map(|deck| Column::new(deck.len(), &config, pause_signals))
            .collect();
        let lifecycle = FeedLifecycle::new(signature, deck_lengths(&decks));

        debug!(
            products = ordered.len(),
            columns = column_count,
            ?rank_outcome,
            signature = %lifecycle.signature(),
            "feed mounted"
        );

        Self {
            config,
            ranker,
            catalog: products,
            signals: signals.clone(),
            query: query.clone(),
            pause_signals: Some(pause_signals.clone()),
            viewport_width,
            page_height: 0.0,
            rank_outcome,
            ordered,
            decks,
            columns,
            lifecycle,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.pause_signals.is_some()
    }

    /// Advance every column by `dt` and return the lifecycle changes it
    /// caused.
    pub fn tick(&mut self, dt: Duration) -> Vec<LifecycleEvent> {
        if !self.is_mounted() {
            return Vec::new();
        }

        let signature = self.lifecycle.signature().clone();
        for (index, column) in self.columns.iter_mut().enumerate() {
            let paused = !column.pause.is_advancing();
            let events = column.motion.tick(dt, paused);
            column.pause.advance(dt);

            if column.is_empty() {
                continue;
            }
            for event in events {
                let kind = match event {
                    MotionEvent::EnteredEndZone => ReportKind::EnteredEndZone,
                    MotionEvent::Completed => ReportKind::Completed,
                };
                self.lifecycle.queue(LifecycleReport {
                    signature: signature.clone(),
                    column: index,
                    kind,
                });
            }
        }
        self.lifecycle.commit()
    }

    /// Route a wheel event. Returns whether the column moved.
    pub fn wheel(&mut self, column: usize, delta: WheelDelta) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(column) = self.columns.get_mut(column) else {
            return false;
        };
        let blocked = column.pause.blocks_direct_input();
        let moved = column.motion.apply_wheel(delta, blocked);
        if moved {
            column.pause.note_interaction();
        }
        moved
    }

    /// Route a pointer event. Returns whether the column moved or a drag
    /// ended.
    pub fn pointer(&mut self, column: usize, event: PointerEvent) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(column) = self.columns.get_mut(column) else {
            return false;
        };

        match event {
            PointerEvent::Enter(kind) => {
                column.pause.pointer_enter(kind);
                false
            }
            PointerEvent::Leave => {
                column.pause.pointer_leave();
                false
            }
            PointerEvent::Down { y } => {
                column.motion.begin_drag(y);
                false
            }
            PointerEvent::Move { y } => {
                let blocked = column.pause.blocks_direct_input();
                let moved = column.motion.drag_to(y, blocked);
                if moved {
                    column.pause.note_interaction();
                }
                moved
            }
            PointerEvent::Up => column.motion.end_drag(),
        }
    }

    /// Record the measured height of one pass through a column's deck.
    pub fn set_loop_height(&mut self, column: usize, loop_height: f64) {
        if !self.is_mounted() {
            return;
        }
        if let Some(column) = self.columns.get_mut(column) {
            column.motion.set_loop_height(loop_height);
        }
    }

    /// Visible column height, used for page-mode wheel deltas.
    pub fn set_page_height(&mut self, page_height: f64) {
        if !self.is_mounted() {
            return;
        }
        self.page_height = page_height;
        for column in &mut self.columns {
            column.motion.set_page_height(page_height);
        }
    }

    pub fn set_speed_mode(&mut self, mode: SpeedMode) {
        if !self.is_mounted() {
            return;
        }
        self.config.motion.speed_mode = mode;
        for column in &mut self.columns {
            column.motion.set_speed_mode(mode);
        }
    }

    /// Recompute the column count for a new viewport width. Returns whether
    /// the deck layout was rebuilt.
    pub fn resize(&mut self, viewport_width: f32) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.viewport_width = viewport_width;
        let count = columns_for_width(viewport_width, &self.config.layout);
        if count == self.decks.len() {
            return false;
        }
        debug!(from = self.decks.len(), to = count, "column count changed");
        self.layout(self.ordered.clone(), count)
    }

    /// Swap in a new catalog. Returns whether the deck layout changed.
    pub fn replace_catalog(&mut self, products: Vec<Product>) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.catalog = products;
        self.reorder()
    }

    /// Apply updated viewer signals, e.g. once hydration finishes.
    pub fn update_signals(&mut self, signals: &FeedSignals) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.signals = signals.clone();
        self.reorder()
    }

    pub fn set_query(&mut self, query: &FeedQuery) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.query = query.clone();
        self.reorder()
    }

    /// Note that the viewer opened `id`.
    ///
    /// The id moves to the front of the loaded history and, when the product
    /// is in the catalog, its category and tags are nudged by `taste_delta`.
    /// Pending signals are left alone. Returns whether the deck layout
    /// changed.
    pub fn record_view(&mut self, id: &ProductId, taste_delta: f32) -> bool {
        if !self.is_mounted() {
            return false;
        }
        if let Some(history) = self.signals.recently_viewed.loaded_mut() {
            history.record(id.clone());
        }
        let product = self.catalog.iter().find(|product| &product.id == id);
        if let Some(product) = product
            && let Some(taste) = self.signals.taste.loaded_mut()
        {
            taste.nudge_from_product(product, taste_delta);
        }
        trace!(%id, taste_delta, "view recorded");
        self.reorder()
    }

    /// Start the deck over. Returns the new cycle token event.
    pub fn replay(&mut self) -> Option<LifecycleEvent> {
        if !self.is_mounted() {
            return None;
        }
        for column in &mut self.columns {
            column.motion.reset_cycle();
        }
        Some(self.lifecycle.replay())
    }

    /// Tear down. Signal receivers are dropped and every later call is a
    /// no-op.
    pub fn unmount(&mut self) {
        if self.pause_signals.take().is_none() {
            return;
        }
        for column in &mut self.columns {
            column.pause.detach();
        }
        self.columns.clear();
        debug!(signature = %self.lifecycle.signature(), "feed unmounted");
    }

    pub fn cycle_token(&self) -> String {
        self.lifecycle.cycle_token()
    }

    pub fn deck_ended(&self) -> bool {
        self.is_mounted() && self.lifecycle.deck_ended()
    }

    pub fn decks(&self) -> &[Vec<Product>] {
        &self.decks
    }

    /// Ranked, filtered, sorted and interleaved products.
    pub fn ordered(&self) -> &[Product] {
        &self.ordered
    }

    pub fn rank_outcome(&self) -> RankOutcome {
        self.rank_outcome
    }

    pub fn signature(&self) -> &DeckSignature {
        self.lifecycle.signature()
    }

    pub fn lifecycle(&self) -> &FeedLifecycle {
        &self.lifecycle
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The feed's own copy of the viewer signals.
    pub fn signals(&self) -> &FeedSignals {
        &self.signals
    }

    fn reorder(&mut self) -> bool {
        let (ordered, outcome) = order_catalog(
            &self.ranker,
            &self.config,
            self.catalog.clone(),
            &self.signals,
            &self.query,
        );
        self.rank_outcome = outcome;
        let count =
            columns_for_width(self.viewport_width, &self.config.layout);
        self.layout(ordered, count)
    }

    fn layout(&mut self, ordered: Vec<Product>, count: usize) -> bool {
        let decks = build_decks(ordered.clone(), count);
        let signature = deck_signature(&decks);
        self.ordered = ordered;
        if &signature == self.lifecycle.signature() {
            trace!(%signature, "deck layout unchanged");
            return false;
        }

        let Some(pause_signals) = &self.pause_signals else {
            return false;
        };
        let page_height = self.page_height;
        self.columns = decks
            .iter()
            .map(|deck| {
                let mut column =
                    Column::new(deck.len(), &self.config, pause_signals);
                column.motion.set_page_height(page_height);
                column
            })
            .collect();
        self.lifecycle.set_deck(signature, deck_lengths(&decks));
        self.lifecycle.set_visible_columns(decks.len());
        self.decks = decks;
        debug!(
            columns = self.decks.len(),
            signature = %self.lifecycle.signature(),
            "deck layout rebuilt"
        );
        true
    }
}

/// Rank first, then query. The sorts are stable, so an explicit sort order
/// wins and the personalized order only breaks its ties.
fn order_catalog(
    ranker: &Ranker,
    config: &FeedConfig,
    products: Vec<Product>,
    signals: &FeedSignals,
    query: &FeedQuery,
) -> (Vec<Product>, RankOutcome) {
    let ranked = ranker.rank(products, signals);
    let ordered = query.apply(ranked.products, &config.sponsored);
    (ordered, ranked.outcome)
}

fn deck_lengths(decks: &[Vec<Product>]) -> Vec<usize> {
    decks.iter().map(Vec::len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::{
        RecentlyViewed, SortOption, TASTE_WEIGHT_LIMIT, TasteProfile,
    };

    fn id(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn catalog(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                let raw = format!("p{i}");
                Product::new(id(&raw), raw, "Tech", i as f64)
                    .with_tags(["gadget"])
            })
            .collect()
    }

    fn mount(n: usize, width: f32, signals: &PauseSignals) -> Feed {
        Feed::mount(
            catalog(n),
            &FeedSignals::default(),
            &FeedQuery::new().with_sort(SortOption::Newest),
            FeedConfig::default(),
            width,
            signals,
        )
    }

    #[test]
    fn mount_builds_one_column_per_deck() {
        let feed = mount(7, 800.0, &PauseSignals::new());
        assert_eq!(feed.decks().len(), 3);
        assert_eq!(feed.columns().len(), 3);
        assert_eq!(feed.column(0).map(Column::len), Some(3));
        assert_eq!(feed.rank_outcome(), RankOutcome::Pending);
    }

    #[test]
    fn wheel_is_blocked_by_modal_but_not_hover() {
        let signals = PauseSignals::new();
        let mut feed = mount(4, 800.0, &signals);
        feed.set_loop_height(0, 1000.0);

        feed.pointer(0, PointerEvent::Enter(PointerKind::Mouse));
        assert!(feed.wheel(0, WheelDelta::pixels(10.0)));

        signals.modal.set_open(true);
        assert!(!feed.wheel(0, WheelDelta::pixels(10.0)));
    }

    #[test]
    fn drag_is_blocked_by_modal_but_not_hover() {
        let signals = PauseSignals::new();
        let mut feed = mount(4, 800.0, &signals);
        feed.set_loop_height(0, 1000.0);

        feed.pointer(0, PointerEvent::Enter(PointerKind::Mouse));
        feed.pointer(0, PointerEvent::Down { y: 100.0 });
        assert!(feed.pointer(0, PointerEvent::Move { y: 80.0 }));
        let position = feed.column(0).unwrap().motion().position();
        assert!(position > 0.0);

        signals.modal.set_open(true);
        assert!(!feed.pointer(0, PointerEvent::Move { y: 60.0 }));
        assert_eq!(feed.column(0).unwrap().motion().position(), position);
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut config = FeedConfig::default();
        config.motion.manual_decay_rate = -1.0;
        assert!(config.validate().is_err());

        let signals = PauseSignals::new();
        let mut feed = Feed::mount(
            catalog(4),
            &FeedSignals::default(),
            &FeedQuery::new(),
            config,
            800.0,
            &signals,
        );
        assert_eq!(feed.config(), &FeedConfig::default());

        feed.set_loop_height(0, 1000.0);
        assert!(feed.wheel(0, WheelDelta::pixels(20.0)));
        for _ in 0..200 {
            feed.tick(Duration::from_millis(250));
        }
        let velocity = feed.column(0).unwrap().motion().manual_velocity();
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn record_view_updates_loaded_signals() {
        let signals = FeedSignals::loaded(
            RecentlyViewed::from_ids([id("p1")]),
            TasteProfile::new(),
        );
        let mut feed = Feed::mount(
            catalog(6),
            &signals,
            &FeedQuery::new(),
            FeedConfig::default(),
            800.0,
            &PauseSignals::new(),
        );

        feed.record_view(&id("p4"), 100.0);

        let history = feed.signals().recently_viewed.loaded().unwrap();
        assert_eq!(history.ids(), &[id("p4"), id("p1")]);
        let taste = feed.signals().taste.loaded().unwrap();
        assert_eq!(taste.category_weight("tech"), TASTE_WEIGHT_LIMIT);
        assert_eq!(taste.tag_weight("gadget"), TASTE_WEIGHT_LIMIT);
    }

    #[test]
    fn record_view_leaves_pending_signals_alone() {
        let mut feed = mount(6, 800.0, &PauseSignals::new());
        assert!(!feed.record_view(&id("p2"), 5.0));
        assert!(feed.signals().recently_viewed.loaded().is_none());
        assert!(feed.signals().taste.loaded().is_none());
    }

    #[test]
    fn resize_rebuilds_only_when_column_count_changes() {
        let mut feed = mount(10, 800.0, &PauseSignals::new());
        let before = feed.signature().clone();
        assert!(!feed.resize(900.0));
        assert!(feed.resize(1600.0));
        assert_eq!(feed.decks().len(), 5);
        assert_ne!(feed.signature(), &before);
    }

    #[test]
    fn unmount_turns_everything_into_a_no_op() {
        let mut feed = mount(4, 800.0, &PauseSignals::new());
        feed.set_loop_height(0, 100.0);
        feed.unmount();

        assert!(!feed.wheel(0, WheelDelta::pixels(10.0)));
        assert!(feed.tick(Duration::from_millis(16)).is_empty());
        assert!(feed.replay().is_none());
        assert!(!feed.resize(1600.0));
        assert!(!feed.deck_ended());
        assert!(feed.columns().is_empty());
    }
}
