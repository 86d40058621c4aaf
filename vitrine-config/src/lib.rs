//! Shared configuration library for Vitrine.
//!
//! This crate centralizes the feed tuning model (scroll physics, lifecycle
//! thresholds, responsive breakpoints, sponsored placement and scoring
//! term weights), its loading from environment/files, and the guard rails
//! every loaded config must pass before the feed engine consumes it.

pub mod loader;
pub mod models;
pub mod telemetry;
pub mod validation;

pub use loader::FeedConfigSource;
pub use models::{
    FeedConfig, LayoutSettings, LifecycleSettings, MotionSettings,
    ScoringSettings, SpeedMode, SponsoredSettings,
};
pub use validation::FeedConfigError;
