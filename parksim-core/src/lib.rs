//! # Park Simulation Core
//!
//! Deterministic simulation of a theme park's economy and land.
//!
//! This crate implements the core loop: state → actions → state transitions.
//! It is designed for lockstep multiplayer and replay determinism: integer
//! money, a seeded ChaCha RNG drawn in a fixed order, and a checksum over
//! everything that feeds the next tick.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Scenario   │────▶│   Actions    │────▶│    tick     │
//! │  / players  │     │ (validated)  │     │ (systems)   │
//! └─────────────┘     └──────────────┘     └──────┬──────┘
//!                                                 │
//!                     ┌──────────────┐     ┌──────▼──────┐
//!                     │  Observers   │◀────│  GameState  │
//!                     │  (side fx)   │     │ + queue     │
//!                     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`GameState`] | Complete simulation state (map, park, finance, guests, rides) |
//! | [`Action`] | Validated mutations (land rights, park parameters, fees, demolition) |
//! | [`GameActions`] | Dispatcher: pause/editor gates, affordability, payment |
//! | [`tick`] / [`step_world`] | Advance one tick in place / by value |
//! | [`ParkObserver`] | Trait for consuming notifications (panels, audio, network) |
//!
//! ## Observers
//!
//! Side effects are queued on the state as [`Notification`]s and drained into
//! an [`ObserverRegistry`]:
//! - [`ConsoleObserver`]: Logs notifications
//! - [`ReplayRecorder`]: Writes committed actions as JSONL
//! - [`SimMetrics`]: Performance and activity counters

pub mod actions;
pub mod config;
pub mod coords;
pub mod entities;
pub mod finance;
pub mod history;
pub mod management;
pub mod map;
pub mod metrics;
pub mod money;
pub mod observer;
pub mod park;
pub mod ride;
pub mod rng;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;

pub use actions::{
    Action, ActionError, ActionKind, ActionPacket, ActionResult, ActionStatus, GameAction,
    GameActions, StringId,
};
pub use config::{ConfigError, ScenarioConfig, SimConfig};
pub use coords::{CoordsXY, CoordsXYZ, MapRange};
pub use metrics::SimMetrics;
pub use money::Money;
pub use observer::{
    ConsoleObserver, Notification, ObserverRegistry, ParkObserver, ReplayRecorder,
};
pub use state::GameState;
pub use step::{step_world, tick};
