//! Headless driver for the park core.
//!
//! Loads a scenario, feeds its scripted (or replayed) actions into
//! [`parksim_core::tick`] and drains notifications into observers between
//! ticks.

use parksim_core::{Action, GameState, ObserverRegistry, SimConfig, SimMetrics};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Actions keyed by the tick they run on, file order preserved within a tick.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    by_tick: BTreeMap<u32, Vec<Action>>,
}

impl Schedule {
    pub fn new(entries: impl IntoIterator<Item = (u32, Action)>) -> Self {
        let mut by_tick: BTreeMap<u32, Vec<Action>> = BTreeMap::new();
        for (tick, action) in entries {
            by_tick.entry(tick).or_default().push(action);
        }
        Self { by_tick }
    }

    pub fn at(&self, tick: u32) -> &[Action] {
        self.by_tick.get(&tick).map_or(&[], Vec::as_slice)
    }

    pub fn last_tick(&self) -> Option<u32> {
        self.by_tick.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }
}

/// Checksum taken after a tick completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkpoint {
    pub tick: u32,
    pub checksum: u64,
}

/// End-of-run figures printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u32,
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub park_rating: u16,
    pub park_size: u32,
    pub park_value: i64,
    pub cash: i64,
    pub guests_in_park: u32,
    pub guests_heading_for_park: u32,
    pub checksum: u64,
    pub checkpoints: Vec<Checkpoint>,
    pub metrics: SimMetrics,
}

impl RunSummary {
    fn capture(state: &GameState, checkpoints: Vec<Checkpoint>, metrics: SimMetrics) -> Self {
        Self {
            ticks: state.current_ticks,
            year: state.date.year(),
            month: state.date.month(),
            day: state.date.day,
            park_rating: state.park.rating,
            park_size: state.park.size,
            park_value: state.park.value.0,
            cash: state.finance.cash.0,
            guests_in_park: state.park.guests_in_park,
            guests_heading_for_park: state.park.guests_heading_for_park,
            checksum: state.checksum(),
            checkpoints,
            metrics,
        }
    }
}

/// Runs `state` forward `ticks` ticks, returning the final state and summary.
///
/// Notifications are delivered after every tick, so observers see them in
/// the order the core produced them.
pub fn run(
    mut state: GameState,
    schedule: &Schedule,
    ticks: u32,
    sim_config: &SimConfig,
    registry: &mut ObserverRegistry,
) -> (GameState, RunSummary) {
    let mut metrics = SimMetrics::default();
    let mut checkpoints = Vec::new();

    // Anything queued while building the state is not part of the run
    state.notifications.clear();

    for _ in 0..ticks {
        let now = state.current_ticks;
        parksim_core::tick(&mut state, schedule.at(now), Some(&mut metrics));

        let observer_start = Instant::now();
        let pending = state.notifications.drain();
        registry.dispatch(now, &pending);
        metrics.observer_time += observer_start.elapsed();

        if sim_config.checksum_due(state.current_ticks) {
            let checksum = state.checksum();
            log::debug!(
                "Checksum at tick {}: {:016x}",
                state.current_ticks,
                checksum
            );
            checkpoints.push(Checkpoint {
                tick: state.current_ticks,
                checksum,
            });
        }
    }

    log::info!(
        "Ran {} ticks in {:.1} ms ({:.0} ticks/s, {} actions committed, {} rejected)",
        metrics.total_ticks,
        metrics.total_time.as_secs_f64() * 1000.0,
        metrics.ticks_per_second(),
        metrics.actions_committed,
        metrics.actions_rejected
    );

    let summary = RunSummary::capture(&state, checkpoints, metrics);
    (state, summary)
}
