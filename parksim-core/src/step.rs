use crate::actions::{Action, ActionResult, GameAction, GameActions};
use crate::metrics::SimMetrics;
use crate::state::GameState;
use crate::systems;
use std::time::Instant;
use tracing::instrument;

/// Advances `state` by one tick in place.
///
/// Order within a tick:
/// 1. queued actions, in submission order, through [`GameActions::execute`];
/// 2. the date;
/// 3. the daily profit roll-up on a new day;
/// 4. the park systems;
/// 5. the tick counter.
///
/// Returns one result per action.
#[instrument(skip_all, name = "tick")]
pub fn tick(
    state: &mut GameState,
    actions: &[Action],
    mut metrics: Option<&mut SimMetrics>,
) -> Vec<ActionResult> {
    let start = Instant::now();

    let results: Vec<ActionResult> = actions
        .iter()
        .map(|action| {
            let result = GameActions::execute(state, action);
            if let Err(e) = result.clone().into_result() {
                log::warn!(
                    "Tick {}: {} failed: {}",
                    state.current_ticks,
                    action.kind().name(),
                    e
                );
            }
            result
        })
        .collect();
    let action_time = start.elapsed();

    let events = state.date.update();
    if events.day_start {
        state.finance.update_daily_profit();
    }
    if events.month_start {
        log::debug!(
            "Month {} of year {} begins",
            state.date.month() + 1,
            state.date.year()
        );
    }

    let park_start = Instant::now();
    let guests = systems::run_park_update(state);
    let park_update_time = park_start.elapsed();

    state.current_ticks = state.current_ticks.wrapping_add(1);

    if let Some(m) = metrics.as_deref_mut() {
        m.total_ticks += 1;
        m.total_time += start.elapsed();
        m.action_time += action_time;
        m.park_update_time += park_update_time;
        m.guests_generated += guests as u64;
        let committed = results.iter().filter(|r| r.is_ok()).count() as u64;
        m.actions_committed += committed;
        m.actions_rejected += results.len() as u64 - committed;
    }

    results
}

/// Advance the world by one tick, leaving the input untouched.
pub fn step_world(state: &GameState, actions: &[Action]) -> (GameState, Vec<ActionResult>) {
    let mut new_state = state.clone();
    let results = tick(&mut new_state, actions, None);
    (new_state, results)
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
