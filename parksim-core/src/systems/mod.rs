//! Park simulation systems.
//!
//! [`run_park_update`] is the once-per-tick entry point. It runs each system
//! on its own cadence:
//!
//! | Cadence              | Work                                             |
//! |----------------------|--------------------------------------------------|
//! | week start           | history snapshot                                 |
//! | `ticks % 512 == 0`   | rating, values, capacity, generation probability |
//! | `ticks % 4096 == 0`  | park size                                        |
//! | every tick           | guest arrival at the gate, guest generation      |

pub mod arrival;
pub mod generation;
pub mod history;
pub mod land_rights;
pub mod rating;
pub mod value;

pub use arrival::{enter_park, update_arriving_guests};
pub use generation::{
    calculate_guest_generation_probability, generate_guest, generate_guests,
};
pub use history::update_histories;
pub use land_rights::{
    calculate_park_size, count_remaining_land_rights, update_fences, update_fences_around_tile,
    update_park_size,
};
pub use rating::calculate_park_rating;
pub use value::{
    calculate_company_value, calculate_park_value, calculate_suggested_max_guests,
    calculate_total_ride_value_for_money,
};

use crate::observer::{Intent, Panel};
use crate::state::GameState;
use tracing::instrument;

pub const CORE_METRICS_INTERVAL: u32 = 512;
pub const PARK_SIZE_INTERVAL: u32 = 4096;

/// Recomputes every derived park figure, in dependency order.
#[instrument(skip_all, name = "core_metrics")]
pub fn update_core_metrics(state: &mut GameState) {
    state.park.rating = calculate_park_rating(state);
    state.park.value = calculate_park_value(state);
    state.park.company_value = calculate_company_value(state);
    state.park.total_ride_value_for_money = calculate_total_ride_value_for_money(state);
    state.park.suggested_guest_maximum = calculate_suggested_max_guests(state);
    state.park.guest_generation_probability = calculate_guest_generation_probability(state);

    log::trace!(
        "Park metrics: rating {}, value {}, probability {}",
        state.park.rating,
        state.park.value,
        state.park.guest_generation_probability
    );

    state.notifications.invalidate(Panel::Finances);
    state.notifications.broadcast(Intent::UpdateParkRating);
}

/// Runs the park systems due this tick. Returns guests generated.
#[instrument(skip_all, name = "park_update")]
pub fn run_park_update(state: &mut GameState) -> u32 {
    if state.date.is_week_start() {
        update_histories(state);
    }

    let ticks = state.current_ticks;
    if ticks % CORE_METRICS_INTERVAL == 0 {
        update_core_metrics(state);
    }

    if ticks % PARK_SIZE_INTERVAL == 0 {
        update_park_size(state);
    }

    update_arriving_guests(state);
    generate_guests(state)
}

/// Overrides the rating (or clears the override) and recomputes it now.
pub fn set_forced_rating(state: &mut GameState, rating: Option<u16>) {
    state.park.forced_rating = rating;
    state.park.rating = calculate_park_rating(state);
    state.notifications.broadcast(Intent::UpdateParkRating);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::Notification;
    use crate::testing::GameStateBuilder;

    #[test]
    fn test_core_metrics_cadence() {
        let mut state = GameStateBuilder::new().with_guests_in_park(200, 255).build();
        state.current_ticks = 1;
        run_park_update(&mut state);
        assert_eq!(state.park.rating, 0);

        state.current_ticks = 1024;
        run_park_update(&mut state);
        assert!(state.park.rating > 0);
        assert!(state
            .notifications
            .contains(&Notification::Broadcast(Intent::UpdateParkRating)));
        assert!(state
            .notifications
            .contains(&Notification::Invalidate(Panel::Finances)));
    }

    #[test]
    fn test_core_metrics_chain() {
        let mut state = GameStateBuilder::new()
            .with_money(crate::money::Money::gbp(100))
            .with_guests_in_park(10, 255)
            .build();
        update_core_metrics(&mut state);
        // Company value is derived from the freshly computed park value
        assert_eq!(
            state.park.company_value,
            state.park.value + state.finance.cash - state.finance.bank_loan
        );
        assert_eq!(
            state.park.guest_generation_probability,
            calculate_guest_generation_probability(&state)
        );
    }

    #[test]
    fn test_park_size_cadence() {
        let mut state = GameStateBuilder::new()
            .map_size(10)
            .with_owned_tiles(2, 2, 3, 3)
            .build();
        state.current_ticks = 512;
        run_park_update(&mut state);
        assert_eq!(state.park.size, 0);

        state.current_ticks = 4096;
        run_park_update(&mut state);
        assert_eq!(state.park.size, 4);
    }

    #[test]
    fn test_forced_rating() {
        let mut state = GameStateBuilder::new().build();
        set_forced_rating(&mut state, Some(777));
        assert_eq!(state.park.rating, 777);
        assert!(state
            .notifications
            .contains(&Notification::Broadcast(Intent::UpdateParkRating)));

        set_forced_rating(&mut state, None);
        assert_eq!(state.park.rating, 0);
    }
}
