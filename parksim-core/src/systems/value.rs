//! Park valuation and ride capacity figures.

use crate::money::Money;
use crate::park::ParkFlags;
use crate::ride::{ride_rating, segment_length, LifecycleFlags, Ride, RideStatus};
use crate::state::GameState;
use tracing::instrument;

/// Each guest in the park adds this much to the park value.
pub const GUEST_VALUE: Money = Money::gbp(7);

/// Difficult guest generation caps the base suggestion here.
const DIFFICULT_GUEST_CAP: u32 = 1000;
const SUGGESTED_GUESTS_CAP: u32 = 65535;

const GOOD_RIDE_MIN_STATION_LENGTH: i32 = segment_length(600);
const GOOD_RIDE_MIN_EXCITEMENT: i16 = ride_rating(6, 0);

/// Value a single ride contributes to the park.
pub fn calculate_ride_value(ride: &Ride) -> Money {
    if !ride.has_value() {
        return Money::ZERO;
    }
    let customers = ride.customers_in_last_5_minutes() as i64;
    let bonus = ride.traits.bonus_value as i64;
    Money(ride.value as i64 * 10 * (customers + bonus * 4))
}

#[instrument(skip_all, name = "park_value")]
pub fn calculate_park_value(state: &GameState) -> Money {
    let rides: Money = state
        .rides
        .values()
        .filter(|r| r.status == RideStatus::Open)
        .map(calculate_ride_value)
        .sum();
    rides + GUEST_VALUE * state.park.guests_in_park as i64
}

/// Park value less the loan, plus cash, saturating rather than wrapping.
pub fn calculate_company_value(state: &GameState) -> Money {
    let result = state.park.value - state.finance.bank_loan;
    result.saturating_add(state.finance.cash)
}

/// Value for money across open, working rides, counted twice.
#[instrument(skip_all, name = "ride_value_for_money")]
pub fn calculate_total_ride_value_for_money(state: &GameState) -> Money {
    let park = &state.park;
    let subtract_price = park.ride_prices_unlocked() && park.has_money();

    state
        .rides
        .values()
        .filter(|r| r.is_operating() && r.has_value())
        .map(|ride| {
            let mut value = Money(ride.value as i64);
            if subtract_price {
                value -= ride.price;
            }
            value
        })
        .filter(|value| value.is_positive())
        .map(|value| value * 2)
        .sum()
}

/// Tested tracked rides with data logging, a long station and a thrill
/// rating of at least 6.00.
fn is_good_ride(ride: &Ride) -> bool {
    ride.lifecycle.contains(LifecycleFlags::TESTED)
        && ride.traits.has_track
        && ride.traits.has_data_logging
        && ride.station_segment_length >= GOOD_RIDE_MIN_STATION_LENGTH
        && ride.excitement >= GOOD_RIDE_MIN_EXCITEMENT
}

#[instrument(skip_all, name = "suggested_max_guests")]
pub fn calculate_suggested_max_guests(state: &GameState) -> u32 {
    let difficult = state
        .park
        .flags
        .contains(ParkFlags::DIFFICULT_GUEST_GENERATION);

    let mut suggested = 0u32;
    let mut difficult_bonus = 0u32;
    for ride in state.rides.values().filter(|r| r.is_operating()) {
        suggested = suggested.saturating_add(ride.traits.bonus_value);
        if difficult && is_good_ride(ride) {
            difficult_bonus = difficult_bonus.saturating_add(ride.traits.bonus_value * 2);
        }
    }

    if difficult {
        suggested = suggested.min(DIFFICULT_GUEST_CAP);
        suggested = suggested.saturating_add(difficult_bonus);
    }
    suggested.min(SUGGESTED_GUESTS_CAP)
}
