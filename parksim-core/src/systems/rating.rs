//! Park rating (0–999).
//!
//! Starts from a base of 1150 (1050 with difficult rating) and subtracts the
//! shortfall in each category. An empty park with no rides and no litter
//! lands on exactly zero.

use crate::entities::LITTER_RATING_AGE;
use crate::park::{ParkFlags, MAX_PARK_RATING};
use crate::state::GameState;
use tracing::instrument;

const BASE_RATING: i32 = 1150;
const DIFFICULT_BASE_RATING: i32 = 1050;

/// Lost guests tolerated before the rating suffers.
const FREE_LOST_GUESTS: i32 = 25;

/// Ideal average excitement and intensity, in eighths of a rating point.
const IDEAL_EXCITEMENT: i32 = 46;
const IDEAL_INTENSITY: i32 = 65;

#[instrument(skip_all, name = "park_rating")]
pub fn calculate_park_rating(state: &GameState) -> u16 {
    if let Some(forced) = state.park.forced_rating {
        return forced;
    }

    let park = &state.park;
    let mut result = if park.flags.contains(ParkFlags::DIFFICULT_PARK_RATING) {
        DIFFICULT_BASE_RATING
    } else {
        BASE_RATING
    };

    result += guest_adjustment(state);
    result += ride_adjustment(state);
    result += litter_adjustment(state);
    result -= park.rating_casualty_penalty as i32;

    result.clamp(0, MAX_PARK_RATING as i32) as u16
}

/// −150…+3 for headcount, −500…0 for happiness, minus lost guests.
fn guest_adjustment(state: &GameState) -> i32 {
    let guests_in_park = state.park.guests_in_park;
    let mut result = -(150 - (guests_in_park.min(2000) / 13) as i32);

    let inside = state.guests.iter().filter(|g| !g.outside_of_park);
    let (happy, lost) = inside.fold((0u32, 0i32), |(happy, lost), g| {
        (happy + g.is_happy() as u32, lost + g.is_lost() as i32)
    });

    result -= 500;
    if guests_in_park > 0 {
        result += 2 * (250u32.min(happy * 300 / guests_in_park)) as i32;
    }

    if lost > FREE_LOST_GUESTS {
        result -= (lost - FREE_LOST_GUESTS) * 7;
    }
    result
}

/// Uptime, excitement/intensity balance and total thrills.
fn ride_adjustment(state: &GameState) -> i32 {
    let mut ride_count = 0i32;
    let mut rated_count = 0i32;
    let mut total_uptime = 0i32;
    let mut total_excitement = 0i32;
    let mut total_intensity = 0i32;

    for ride in state.rides.values() {
        total_uptime += 100 - ride.downtime as i32;
        if ride.has_ratings() {
            total_excitement += ride.excitement as i32 / 8;
            total_intensity += ride.intensity as i32 / 8;
            rated_count += 1;
        }
        ride_count += 1;
    }

    let mut result = -200;
    if ride_count > 0 {
        result += (total_uptime / ride_count) * 2;
    }

    result -= 100;
    if rated_count > 0 {
        let excitement_miss = ((total_excitement / rated_count - IDEAL_EXCITEMENT).abs() / 2).min(50);
        let intensity_miss = ((total_intensity / rated_count - IDEAL_INTENSITY).abs() / 2).min(50);
        result += 100 - excitement_miss - intensity_miss;
    }

    let total_excitement = total_excitement.min(1000);
    let total_intensity = total_intensity.min(1000);
    result -= 200 - (total_excitement + total_intensity) / 10;
    result
}

/// −600 with 150+ old litter items, down to 0 with none.
fn litter_adjustment(state: &GameState) -> i32 {
    let old_litter = state
        .litter
        .iter()
        .filter(|l| l.age(state.current_ticks) >= LITTER_RATING_AGE)
        .count()
        .min(150) as i32;
    -(600 - 4 * (150 - old_litter))
}
