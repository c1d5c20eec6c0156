//! Weekly history snapshot.

use crate::observer::{Intent, Panel};
use crate::park::GuestChangeModifier;
use crate::state::GameState;
use tracing::instrument;

/// Week-over-week guest change needed to show a trend.
const GUEST_TREND_THRESHOLD: i64 = 20;

pub fn guest_change_modifier(this_week: u32, last_week: u32) -> GuestChangeModifier {
    let change = this_week as i64 - last_week as i64;
    if change <= -GUEST_TREND_THRESHOLD {
        GuestChangeModifier::Falling
    } else if change < GUEST_TREND_THRESHOLD {
        GuestChangeModifier::Steady
    } else {
        GuestChangeModifier::Rising
    }
}

/// Pushes this week's figures onto every history and resets the weekly
/// profit average.
#[instrument(skip_all, name = "update_histories")]
pub fn update_histories(state: &mut GameState) {
    let park = &mut state.park;
    park.guest_change_modifier =
        guest_change_modifier(park.guests_in_park, park.guests_in_park_last_week);
    park.guests_in_park_last_week = park.guests_in_park;

    park.histories.rating.push((park.rating / 4) as u8);
    park.histories.guests.push(park.guests_in_park);

    let finance = &mut state.finance;
    park.histories
        .cash
        .push(finance.cash.saturating_sub(finance.bank_loan));
    park.histories
        .weekly_profit
        .push(finance.take_weekly_profit_average());
    park.histories.park_value.push(park.value);
    finance.close_week();

    log::debug!(
        "Weekly history: rating {}, guests {}, trend {:?}",
        park.rating,
        park.guests_in_park,
        park.guest_change_modifier
    );

    state.notifications.broadcast(Intent::UpdateGuestCount);
    state.notifications.invalidate(Panel::ParkInformation);
    state.notifications.invalidate(Panel::Finances);
}
