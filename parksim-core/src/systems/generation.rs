//! Guest generation: the per-tick spawn roll and campaign extras.
//!
//! Draws from the scenario RNG happen in a fixed order each tick:
//!
//! 1. the spawn trigger, `next_u32() & 0xFFFF`;
//! 2. if a guest spawns, the spawn point index;
//! 3. per active campaign, in list order, one roll below 65535 followed by
//!    a spawn point index when it succeeds.
//!
//! Replays depend on this order.

use crate::entities::{Guest, GuestId, GuestState};
use crate::management::{CampaignKind, MarketingCampaign};
use crate::money::Money;
use crate::observer::Intent;
use crate::park::ParkFlags;
use crate::ride::RideId;
use crate::state::GameState;
use tracing::instrument;

/// Guests in and heading for the park beyond which generation slows.
const CROWDED_PARK_GUESTS: u32 = 7000;

/// Difficult generation stops spawning this far above the suggestion.
const DIFFICULT_HEADROOM: u32 = 150;

/// Arriving guests enter once within this distance of the gate.
const ENTRY_DESTINATION_TOLERANCE: u8 = 5;

#[instrument(skip_all, name = "guest_generation_probability")]
pub fn calculate_guest_generation_probability(state: &GameState) -> u32 {
    let park = &state.park;
    let difficult = park.flags.contains(ParkFlags::DIFFICULT_GUEST_GENERATION);

    let mut probability = 50 + (park.rating as i32 - 200).clamp(0, 650) as u32;

    let guests = park.total_guests();
    if guests > park.suggested_guest_maximum {
        probability /= 4;
        if difficult {
            probability /= 4;
        }
    }

    if guests > CROWDED_PARK_GUESTS {
        probability /= 4;
    }

    let entrance_fee = park.effective_entrance_fee();
    if entrance_fee > park.total_ride_value_for_money {
        probability /= 4;
        if entrance_fee / 2 > park.total_ride_value_for_money {
            probability /= 4;
        }
    }

    // Applied one award at a time; order matters
    for award in &state.awards {
        if award.kind.is_positive() {
            probability += probability / 4;
        } else {
            probability -= probability / 4;
        }
    }

    probability
}

/// Chance out of 65535 that a campaign pulls in a guest this tick.
///
/// Vouchers that save the guest next to nothing are much less effective.
pub fn campaign_guest_generation_probability(state: &GameState, campaign: &MarketingCampaign) -> u32 {
    let probability = campaign.kind.base_probability();
    let fee = state.park.effective_entrance_fee();
    let weak = match campaign.kind {
        CampaignKind::ParkEntryFree => fee < Money::gbp(4),
        CampaignKind::ParkEntryHalfPrice => fee < Money::gbp(6),
        CampaignKind::RideFree => campaign
            .ride_id
            .and_then(|id: RideId| state.rides.get(&id))
            .map_or(true, |ride| ride.price < Money::gbp_tenths(0, 3)),
        _ => false,
    };
    if weak {
        probability / 8
    } else {
        probability
    }
}

/// Creates a guest at a random spawn point, walking into the park.
///
/// Returns `None` without drawing when there are no spawn points.
pub fn generate_guest(state: &mut GameState) -> Option<GuestId> {
    let index = state.rng.next_index(state.peep_spawns.len())?;
    let spawn = state.peep_spawns[index];

    let direction = spawn.direction.reverse();
    let location = spawn.location();
    let id = state.next_guest_id;
    state.next_guest_id = state.next_guest_id.wrapping_add(1);

    let park = &state.park;
    state.guests.push(Guest {
        id,
        location,
        direction,
        orientation: direction.raw() << 3,
        destination: location.xy().to_tile_centre(),
        destination_tolerance: ENTRY_DESTINATION_TOLERANCE,
        state: GuestState::EnteringPark,
        outside_of_park: true,
        happiness: park.guest_initial_happiness,
        leaving_park: false,
        lost_countdown: 0,
        cash: park.guest_initial_cash,
        hunger: park.guest_initial_hunger,
        thirst: park.guest_initial_thirst,
        campaign: None,
    });

    state.park.guests_heading_for_park = state.park.guests_heading_for_park.saturating_add(1);
    state.notifications.broadcast(Intent::UpdateGuestCount);
    log::trace!("Guest {} spawned at ({}, {})", id, location.x, location.y);
    Some(id)
}

fn generate_guest_from_campaign(state: &mut GameState, kind: CampaignKind) -> Option<GuestId> {
    let id = generate_guest(state)?;
    if let Some(guest) = state.guests.last_mut() {
        guest.campaign = Some(kind);
    }
    Some(id)
}

/// Runs the per-tick spawn roll and every campaign roll.
///
/// Returns the number of guests created.
#[instrument(skip_all, name = "generate_guests")]
pub fn generate_guests(state: &mut GameState) -> u32 {
    let mut generated = 0;

    let roll = state.rng.next_u32() & 0xFFFF;
    if roll < state.park.guest_generation_probability {
        let park = &state.park;
        let difficult = park.flags.contains(ParkFlags::DIFFICULT_GUEST_GENERATION);
        let has_room = park
            .suggested_guest_maximum
            .saturating_add(DIFFICULT_HEADROOM)
            >= park.guests_in_park;
        if (!difficult || has_room) && generate_guest(state).is_some() {
            generated += 1;
        }
    }

    // Campaigns can't change during this loop; copy to release the borrow
    let campaigns = state.campaigns.clone();
    for campaign in &campaigns {
        let probability = campaign_guest_generation_probability(state, campaign);
        let roll = state.rng.next_below(u16::MAX as u32);
        if roll < probability && generate_guest_from_campaign(state, campaign.kind).is_some() {
            generated += 1;
        }
    }

    generated
}
