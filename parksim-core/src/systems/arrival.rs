//! Guests walking from their spawn point to the park gate.
//!
//! Each tick a guest heading for the park takes one step towards the
//! nearest park entrance. Once within its destination tolerance of an open
//! gate it pays the entrance fee and is admitted, or turns back if it cannot
//! afford it. A closed park leaves guests queuing at the gate.

use crate::coords::{CoordsXY, Direction};
use crate::entities::{Guest, GuestId, GuestState};
use crate::finance::ExpenditureType;
use crate::observer::Intent;
use crate::state::GameState;
use tracing::instrument;

/// World units walked per tick on each axis.
pub const GUEST_WALK_SPEED: i32 = 1;

fn is_arriving(guest: &Guest) -> bool {
    guest.outside_of_park && guest.state == GuestState::EnteringPark
}

/// First gate by Manhattan distance; ties keep row-major order.
fn nearest_gate(gates: &[CoordsXY], from: CoordsXY) -> Option<CoordsXY> {
    gates
        .iter()
        .copied()
        .min_by_key(|gate| (gate.x - from.x).abs() + (gate.y - from.y).abs())
}

fn step_towards(from: i32, to: i32) -> i32 {
    from + (to - from).clamp(-GUEST_WALK_SPEED, GUEST_WALK_SPEED)
}

fn walk(guest: &mut Guest, target: CoordsXY) {
    let here = guest.location.xy();
    let x = step_towards(here.x, target.x);
    let y = step_towards(here.y, target.y);

    let facing = if x != here.x {
        if x > here.x {
            Direction::EAST
        } else {
            Direction::WEST
        }
    } else if y > here.y {
        Direction::NORTH
    } else if y < here.y {
        Direction::SOUTH
    } else {
        guest.direction
    };

    guest.location.x = x;
    guest.location.y = y;
    guest.direction = facing;
    guest.orientation = facing.raw() << 3;
}

fn at_destination(guest: &Guest) -> bool {
    let here = guest.location.xy();
    let tolerance = guest.destination_tolerance as i32;
    (guest.destination.x - here.x).abs() <= tolerance
        && (guest.destination.y - here.y).abs() <= tolerance
}

/// Moves arriving guests one step and admits those at an open gate.
///
/// Returns the number of guests admitted.
#[instrument(skip_all, name = "guest_arrival")]
pub fn update_arriving_guests(state: &mut GameState) -> u32 {
    if !state.guests.iter().any(is_arriving) {
        return 0;
    }
    let gates: Vec<CoordsXY> = state
        .map
        .park_entrances()
        .map(CoordsXY::to_tile_centre)
        .collect();
    if gates.is_empty() {
        return 0;
    }
    let open = state.park.is_open();

    let mut at_gate = Vec::new();
    for guest in state.guests.iter_mut().filter(|g| is_arriving(g)) {
        let Some(gate) = nearest_gate(&gates, guest.location.xy()) else {
            continue;
        };
        guest.destination = gate;
        walk(guest, gate);
        if open && at_destination(guest) {
            at_gate.push(guest.id);
        }
    }

    let mut admitted = 0;
    for id in at_gate {
        if enter_park(state, id) {
            admitted += 1;
        }
    }
    if admitted > 0 {
        log::trace!(
            "Tick {}: {} guests admitted, {} in park",
            state.current_ticks,
            admitted,
            state.park.guests_in_park
        );
    }
    admitted
}

/// Charges the entrance fee and admits the guest, or sends it home.
pub fn enter_park(state: &mut GameState, id: GuestId) -> bool {
    let fee = state.park.effective_entrance_fee();
    let Some(guest) = state.guests.iter_mut().find(|g| g.id == id) else {
        return false;
    };

    if guest.cash < fee {
        log::debug!(
            "Guest {} turned away: {} for entry, has {}",
            id,
            fee,
            guest.cash
        );
        state.guests.retain(|g| g.id != id);
        state.park.guests_heading_for_park = state.park.guests_heading_for_park.saturating_sub(1);
        state.notifications.broadcast(Intent::UpdateGuestCount);
        return false;
    }

    guest.cash -= fee;
    if fee.is_positive() {
        state
            .finance
            .payment(-fee, ExpenditureType::ParkEntranceTickets);
    }
    state.admit_guest(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::testing::GameStateBuilder;

    /// Gate on tile (5, 1), spawn a few units away on the same tile row.
    fn park_with_gate() -> GameState {
        let mut state = GameStateBuilder::new()
            .with_park_entrance(5, 1, 2)
            .with_peep_spawn(5 * 32 + 16 + 20, 32 + 16, 16)
            .open()
            .build();
        crate::systems::generate_guest(&mut state);
        state
    }

    fn run(state: &mut GameState, ticks: u32) -> u32 {
        (0..ticks).map(|_| update_arriving_guests(state)).sum()
    }

    #[test]
    fn test_guest_walks_to_gate_and_enters() {
        let mut state = park_with_gate();
        assert_eq!(state.park.guests_heading_for_park, 1);

        // 20 units out with a tolerance of 5: inside after 15 steps
        assert_eq!(run(&mut state, 14), 0);
        assert_eq!(state.guests[0].direction, Direction::WEST);
        assert_eq!(run(&mut state, 1), 1);

        let guest = &state.guests[0];
        assert!(!guest.outside_of_park);
        assert_eq!(guest.state, GuestState::Walking);
        assert_eq!(state.park.guests_heading_for_park, 0);
        assert_eq!(state.park.guests_in_park, 1);

        // Admitted guests are no longer walked
        let location = guest.location;
        run(&mut state, 10);
        assert_eq!(state.guests[0].location, location);
    }

    #[test]
    fn test_closed_park_keeps_guests_at_gate() {
        let mut state = park_with_gate();
        state.park.flags.remove(crate::park::ParkFlags::PARK_OPEN);
        assert_eq!(run(&mut state, 100), 0);
        assert!(state.guests[0].outside_of_park);
        assert_eq!(state.guests[0].location.xy(), CoordsXY::from_tile(5, 1).to_tile_centre());

        state.park.flags.insert(crate::park::ParkFlags::PARK_OPEN);
        assert_eq!(run(&mut state, 1), 1);
    }

    #[test]
    fn test_entrance_fee_is_charged() {
        let mut state = park_with_gate();
        state.park.flags.remove(crate::park::ParkFlags::NO_MONEY);
        state.park.entrance_fee = Money::gbp(15);
        let cash = state.guests[0].cash;

        run(&mut state, 20);
        assert_eq!(state.guests[0].cash, cash - Money::gbp(15));
        assert_eq!(state.finance.cash, Money::gbp(15));
        assert_eq!(
            state
                .finance
                .expenditure
                .get(&ExpenditureType::ParkEntranceTickets),
            Some(&Money::gbp(15))
        );
    }

    #[test]
    fn test_guest_who_cannot_pay_goes_home() {
        let mut state = park_with_gate();
        state.park.flags.remove(crate::park::ParkFlags::NO_MONEY);
        state.park.entrance_fee = state.guests[0].cash + Money(1);

        assert_eq!(run(&mut state, 20), 0);
        assert!(state.guests.is_empty());
        assert_eq!(state.park.guests_heading_for_park, 0);
        assert_eq!(state.park.guests_in_park, 0);
        assert_eq!(state.finance.cash, Money::ZERO);
    }

    #[test]
    fn test_no_gate_no_admission() {
        let mut state = GameStateBuilder::new()
            .with_peep_spawn(160, 48, 16)
            .open()
            .build();
        crate::systems::generate_guest(&mut state);
        let location = state.guests[0].location;
        assert_eq!(run(&mut state, 50), 0);
        assert_eq!(state.guests[0].location, location);
    }

    #[test]
    fn test_nearest_gate_prefers_first_on_tie() {
        let gates = [CoordsXY::new(0, 10), CoordsXY::new(10, 0), CoordsXY::new(40, 40)];
        assert_eq!(nearest_gate(&gates, CoordsXY::new(0, 0)), Some(gates[0]));
        assert_eq!(nearest_gate(&gates, CoordsXY::new(30, 30)), Some(gates[2]));
        assert_eq!(nearest_gate(&[], CoordsXY::new(0, 0)), None);
    }
}
