//! Unit tests for step.rs simulation stepping.
use super::*;
use crate::actions::{
    ActionStatus, LandSetRightsAction, LandSetRightsSetting, ParkParameter,
    ParkSetEntranceFeeAction, ParkSetParameterAction,
};
use crate::coords::MapRange;
use crate::map::Ownership;
use crate::money::Money;
use crate::observer::Notification;
use crate::park::RATING_HISTORY_UNDEFINED;
use crate::systems::set_forced_rating;
use crate::testing::GameStateBuilder;

fn run(state: &mut GameState, ticks: u32) {
    for _ in 0..ticks {
        tick(state, &[], None);
    }
}

#[test]
fn test_step_world_leaves_input_untouched() {
    let state = GameStateBuilder::new().build();
    let before = state.checksum();

    let open = Action::ParkSetParameter(ParkSetParameterAction::new(ParkParameter::Open, 0));
    let (next, results) = step_world(&state, &[open]);

    assert_eq!(state.checksum(), before);
    assert_eq!(state.current_ticks, 0);
    assert_eq!(next.current_ticks, 1);
    assert!(next.park.is_open());
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
}

#[test]
fn test_one_result_per_action_in_order() {
    let mut state = GameStateBuilder::new().with_money(Money::gbp(100)).build();
    let actions = [
        Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money::gbp(5))),
        Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money::gbp(5000))),
        Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money::gbp(7))),
    ];
    let results = tick(&mut state, &actions, None);
    let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ActionStatus::Ok,
            ActionStatus::InvalidParameters,
            ActionStatus::Ok
        ]
    );
    assert_eq!(state.park.entrance_fee, Money::gbp(7));
}

#[test]
fn test_actions_run_before_park_update() {
    // Land bought on tick 0 is counted by the park size update on the same tick
    let mut state = GameStateBuilder::new().map_size(10).editor().build();
    let buy = Action::LandSetRights(LandSetRightsAction::new(
        MapRange::tiles(2, 2, 4, 4),
        LandSetRightsSetting::SetOwnershipWithChecks,
        Ownership::OWNED,
    ));
    tick(&mut state, &[buy], None);
    assert_eq!(state.park.size, 9);
}

#[test]
fn test_committed_actions_carry_their_tick() {
    let mut state = GameStateBuilder::new().build();
    run(&mut state, 3);
    state.notifications.clear();

    let open = Action::ParkSetParameter(ParkSetParameterAction::new(ParkParameter::Open, 0));
    tick(&mut state, &[open], None);
    let ticks: Vec<u32> = state
        .notifications
        .iter()
        .filter_map(|n| match n {
            Notification::ActionCommitted(packet) => Some(packet.tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![3]);
}

#[test]
fn test_weekly_history_after_4096_ticks() {
    let mut state = GameStateBuilder::new().with_guests_in_park(100, 200).build();
    run(&mut state, 4095);
    assert_eq!(
        state.park.histories.rating.latest(),
        Some(RATING_HISTORY_UNDEFINED)
    );

    run(&mut state, 1);
    let expected = (state.park.rating / 4) as u8;
    assert_eq!(state.park.histories.rating.latest(), Some(expected));
    assert_eq!(state.park.histories.guests.latest(), Some(100));
}

#[test]
fn test_daily_profit_rolls_up() {
    let mut state = GameStateBuilder::new().with_money(Money::gbp(100)).build();
    // 31-day March: a new day roughly every 529 ticks
    run(&mut state, 2000);
    assert_eq!(state.finance.weekly_profit_average_divisor, 3);
    assert_eq!(state.date.day, 3);
}

#[test]
fn test_guests_arrive_over_time() {
    let mut state = GameStateBuilder::new()
        .seed(5)
        .with_peep_spawn(5 * 32 + 16, 32 + 16, 16)
        .build();
    set_forced_rating(&mut state, Some(999));
    run(&mut state, 4096);
    assert!(state.park.guests_heading_for_park > 0);
    assert_eq!(
        state.guests.len() as u32,
        state.park.guests_heading_for_park
    );
}

#[test]
fn test_guests_enter_through_gate() {
    let mut state = GameStateBuilder::new()
        .with_money(Money::gbp(100))
        .with_park_entrance(5, 1, 2)
        .with_peep_spawn(5 * 32 + 16, 8 * 32 + 16, 16)
        .open()
        .build();
    state.park.entrance_fee = Money::gbp(2);
    for _ in 0..3 {
        crate::systems::generate_guest(&mut state);
    }
    // 224 units from the gate
    run(&mut state, 300);

    let inside = state.guests.iter().filter(|g| !g.outside_of_park).count() as u32;
    assert!(inside >= 3);
    assert_eq!(state.park.guests_in_park, inside);
    assert_eq!(
        state.park.guests_in_park + state.park.guests_heading_for_park,
        state.guests.len() as u32
    );
    assert_eq!(state.finance.cash, Money::gbp(100) + Money::gbp(2) * inside as i64);
}

#[test]
fn test_determinism() {
    let build = || {
        GameStateBuilder::new()
            .seed(42)
            .map_size(12)
            .editor()
            .with_money(Money::gbp(50_000))
            .with_peep_spawn(6 * 32 + 16, 32 + 16, 16)
            .with_peep_spawn(32 + 16, 6 * 32 + 16, 16)
            .build()
    };
    let script = |t: u32| -> Vec<Action> {
        match t {
            10 => vec![Action::LandSetRights(LandSetRightsAction::new(
                MapRange::tiles(3, 3, 8, 8),
                LandSetRightsSetting::SetOwnershipWithChecks,
                Ownership::OWNED,
            ))],
            20 => vec![Action::ParkSetParameter(ParkSetParameterAction::new(
                ParkParameter::Open,
                0,
            ))],
            _ => vec![],
        }
    };

    let mut a = build();
    let mut b = build();
    for t in 0..5000 {
        tick(&mut a, &script(t), None);
        tick(&mut b, &script(t), None);
    }
    assert_eq!(a.checksum(), b.checksum());
    assert_eq!(a.guests.len(), b.guests.len());

    // A different seed diverges
    let mut c = build();
    c.rng = crate::rng::ScenarioRng::from_seed_u64(43);
    for t in 0..5000 {
        tick(&mut c, &script(t), None);
    }
    assert_ne!(a.checksum(), c.checksum());
}

#[test]
fn test_metrics_accumulate() {
    let mut state = GameStateBuilder::new().with_money(Money::gbp(100)).build();
    let mut metrics = SimMetrics::default();
    let actions = [
        Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money::gbp(5))),
        Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money(-1))),
    ];
    tick(&mut state, &actions, Some(&mut metrics));
    tick(&mut state, &[], Some(&mut metrics));

    assert_eq!(metrics.total_ticks, 2);
    assert_eq!(metrics.actions_committed, 1);
    assert_eq!(metrics.actions_rejected, 1);
}
