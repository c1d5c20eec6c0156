//! Entry point for running actions against the live state.
//!
//! The dispatcher owns the checks that are the same for every action: the
//! pause gate, the editor gate and affordability. It also books the cost
//! and announces committed actions for network broadcast and replays.

use super::{Action, ActionFlags, ActionPacket, ActionResult, ActionStatus, GameAction, StringId};
use crate::money::Money;
use crate::observer::{Notification, Panel};
use crate::state::GameState;

pub struct GameActions;

impl GameActions {
    /// Runs every gate and the action's own validation. Never mutates.
    pub fn query(state: &GameState, action: &Action) -> ActionResult {
        let flags = action.flags();

        if state.paused && !flags.contains(ActionFlags::ALLOW_WHILE_PAUSED) {
            return ActionResult::error(
                ActionStatus::GamePaused,
                StringId::None,
                StringId::GamePaused,
            );
        }

        if flags.contains(ActionFlags::EDITOR_ONLY)
            && !state.is_editor()
            && !state.cheats.sandbox_mode
        {
            return ActionResult::error(
                ActionStatus::NotInEditorMode,
                StringId::None,
                StringId::LandNotForSale,
            );
        }

        let mut result = action.query(state);
        if result.is_ok() && !Self::can_afford(state, result.cost) {
            result.status = ActionStatus::InsufficientFunds;
            result.error_message = StringId::NotEnoughCash;
        }
        result
    }

    /// Queries, then executes and books the cost.
    ///
    /// On failure nothing in `state` changes and no notification is queued.
    pub fn execute(state: &mut GameState, action: &Action) -> ActionResult {
        let queried = Self::query(state, action);
        if !queried.is_ok() {
            log::debug!(
                "{} rejected in query: {:?} {:?}",
                action.kind().name(),
                queried.status,
                queried.error_message
            );
            return queried;
        }

        let result = action.execute(state);
        if !result.is_ok() {
            log::warn!(
                "{} rejected in execute: {:?} {:?}",
                action.kind().name(),
                result.status,
                result.error_message
            );
            return result;
        }

        if state.park.has_money() && result.cost != Money::ZERO {
            match result.expenditure {
                Some(kind) => state.finance.payment(result.cost, kind),
                None => state.finance.cash = state.finance.cash.saturating_sub(result.cost),
            }
            state.notifications.invalidate(Panel::Finances);
        }

        let packet = ActionPacket::new(action, state.current_ticks);
        state.notifications.push(Notification::ActionCommitted(packet));
        log::debug!(
            "{} committed at tick {}, cost {}",
            action.kind().name(),
            state.current_ticks,
            result.cost
        );
        result
    }

    fn can_afford(state: &GameState, cost: Money) -> bool {
        !state.park.has_money() || cost <= Money::ZERO || cost <= state.finance.cash
    }
}
