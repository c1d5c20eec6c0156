use super::{
    ActionFlags, ActionKind, ActionResult, ActionStatus, GameAction, ParameterVisitor, StringId,
};
use crate::money::Money;
use crate::observer::Panel;
use crate::state::GameState;
use serde::{Deserialize, Serialize};

/// Highest fee the gate can charge, £999.00.
pub const MAX_ENTRANCE_FEE: Money = Money::gbp(999);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParkSetEntranceFeeAction {
    pub fee: Money,
}

impl ParkSetEntranceFeeAction {
    pub fn new(fee: Money) -> Self {
        Self { fee }
    }

    fn validate(&self, state: &GameState) -> Result<(), ActionResult> {
        let park = &state.park;
        if !park.has_money() {
            return Err(ActionResult::error(
                ActionStatus::Disallowed,
                StringId::CantChangeEntranceFee,
                StringId::MoneyDisabled,
            ));
        }
        if !park.entrance_fee_unlocked() {
            return Err(ActionResult::error(
                ActionStatus::Disallowed,
                StringId::CantChangeEntranceFee,
                StringId::EntranceFeeLocked,
            ));
        }
        if self.fee < Money::ZERO || self.fee > MAX_ENTRANCE_FEE {
            log::warn!("Invalid entrance fee {}", self.fee);
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                StringId::CantChangeEntranceFee,
                StringId::ErrValueOutOfRange,
            ));
        }
        Ok(())
    }
}

impl GameAction for ParkSetEntranceFeeAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ParkSetEntranceFee
    }

    fn flags(&self) -> ActionFlags {
        ActionFlags::ALLOW_WHILE_PAUSED
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_i64("fee", &mut self.fee.0);
    }

    fn query(&self, state: &GameState) -> ActionResult {
        match self.validate(state) {
            Ok(()) => ActionResult::ok(),
            Err(result) => result,
        }
    }

    fn execute(&self, state: &mut GameState) -> ActionResult {
        if let Err(result) = self.validate(state) {
            return result;
        }
        state.park.entrance_fee = self.fee;
        state.notifications.invalidate(Panel::ParkInformation);
        ActionResult::ok()
    }
}
