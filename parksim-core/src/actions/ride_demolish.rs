//! Demolishing a ride for a refund, or refurbishing it.

use super::{
    ActionKind, ActionResult, ActionStatus, GameAction, ParameterVisitor, StringId,
};
use crate::finance::ExpenditureType;
use crate::observer::Panel;
use crate::ride::{LifecycleFlags, Ride, RideId, RideStatus};
use crate::state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RideModifyType {
    Demolish = 0,
    Renew = 1,
}

impl RideModifyType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Demolish),
            1 => Some(Self::Renew),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RideDemolishAction {
    pub ride: RideId,
    pub modify_type: u8,
}

impl RideDemolishAction {
    pub fn new(ride: RideId, modify_type: RideModifyType) -> Self {
        Self::from_raw(ride, modify_type as u8)
    }

    pub fn from_raw(ride: RideId, modify_type: u8) -> Self {
        Self { ride, modify_type }
    }

    fn validate(&self, state: &GameState) -> Result<RideModifyType, ActionResult> {
        let Some(modify_type) = RideModifyType::from_raw(self.modify_type) else {
            log::warn!("Invalid ride modify type {}", self.modify_type);
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                StringId::CantDemolishRide,
                StringId::ErrValueOutOfRange,
            ));
        };

        let Some(ride) = state.rides.get(&self.ride) else {
            log::warn!("Invalid game command for ride {}", self.ride);
            return Err(ActionResult::error(
                ActionStatus::InvalidParameters,
                StringId::CantDemolishRide,
                StringId::ErrRideNotFound,
            ));
        };

        match modify_type {
            RideModifyType::Demolish => {
                if ride.lifecycle.contains(LifecycleFlags::INDESTRUCTIBLE) {
                    return Err(ActionResult::error(
                        ActionStatus::Disallowed,
                        StringId::CantDemolishRide,
                        StringId::RideIndestructible,
                    ));
                }
            }
            RideModifyType::Renew => {
                if ride.status != RideStatus::Closed {
                    return Err(ActionResult::error(
                        ActionStatus::Disallowed,
                        StringId::CantRefurbishRide,
                        StringId::MustBeClosedFirst,
                    ));
                }
            }
        }
        Ok(modify_type)
    }

    fn result_for(ride: &Ride, modify_type: RideModifyType) -> ActionResult {
        let (title, cost) = match modify_type {
            RideModifyType::Demolish => (StringId::CantDemolishRide, -ride.refund_price()),
            RideModifyType::Renew => (StringId::CantRefurbishRide, ride.refurbish_price()),
        };
        ActionResult {
            error_title: title,
            cost,
            expenditure: Some(ExpenditureType::RideConstruction),
            ..ActionResult::ok()
        }
    }
}

impl GameAction for RideDemolishAction {
    fn kind(&self) -> ActionKind {
        ActionKind::RideDemolish
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_u16("ride", &mut self.ride);
        visitor.visit_u8("modify_type", &mut self.modify_type);
    }

    fn query(&self, state: &GameState) -> ActionResult {
        let modify_type = match self.validate(state) {
            Ok(modify_type) => modify_type,
            Err(result) => return result,
        };
        match state.rides.get(&self.ride) {
            Some(ride) => Self::result_for(ride, modify_type),
            None => ActionResult::invalid_parameter(StringId::ErrRideNotFound),
        }
    }

    fn execute(&self, state: &mut GameState) -> ActionResult {
        let modify_type = match self.validate(state) {
            Ok(modify_type) => modify_type,
            Err(result) => return result,
        };

        match modify_type {
            RideModifyType::Demolish => {
                let Some(ride) = state.rides.remove(&self.ride) else {
                    return ActionResult::invalid_parameter(StringId::ErrRideNotFound);
                };
                state
                    .campaigns
                    .retain(|campaign| campaign.ride_id != Some(self.ride));
                state.notifications.invalidate(Panel::RideList);
                log::debug!("Demolished ride {} '{}'", ride.id, ride.name);
                Self::result_for(&ride, modify_type)
            }
            RideModifyType::Renew => {
                let Some(ride) = state.rides.get_mut(&self.ride) else {
                    return ActionResult::invalid_parameter(StringId::ErrRideNotFound);
                };
                ride.downtime = 0;
                ride.lifecycle.remove(LifecycleFlags::BROKEN_DOWN);
                ride.lifecycle.remove(LifecycleFlags::CRASHED);
                Self::result_for(ride, modify_type)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::observer::Notification;
    use crate::testing::GameStateBuilder;

    #[test]
    fn test_demolish_refunds_half() {
        let mut state = GameStateBuilder::new()
            .with_ride(0, 1000, true)
            .with_ride(1, 200, false)
            .with_campaign_for_ride(0)
            .with_campaign_for_ride(1)
            .build();

        let action = RideDemolishAction::new(0, RideModifyType::Demolish);
        let queried = action.query(&state);
        assert_eq!(queried.cost, -Money::gbp(500));

        let executed = action.execute(&mut state);
        assert_eq!(executed, queried);
        assert!(!state.rides.contains_key(&0));
        assert_eq!(state.campaigns.len(), 1);
        assert_eq!(state.campaigns[0].ride_id, Some(1));
        assert!(state
            .notifications
            .contains(&Notification::Invalidate(Panel::RideList)));
    }

    #[test]
    fn test_indestructible_ride() {
        let mut state = GameStateBuilder::new()
            .with_ride(3, 1000, true)
            .indestructible_ride(3)
            .build();
        let result = RideDemolishAction::new(3, RideModifyType::Demolish).execute(&mut state);
        assert_eq!(result.status, ActionStatus::Disallowed);
        assert_eq!(result.error_message, StringId::RideIndestructible);
        assert!(state.rides.contains_key(&3));

        // Refurbishing is still allowed once closed
        state.rides.get_mut(&3).unwrap().status = RideStatus::Closed;
        assert!(RideDemolishAction::new(3, RideModifyType::Renew)
            .execute(&mut state)
            .is_ok());
    }

    #[test]
    fn test_renew_requires_closed() {
        let mut state = GameStateBuilder::new().with_ride(0, 1000, true).build();
        let action = RideDemolishAction::new(0, RideModifyType::Renew);
        let result = action.execute(&mut state);
        assert_eq!(result.status, ActionStatus::Disallowed);
        assert_eq!(result.error_title, StringId::CantRefurbishRide);

        let ride = state.rides.get_mut(&0).unwrap();
        ride.status = RideStatus::Closed;
        ride.downtime = 40;
        ride.lifecycle.insert(LifecycleFlags::BROKEN_DOWN);
        ride.lifecycle.insert(LifecycleFlags::CRASHED);

        let result = action.execute(&mut state);
        assert!(result.is_ok());
        assert_eq!(result.cost, Money::gbp(250));
        let ride = &state.rides[&0];
        assert_eq!(ride.downtime, 0);
        assert!(!ride.lifecycle.contains(LifecycleFlags::BROKEN_DOWN));
        assert!(!ride.lifecycle.contains(LifecycleFlags::CRASHED));
    }

    #[test]
    fn test_invalid_parameters() {
        let state = GameStateBuilder::new().with_ride(0, 1000, true).build();
        let missing = RideDemolishAction::new(9, RideModifyType::Demolish).query(&state);
        assert_eq!(missing.status, ActionStatus::InvalidParameters);
        assert_eq!(missing.error_message, StringId::ErrRideNotFound);

        let bad_type = RideDemolishAction::from_raw(0, 2).query(&state);
        assert_eq!(bad_type.status, ActionStatus::InvalidParameters);
        assert_eq!(bad_type.error_message, StringId::ErrValueOutOfRange);
    }
}
