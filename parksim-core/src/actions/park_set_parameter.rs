//! Opening and closing the park, and the park-wide pricing mask.

use super::{ActionFlags, ActionKind, ActionResult, GameAction, ParameterVisitor, StringId};
use crate::observer::Panel;
use crate::park::ParkFlags;
use crate::state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParkParameter {
    Close = 0,
    Open = 1,
    SamePriceInPark = 2,
}

impl ParkParameter {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Close),
            1 => Some(Self::Open),
            2 => Some(Self::SamePriceInPark),
            _ => None,
        }
    }

    /// Title shown if the change is later rejected.
    fn error_title(self) -> StringId {
        match self {
            ParkParameter::Close => StringId::CantClosePark,
            ParkParameter::Open => StringId::CantOpenPark,
            ParkParameter::SamePriceInPark => StringId::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParkSetParameterAction {
    pub parameter: u8,
    /// Shop-item mask for `SamePriceInPark`; ignored otherwise.
    pub value: u64,
}

impl ParkSetParameterAction {
    pub fn new(parameter: ParkParameter, value: u64) -> Self {
        Self::from_raw(parameter as u8, value)
    }

    pub fn from_raw(parameter: u8, value: u64) -> Self {
        Self { parameter, value }
    }

    fn validate(&self) -> Result<(ParkParameter, ActionResult), ActionResult> {
        let Some(parameter) = ParkParameter::from_raw(self.parameter) else {
            log::warn!("Invalid park parameter {}", self.parameter);
            return Err(ActionResult::invalid_parameter(StringId::ErrValueOutOfRange));
        };
        let result = ActionResult {
            error_title: parameter.error_title(),
            ..ActionResult::ok()
        };
        Ok((parameter, result))
    }
}

impl GameAction for ParkSetParameterAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ParkSetParameter
    }

    fn flags(&self) -> ActionFlags {
        ActionFlags::ALLOW_WHILE_PAUSED
    }

    fn accept_parameters(&mut self, visitor: &mut dyn ParameterVisitor) {
        visitor.visit_u8("parameter", &mut self.parameter);
        visitor.visit_u64("value", &mut self.value);
    }

    fn query(&self, _state: &GameState) -> ActionResult {
        match self.validate() {
            Ok((_, result)) => result,
            Err(result) => result,
        }
    }

    fn execute(&self, state: &mut GameState) -> ActionResult {
        let (parameter, result) = match self.validate() {
            Ok(validated) => validated,
            Err(result) => return result,
        };

        match parameter {
            ParkParameter::Close => {
                if state.park.is_open() {
                    state.park.flags.remove(ParkFlags::PARK_OPEN);
                    state.notifications.invalidate(Panel::ParkInformation);
                }
            }
            ParkParameter::Open => {
                if !state.park.is_open() {
                    state.park.flags.insert(ParkFlags::PARK_OPEN);
                    state.notifications.invalidate(Panel::ParkInformation);
                }
            }
            ParkParameter::SamePriceInPark => {
                state.park.same_price_throughout_park = self.value;
                state.notifications.invalidate(Panel::RideList);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionStatus;
    use crate::observer::Notification;
    use crate::testing::GameStateBuilder;

    #[test]
    fn test_query_preloads_title() {
        let state = GameStateBuilder::new().build();
        let close = ParkSetParameterAction::new(ParkParameter::Close, 0).query(&state);
        assert!(close.is_ok());
        assert_eq!(close.error_title, StringId::CantClosePark);

        let open = ParkSetParameterAction::new(ParkParameter::Open, 0).query(&state);
        assert_eq!(open.error_title, StringId::CantOpenPark);

        let price = ParkSetParameterAction::new(ParkParameter::SamePriceInPark, 3).query(&state);
        assert_eq!(price.error_title, StringId::None);
    }

    #[test]
    fn test_unknown_parameter() {
        let mut state = GameStateBuilder::new().build();
        let result = ParkSetParameterAction::from_raw(3, 0).execute(&mut state);
        assert_eq!(result.status, ActionStatus::InvalidParameters);
        assert_eq!(result.error_message, StringId::ErrValueOutOfRange);
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_open_then_close() {
        let mut state = GameStateBuilder::new().build();
        ParkSetParameterAction::new(ParkParameter::Open, 0).execute(&mut state);
        assert!(state.park.is_open());
        assert!(state
            .notifications
            .contains(&Notification::Invalidate(Panel::ParkInformation)));

        state.notifications.clear();
        ParkSetParameterAction::new(ParkParameter::Close, 0).execute(&mut state);
        assert!(!state.park.is_open());
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_repeated_open_is_silent() {
        let mut state = GameStateBuilder::new().open().build();
        let result = ParkSetParameterAction::new(ParkParameter::Open, 0).execute(&mut state);
        assert!(result.is_ok());
        assert!(state.park.is_open());
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_same_price_mask() {
        let mut state = GameStateBuilder::new().build();
        ParkSetParameterAction::new(ParkParameter::SamePriceInPark, 0b1010).execute(&mut state);
        assert_eq!(state.park.same_price_throughout_park, 0b1010);
        assert!(state
            .notifications
            .contains(&Notification::Invalidate(Panel::RideList)));
    }
}
