//! Parameter visitors: one field list per action, three encodings.
//!
//! Each action lists its fields once in `accept_parameters`. The same list
//! drives the network/replay byte payload ([`ParameterWriter`] and
//! [`ParameterReader`]) and the named JSON form used by scripting and the
//! replay log ([`ParameterMap`]). Field order is the wire contract.
//!
//! Named fields match the serde form of the action, except that a map range
//! is flattened into `x1`, `y1`, `x2`, `y2`.

use super::{Action, ActionKind, GameAction};
use crate::coords::MapRange;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("unexpected end of payload while reading '{0}'")]
    UnexpectedEof(&'static str),
    #[error("{0} trailing bytes after last parameter")]
    TrailingBytes(usize),
    #[error("unknown action kind {0}")]
    UnknownKind(u32),
    #[error("missing parameter '{0}'")]
    MissingField(&'static str),
    #[error("parameter '{0}' has the wrong type or is out of range")]
    InvalidField(&'static str),
    #[error("packet header truncated")]
    TruncatedHeader,
}

/// Walks an action's fields in declaration order.
///
/// Visitors may read or overwrite each value.
pub trait ParameterVisitor {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32);
    fn visit_u8(&mut self, name: &'static str, value: &mut u8);
    fn visit_u16(&mut self, name: &'static str, value: &mut u16);
    fn visit_u64(&mut self, name: &'static str, value: &mut u64);
    fn visit_i64(&mut self, name: &'static str, value: &mut i64);

    /// Ranges are four corner coordinates.
    fn visit_range(&mut self, range: &mut MapRange) {
        self.visit_i32("x1", &mut range.left);
        self.visit_i32("y1", &mut range.top);
        self.visit_i32("x2", &mut range.right);
        self.visit_i32("y2", &mut range.bottom);
    }
}

/// Big-endian byte encoding.
#[derive(Debug, Default)]
pub struct ParameterWriter {
    buf: Vec<u8>,
}

impl ParameterWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl ParameterVisitor for ParameterWriter {
    fn visit_i32(&mut self, _name: &'static str, value: &mut i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn visit_u8(&mut self, _name: &'static str, value: &mut u8) {
        self.buf.push(*value);
    }

    fn visit_u16(&mut self, _name: &'static str, value: &mut u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn visit_u64(&mut self, _name: &'static str, value: &mut u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn visit_i64(&mut self, _name: &'static str, value: &mut i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }
}

/// Decodes a [`ParameterWriter`] payload.
///
/// The first failure is remembered and later fields are left untouched;
/// call [`ParameterReader::finish`] to collect it.
pub struct ParameterReader<'a> {
    data: &'a [u8],
    pos: usize,
    error: Option<ParameterError>,
}

impl<'a> ParameterReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            error: None,
        }
    }

    fn take<const N: usize>(&mut self, name: &'static str) -> Option<[u8; N]> {
        if self.error.is_some() {
            return None;
        }
        let end = self.pos + N;
        let Some(slice) = self.data.get(self.pos..end) else {
            self.error = Some(ParameterError::UnexpectedEof(name));
            return None;
        };
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slice);
        self.pos = end;
        Some(bytes)
    }

    pub fn finish(self) -> Result<(), ParameterError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let remaining = self.data.len() - self.pos;
        if remaining != 0 {
            return Err(ParameterError::TrailingBytes(remaining));
        }
        Ok(())
    }
}

impl ParameterVisitor for ParameterReader<'_> {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32) {
        if let Some(b) = self.take(name) {
            *value = i32::from_be_bytes(b);
        }
    }

    fn visit_u8(&mut self, name: &'static str, value: &mut u8) {
        if let Some([b]) = self.take::<1>(name) {
            *value = b;
        }
    }

    fn visit_u16(&mut self, name: &'static str, value: &mut u16) {
        if let Some(b) = self.take(name) {
            *value = u16::from_be_bytes(b);
        }
    }

    fn visit_u64(&mut self, name: &'static str, value: &mut u64) {
        if let Some(b) = self.take(name) {
            *value = u64::from_be_bytes(b);
        }
    }

    fn visit_i64(&mut self, name: &'static str, value: &mut i64) {
        if let Some(b) = self.take(name) {
            *value = i64::from_be_bytes(b);
        }
    }
}

/// Named parameters as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    fields: Map<String, Value>,
}

impl ParameterMap {
    /// Captures the parameters of `action`.
    pub fn capture(action: &Action) -> Self {
        let mut action = action.clone();
        let mut map = Self::default();
        action.accept_parameters(&mut map);
        map
    }

    pub fn from_json(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn as_json(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.fields)
    }

    /// Builds an action of `kind` from these parameters.
    pub fn to_action(&self, kind: ActionKind) -> Result<Action, ParameterError> {
        let mut action = Action::blank(kind);
        self.apply(&mut action)?;
        Ok(action)
    }

    /// Overwrites every parameter of `action` with the named values.
    pub fn apply(&self, action: &mut Action) -> Result<(), ParameterError> {
        let mut applier = MapApplier {
            fields: &self.fields,
            error: None,
        };
        action.accept_parameters(&mut applier);
        match applier.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ParameterVisitor for ParameterMap {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32) {
        self.fields.insert(name.to_string(), Value::from(*value));
    }

    fn visit_u8(&mut self, name: &'static str, value: &mut u8) {
        self.fields.insert(name.to_string(), Value::from(*value));
    }

    fn visit_u16(&mut self, name: &'static str, value: &mut u16) {
        self.fields.insert(name.to_string(), Value::from(*value));
    }

    fn visit_u64(&mut self, name: &'static str, value: &mut u64) {
        self.fields.insert(name.to_string(), Value::from(*value));
    }

    fn visit_i64(&mut self, name: &'static str, value: &mut i64) {
        self.fields.insert(name.to_string(), Value::from(*value));
    }
}

struct MapApplier<'a> {
    fields: &'a Map<String, Value>,
    error: Option<ParameterError>,
}

impl MapApplier<'_> {
    fn read<T: TryFrom<i64> + TryFrom<u64>>(&mut self, name: &'static str) -> Option<T> {
        if self.error.is_some() {
            return None;
        }
        let Some(value) = self.fields.get(name) else {
            self.error = Some(ParameterError::MissingField(name));
            return None;
        };
        let converted = match (value.as_u64(), value.as_i64()) {
            (Some(u), _) => <T as TryFrom<u64>>::try_from(u).ok(),
            (None, Some(i)) => <T as TryFrom<i64>>::try_from(i).ok(),
            _ => None,
        };
        if converted.is_none() {
            self.error = Some(ParameterError::InvalidField(name));
        }
        converted
    }
}

impl ParameterVisitor for MapApplier<'_> {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32) {
        if let Some(v) = self.read(name) {
            *value = v;
        }
    }

    fn visit_u8(&mut self, name: &'static str, value: &mut u8) {
        if let Some(v) = self.read(name) {
            *value = v;
        }
    }

    fn visit_u16(&mut self, name: &'static str, value: &mut u16) {
        if let Some(v) = self.read(name) {
            *value = v;
        }
    }

    fn visit_u64(&mut self, name: &'static str, value: &mut u64) {
        if let Some(v) = self.read(name) {
            *value = v;
        }
    }

    fn visit_i64(&mut self, name: &'static str, value: &mut i64) {
        if let Some(v) = self.read(name) {
            *value = v;
        }
    }
}

const HEADER_LEN: usize = 8;

/// A committed action as broadcast to peers and written to replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPacket {
    pub kind: ActionKind,
    pub tick: u32,
    pub payload: Vec<u8>,
}

impl ActionPacket {
    pub fn new(action: &Action, tick: u32) -> Self {
        let mut action = action.clone();
        let mut writer = ParameterWriter::new();
        action.accept_parameters(&mut writer);
        Self {
            kind: action.kind(),
            tick,
            payload: writer.into_bytes(),
        }
    }

    /// `kind id (u32) | tick (u32) | payload`, big-endian.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&self.kind.id().to_be_bytes());
        out.extend_from_slice(&self.tick.to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ParameterError> {
        if bytes.len() < HEADER_LEN {
            return Err(ParameterError::TruncatedHeader);
        }
        let (header, payload) = bytes.split_at(HEADER_LEN);
        let id = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let tick = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
        let kind = ActionKind::from_id(id).ok_or(ParameterError::UnknownKind(id))?;
        Ok(Self {
            kind,
            tick,
            payload: payload.to_vec(),
        })
    }

    /// Rebuilds the action from the payload.
    pub fn to_action(&self) -> Result<Action, ParameterError> {
        let mut action = Action::blank(self.kind);
        let mut reader = ParameterReader::new(&self.payload);
        action.accept_parameters(&mut reader);
        reader.finish()?;
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{
        LandSetRightsAction, LandSetRightsSetting, ParkParameter, ParkSetEntranceFeeAction,
        ParkSetParameterAction, RideDemolishAction, RideModifyType,
    };
    use crate::coords::MapRange;
    use crate::map::Ownership;
    use crate::money::Money;
    use proptest::prelude::*;

    fn land_action() -> Action {
        Action::LandSetRights(LandSetRightsAction::new(
            MapRange::new(64, 96, 128, 160),
            LandSetRightsSetting::SetOwnershipWithChecks,
            Ownership::OWNED,
        ))
    }

    #[test]
    fn test_payload_layout_is_field_order() {
        let packet = ActionPacket::new(&land_action(), 7);
        assert_eq!(packet.kind, ActionKind::LandSetRights);
        // 4 x i32 range, setting, ownership
        assert_eq!(packet.payload.len(), 18);
        assert_eq!(&packet.payload[0..4], &64i32.to_be_bytes());
        assert_eq!(packet.payload[16], LandSetRightsSetting::SetOwnershipWithChecks as u8);
        assert_eq!(packet.payload[17], Ownership::OWNED.bits());
    }

    #[test]
    fn test_packet_decode_rebuilds_action() {
        let action = Action::RideDemolish(RideDemolishAction::new(3, RideModifyType::Renew));
        let bytes = ActionPacket::new(&action, 42).encode();

        let packet = ActionPacket::decode(&bytes).unwrap();
        assert_eq!(packet.tick, 42);
        assert_eq!(packet.to_action().unwrap(), action);
    }

    #[test]
    fn test_unknown_kind() {
        let mut bytes = ActionPacket::new(&land_action(), 0).encode();
        bytes[0..4].copy_from_slice(&999u32.to_be_bytes());
        assert_eq!(
            ActionPacket::decode(&bytes),
            Err(ParameterError::UnknownKind(999))
        );
        assert_eq!(
            ActionPacket::decode(&[0, 0, 0]),
            Err(ParameterError::TruncatedHeader)
        );
    }

    #[test]
    fn test_short_and_trailing_payloads() {
        let mut packet = ActionPacket::new(&land_action(), 0);
        packet.payload.pop();
        assert_eq!(
            packet.to_action(),
            Err(ParameterError::UnexpectedEof("ownership"))
        );

        let mut packet = ActionPacket::new(&land_action(), 0);
        packet.payload.extend_from_slice(&[1, 2]);
        assert_eq!(packet.to_action(), Err(ParameterError::TrailingBytes(2)));
    }

    #[test]
    fn test_parameter_map_names() {
        let map = ParameterMap::capture(&Action::ParkSetParameter(ParkSetParameterAction::new(
            ParkParameter::SamePriceInPark,
            0b101,
        )));
        assert_eq!(map.get("parameter"), Some(&Value::from(2u8)));
        assert_eq!(map.get("value"), Some(&Value::from(5u64)));

        let map = ParameterMap::capture(&land_action());
        let mut keys: Vec<_> = map.as_json().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["ownership", "setting", "x1", "x2", "y1", "y2"]);
    }

    #[test]
    fn test_parameter_names_match_scenario_keys() {
        let actions = [
            Action::ParkSetParameter(ParkSetParameterAction::new(ParkParameter::Open, 0)),
            Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money(150))),
            Action::RideDemolish(RideDemolishAction::new(3, RideModifyType::Renew)),
        ];
        for action in &actions {
            let Value::Object(serde_fields) = serde_json::to_value(action).unwrap() else {
                unreachable!()
            };
            let map = ParameterMap::capture(action);
            for (name, value) in map.as_json() {
                assert_eq!(serde_fields.get(name), Some(value), "{name} in {action:?}");
            }
            assert_eq!(map.as_json().len() + 1, serde_fields.len());
        }
    }

    #[test]
    fn test_parameter_map_apply() {
        let json = serde_json::json!({ "fee": 150 });
        let Value::Object(fields) = json else {
            unreachable!()
        };
        let action = ParameterMap::from_json(fields)
            .to_action(ActionKind::ParkSetEntranceFee)
            .unwrap();
        assert_eq!(
            action,
            Action::ParkSetEntranceFee(ParkSetEntranceFeeAction::new(Money(150)))
        );
    }

    #[test]
    fn test_parameter_map_rejects_bad_fields() {
        let json = serde_json::json!({ "ride": 1, "modify_type": 300 });
        let Value::Object(fields) = json else {
            unreachable!()
        };
        assert_eq!(
            ParameterMap::from_json(fields).to_action(ActionKind::RideDemolish),
            Err(ParameterError::InvalidField("modify_type"))
        );

        let json = serde_json::json!({ "parameter": 1 });
        let Value::Object(fields) = json else {
            unreachable!()
        };
        assert_eq!(
            ParameterMap::from_json(fields).to_action(ActionKind::ParkSetParameter),
            Err(ParameterError::MissingField("value"))
        );
    }

    proptest! {
        #[test]
        fn prop_land_packets_survive_the_wire(
            x1 in -100i32..10_000, y1 in -100i32..10_000,
            x2 in -100i32..10_000, y2 in -100i32..10_000,
            setting in any::<u8>(), ownership in any::<u8>(), tick in any::<u32>(),
        ) {
            let action = Action::LandSetRights(LandSetRightsAction::from_raw(
                MapRange::new(x1, y1, x2, y2),
                setting,
                ownership,
            ));
            let bytes = ActionPacket::new(&action, tick).encode();
            let decoded = ActionPacket::decode(&bytes).unwrap();
            prop_assert_eq!(decoded.tick, tick);
            prop_assert_eq!(decoded.to_action().unwrap(), action.clone());

            let via_map = ParameterMap::capture(&action).to_action(ActionKind::LandSetRights).unwrap();
            prop_assert_eq!(via_map, action);
        }
    }
}
