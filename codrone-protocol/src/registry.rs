//! Message type registry.
//!
//! Maps wire bytes to [`DataType`] entries and payload shapes to the type
//! they travel under. Built once by [`Registry::standard`] and immutable
//! afterwards; share it behind an `Arc`.

use crate::codec::Serializable;
use crate::error::ProtocolError;
use crate::message::*;
use crate::types::DataType;
use std::any::TypeId;
use std::collections::HashMap;

/// Produces a default-valued message ready to be unpacked into.
pub type Factory = fn() -> Message;

/// Registry entry for one message type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub data_type: DataType,
    /// Name of the primary shape, if the type has one.
    pub shape: Option<&'static str>,
    factory: Option<Factory>,
}

impl TypeInfo {
    fn reserved(data_type: DataType) -> Self {
        Self {
            data_type,
            shape: None,
            factory: None,
        }
    }

    pub fn wire_byte(&self) -> u8 {
        self.data_type.value()
    }

    /// Whether inbound frames of this type can be decoded.
    pub fn is_decodable(&self) -> bool {
        self.factory.is_some()
    }
}

fn factory<T: Payload>() -> Message {
    T::default().into()
}

#[derive(Debug)]
pub struct Registry {
    by_wire: HashMap<u8, TypeInfo>,
    by_shape: HashMap<TypeId, DataType>,
}

impl Registry {
    /// Entries for every [`DataType`], with no shapes attached.
    fn bare() -> Self {
        let by_wire = DataType::ALL
            .iter()
            .map(|&data_type| (data_type.value(), TypeInfo::reserved(data_type)))
            .collect();
        Self {
            by_wire,
            by_shape: HashMap::new(),
        }
    }

    /// The registry for the CoDrone EDU protocol.
    ///
    /// Inbound telemetry types carry a factory. Command, light, buzzer and
    /// display types are outbound only: they resolve but never decode.
    pub fn standard() -> Self {
        let mut registry = Self::bare();

        registry.decodable::<Ping>();
        registry.decodable::<Ack>();
        registry.decodable::<SystemError>();
        registry.outbound::<Request>();
        registry.decodable::<TextMessage>();
        registry.decodable::<Address>();
        registry.decodable::<Information>();
        registry.decodable::<UpdateLocation>();
        registry.decodable::<SystemInformation>();
        registry.decodable::<Registration>();
        registry.decodable::<Pairing>();
        registry.decodable::<Rssi>();

        registry.outbound::<Quad8>();
        registry.outbound::<Quad8AndRequestData>();
        registry.outbound::<ControlPosition16>();
        registry.outbound::<ControlPosition>();
        registry.outbound::<Command>();
        registry.outbound::<CommandLightEvent>();
        registry.outbound::<CommandLightEventColor>();

        registry.outbound::<LightManual>();
        registry.outbound::<LightMode>();
        registry.outbound::<LightEvent>();
        registry.outbound::<LightDefault>();

        registry.decodable::<RawMotion>();
        registry.decodable::<RawFlow>();
        registry.decodable::<State>();
        registry.decodable::<Attitude>();
        registry.decodable::<Position>();
        registry.decodable::<Altitude>();
        registry.decodable::<Motion>();
        registry.decodable::<Range>();
        registry.decodable::<Flow>();

        registry.decodable::<Count>();
        registry.decodable::<Bias>();
        registry.decodable::<Trim>();
        registry.decodable::<Weight>();

        registry.outbound::<Buzzer>();

        registry.decodable::<Button>();
        registry.decodable::<Joystick>();

        registry.outbound::<DisplayClearAll>();
        registry.outbound::<DisplayClear>();
        registry.outbound::<DisplayInvert>();
        registry.outbound::<DisplayDrawPoint>();
        registry.outbound::<DisplayDrawLine>();
        registry.outbound::<DisplayDrawRect>();
        registry.outbound::<DisplayDrawCircle>();
        registry.outbound::<DisplayDrawString>();
        registry.outbound::<DisplayDrawStringAlign>();
        registry.outbound::<DisplayDrawImage>();

        registry.decodable::<CardClassify>();
        registry.decodable::<CardRange>();
        registry.decodable::<CardRaw>();
        registry.decodable::<CardColor>();
        registry.decodable::<CardList>();

        registry.decodable::<InformationAssembledForController>();
        registry.decodable::<InformationAssembledForEntry>();

        registry
    }

    fn decodable<T: Payload>(&mut self) {
        self.register::<T>(Some(factory::<T>));
    }

    fn outbound<T: Payload>(&mut self) {
        self.register::<T>(None);
    }

    fn register<T: Payload>(&mut self, factory: Option<Factory>) {
        let data_type = T::DATA_TYPE;
        if let Some(info) = self.by_wire.get_mut(&data_type.value()) {
            // First shape registered for a type is its primary shape.
            if info.shape.is_none() {
                info.shape = Some(T::NAME);
            }
            if info.factory.is_none() {
                info.factory = factory;
            }
        }
        self.by_shape.insert(TypeId::of::<T>(), data_type);
    }

    pub fn lookup_by_wire_byte(&self, byte: u8) -> Option<&TypeInfo> {
        self.by_wire.get(&byte)
    }

    pub fn lookup(&self, data_type: DataType) -> Option<&TypeInfo> {
        self.by_wire.get(&data_type.value())
    }

    /// Entry for the type shape `T` is sent under.
    pub fn lookup_by_shape<T: Payload>(&self) -> Option<&TypeInfo> {
        self.by_shape
            .get(&TypeId::of::<T>())
            .and_then(|data_type| self.lookup(*data_type))
    }

    /// A fresh default instance of the entry's primary shape, or `None` for
    /// outbound-only and reserved types.
    pub fn create_instance(&self, info: &TypeInfo) -> Option<Message> {
        info.factory.map(|make| make())
    }

    /// Decodes a complete payload for `data_type`.
    ///
    /// Returns `Ok(None)` when the type has no decoder. The payload must be
    /// consumed exactly; leftover bytes are a size mismatch.
    pub fn decode(&self, data_type: DataType, payload: &[u8]) -> Result<Option<Message>, ProtocolError> {
        let Some(mut message) = self.lookup(data_type).and_then(|info| self.create_instance(info))
        else {
            return Ok(None);
        };

        let mut buf = payload;
        message.unpack(&mut buf)?;
        if !buf.is_empty() {
            return Err(ProtocolError::SizeMismatch {
                expected: message.size(),
                actual: payload.len(),
            });
        }
        Ok(Some(message))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.by_wire.values()
    }

    pub fn len(&self) -> usize {
        self.by_wire.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_wire.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
