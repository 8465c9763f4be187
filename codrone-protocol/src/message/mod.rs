//! Payload shapes and the [`Message`] sum type.
//!
//! Every shape implements [`Payload`], which ties it to the [`DataType`] it
//! travels under. Several shapes may share one type: `Control` accepts four
//! stick/position layouts and `Command` three.

pub mod buzzer;
pub mod card;
pub mod control;
pub mod display;
pub mod information;
pub mod input;
pub mod light;
pub mod link;
pub mod settings;
pub mod status;

pub use buzzer::*;
pub use card::*;
pub use control::*;
pub use display::*;
pub use information::*;
pub use input::*;
pub use light::*;
pub use link::*;
pub use settings::*;
pub use status::*;

use crate::codec::Serializable;
use crate::error::ProtocolError;
use crate::types::DataType;
use bytes::{Buf, BufMut};
use serde::Serialize;

/// A concrete payload shape.
pub trait Payload: Serializable + Clone + Default + Into<Message> + 'static {
    /// Message type this shape is sent under.
    const DATA_TYPE: DataType;

    /// Shape name, used in logs and JSON output.
    const NAME: &'static str;

    /// Borrows the shape out of a [`Message`] if it holds one.
    fn from_message(message: &Message) -> Option<&Self>;
}

macro_rules! messages {
    ($($shape:ident => $data_type:ident),+ $(,)?) => {
        /// Any decoded payload.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "shape", content = "fields")]
        pub enum Message {
            $($shape($shape),)+
        }

        $(
            impl Payload for $shape {
                const DATA_TYPE: DataType = DataType::$data_type;
                const NAME: &'static str = stringify!($shape);

                fn from_message(message: &Message) -> Option<&Self> {
                    match message {
                        Message::$shape(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$shape> for Message {
                fn from(inner: $shape) -> Self {
                    Message::$shape(inner)
                }
            }
        )+

        impl Message {
            pub fn data_type(&self) -> DataType {
                match self {
                    $(Message::$shape(_) => DataType::$data_type,)+
                }
            }

            pub fn shape_name(&self) -> &'static str {
                match self {
                    $(Message::$shape(_) => stringify!($shape),)+
                }
            }
        }

        impl Serializable for Message {
            fn size(&self) -> usize {
                match self {
                    $(Message::$shape(inner) => inner.size(),)+
                }
            }

            fn pack<B: BufMut>(&self, buf: &mut B) {
                match self {
                    $(Message::$shape(inner) => inner.pack(buf),)+
                }
            }

            fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError> {
                match self {
                    $(Message::$shape(inner) => inner.unpack(buf),)+
                }
            }
        }
    };
}

messages! {
    Ping => Ping,
    Ack => Ack,
    SystemError => Error,
    Request => Request,
    TextMessage => Message,
    Address => Address,
    Information => Information,
    UpdateLocation => UpdateLocation,
    SystemInformation => SystemInformation,
    Registration => Registration,
    Pairing => Pairing,
    Rssi => Rssi,

    Quad8 => Control,
    Quad8AndRequestData => Control,
    ControlPosition16 => Control,
    ControlPosition => Control,
    Command => Command,
    CommandLightEvent => Command,
    CommandLightEventColor => Command,

    LightManual => LightManual,
    LightMode => LightMode,
    LightEvent => LightEvent,
    LightDefault => LightDefault,

    RawMotion => RawMotion,
    RawFlow => RawFlow,
    State => State,
    Attitude => Attitude,
    Position => Position,
    Altitude => Altitude,
    Motion => Motion,
    Range => Range,
    Flow => Flow,

    Count => Count,
    Bias => Bias,
    Trim => Trim,
    Weight => Weight,

    Buzzer => Buzzer,

    Button => Button,
    Joystick => Joystick,

    DisplayClearAll => DisplayClear,
    DisplayClear => DisplayClear,
    DisplayInvert => DisplayInvert,
    DisplayDrawPoint => DisplayDrawPoint,
    DisplayDrawLine => DisplayDrawLine,
    DisplayDrawRect => DisplayDrawRect,
    DisplayDrawCircle => DisplayDrawCircle,
    DisplayDrawString => DisplayDrawString,
    DisplayDrawStringAlign => DisplayDrawStringAlign,
    DisplayDrawImage => DisplayDrawImage,

    CardClassify => CardClassify,
    CardRange => CardRange,
    CardRaw => CardRaw,
    CardColor => CardColor,
    CardList => CardList,

    InformationAssembledForController => InformationAssembledForController,
    InformationAssembledForEntry => InformationAssembledForEntry,
}

impl Message {
    /// Borrows the payload as shape `T`.
    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        T::from_message(self)
    }
}
