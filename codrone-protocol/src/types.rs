//! Wire enumerations: message types and device addresses.

/// Declares a `#[repr]` enum carried on the wire.
///
/// The generated type converts from its raw value with `TryFrom` (unknown
/// values are rejected), converts back with `From`, and is a [`WireField`].
///
/// [`WireField`]: crate::codec::WireField
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $repr:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ::serde::Serialize)]
        #[repr($repr)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Raw wire value.
            pub const fn value(self) -> $repr {
                self as $repr
            }
        }

        impl TryFrom<$repr> for $name {
            type Error = $crate::error::ProtocolError;

            fn try_from(value: $repr) -> Result<Self, $crate::error::ProtocolError> {
                match value {
                    $(v if v == $value => Ok($name::$variant),)+
                    _ => Err($crate::error::ProtocolError::UnknownEnumValue {
                        field: stringify!($name),
                        value: value as u32,
                    }),
                }
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> $repr {
                value as $repr
            }
        }

        impl $crate::codec::WireField for $name {
            const SIZE: usize = ::std::mem::size_of::<$repr>();

            fn put<B: ::bytes::BufMut>(&self, buf: &mut B) {
                $crate::codec::WireField::put(&(*self as $repr), buf);
            }

            fn get<B: ::bytes::Buf>(buf: &mut B) -> Result<Self, $crate::error::ProtocolError> {
                let raw = <$repr as $crate::codec::WireField>::get(buf)?;
                $name::try_from(raw)
            }
        }
    };
}

wire_enum! {
    /// Message type carried in the first header byte.
    pub enum DataType: u8 {
        #[default]
        None = 0x00,

        Ping = 0x01,
        Ack = 0x02,
        Error = 0x03,
        Request = 0x04,
        Message = 0x05,
        Address = 0x06,
        Information = 0x07,
        UpdateLocation = 0x09,
        SystemInformation = 0x0C,
        Registration = 0x0D,

        Control = 0x10,
        Command = 0x11,
        Pairing = 0x12,
        Rssi = 0x13,

        LightManual = 0x20,
        LightMode = 0x21,
        LightEvent = 0x22,
        LightDefault = 0x23,

        RawMotion = 0x30,
        RawFlow = 0x31,

        State = 0x40,
        Attitude = 0x41,
        Position = 0x42,
        Altitude = 0x43,
        Motion = 0x44,
        Range = 0x45,
        Flow = 0x46,

        Count = 0x50,
        Bias = 0x51,
        Trim = 0x52,
        Weight = 0x53,

        Buzzer = 0x62,

        Button = 0x70,
        Joystick = 0x71,

        DisplayClear = 0x80,
        DisplayInvert = 0x81,
        DisplayDrawPoint = 0x82,
        DisplayDrawLine = 0x83,
        DisplayDrawRect = 0x84,
        DisplayDrawCircle = 0x85,
        DisplayDrawString = 0x86,
        DisplayDrawStringAlign = 0x87,
        DisplayDrawImage = 0x88,

        CardClassify = 0x90,
        CardRange = 0x91,
        CardRaw = 0x92,
        CardColor = 0x93,
        CardList = 0x94,
        CardFunctionList = 0x95,

        InformationAssembledForController = 0xA0,
        InformationAssembledForEntry = 0xA1,

        EndOfType = 0xDC,
    }
}

impl DataType {
    /// Types that never carry a payload shape of their own.
    pub fn is_reserved(self) -> bool {
        matches!(self, DataType::None | DataType::EndOfType)
    }
}

wire_enum! {
    /// Device address used in the `from` and `to` header fields.
    pub enum DeviceType: u8 {
        #[default]
        None = 0x00,

        Drone = 0x10,
        Controller = 0x20,

        Link = 0x30,
        LinkServer = 0x31,
        BleClient = 0x32,
        BleServer = 0x33,

        Range = 0x40,
        Base = 0x70,

        ByScratch = 0x80,
        Scratch = 0x81,
        Entry = 0x82,

        Tester = 0xA0,
        Monitor = 0xA1,
        Updater = 0xA2,
        Encryptor = 0xA3,

        Whispering = 0xFE,
        Broadcasting = 0xFF,
    }
}
