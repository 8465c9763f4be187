//! Link manager messages: liveness, acknowledgement, identity and pairing.

use crate::codec::{get_text, Serializable};
use crate::error::ProtocolError;
use crate::system::{ModeUpdate, ModelNumber};
use crate::types::DataType;
use bytes::{Buf, BufMut};
use serde::Serialize;

crate::wire_struct! {
    pub struct Ping {
        pub system_time: u32,
    }
}

crate::wire_struct! {
    /// Acknowledges receipt of a frame of `data_type`.
    pub struct Ack {
        pub system_time: u32,
        pub data_type: DataType,
    }
}

crate::wire_struct! {
    /// Sensor and state error bitfields.
    pub struct SystemError {
        pub system_time: u64,
        pub error_flags_for_sensor: u32,
        pub error_flags_for_state: u32,
    }
}

crate::wire_struct! {
    /// Asks the remote device to send one frame of `data_type`.
    pub struct Request {
        pub data_type: DataType,
    }
}

crate::wire_struct! {
    pub struct Address {
        pub address: [u8; 16],
    }
}

crate::wire_struct! {
    pub struct Version {
        pub build: u16,
        pub minor: u8,
        pub major: u8,
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

crate::wire_struct! {
    /// Firmware identity: update state, model, version and build date.
    pub struct Information {
        pub mode_update: ModeUpdate,
        pub model_number: ModelNumber,
        pub version: Version,
        pub year: u16,
        pub month: u8,
        pub day: u8,
    }
}

crate::wire_struct! {
    pub struct UpdateLocation {
        pub index_block_next: i16,
    }
}

crate::wire_struct! {
    /// CRC32 of the bootloader and application images.
    pub struct SystemInformation {
        pub crc32_bootloader: u32,
        pub crc32_application: u32,
    }
}

crate::wire_struct! {
    pub struct Registration {
        pub address: Address,
        pub year: u16,
        pub month: u8,
        pub key: u8,
        pub flag_valid: bool,
    }
}

crate::wire_struct! {
    pub struct Pairing {
        pub address0: u16,
        pub address1: u16,
        pub address2: u16,
        pub scramble: u8,
        pub channel0: u8,
        pub channel1: u8,
        pub channel2: u8,
        pub channel3: u8,
    }
}

crate::wire_struct! {
    pub struct Rssi {
        pub rssi: i8,
    }
}

/// Free-form UTF-8 text. Consumes the rest of the payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Serializable for TextMessage {
    fn size(&self) -> usize {
        self.text.len()
    }

    fn pack<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.text.as_bytes());
    }

    fn unpack<B: Buf>(&mut self, buf: &mut B) -> Result<(), ProtocolError> {
        self.text = get_text(buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(Ping::SIZE, 4);
        assert_eq!(Ack::SIZE, 5);
        assert_eq!(SystemError::SIZE, 16);
        assert_eq!(Request::SIZE, 1);
        assert_eq!(Address::SIZE, 16);
        assert_eq!(Version::SIZE, 4);
        assert_eq!(Information::SIZE, 13);
        assert_eq!(UpdateLocation::SIZE, 2);
        assert_eq!(SystemInformation::SIZE, 8);
        assert_eq!(Registration::SIZE, 21);
        assert_eq!(Pairing::SIZE, 11);
        assert_eq!(Rssi::SIZE, 1);
    }

    #[test]
    fn test_ack_layout() {
        let ack = Ack {
            system_time: 0x0102_0304,
            data_type: DataType::Command,
        };
        let bytes = ack.to_bytes();
        assert_eq!(&bytes[..], &[0x04, 0x03, 0x02, 0x01, 0x11]);
        assert_eq!(Ack::from_bytes(&bytes).unwrap(), ack);
    }

    #[test]
    fn test_ack_unknown_type() {
        let err = Ack::from_bytes(&[0, 0, 0, 0, 0x08]).unwrap_err();
        assert!(err.is_unknown_value());
    }

    #[test]
    fn test_information_decode() {
        let bytes = [
            0x03, // mode update: complete
            0x05, 0x10, 0x04, 0x00, // model number
            0x2A, 0x00, 0x03, 0x02, // version 2.3.42
            0xE8, 0x07, // year 2024
            0x06, 0x0F,
        ];
        let info = Information::from_bytes(&bytes).unwrap();
        assert_eq!(info.mode_update, ModeUpdate::Complete);
        assert_eq!(info.model_number, ModelNumber::Drone4DroneP5);
        assert_eq!(info.version.to_string(), "2.3.42");
        assert_eq!(info.year, 2024);
        assert_eq!(info.month, 6);
        assert_eq!(info.day, 15);
        assert_eq!(&info.to_bytes()[..], &bytes);
    }

    #[test]
    fn test_registration_roundtrip() {
        let mut address = [0u8; 16];
        address[0] = 0xAB;
        address[15] = 0xCD;
        let reg = Registration {
            address: Address { address },
            year: 2023,
            month: 11,
            key: 7,
            flag_valid: true,
        };
        let bytes = reg.to_bytes();
        assert_eq!(bytes.len(), 21);
        assert_eq!(bytes[0], 0xAB);
        assert_eq!(bytes[15], 0xCD);
        assert_eq!(bytes[20], 1);
        assert_eq!(Registration::from_bytes(&bytes).unwrap(), reg);
    }

    #[test]
    fn test_text_message() {
        let msg = TextMessage::new("héllo");
        assert_eq!(msg.size(), 6);
        let bytes = msg.to_bytes();
        assert_eq!(TextMessage::from_bytes(&bytes).unwrap(), msg);

        assert_eq!(TextMessage::from_bytes(&[]).unwrap(), TextMessage::default());
        assert_eq!(
            TextMessage::from_bytes(&[0xFF, 0xFE]).unwrap_err(),
            ProtocolError::InvalidUtf8
        );
    }
}
