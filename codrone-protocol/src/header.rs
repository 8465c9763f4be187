//! Four-byte frame header.

use crate::types::{DataType, DeviceType};

crate::wire_struct! {
    /// Header preceding every payload: `[type][length][from][to]`.
    pub struct Header {
        pub data_type: DataType,
        pub length: u8,
        pub from: DeviceType,
        pub to: DeviceType,
    }
}

impl Header {
    pub fn new(data_type: DataType, length: u8, from: DeviceType, to: DeviceType) -> Self {
        Self {
            data_type,
            length,
            from,
            to,
        }
    }

    /// Raw header bytes in wire order.
    pub fn to_array(&self) -> [u8; 4] {
        [
            self.data_type.value(),
            self.length,
            self.from.value(),
            self.to.value(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Serializable;

    #[test]
    fn test_header_size() {
        assert_eq!(Header::SIZE, 4);
        assert_eq!(Header::SIZE, crate::HEADER_SIZE);
    }

    #[test]
    fn test_header_layout() {
        let header = Header::new(DataType::State, 8, DeviceType::Drone, DeviceType::Controller);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[..], &[0x40, 0x08, 0x10, 0x20]);
        assert_eq!(header.to_array(), [0x40, 0x08, 0x10, 0x20]);
    }

    #[test]
    fn test_header_decode() {
        let header = Header::from_bytes(&[0x02, 0x05, 0x10, 0x70]).unwrap();
        assert_eq!(header.data_type, DataType::Ack);
        assert_eq!(header.length, 5);
        assert_eq!(header.from, DeviceType::Drone);
        assert_eq!(header.to, DeviceType::Base);
    }

    #[test]
    fn test_header_rejects_unknown_fields() {
        let err = Header::from_bytes(&[0x08, 0x00, 0x10, 0x20]).unwrap_err();
        assert!(err.to_string().contains("DataType"));

        let err = Header::from_bytes(&[0x40, 0x08, 0x11, 0x20]).unwrap_err();
        assert!(err.to_string().contains("DeviceType"));
    }

    #[test]
    fn test_header_short() {
        assert!(Header::from_bytes(&[0x40, 0x08]).is_err());
    }
}
