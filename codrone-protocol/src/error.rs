//! Protocol error types.

use thiserror::Error;

/// Errors raised while packing, unpacking or framing protocol messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid data size: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("unknown {field} value: {value:#04x}")]
    UnknownEnumValue { field: &'static str, value: u32 },

    #[error("invalid UTF-8 in payload")]
    InvalidUtf8,

    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("invalid start bytes: expected {expected:02x?}, got {actual:02x?}")]
    InvalidStart { expected: [u8; 2], actual: [u8; 2] },

    #[error("CRC mismatch: received {received:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { received: u16, calculated: u16 },
}

impl ProtocolError {
    /// Returns whether this error comes from an enumerated field that did not
    /// match its value table.
    pub fn is_unknown_value(&self) -> bool {
        matches!(self, ProtocolError::UnknownEnumValue { .. })
    }
}
