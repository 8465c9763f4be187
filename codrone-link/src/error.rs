//! Link error types.

use codrone_protocol::{DataType, ProtocolError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a dropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Bad sentinel, unknown header field or length over the ceiling.
    Framing,
    /// CRC mismatch.
    Integrity,
    /// Payload failed to decode despite a valid CRC.
    Decode,
    /// Frame stalled past the frame timeout.
    Timeout,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Framing,
        ErrorKind::Integrity,
        ErrorKind::Decode,
        ErrorKind::Timeout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Framing => "framing",
            ErrorKind::Integrity => "integrity",
            ErrorKind::Decode => "decode",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the receiver abandoned a frame. Never escapes `feed_byte` as a panic
/// or error; it is reported in the returned outcome and then discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("invalid second start byte: expected {expected:#04x}, got {actual:#04x}")]
    InvalidStart { expected: u8, actual: u8 },

    #[error("unknown data type: {0:#04x}")]
    UnknownDataType(u8),

    #[error("unknown device: {0:#04x}")]
    UnknownDevice(u8),

    #[error("payload length {length} exceeds maximum {max}")]
    LengthOverflow { length: u8, max: usize },

    #[error("CRC mismatch: received {received:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { received: u16, calculated: u16 },

    #[error("frame stalled for {elapsed:?} (limit {limit:?})")]
    Timeout { elapsed: Duration, limit: Duration },

    #[error("payload length {actual} does not match {data_type:?} size {expected}")]
    LengthMismatch {
        data_type: DataType,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode {data_type:?} payload: {source}")]
    Decode {
        data_type: DataType,
        #[source]
        source: ProtocolError,
    },
}

impl FrameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::InvalidStart { .. }
            | FrameError::UnknownDataType(_)
            | FrameError::UnknownDevice(_)
            | FrameError::LengthOverflow { .. } => ErrorKind::Framing,
            FrameError::CrcMismatch { .. } => ErrorKind::Integrity,
            FrameError::Timeout { .. } => ErrorKind::Timeout,
            FrameError::LengthMismatch { .. } | FrameError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Whether this is ordinary line noise rather than a protocol bug.
    pub fn is_expected(&self) -> bool {
        self.kind() != ErrorKind::Decode
    }

    pub(crate) fn from_decode(data_type: DataType, err: ProtocolError) -> Self {
        match err {
            ProtocolError::SizeMismatch { expected, actual } => FrameError::LengthMismatch {
                data_type,
                expected,
                actual,
            },
            source => FrameError::Decode { data_type, source },
        }
    }
}

/// Outcome of waiting on an acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AckError {
    #[error("a newer wait for the same message type replaced this one")]
    Superseded,

    #[error("acknowledgment wait cancelled")]
    Cancelled,

    #[error("no acknowledgment within {0:?}")]
    Timeout(Duration),
}

/// Failure reported by a dispatch handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("message channel closed")]
    ChannelClosed,
}

/// Errors from the outbound command path.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("acknowledgment error: {0}")]
    Ack(#[from] AckError),
}

impl LinkError {
    /// Returns whether resending the same command may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LinkError::Ack(AckError::Timeout(_)) | LinkError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_kinds() {
        assert_eq!(
            FrameError::InvalidStart {
                expected: 0x55,
                actual: 0x00
            }
            .kind(),
            ErrorKind::Framing
        );
        assert_eq!(FrameError::UnknownDataType(0x08).kind(), ErrorKind::Framing);
        assert_eq!(FrameError::UnknownDevice(0x11).kind(), ErrorKind::Framing);
        assert_eq!(
            FrameError::LengthOverflow {
                length: 200,
                max: 128
            }
            .kind(),
            ErrorKind::Framing
        );
        assert_eq!(
            FrameError::CrcMismatch {
                received: 1,
                calculated: 2
            }
            .kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            FrameError::Timeout {
                elapsed: Duration::from_millis(700),
                limit: Duration::from_millis(600)
            }
            .kind(),
            ErrorKind::Timeout
        );
    }

    #[test]
    fn test_decode_errors_are_unexpected() {
        let err = FrameError::from_decode(
            DataType::State,
            ProtocolError::SizeMismatch {
                expected: 8,
                actual: 9,
            },
        );
        assert!(matches!(err, FrameError::LengthMismatch { expected: 8, actual: 9, .. }));
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!err.is_expected());

        let err = FrameError::from_decode(
            DataType::State,
            ProtocolError::UnknownEnumValue {
                field: "ModeFlight",
                value: 0x99,
            },
        );
        assert!(matches!(err, FrameError::Decode { .. }));
        assert!(err.to_string().contains("ModeFlight"));

        assert!(FrameError::UnknownDataType(0).is_expected());
    }

    #[test]
    fn test_link_error_retryable() {
        assert!(LinkError::Ack(AckError::Timeout(Duration::from_secs(1))).is_retryable());
        assert!(!LinkError::Ack(AckError::Superseded).is_retryable());
        assert!(!LinkError::Protocol(ProtocolError::InvalidUtf8).is_retryable());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Integrity.to_string(), "integrity");
        assert_eq!(ErrorKind::ALL.len(), 4);
    }
}
