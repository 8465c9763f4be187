//! Binary frame format.
//!
//! Frame layout (8 bytes overhead + payload):
//!
//! ```text
//! +---------+---------+------+--------+------+------+-----------+--------+--------+
//! | start 1 | start 2 | type | length | from |  to  |  payload  | crc lo | crc hi |
//! | 1 byte  | 1 byte  |  1   |   1    |  1   |  1   | length B  |   1    |   1    |
//! +---------+---------+------+--------+------+------+-----------+--------+--------+
//! ```
//!
//! The CRC16 covers the four header bytes and the payload.

use crate::codec::Serializable;
use crate::crc16;
use crate::error::ProtocolError;
use crate::header::Header;
use crate::message::{Message, Payload};
use crate::types::{DataType, DeviceType};
use crate::{HEADER_SIZE, MAX_PAYLOAD_SIZE, START_BYTES};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Start sentinel, header and checksum bytes around every payload.
pub const FRAME_OVERHEAD: usize = 2 + HEADER_SIZE + 2;

/// A complete frame: header plus raw payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: Header,
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame carrying `payload` under `data_type`.
    ///
    /// The header length is set from the payload and saturates at 255;
    /// [`Frame::encode`] rejects anything above the maximum.
    pub fn new(data_type: DataType, from: DeviceType, to: DeviceType, payload: Bytes) -> Self {
        let length = u8::try_from(payload.len()).unwrap_or(u8::MAX);
        Self {
            header: Header::new(data_type, length, from, to),
            payload,
        }
    }

    /// Packs a typed payload into a frame.
    pub fn from_payload<T: Payload>(from: DeviceType, to: DeviceType, payload: &T) -> Self {
        Self::new(T::DATA_TYPE, from, to, payload.to_bytes().freeze())
    }

    /// Packs any message into a frame under its own data type.
    pub fn from_message(from: DeviceType, to: DeviceType, message: &Message) -> Self {
        Self::new(message.data_type(), from, to, message.to_bytes().freeze())
    }

    /// CRC16 over header and payload.
    pub fn checksum(&self) -> u16 {
        let header_crc = crc16::accumulate_slice(&self.header.to_array(), 0);
        crc16::accumulate_slice(&self.payload, header_crc)
    }

    /// Encodes the frame with the default start bytes.
    pub fn encode(&self) -> Result<BytesMut, ProtocolError> {
        self.encode_with(START_BYTES)
    }

    /// Encodes the frame with explicit start bytes.
    pub fn encode_with(&self, start: [u8; 2]) -> Result<BytesMut, ProtocolError> {
        self.encode_limited(start, MAX_PAYLOAD_SIZE)
    }

    /// Encodes the frame, rejecting payloads longer than `max_payload`.
    ///
    /// The limit is clamped to 255 since the header length is one byte.
    pub fn encode_limited(
        &self,
        start: [u8; 2],
        max_payload: usize,
    ) -> Result<BytesMut, ProtocolError> {
        let max = max_payload.min(usize::from(u8::MAX));
        if self.payload.len() > max {
            return Err(ProtocolError::PayloadTooLarge {
                size: self.payload.len(),
                max,
            });
        }

        let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + self.payload.len());
        buf.put_slice(&start);
        self.header.pack(&mut buf);
        buf.put_slice(&self.payload);
        buf.put_u16_le(self.checksum());
        Ok(buf)
    }

    /// Decodes a frame from bytes using the default start bytes.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol errors.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        Self::decode_with(buf, START_BYTES)
    }

    /// Decodes a frame from bytes using explicit start bytes.
    ///
    /// A bad start sequence or header discards one byte before the error is
    /// returned, so calling again after an error walks forward to the next
    /// frame.
    pub fn decode_with(buf: &mut BytesMut, start: [u8; 2]) -> Result<Option<Self>, ProtocolError> {
        if buf.len() < FRAME_OVERHEAD {
            return Ok(None);
        }

        let actual = [buf[0], buf[1]];
        if actual != start {
            buf.advance(1);
            return Err(ProtocolError::InvalidStart {
                expected: start,
                actual,
            });
        }

        let header = match Header::from_bytes(&buf[2..2 + HEADER_SIZE]) {
            Ok(header) => header,
            Err(err) => {
                buf.advance(1);
                return Err(err);
            }
        };
        let payload_len = usize::from(header.length);
        if payload_len > MAX_PAYLOAD_SIZE {
            buf.advance(1);
            return Err(ProtocolError::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let total_len = FRAME_OVERHEAD + payload_len;
        if buf.len() < total_len {
            return Ok(None);
        }

        // Consume start bytes and header
        buf.advance(2 + HEADER_SIZE);
        let payload = buf.split_to(payload_len).freeze();
        let received = buf.get_u16_le();

        let frame = Self { header, payload };
        let calculated = frame.checksum();
        if received != calculated {
            return Err(ProtocolError::CrcMismatch {
                received,
                calculated,
            });
        }

        Ok(Some(frame))
    }
}

/// Encodes a typed payload as a complete frame with the default start bytes.
pub fn encode<T: Payload>(
    from: DeviceType,
    to: DeviceType,
    payload: &T,
) -> Result<BytesMut, ProtocolError> {
    Frame::from_payload(from, to, payload).encode()
}
