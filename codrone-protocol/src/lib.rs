//! # codrone-protocol
//!
//! Wire protocol implementation for CoDrone EDU drones and controllers.
//!
//! This crate provides:
//! - Binary framing with start sentinel and CRC16 validation
//! - Little-endian payload shapes for every message type
//! - A registry mapping wire bytes to message types and decoders
//! - Device addressing and drone system enumerations

pub mod codec;
pub mod crc16;
pub mod error;
pub mod frame;
pub mod header;
pub mod message;
pub mod registry;
pub mod system;
pub mod types;

pub use codec::{Serializable, WireField};
pub use error::ProtocolError;
pub use frame::{Frame, FRAME_OVERHEAD};
pub use header::Header;
pub use message::{Message, Payload};
pub use registry::{Registry, TypeInfo};
pub use types::{DataType, DeviceType};

/// Default start sentinel preceding every frame.
pub const START_BYTES: [u8; 2] = [0x0A, 0x55];

/// Size of the frame header in bytes.
pub const HEADER_SIZE: usize = 4;

/// Maximum payload length accepted by the receiver.
pub const MAX_PAYLOAD_SIZE: usize = 128;
