//! # codrone-link
//!
//! Serial link runtime for CoDrone EDU.
//!
//! This crate provides:
//! - Byte-at-a-time receiver state machine with CRC validation and stall recovery
//! - Per-type dispatch handlers with panic isolation
//! - Acknowledgment tracking for outbound commands
//! - Latest-value telemetry store for concurrent readers
//! - Async command writer
//! - YAML and environment configuration

pub mod ack;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod receiver;
pub mod store;
pub mod writer;

pub use ack::{AckHandle, AckTracker};
pub use config::{Config, ConfigError, LinkConfig, ReceiverConfig};
pub use dispatch::{Dispatcher, Handler, Received};
pub use error::{AckError, ErrorKind, FrameError, HandlerError, LinkError};
pub use receiver::{Feed, Receiver, ReceiverStats, Section};
pub use store::TelemetryStore;
pub use writer::CommandWriter;
