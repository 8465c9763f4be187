//! Byte-at-a-time frame receiver.
//!
//! The receiver walks every frame through four sections:
//!
//! ```text
//! START  --start1,start2-->  HEADER  --4 bytes-->  DATA  --length bytes-->  END  --crc lo,hi--> START
//!                               \---- length 0 ----------------------------/
//! ```
//!
//! Any failure resets to START with cleared buffers; the stream is never
//! abandoned. A frame that stays in progress longer than the frame timeout
//! is dropped when the next byte arrives.
//!
//! One task owns the receiver and feeds it. Handlers run synchronously on
//! that task; state they share with other threads must carry its own
//! synchronization (see [`crate::store::TelemetryStore`]).

use crate::ack::AckTracker;
use crate::config::ReceiverConfig;
use crate::dispatch::{Dispatcher, Received};
use crate::error::{ErrorKind, FrameError};
use bytes::{BufMut, BytesMut};
use codrone_protocol::message::Ack;
use codrone_protocol::{crc16, DataType, DeviceType, Header, Registry, Serializable};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read buffer size for [`Receiver::run`].
const READ_BUFFER_SIZE: usize = 1024;

/// Section of the frame the receiver is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Start,
    Header,
    Data,
    End,
}

/// Outcome of feeding one byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    /// Frame still in progress (or noise skipped while hunting for a start).
    Pending,
    /// Frame decoded and passed to the handlers registered for it, if any.
    Dispatched(DataType),
    /// Valid frame of a type that has no decoder.
    Ignored(DataType),
    /// Ack frame forwarded to the tracker. `None` if the acknowledged type
    /// could not be decoded.
    Acknowledged(Option<DataType>),
    /// Frame decoded but a handler failed or panicked.
    HandlerFailed(DataType),
    /// Frame abandoned.
    Dropped(FrameError),
}

impl Feed {
    /// Whether this byte finished a frame, successfully or not.
    pub fn is_complete(&self) -> bool {
        !matches!(self, Feed::Pending)
    }
}

/// Running counters. Never reset by [`Receiver::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReceiverStats {
    pub bytes: u64,
    pub frames_dispatched: u64,
    pub frames_ignored: u64,
    pub acks: u64,
    pub handler_failures: u64,
    pub dropped_framing: u64,
    pub dropped_integrity: u64,
    pub dropped_decode: u64,
    pub dropped_timeout: u64,
}

impl ReceiverStats {
    pub fn dropped(&self, kind: ErrorKind) -> u64 {
        match kind {
            ErrorKind::Framing => self.dropped_framing,
            ErrorKind::Integrity => self.dropped_integrity,
            ErrorKind::Decode => self.dropped_decode,
            ErrorKind::Timeout => self.dropped_timeout,
        }
    }

    pub fn total_dropped(&self) -> u64 {
        ErrorKind::ALL.iter().map(|kind| self.dropped(*kind)).sum()
    }

    fn record_drop(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::Framing => self.dropped_framing += 1,
            ErrorKind::Integrity => self.dropped_integrity += 1,
            ErrorKind::Decode => self.dropped_decode += 1,
            ErrorKind::Timeout => self.dropped_timeout += 1,
        }
    }
}

pub struct Receiver {
    config: ReceiverConfig,
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    acks: Arc<AckTracker>,

    section: Section,
    index: usize,
    header: Header,
    payload: BytesMut,
    crc: u16,
    received_crc: u16,
    frame_start: Option<Instant>,

    stats: ReceiverStats,
}

impl Receiver {
    pub fn new(
        config: ReceiverConfig,
        registry: Arc<Registry>,
        dispatcher: Dispatcher,
        acks: Arc<AckTracker>,
    ) -> Self {
        let payload = BytesMut::with_capacity(config.max_payload_size);
        Self {
            config,
            registry,
            dispatcher,
            acks,
            section: Section::Start,
            index: 0,
            header: Header::default(),
            payload,
            crc: 0,
            received_crc: 0,
            frame_start: None,
            stats: ReceiverStats::default(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Position within the current section.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    pub fn acks(&self) -> &Arc<AckTracker> {
        &self.acks
    }

    /// Discards any frame in progress.
    pub fn reset(&mut self) {
        self.section = Section::Start;
        self.index = 0;
        self.header = Header::default();
        self.payload.clear();
        self.crc = 0;
        self.received_crc = 0;
        self.frame_start = None;
    }

    /// Feeds one byte from the transport.
    pub fn feed_byte(&mut self, byte: u8) -> Feed {
        self.feed_byte_at(byte, Instant::now())
    }

    /// Feeds one byte received at `now`.
    pub fn feed_byte_at(&mut self, byte: u8, now: Instant) -> Feed {
        self.stats.bytes += 1;

        if let Some(started) = self.frame_start {
            let elapsed = now.saturating_duration_since(started);
            let limit = self.config.frame_timeout();
            if elapsed > limit {
                let err = FrameError::Timeout { elapsed, limit };
                tracing::debug!(
                    section = ?self.section,
                    index = self.index,
                    "dropping stale frame: {}",
                    err
                );
                self.reset();
                self.stats.record_drop(err.kind());
                // The byte that exposed the stall may start the next frame.
                let _ = self.step(byte, now);
                return Feed::Dropped(err);
            }
        }

        self.step(byte, now)
    }

    /// Feeds a chunk, returning every non-pending outcome in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Feed> {
        data.iter()
            .map(|&byte| self.feed_byte(byte))
            .filter(Feed::is_complete)
            .collect()
    }

    /// Reads `reader` to the end, feeding every byte.
    pub async fn run<R>(&mut self, mut reader: R) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                tracing::debug!(bytes = self.stats.bytes, "transport closed");
                return Ok(());
            }
            for &byte in &buf[..n] {
                self.feed_byte(byte);
            }
        }
    }

    fn step(&mut self, byte: u8, now: Instant) -> Feed {
        match self.section {
            Section::Start => self.on_start(byte, now),
            Section::Header => self.on_header(byte),
            Section::Data => {
                self.crc = crc16::accumulate(byte, self.crc);
                self.payload.put_u8(byte);
                self.index += 1;
                if self.index == usize::from(self.header.length) {
                    self.section = Section::End;
                    self.index = 0;
                }
                Feed::Pending
            }
            Section::End => {
                if self.index == 0 {
                    self.received_crc = u16::from(byte);
                    self.index = 1;
                    Feed::Pending
                } else {
                    self.received_crc |= u16::from(byte) << 8;
                    self.complete()
                }
            }
        }
    }

    fn on_start(&mut self, byte: u8, now: Instant) -> Feed {
        let [start1, start2] = self.config.start_bytes;

        if self.index == 0 {
            if byte == start1 {
                self.index = 1;
            }
            return Feed::Pending;
        }

        if byte == start2 {
            self.section = Section::Header;
            self.index = 0;
            self.crc = 0;
            self.frame_start = Some(now);
            return Feed::Pending;
        }

        let err = FrameError::InvalidStart {
            expected: start2,
            actual: byte,
        };
        tracing::trace!("{}", err);
        self.reset();
        self.stats.record_drop(err.kind());
        if byte == start1 {
            self.index = 1;
        }
        Feed::Dropped(err)
    }

    fn on_header(&mut self, byte: u8) -> Feed {
        self.crc = crc16::accumulate(byte, self.crc);

        match self.index {
            0 => match self.registry.lookup_by_wire_byte(byte) {
                Some(info) => self.header.data_type = info.data_type,
                None => return self.abort(FrameError::UnknownDataType(byte)),
            },
            1 => {
                if usize::from(byte) > self.config.max_payload_size {
                    return self.abort(FrameError::LengthOverflow {
                        length: byte,
                        max: self.config.max_payload_size,
                    });
                }
                self.header.length = byte;
            }
            2 => match DeviceType::try_from(byte) {
                Ok(device) => self.header.from = device,
                Err(_) => return self.abort(FrameError::UnknownDevice(byte)),
            },
            _ => {
                match DeviceType::try_from(byte) {
                    Ok(device) => self.header.to = device,
                    Err(_) => return self.abort(FrameError::UnknownDevice(byte)),
                }
                self.section = if self.header.length == 0 {
                    Section::End
                } else {
                    Section::Data
                };
                self.index = 0;
                return Feed::Pending;
            }
        }

        self.index += 1;
        Feed::Pending
    }

    fn abort(&mut self, err: FrameError) -> Feed {
        tracing::debug!(section = ?self.section, "dropping frame: {}", err);
        self.reset();
        self.stats.record_drop(err.kind());
        Feed::Dropped(err)
    }

    fn complete(&mut self) -> Feed {
        let header = self.header;
        let received = self.received_crc;
        let calculated = self.crc;
        let payload = self.payload.split().freeze();
        self.reset();

        if received != calculated {
            let err = FrameError::CrcMismatch {
                received,
                calculated,
            };
            tracing::debug!(data_type = ?header.data_type, "{}", err);
            self.stats.record_drop(err.kind());
            return Feed::Dropped(err);
        }

        if header.data_type == DataType::Ack {
            let target = ack_target(&payload);
            self.stats.acks += 1;
            self.acks.resolve(target);
            return Feed::Acknowledged(target);
        }

        self.decode_and_dispatch(header, &payload)
    }

    fn decode_and_dispatch(&mut self, header: Header, payload: &[u8]) -> Feed {
        let data_type = header.data_type;

        let message = match self.registry.decode(data_type, payload) {
            Ok(Some(message)) => message,
            Ok(None) => {
                tracing::debug!(?data_type, "no decoder for data type, ignoring frame");
                self.stats.frames_ignored += 1;
                return Feed::Ignored(data_type);
            }
            Err(err) => {
                let err = FrameError::from_decode(data_type, err);
                tracing::error!(
                    ?data_type,
                    length = header.length,
                    from = ?header.from,
                    to = ?header.to,
                    "{}",
                    err
                );
                self.stats.record_drop(err.kind());
                return Feed::Dropped(err);
            }
        };

        let received = Received { header, message };
        self.stats.frames_dispatched += 1;
        match self.dispatcher.dispatch(&received) {
            Ok(handled) => {
                tracing::trace!(?data_type, handled, "dispatched {}", received.message.shape_name());
                Feed::Dispatched(data_type)
            }
            Err(err) => {
                tracing::error!(
                    ?data_type,
                    length = header.length,
                    from = ?header.from,
                    to = ?header.to,
                    "{}",
                    err
                );
                self.stats.handler_failures += 1;
                Feed::HandlerFailed(data_type)
            }
        }
    }
}

/// Data type an Ack payload refers to.
///
/// A full Ack carries a timestamp before the type byte; a short one is just
/// the type byte.
fn ack_target(payload: &[u8]) -> Option<DataType> {
    if payload.len() >= Ack::SIZE {
        let mut buf = payload;
        let mut ack = Ack::default();
        ack.unpack(&mut buf).ok().map(|_| ack.data_type)
    } else {
        payload
            .first()
            .and_then(|&byte| DataType::try_from(byte).ok())
    }
}

impl std::fmt::Debug for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("section", &self.section)
            .field("index", &self.index)
            .field("header", &self.header)
            .field("payload_len", &self.payload.len())
            .field("stats", &self.stats)
            .finish()
    }
}
