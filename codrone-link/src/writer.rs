//! Outbound command path.

use crate::ack::AckTracker;
use crate::config::{Config, LinkConfig, ReceiverConfig};
use crate::error::LinkError;
use codrone_protocol::message::Request;
use codrone_protocol::{DataType, DeviceType, Frame, Message, Payload};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Frames commands and writes them to the transport.
pub struct CommandWriter<W> {
    writer: Mutex<W>,
    acks: Arc<AckTracker>,
    from: DeviceType,
    to: DeviceType,
    start_bytes: [u8; 2],
    max_payload_size: usize,
    ack_timeout: Duration,
}

impl<W: AsyncWrite + Unpin> CommandWriter<W> {
    pub fn new(writer: W, acks: Arc<AckTracker>, config: &Config) -> Self {
        Self::with_link(writer, acks, &config.link, &config.receiver)
    }

    /// Builds a writer framing with the receiver's start bytes and payload limit.
    pub fn with_link(
        writer: W,
        acks: Arc<AckTracker>,
        link: &LinkConfig,
        receiver: &ReceiverConfig,
    ) -> Self {
        Self {
            writer: Mutex::new(writer),
            acks,
            from: link.local_device,
            to: link.remote_device,
            start_bytes: receiver.start_bytes,
            max_payload_size: receiver.max_payload_size,
            ack_timeout: link.ack_timeout(),
        }
    }

    /// Overrides the destination device.
    pub fn with_target(mut self, to: DeviceType) -> Self {
        self.to = to;
        self
    }

    /// Writes a command without waiting for an acknowledgment.
    pub async fn send<T: Payload>(&self, payload: &T) -> Result<(), LinkError> {
        let frame = Frame::from_payload(self.from, self.to, payload);
        self.write_frame(&frame).await
    }

    pub async fn send_message(&self, message: &Message) -> Result<(), LinkError> {
        let frame = Frame::from_message(self.from, self.to, message);
        self.write_frame(&frame).await
    }

    /// Writes a command and waits for the drone to acknowledge its type.
    pub async fn send_with_ack<T: Payload>(&self, payload: &T) -> Result<(), LinkError> {
        let frame = Frame::from_payload(self.from, self.to, payload);
        let mut handle = self.acks.expect(T::DATA_TYPE);

        if let Err(err) = self.write_frame(&frame).await {
            self.acks.cancel_handle(&handle);
            return Err(err);
        }

        match handle.wait_timeout(self.ack_timeout).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(data_type = ?T::DATA_TYPE, "acknowledgment wait failed: {}", err);
                self.acks.cancel_handle(&handle);
                Err(err.into())
            }
        }
    }

    /// Asks the remote device to send a frame of `data_type`.
    pub async fn request(&self, data_type: DataType) -> Result<(), LinkError> {
        self.send(&Request { data_type }).await
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_frame(&self, frame: &Frame) -> Result<(), LinkError> {
        let bytes = frame.encode_limited(self.start_bytes, self.max_payload_size)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        tracing::trace!(data_type = ?frame.header.data_type, len = bytes.len(), "frame written");
        Ok(())
    }
}

impl<W> std::fmt::Debug for CommandWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandWriter")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("max_payload_size", &self.max_payload_size)
            .field("ack_timeout", &self.ack_timeout)
            .finish()
    }
}
