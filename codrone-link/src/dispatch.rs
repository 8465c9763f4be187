//! Dispatch of decoded messages to handlers.

use crate::error::HandlerError;
use crate::store::TelemetryStore;
use codrone_protocol::{DataType, Header, Message, Payload, Registry};
use serde::Serialize;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A decoded frame as seen by handlers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Received {
    pub header: Header,
    pub message: Message,
}

impl Received {
    pub fn data_type(&self) -> DataType {
        self.header.data_type
    }
}

/// Handler callback.
pub type Handler = Box<dyn Fn(&Received) -> Result<(), HandlerError> + Send + Sync>;

/// Per-type handler table plus handlers that see every message.
///
/// Built before the receiver starts and owned by it afterwards.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<DataType, Vec<Handler>>,
    catch_all: Vec<Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one data type.
    pub fn on<F>(mut self, data_type: DataType, handler: F) -> Self
    where
        F: Fn(&Received) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handlers
            .entry(data_type)
            .or_default()
            .push(Box::new(handler));
        self
    }

    /// Registers a handler for shape `T`.
    ///
    /// Messages of the same data type but another shape are skipped.
    pub fn on_payload<T, F>(self, handler: F) -> Self
    where
        T: Payload,
        F: Fn(&Header, &T) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.on(T::DATA_TYPE, move |received| {
            match received.message.downcast_ref::<T>() {
                Some(payload) => handler(&received.header, payload),
                None => Ok(()),
            }
        })
    }

    /// Registers a handler that sees every dispatched message.
    pub fn on_any<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Received) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.catch_all.push(Box::new(handler));
        self
    }

    /// Stores every decodable type into `store`.
    pub fn with_store(mut self, registry: &Registry, store: Arc<TelemetryStore>) -> Self {
        for info in registry.iter().filter(|info| info.is_decodable()) {
            let store = Arc::clone(&store);
            self = self.on(info.data_type, move |received| {
                store.update(received.message.clone());
                Ok(())
            });
        }
        self
    }

    /// Forwards every message to a channel consumed by a single owning task.
    pub fn forward_to(self, sender: mpsc::UnboundedSender<Received>) -> Self {
        self.on_any(move |received| {
            sender
                .send(received.clone())
                .map_err(|_| HandlerError::ChannelClosed)
        })
    }

    pub fn has_handler(&self, data_type: DataType) -> bool {
        !self.catch_all.is_empty() || self.handlers.contains_key(&data_type)
    }

    /// Runs every handler for the message.
    ///
    /// Returns `Ok(false)` when nothing handles the type. All handlers run
    /// even if one fails; the first failure is returned. Panics are caught.
    pub fn dispatch(&self, received: &Received) -> Result<bool, HandlerError> {
        let typed = self
            .handlers
            .get(&received.data_type())
            .map(Vec::as_slice)
            .unwrap_or_default();

        if typed.is_empty() && self.catch_all.is_empty() {
            return Ok(false);
        }

        let mut first_error = None;
        for handler in typed.iter().chain(self.catch_all.iter()) {
            if let Err(err) = invoke(handler, received) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }
}

fn invoke(handler: &Handler, received: &Received) -> Result<(), HandlerError> {
    match catch_unwind(AssertUnwindSafe(|| handler(received))) {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(HandlerError::Panicked(reason))
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("types", &self.handlers.len())
            .field("catch_all", &self.catch_all.len())
            .finish()
    }
}
