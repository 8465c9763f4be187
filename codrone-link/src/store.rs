//! Latest-value telemetry store.
//!
//! Written by the receiver's dispatch handlers, read from any thread.

use codrone_protocol::message::{Attitude, State};
use codrone_protocol::{DataType, Message, Payload};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    message: Message,
    count: u64,
    updated_at: Instant,
}

/// Most recent message of each type, with per-type update counts.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    entries: RwLock<HashMap<DataType, Entry>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored value for the message's data type.
    pub fn update(&self, message: Message) {
        let data_type = message.data_type();
        let mut entries = self.entries.write();
        let count = entries.get(&data_type).map_or(0, |e| e.count) + 1;
        entries.insert(
            data_type,
            Entry {
                message,
                count,
                updated_at: Instant::now(),
            },
        );
    }

    /// Snapshot of the latest value of shape `T`.
    ///
    /// `None` if nothing of that type has arrived or the latest value of the
    /// type was a different shape.
    pub fn get<T: Payload>(&self) -> Option<T> {
        let entries = self.entries.read();
        entries
            .get(&T::DATA_TYPE)
            .and_then(|entry| T::from_message(&entry.message))
            .cloned()
    }

    pub fn latest(&self, data_type: DataType) -> Option<Message> {
        self.entries
            .read()
            .get(&data_type)
            .map(|entry| entry.message.clone())
    }

    pub fn update_count(&self, data_type: DataType) -> u64 {
        self.entries.read().get(&data_type).map_or(0, |e| e.count)
    }

    /// When the type was last updated.
    pub fn updated_at(&self, data_type: DataType) -> Option<Instant> {
        self.entries.read().get(&data_type).map(|e| e.updated_at)
    }

    pub fn state(&self) -> Option<State> {
        self.get()
    }

    pub fn attitude(&self) -> Option<Attitude> {
        self.get()
    }

    /// Battery percentage from the latest State.
    pub fn battery(&self) -> Option<u8> {
        self.state().map(|s| s.battery)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codrone_protocol::message::{Altitude, Range};
    use codrone_protocol::system::ModeFlight;
    use std::sync::Arc;

    #[test]
    fn test_empty_store() {
        let store = TelemetryStore::new();
        assert!(store.is_empty());
        assert!(store.state().is_none());
        assert!(store.battery().is_none());
        assert_eq!(store.update_count(DataType::State), 0);
        assert!(store.updated_at(DataType::State).is_none());
    }

    #[test]
    fn test_update_and_get() {
        let store = TelemetryStore::new();
        let state = State {
            mode_flight: ModeFlight::Flight,
            battery: 64,
            ..Default::default()
        };
        store.update(state.into());

        assert_eq!(store.state(), Some(state));
        assert_eq!(store.battery(), Some(64));
        assert_eq!(store.update_count(DataType::State), 1);
        assert!(store.updated_at(DataType::State).is_some());
        assert_eq!(store.latest(DataType::State), Some(Message::State(state)));
    }

    #[test]
    fn test_latest_value_wins() {
        let store = TelemetryStore::new();
        for yaw in [10, 20, 30] {
            store.update(Attitude { roll: 0, pitch: 0, yaw }.into());
        }
        assert_eq!(store.attitude().map(|a| a.yaw), Some(30));
        assert_eq!(store.update_count(DataType::Attitude), 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_types_are_independent() {
        let store = TelemetryStore::new();
        store.update(Altitude::default().into());
        store.update(Range::default().into());
        assert_eq!(store.len(), 2);
        assert!(store.get::<Altitude>().is_some());
        assert!(store.get::<Range>().is_some());
        assert!(store.get::<Attitude>().is_none());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_readers() {
        let store = Arc::new(TelemetryStore::new());
        let writer = Arc::clone(&store);
        let handle = std::thread::spawn(move || {
            for battery in 0..100u8 {
                writer.update(
                    State {
                        battery,
                        ..Default::default()
                    }
                    .into(),
                );
            }
        });

        for _ in 0..100 {
            if let Some(battery) = store.battery() {
                assert!(battery < 100);
            }
        }
        handle.join().unwrap();
        assert_eq!(store.battery(), Some(99));
        assert_eq!(store.update_count(DataType::State), 100);
    }
}
