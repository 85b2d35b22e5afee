// Board hub: relays move events between every participant connected to
// the shared tactical board.
//
// One hub serves one board. Participants register on connect and are
// pruned on disconnect; events fan out to everyone except their origin.
// There is no delivery guarantee and no history: a participant that
// joins after an event was relayed never sees it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

/// An event traveling through the hub. `origin` is the participant that
/// emitted it, or None for server-originated pushes that everyone gets.
#[derive(Debug, Clone)]
pub struct BoardEvent {
    pub origin: Option<Uuid>,
    pub name: String,
    pub data: Value,
}

/// Thread-safe participant registry plus fan-out.
#[derive(Debug, Clone, Default)]
pub struct BoardHub {
    inner: Arc<Mutex<HashMap<Uuid, mpsc::UnboundedSender<BoardEvent>>>>,
}

impl BoardHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a participant. Returns its id and the receiving end of
    /// its event stream.
    pub fn join(&self) -> (Uuid, mpsc::UnboundedReceiver<BoardEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().unwrap().insert(id, tx);
        (id, rx)
    }

    /// Remove a participant. Safe to call for an id that already left.
    pub fn leave(&self, id: Uuid) {
        self.inner.lock().unwrap().remove(&id);
    }

    /// Relay a participant's event to every other participant. Returns
    /// the number of participants the event was delivered to.
    pub fn relay(&self, origin: Uuid, name: &str, data: Value) -> usize {
        self.fan_out(BoardEvent {
            origin: Some(origin),
            name: name.to_string(),
            data,
        })
    }

    /// Push a server-originated event to every participant.
    pub fn push(&self, name: &str, data: Value) -> usize {
        self.fan_out(BoardEvent {
            origin: None,
            name: name.to_string(),
            data,
        })
    }

    pub fn participant_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    fn fan_out(&self, event: BoardEvent) -> usize {
        // Snapshot the senders so a participant leaving mid-broadcast
        // cannot invalidate the iteration.
        let targets: Vec<(Uuid, mpsc::UnboundedSender<BoardEvent>)> = {
            let map = self.inner.lock().unwrap();
            map.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut delivered = 0;
        for (id, tx) in targets {
            if event.origin == Some(id) {
                continue;
            }
            // A send to a dropped receiver means the participant is gone;
            // skip it silently and let the socket task clean up.
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}
