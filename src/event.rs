//! Sample events and the listener registry that delivers them.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Name of the only event the overlay dispatches.
pub const REFRESH: &str = "refresh";

/// Pixels under the cursor at one tick, plus when they were read.
#[derive(Debug)]
pub struct SampleEvent {
    /// Raw RGBA bytes, row-major, `side * side * 4` long.
    pub data: Vec<u8>,
    pub time: DateTime<Utc>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: AtomicBool,
}

impl SampleEvent {
    pub fn new(data: Vec<u8>, time: DateTime<Utc>) -> Self {
        Self {
            data,
            time,
            bubbles: true,
            cancelable: true,
            default_prevented: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        REFRESH
    }

    /// Advisory only: the overlay keeps ticking and painting either way.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.store(true, Ordering::Relaxed);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::Relaxed)
    }
}

pub type Listener = Box<dyn FnMut(&SampleEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners keyed by event name, fired in registration order.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, String, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        if name != REFRESH {
            warn!(name, "listener registered for an event that is never dispatched");
        } else {
            debug!(?id, "refresh listener registered");
        }
        self.entries.push((id, name.to_owned(), listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _, _)| *eid != id);
        before != self.entries.len()
    }

    /// Deliver `event` to every listener registered under its name.
    /// Returns how many listeners saw it.
    pub fn dispatch(&mut self, event: &SampleEvent) -> usize {
        let mut delivered = 0;
        for (_, name, listener) in self.entries.iter_mut() {
            if name.as_str() == event.name() {
                listener(event);
                delivered += 1;
            }
        }
        delivered
    }
}
