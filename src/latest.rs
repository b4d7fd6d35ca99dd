//! Single-slot "latest value" channel.
//!
//! The capture/inference side runs at its own rate relative to the render
//! tick, so frames are never queued: the producer overwrites one slot and
//! the consumer reads whatever is newest each tick. If inference lags, the
//! same frame is read twice (and deduplicated downstream by timestamp); if
//! it outpaces rendering, intermediate frames are simply dropped. Either
//! way memory use is constant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct Slot<T> {
    value: Mutex<Option<T>>,
    closed: AtomicBool,
}

/// Producer half: overwrites the slot, never blocks on the consumer.
pub struct Publisher<T> {
    slot: Arc<Slot<T>>,
}

/// Consumer half: reads the most recent value, never blocks on the producer.
pub struct Latest<T> {
    slot: Arc<Slot<T>>,
}

/// Create a connected publisher/consumer pair.
pub fn channel<T>() -> (Publisher<T>, Latest<T>) {
    let slot = Arc::new(Slot {
        value: Mutex::new(None),
        closed: AtomicBool::new(false),
    });
    (Publisher { slot: slot.clone() }, Latest { slot })
}

impl<T> Publisher<T> {
    /// Replace the slot contents with a newer value.
    pub fn publish(&self, value: T) {
        if let Ok(mut slot) = self.slot.value.lock() {
            *slot = Some(value);
        }
    }

    /// Whether the consumer half is still alive. A capture producer uses
    /// this to know when to stop the device.
    pub fn is_open(&self) -> bool {
        !self.slot.closed.load(Ordering::Acquire) && Arc::strong_count(&self.slot) > 1
    }
}

impl<T: Clone> Latest<T> {
    /// Clone out the most recent value, if any was ever published.
    pub fn latest(&self) -> Option<T> {
        self.slot.value.lock().ok().and_then(|slot| slot.clone())
    }
}

impl<T> Latest<T> {
    /// Explicitly signal shutdown to the producer without dropping.
    pub fn close(&self) {
        self.slot.closed.store(true, Ordering::Release);
    }
}

impl<T> Drop for Latest<T> {
    fn drop(&mut self) {
        self.slot.closed.store(true, Ordering::Release);
    }
}
