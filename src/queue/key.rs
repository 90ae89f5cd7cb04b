//! Monotonic message keys
//!
//! Keys order messages inside a priority bucket. Each key is the later of the
//! current wall clock (nanoseconds since the epoch) and the previous key plus
//! one, so keys follow real time while staying strictly increasing even when
//! many callers ask within the same clock tick or the clock steps backwards.

use std::sync::atomic::{AtomicU64, Ordering};

/// Width of an encoded key in bytes
pub const KEY_LEN: usize = 8;

/// Lock-free generator of strictly increasing 64-bit keys
///
/// A generator is shared by reference (usually behind an `Arc`) between all
/// producers that must agree on one ordering. Engines create their own by
/// default; see [`QueueOptions::key_generator`](crate::queue::QueueOptions::key_generator)
/// to share one between engines.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    last: AtomicU64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next key
    ///
    /// Every value returned is strictly greater than every value this
    /// generator returned before, across all threads.
    pub fn next(&self) -> u64 {
        let now = wall_clock_nanos();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            // the closure always returns Some
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }

    /// Return the next key encoded big-endian, so byte order equals numeric order
    pub fn next_bytes(&self) -> [u8; KEY_LEN] {
        self.next().to_be_bytes()
    }

    /// Make sure future keys sort after `seen`
    ///
    /// Called when a queue file is opened so that keys minted by this process
    /// land after everything already stored, whatever the clock says.
    pub fn observe(&self, seen: u64) {
        self.last.fetch_max(seen, Ordering::AcqRel);
    }

    /// The most recent key handed out or observed
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

/// Decode a stored key; `None` when the slice is not exactly [`KEY_LEN`] bytes
pub fn decode_key(bytes: &[u8]) -> Option<u64> {
    let raw: [u8; KEY_LEN] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(raw))
}

pub(crate) fn wall_clock_nanos() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .map_or(0, |nanos| nanos.max(0) as u64)
}
