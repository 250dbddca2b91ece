// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Bounded Blocking Queue
//!
//! A single-producer, multi-consumer FIFO hand-off between the chunk
//! extractor and the chunk workers (component 1 of the design).
//!
//! One `parking_lot::Mutex` protects the internal deque and the closed
//! latch; a `parking_lot::Condvar` is signalled on every enqueue and on
//! close. `dequeue` loops on its predicate so spurious wakeups are handled
//! for free. The queue never drops items and never blocks on enqueue — the
//! "bound" is implicit, enforced by the number of in-flight chunks the
//! producer is willing to have outstanding, not by the queue itself.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use pfw_domain::error::EngineError;

/// One slot in the queue: either real work, or the sentinel that tells a
/// worker there is no more work coming.
enum Entry<T> {
    Item(T),
    Sentinel,
}

struct State<T> {
    items: VecDeque<Entry<T>>,
    closed: bool,
    added: u64,
}

/// FIFO hand-off of owned work items, with a blocking dequeue and a
/// sentinel that signals "no more work".
pub struct BlockingQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
                added: 0,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Places `item` at the tail and wakes one waiting consumer.
    ///
    /// Allocation failure propagates to the caller without enqueuing the
    /// item (§4.1's failure semantics), surfaced as `EngineError::AllocationFailed`.
    pub fn enqueue(&self, item: T) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state
            .items
            .try_reserve(1)
            .map_err(|e| EngineError::AllocationFailed(e.to_string()))?;
        state.items.push_back(Entry::Item(item));
        state.added += 1;
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Enqueues the sentinel that tells one worker to stop. Sets the
    /// closed latch and wakes every waiter. Idempotent: closing an
    /// already-closed queue is a no-op beyond placing another sentinel.
    pub fn enqueue_sentinel(&self) {
        let mut state = self.state.lock();
        state.items.push_back(Entry::Sentinel);
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
    }

    /// Blocks while the queue is empty and not closed. Returns the head
    /// item, or `None` once a sentinel is dequeued or the queue is empty
    /// and closed.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(entry) = state.items.pop_front() {
                return match entry {
                    Entry::Item(item) => Some(item),
                    Entry::Sentinel => None,
                };
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Monotonic total of non-sentinel items ever enqueued.
    pub fn elements_added(&self) -> u64 {
        self.state.lock().added
    }
}
