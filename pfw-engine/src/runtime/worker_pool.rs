// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Worker Pool
//!
//! Spawns a fixed number `T` of identical worker threads, each running the
//! same task closure against shared context (component 2 of the design).
//! Lifecycle is *spawn*, then *join* as two explicit steps, rather than one
//! blocking call: the orchestrator (§2's "entry point") spawns the pool,
//! drives the chunk extractor on the calling thread while workers run
//! concurrently, and only then joins — mirroring the source design's
//! producer-on-calling-thread control flow.
//!
//! Workers live only for the duration of one `parallel_filtered_write`
//! call, so this uses `std::thread::scope` rather than `'static` threads:
//! `task` borrows the call's queue, resolved pipeline, and host dataset
//! handle directly instead of requiring the caller to wrap them in `Arc`.
//! A panic in a worker thread is caught at join time and recorded into the
//! shared `FatalSlot` rather than unwinding past the scope.

use std::thread::{self, Scope, ScopedJoinHandle};

use pfw_domain::value_objects::WorkerCount;

use crate::runtime::fatal_slot::FatalSlot;

/// Spawns `count` threads within `scope`, each invoking `task(worker_index)`.
///
/// Returns immediately with the join handles; the caller is expected to do
/// its own work (driving the extractor) before calling [`join`].
pub fn spawn<'scope, F>(scope: &'scope Scope<'scope, '_>, count: WorkerCount, task: &'scope F) -> Vec<ScopedJoinHandle<'scope, ()>>
where
    F: Fn(usize) + Sync,
{
    let handles = (0..count.count())
        .map(|index| {
            thread::Builder::new()
                .name(format!("pfw-chunk-worker-{index}"))
                .spawn_scoped(scope, move || task(index))
                .expect("failed to spawn chunk worker thread")
        })
        .collect();
    tracing::debug!(workers = count.count(), "worker pool started");
    handles
}

/// Joins every handle. A thread that panicked has its payload recorded
/// into `fatal` as `EngineError::WorkerPanicked` instead of propagating.
pub fn join(handles: Vec<ScopedJoinHandle<'_, ()>>, fatal: &FatalSlot) {
    for handle in handles {
        let name = handle.thread().name().unwrap_or("pfw-chunk-worker").to_string();
        if let Err(payload) = handle.join() {
            let message = panic_message(&payload);
            tracing::error!(worker = %name, %message, "worker thread panicked");
            fatal.record(pfw_domain::error::EngineError::WorkerPanicked(message));
        }
    }
    tracing::debug!("worker pool joined");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn every_worker_runs_the_task_once() {
        let counter = AtomicUsize::new(0);
        let fatal = FatalSlot::new();
        let task = |_index: usize| {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        thread::scope(|scope| {
            let handles = spawn(scope, WorkerCount::new(4).unwrap(), &task);
            join(handles, &fatal);
        });
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert!(fatal.get().is_none());
    }

    #[test]
    fn panic_is_recorded_not_propagated() {
        let fatal = FatalSlot::new();
        let task = |index: usize| {
            if index == 0 {
                panic!("boom");
            }
        };
        thread::scope(|scope| {
            let handles = spawn(scope, WorkerCount::new(2).unwrap(), &task);
            join(handles, &fatal);
        });
        assert!(matches!(
            fatal.get(),
            Some(pfw_domain::error::EngineError::WorkerPanicked(_))
        ));
    }

    #[test]
    fn excess_workers_exit_immediately_when_given_only_sentinels() {
        use crate::queue::BlockingQueue;

        let queue = BlockingQueue::<i32>::new();
        // No real items: N=0 chunks is a valid (degenerate) case.
        for _ in 0..16 {
            queue.enqueue_sentinel();
        }
        let seen = AtomicUsize::new(0);
        let fatal = FatalSlot::new();
        let task = |_index: usize| {
            while queue.dequeue().is_some() {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        };
        thread::scope(|scope| {
            let handles = spawn(scope, WorkerCount::new(16).unwrap(), &task);
            join(handles, &fatal);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
