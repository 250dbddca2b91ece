// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Bootstrap-phase logging initialization.
//!
//! Routes `pfw-engine`'s `tracing` instrumentation to stderr. Verbosity is
//! the only knob exposed at the CLI: `-v` raises the demo binary's own
//! events to `debug`, `-vv` to `trace`; the engine's own spans/events follow
//! the same level.

use tracing_subscriber::FmtSubscriber;

/// Installs the global `tracing` subscriber for the demo binary.
///
/// `verbosity` is the CLI's repeated `-v` count: `0` → info, `1` → debug,
/// `2+` → trace.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already installed (e.g. a test harness set one up); not fatal.
        tracing::debug!("tracing subscriber already installed, keeping the existing one");
    }
}
