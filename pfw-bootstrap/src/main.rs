// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Demonstration binary: drives `pfw_engine::parallel_filtered_write`
//! against an in-memory dataset so the engine is exercisable without a
//! real host library. Not part of the specified API surface.

use clap::Parser;

use pfw_bootstrap::{logger, parse_filter_spec, Cli, DemoDefaults, ExitCode, InMemoryHostDataset};
use pfw_domain::value_objects::{ChunkShape, DatasetDescriptor};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            println!("{summary}");
            std::process::ExitCode::from(ExitCode::Success)
        }
        Err(report) => {
            eprintln!("pfw-demo: {report}");
            std::process::ExitCode::from(report.exit_code)
        }
    }
}

struct Failure {
    exit_code: ExitCode,
    message: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn run(cli: &Cli) -> Result<String, Failure> {
    let defaults = DemoDefaults::load(cli.config.as_deref()).map_err(|e| Failure {
        exit_code: ExitCode::CliUsage,
        message: format!("failed to load config: {e}"),
    })?;

    if let Some(plugin_path) = defaults.plugin_path() {
        // SAFETY: single-threaded at this point in startup, well before
        // `pfw-engine` spawns any worker and reads this var during resolution.
        unsafe {
            std::env::set_var(pfw_engine::filters::PLUGIN_PATH_ENV, plugin_path);
        }
    }

    let pipeline = parse_filter_spec(&cli.filter).map_err(|e| Failure {
        exit_code: ExitCode::CliUsage,
        message: e.to_string(),
    })?;

    let dataset = DatasetDescriptor::new(cli.extents.clone(), cli.element_size).map_err(|e| Failure {
        exit_code: ExitCode::from(&e),
        message: e.to_string(),
    })?;
    let chunk_shape = ChunkShape::new(cli.chunk.clone(), &dataset).map_err(|e| Failure {
        exit_code: ExitCode::from(&e),
        message: e.to_string(),
    })?;

    let element_count = dataset.element_count() as usize;
    let source = synthetic_source(element_count, dataset.element_size());

    let host = InMemoryHostDataset::new(dataset, chunk_shape, pipeline);

    let threads = if cli.threads != 0 {
        cli.threads
    } else {
        defaults.default_threads().unwrap_or(0)
    };

    let report = pfw_engine::parallel_filtered_write(&host, &source, threads).map_err(|e| Failure {
        exit_code: ExitCode::from(&e),
        message: e.to_string(),
    })?;

    Ok(format!(
        "wrote {} chunks ({} bytes encoded, {} masked) with filter `{}`",
        report.chunks_written,
        host.total_encoded_bytes(),
        host.masked_chunk_count(),
        cli.filter,
    ))
}

/// Deterministic, non-uniform source pattern so a deflate pipeline actually
/// has redundancy to compress: every other element is a running counter,
/// the rest are a constant.
fn synthetic_source(element_count: usize, element_size: usize) -> Vec<u8> {
    let mut source = Vec::with_capacity(element_count * element_size);
    let mut counter: u32 = 0;
    for i in 0..element_count {
        let value: u32 = if i % 2 == 0 {
            let v = counter;
            counter = counter.wrapping_add(1);
            v
        } else {
            1
        };
        let bytes = value.to_le_bytes();
        source.extend_from_slice(&bytes[..element_size.min(4)]);
        if element_size > 4 {
            source.resize(source.len() + (element_size - 4), 0);
        }
    }
    source
}
