// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Optional on-disk defaults file for the demo binary.
//!
//! Mirrors the teacher's `bootstrap::config::AppConfig` builder shape, but
//! scoped to the two knobs this engine actually exposes as defaults: the
//! plugin search path override and a default worker-thread count. Both stay
//! `Option` — an absent or unreadable config file is not an error, it just
//! leaves `pfw-engine`'s own `HDF5_PLUGIN_PATH`/`H5_NTHREADS`/compile-time
//! fallbacks in charge.

use std::path::Path;

/// Validated demo-binary defaults, loaded from an optional TOML file and/or
/// `PFW_`-prefixed environment variables.
#[derive(Debug, Clone, Default)]
pub struct DemoDefaults {
    plugin_path: Option<String>,
    default_threads: Option<usize>,
}

impl DemoDefaults {
    pub fn builder() -> DemoDefaultsBuilder {
        DemoDefaultsBuilder::default()
    }

    pub fn plugin_path(&self) -> Option<&str> {
        self.plugin_path.as_deref()
    }

    pub fn default_threads(&self) -> Option<usize> {
        self.default_threads
    }

    /// Loads defaults from `path` (if it exists) layered under `PFW_`
    /// environment variables, which take precedence. A missing file is not
    /// an error; an unparsable one is.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix("PFW"));
        let cfg = builder.build()?;

        let plugin_path = cfg.get::<String>("plugin_path").ok();
        let default_threads = cfg.get::<usize>("default_threads").ok();

        Ok(Self {
            plugin_path,
            default_threads,
        })
    }
}

/// Builder for tests and programmatic construction, mirroring the
/// teacher's `AppConfigBuilder` pattern.
#[derive(Debug, Default)]
pub struct DemoDefaultsBuilder {
    plugin_path: Option<String>,
    default_threads: Option<usize>,
}

impl DemoDefaultsBuilder {
    pub fn plugin_path(mut self, path: impl Into<String>) -> Self {
        self.plugin_path = Some(path.into());
        self
    }

    pub fn default_threads(mut self, count: usize) -> Self {
        self.default_threads = Some(count);
        self
    }

    pub fn build(self) -> DemoDefaults {
        DemoDefaults {
            plugin_path: self.plugin_path,
            default_threads: self.default_threads,
        }
    }
}
