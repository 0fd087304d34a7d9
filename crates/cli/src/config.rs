// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads a `BuildConfig` from a TOML file, demonstrating the
//! deserialization the driver itself stays agnostic to.

use anyhow::{Context, Result};
use kiln_core::config::BuildConfig;
use std::path::Path;

/// Reads `path` as TOML into a `BuildConfig`, or builds a default config
/// rooted at `project_root/.kiln-tmp` when no config file is given.
pub fn load(config_path: Option<&Path>, project_root: &Path) -> Result<BuildConfig> {
    match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("parsing config file '{}'", path.display()))
        }
        None => Ok(BuildConfig::new(project_root.join(".kiln-tmp"))),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
