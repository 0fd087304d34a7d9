// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln - a thin demonstration front-end for the kiln build driver. Wires
//! `kiln-driver`'s `LifecycleCoordinator` to a small fixed demo project,
//! over `kiln-adapters`' real collaborators and `kiln-store`'s persistent
//! stores. Contains no build logic of its own.

mod commands;
mod config;
mod demo_project;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kiln", version, about = "Incremental build driver demo")]
struct Cli {
    /// Project root to build; defaults to the current directory.
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to a TOML config file deserialized into a `BuildConfig`.
    #[arg(long = "config", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Incremental build over the demo project.
    Build,
    /// Whole-project rebuild.
    Rebuild,
    /// Remove the demo project's outputs and persistent stores.
    Clean,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let project_root = match cli.directory {
        Some(dir) => std::fs::canonicalize(&dir)
            .map_err(|e| anyhow::anyhow!("cannot use directory '{}': {}", dir.display(), e))?,
        None => std::env::current_dir()?,
    };
    let build_config = config::load(cli.config.as_deref(), &project_root)?;

    match cli.command {
        Commands::Build => commands::build::run(project_root, build_config, false),
        Commands::Rebuild => commands::build::run(project_root, build_config, true),
        Commands::Clean => commands::clean::run(project_root, build_config),
    }
}
