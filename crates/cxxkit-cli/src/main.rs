//! cxxkit CLI entry point.
//!
//! Usage:
//!   cxxkit build [OPTIONS]     # CMake configure + build
//!   cxxkit format [--check]    # clang-format the tree (or check it)
//!   cxxkit lint [--fix] [-j N] # clang-tidy in parallel

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cxxkit_cli::cli::{Cli, Commands};
use cxxkit_cli::commands;
use cxxkit_cli::config::KitConfig;

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("project root not found: {}", cli.root.display()))?;
    let config = KitConfig::load(&root)?;

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    rt.block_on(async {
        match &cli.command {
            Commands::Build(args) => commands::build::run(&root, &config, args).await,
            Commands::Format(args) => commands::format::run(&root, &config, args).await,
            Commands::Lint(args) => commands::lint::run(&root, &config, args).await,
        }
    })
}
