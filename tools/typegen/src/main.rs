// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! typegen CLI
//!
//! Generates host code, wrappers, middleware adaptors and test stubs from a
//! YAML type registry.
//!
//! # Usage
//!
//! ```bash
//! # Generate every artifact into build.src/
//! typegen generate --config types.yaml --out build.src
//!
//! # Keep going past failing types, emit in parallel
//! typegen generate --config types.yaml --out build.src --keep-going --parallel
//!
//! # Validate a registry description
//! typegen check --config types.yaml
//!
//! # Print version keys in resolved order
//! typegen signatures --config types.yaml
//! ```

mod generator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use generator::{GenerateOptions, TypeGenerator};

/// Type-description driven code generator
#[derive(Parser, Debug)]
#[command(name = "typegen")]
#[command(about = "Generate host code, JS wrappers and adaptors from a type registry")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate all artifacts and manifest.json
    Generate {
        /// Registry description (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "build.src")]
        out: PathBuf,

        /// Emit types concurrently
        #[arg(long)]
        parallel: bool,

        /// Record failing types and continue
        #[arg(long)]
        keep_going: bool,
    },

    /// Freeze the registry and report configuration errors
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print name@signature for every type
    Signatures {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print each type's artifact files and declaration dependencies
    Plan {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Commands::Generate {
            config,
            out,
            parallel,
            keep_going,
        } => cmd_generate(config, out, parallel, keep_going),
        Commands::Check { config } => cmd_check(config),
        Commands::Signatures { config } => cmd_signatures(config),
        Commands::Plan { config } => cmd_plan(config),
    }
}

fn cmd_generate(config: PathBuf, out: PathBuf, parallel: bool, keep_going: bool) -> Result<()> {
    let generator = TypeGenerator::from_config(&config)?;

    tracing::info!("Starting generation into {:?}", out);
    let report = generator.generate(&GenerateOptions {
        out_dir: out,
        parallel,
        keep_going,
    })?;

    report.summary();

    if !report.is_success() {
        anyhow::bail!("{} type(s) failed to emit", report.failures.len());
    }
    Ok(())
}

fn cmd_check(config: PathBuf) -> Result<()> {
    let generator = TypeGenerator::from_config(&config)?;
    println!(
        "[OK] {}: {} types",
        config.display(),
        generator.registry().len()
    );
    Ok(())
}

fn cmd_signatures(config: PathBuf) -> Result<()> {
    let generator = TypeGenerator::from_config(&config)?;
    for key in generator.version_keys() {
        println!("{key}");
    }
    Ok(())
}

fn cmd_plan(config: PathBuf) -> Result<()> {
    let generator = TypeGenerator::from_config(&config)?;
    for line in generator.plan_lines() {
        println!("{line}");
    }
    Ok(())
}
