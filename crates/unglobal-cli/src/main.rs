use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use unglobal_cli::Migrator;
use unglobal_core::MigratorConfig;

#[derive(Parser)]
#[command(name = "unglobal")]
#[command(about = "Split flat-namespace JavaScript into one-class-per-file ES modules", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a legacy source tree into an output directory
    Migrate {
        /// Root of the legacy source tree
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the generated modules are written to
        #[arg(short, long)]
        output: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the root namespace identifier
        #[arg(long)]
        root_namespace: Option<String>,

        /// Override the module name prefix used in import paths
        #[arg(long)]
        local_module_name: Option<String>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print the destination plan as JSON without writing anything
    Plan {
        /// Root of the legacy source tree
        #[arg(short, long)]
        input: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the root namespace identifier
        #[arg(long)]
        root_namespace: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .init();

    match cli.command {
        Commands::Migrate {
            input,
            output,
            config,
            root_namespace,
            local_module_name,
            report,
        } => {
            let config = resolve_config(config, root_namespace, local_module_name)?;
            let migrator = Migrator::new(config, input, output);
            let outcome = migrator.run(false)?;

            for failure in &outcome.report.parse_failures {
                warn!(path = %failure.path, "file was skipped: {}", failure.message);
            }
            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&outcome.report)?;
                fs::write(&path, json)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
            }
            Ok(())
        }

        Commands::Plan {
            input,
            config,
            root_namespace,
        } => {
            let config = resolve_config(config, root_namespace, None)?;
            let migrator = Migrator::new(config, input, PathBuf::new());
            let outcome = migrator.run(true)?;
            println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
            Ok(())
        }
    }
}

/// Config file first, then command-line overrides on top.
fn resolve_config(
    path: Option<PathBuf>,
    root_namespace: Option<String>,
    local_module_name: Option<String>,
) -> Result<MigratorConfig> {
    let mut config = match path {
        Some(path) => Migrator::load_config(&path)?,
        None => MigratorConfig::default(),
    };
    if let Some(ns) = root_namespace {
        config.root_namespace = ns;
    }
    if let Some(name) = local_module_name {
        config.local_module_name = name;
    }
    Ok(config)
}
