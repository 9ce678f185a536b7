use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use passcloak_core::{resolve_plugins, Invocation, Platform, RewriteEvent, Rewriter};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::env::WrapperEnv;

#[derive(Parser)]
#[command(name = "passcloak-cli")]
#[command(about = "Inspect how the PassCloak compiler wrapper rewrites invocations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the rewritten command line without running the compiler
    Rewrite {
        /// Configuration file (defaults to the wrapper's resolution)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the result as a JSON array
        #[arg(long)]
        json: bool,
        /// Print every rewrite decision to stderr
        #[arg(long)]
        explain: bool,
        /// Compiler invocation, program name first
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the resolved configuration after environment overrides
    ShowConfig {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },
    /// List enabled passes with their resolved plugin libraries
    Plugins {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Serialize)]
struct PluginStatus {
    pass: String,
    path: PathBuf,
    present: bool,
}

fn config_path(env: &WrapperEnv, config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(|| env.config_path.clone())
}

pub fn rewrite_command(
    env: &WrapperEnv,
    config: Option<PathBuf>,
    json: bool,
    explain: bool,
    args: Vec<String>,
) -> Result<()> {
    let config = config_path(env, config);
    info!("Dry-run rewrite against {}", config.display());

    let rewriter = Rewriter::new(Platform::current()).with_loader(env.config_loader());
    let mut events: Vec<RewriteEvent> = Vec::new();
    let rewritten = rewriter.rewrite(&Invocation::new(args), &config, &mut events);

    if explain {
        for event in &events {
            eprintln!("- {}", event);
        }
    }

    if json {
        println!("{}", serde_json::to_string(&rewritten)?);
    } else {
        println!("{}", rewritten);
    }
    Ok(())
}

pub fn show_config_command(env: &WrapperEnv, config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let path = config_path(env, config);
    let loaded = env
        .config_loader()
        .load(&path)
        .with_context(|| format!("cannot resolve configuration {}", path.display()))?;

    for name in &loaded.unknown_passes {
        warn!("Unknown pass '{}' in {}", name, path.display());
        eprintln!("warning: ignoring unknown pass '{}'", name);
    }

    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&loaded.config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&loaded.config)?),
    }
    Ok(())
}

pub fn plugins_command(env: &WrapperEnv, config: Option<PathBuf>, json: bool) -> Result<()> {
    let path = config_path(env, config);
    let loaded = env
        .config_loader()
        .load(&path)
        .with_context(|| format!("cannot resolve configuration {}", path.display()))?;

    if !loaded.config.global.enabled {
        warn!("Obfuscation is disabled in {}", path.display());
        eprintln!("note: obfuscation is disabled in {}", path.display());
    }

    let statuses: Vec<PluginStatus> = resolve_plugins(&loaded.config, Platform::current())
        .into_iter()
        .map(|plugin| PluginStatus {
            pass: plugin.pass.to_string(),
            present: plugin.path.is_file(),
            path: plugin.path,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No passes enabled.");
        return Ok(());
    }

    for status in &statuses {
        let marker = if status.present { "ok" } else { "missing" };
        println!("{:<20} {:<8} {}", status.pass, marker, status.path.display());
    }

    let missing = statuses.iter().filter(|s| !s.present).count();
    if missing > 0 {
        warn!("{} of {} plugin libraries are missing", missing, statuses.len());
    }
    Ok(())
}
