use anyhow::Result;
use clap::Parser;
use passcloak_cli::cli::{self, Cli, Commands};
use passcloak_cli::env::WrapperEnv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let env = WrapperEnv::capture();

    match cli.command {
        Commands::Rewrite { config, json, explain, args } => {
            cli::rewrite_command(&env, config, json, explain, args)
        }
        Commands::ShowConfig { config, format } => cli::show_config_command(&env, config, format),
        Commands::Plugins { config, json } => cli::plugins_command(&env, config, json),
    }
}
