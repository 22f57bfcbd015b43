//! schedconf CLI: the `schedconf` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use support::ResourceKind;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { config, json } => commands::init::run(config, json),

        Commands::Show { config, json } => commands::show::run(config, json),

        Commands::Check { config, json } => commands::check::run(config, json),

        Commands::Room { command } => commands::resource::run(ResourceKind::Room, command),

        Commands::Lab { command } => commands::resource::run(ResourceKind::Lab, command),

        Commands::Course { command } => commands::course::run(command),

        Commands::Faculty { command } => commands::faculty::run(command),

        Commands::Conflict { command } => commands::conflict::run(command),
    }
}
