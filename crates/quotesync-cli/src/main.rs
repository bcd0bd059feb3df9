//! quotes - command-line quote collection with a simulated sync server
//!
//! Quotes live in a local libSQL file together with the simulated server
//! copy; `quotes sync` reconciles the two.

mod cli;
mod cli_config;
mod commands;
mod error;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, SyncCommands};
use crate::cli_config::CliConfig;
use crate::commands::add::run_add;
use crate::commands::common::{resolve_db_path, RunContext};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::{run_categories, run_list, run_random};
use crate::commands::remote::run_remote;
use crate::commands::sync::{
    run_sync, run_sync_conflicts, run_sync_resolve, run_sync_status, run_sync_watch,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive: tracing_subscriber::filter::Directive = "quotesync=info"
        .parse()
        .map_err(|error| CliError::Config(format!("Invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    // Commands that never touch the quote database.
    let command = match command {
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
            return Ok(());
        }
        Commands::Config { command } => return run_config(command),
        other => other,
    };

    let mut sync = CliConfig::load().map_err(CliError::Config)?.sync_config();
    if cli.offline {
        sync = sync.offline();
    }
    let context = RunContext::new(resolve_db_path(cli.db_path), sync);

    match command {
        Commands::Add {
            text,
            author,
            category,
        } => {
            run_add(&text, author, category, &context).await?;
        }
        Commands::List { category, json } => {
            run_list(category.as_deref(), json, &context).await?;
        }
        Commands::Categories => {
            run_categories(&context).await?;
        }
        Commands::Random => {
            run_random(&context).await?;
        }
        Commands::Edit {
            id,
            text,
            author,
            category,
        } => {
            run_edit(&id, text, author, category, &context).await?;
        }
        Commands::Delete { id } => {
            run_delete(&id, &context).await?;
        }
        Commands::Export { format, output } => {
            run_export(format, output.as_deref(), &context).await?;
        }
        Commands::Import { input } => {
            run_import(&input, &context).await?;
        }
        Commands::Sync { command } => match command {
            None => {
                run_sync(&context).await?;
            }
            Some(SyncCommands::Status { json }) => {
                run_sync_status(json, &context).await?;
            }
            Some(SyncCommands::Conflicts { json }) => {
                run_sync_conflicts(json, &context).await?;
            }
            Some(SyncCommands::Resolve { resolution }) => {
                run_sync_resolve(resolution.into(), &context).await?;
            }
            Some(SyncCommands::Watch { interval }) => {
                run_sync_watch(interval, &context).await?;
            }
        },
        Commands::Remote { command } => run_remote(command, &context).await?,
        Commands::Completions { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}
