//! Invoices command - query the invoice line repository.

use clap::{Args, Subcommand};
use console::style;

use super::ingest::open_repository;
use super::load_config;
use super::output::{format_stored, OutputFormat};

/// Arguments for the invoices command.
#[derive(Args)]
pub struct InvoicesArgs {
    #[command(subcommand)]
    command: InvoicesCommand,
}

#[derive(Subcommand)]
enum InvoicesCommand {
    /// List stored invoice lines
    List {
        /// Only lines of this owner
        #[arg(long)]
        owner: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one stored invoice line
    Show {
        /// Line id
        id: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Delete a stored invoice line
    Remove {
        /// Line id
        id: i64,
    },
}

pub async fn run(args: InvoicesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let repository = open_repository(&config)?;

    match args.command {
        InvoicesCommand::List { owner, format } => {
            let lines = repository.list(owner.as_deref())?;
            println!("{}", format_stored(&lines, format)?);
        }
        InvoicesCommand::Show { id, format } => {
            let Some(line) = repository.get(id)? else {
                anyhow::bail!("Invoice line {} not found", id);
            };
            println!("{}", format_stored(std::slice::from_ref(&line), format)?);
        }
        InvoicesCommand::Remove { id } => {
            if !repository.delete(id)? {
                anyhow::bail!("Invoice line {} not found", id);
            }
            println!("{} Removed invoice line {}", style("✓").green(), id);
        }
    }

    Ok(())
}
