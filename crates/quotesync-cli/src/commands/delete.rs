use quotesync_core::Quote;

use crate::commands::common::{open_orchestrator, parse_quote_id, RunContext};
use crate::error::CliError;

pub async fn run_delete(id: &str, context: &RunContext) -> Result<Quote, CliError> {
    let id = parse_quote_id(id)?;
    let mut orchestrator = open_orchestrator(context).await?;
    let removed = orchestrator.delete_quote(id).await?;

    println!("{}", removed.id);
    Ok(removed)
}
