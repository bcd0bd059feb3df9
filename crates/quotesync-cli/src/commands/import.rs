use std::io::Read;
use std::path::Path;

use quotesync_core::import::import_quotes;
use quotesync_core::Quote;

use crate::commands::common::{open_orchestrator, RunContext};
use crate::error::CliError;

pub async fn run_import(input: &Path, context: &RunContext) -> Result<Vec<Quote>, CliError> {
    let raw = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().lock().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)?
    };

    let mut orchestrator = open_orchestrator(context).await?;
    let added = import_quotes(orchestrator.store_mut(), &raw).await?;

    println!("Quotes imported successfully! ({} added)", added.len());
    Ok(added)
}
