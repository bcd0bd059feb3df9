use quotesync_core::{Quote, QuoteDraft};

use crate::commands::common::{open_orchestrator, resolve_quote_text, RunContext};
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    author: Option<String>,
    category: Option<String>,
    context: &RunContext,
) -> Result<Quote, CliError> {
    // Validate the fields we already have before prompting for text.
    let text = if text_parts.is_empty() && (author.is_none() || category.is_none()) {
        None
    } else {
        Some(resolve_quote_text(text_parts)?)
    };
    let draft = QuoteDraft::from_parts(text, author, category)?;

    let mut orchestrator = open_orchestrator(context).await?;
    let quote = orchestrator.add_quote(draft).await?;

    println!("{}", quote.id);
    Ok(quote)
}
