use quotesync_core::{Error, Quote, QuotePatch};

use crate::commands::common::{
    capture_editor_input_with_initial, open_orchestrator, parse_quote_id, RunContext,
};
use crate::error::CliError;

/// Edit a quote's fields; with no fields given the text opens in `$EDITOR`
pub async fn run_edit(
    id: &str,
    text: Option<String>,
    author: Option<String>,
    category: Option<String>,
    context: &RunContext,
) -> Result<Quote, CliError> {
    let id = parse_quote_id(id)?;
    let mut orchestrator = open_orchestrator(context).await?;

    let text = if text.is_none() && author.is_none() && category.is_none() {
        let current = orchestrator
            .store()
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let Some(edited) = capture_editor_input_with_initial(&current.text)? else {
            return Err(CliError::EmptyText);
        };
        Some(edited)
    } else {
        text
    };

    let patch = QuotePatch::new(text, author, category)?;
    let updated = orchestrator.edit_quote(id, &patch).await?;

    println!("{}", updated.id);
    Ok(updated)
}
