use quotesync_core::sync::RemoteMirror;
use quotesync_core::{Quote, QuoteDraft, QuotePatch};

use crate::cli::RemoteCommands;
use crate::commands::common::{
    format_quote_lines, open_orchestrator, parse_quote_id, quote_to_list_item, QuoteListItem,
    RunContext,
};
use crate::error::CliError;

pub async fn run_remote(command: RemoteCommands, context: &RunContext) -> Result<(), CliError> {
    match command {
        RemoteCommands::List { json } => {
            run_remote_list(json, context).await?;
        }
        RemoteCommands::Add {
            text,
            author,
            category,
        } => {
            run_remote_add(&text, author, category, context).await?;
        }
        RemoteCommands::Edit {
            id,
            text,
            author,
            category,
        } => {
            run_remote_edit(&id, text, author, category, context).await?;
        }
        RemoteCommands::Delete { id } => {
            run_remote_delete(&id, context).await?;
        }
    }
    Ok(())
}

pub async fn run_remote_list(as_json: bool, context: &RunContext) -> Result<Vec<Quote>, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let quotes = orchestrator.remote().fetch().await?.into_vec();

    if as_json {
        let json_items = quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }
    Ok(quotes)
}

pub async fn run_remote_add(
    text_parts: &[String],
    author: Option<String>,
    category: Option<String>,
    context: &RunContext,
) -> Result<Quote, CliError> {
    let text = Some(text_parts.join(" "));
    let draft = QuoteDraft::from_parts(text, author, category)?;

    let orchestrator = open_orchestrator(context).await?;
    let quote = orchestrator.remote().insert(draft).await?;
    println!("{}", quote.id);
    Ok(quote)
}

pub async fn run_remote_edit(
    id: &str,
    text: Option<String>,
    author: Option<String>,
    category: Option<String>,
    context: &RunContext,
) -> Result<Quote, CliError> {
    let id = parse_quote_id(id)?;
    let patch = QuotePatch::new(text, author, category)?;

    let orchestrator = open_orchestrator(context).await?;
    let quote = orchestrator.remote().edit(id, &patch).await?;
    println!("{} (server v{})", quote.id, quote.version);
    Ok(quote)
}

pub async fn run_remote_delete(id: &str, context: &RunContext) -> Result<Quote, CliError> {
    let id = parse_quote_id(id)?;
    let orchestrator = open_orchestrator(context).await?;
    let removed = orchestrator.remote().remove(id).await?;
    println!("{}", removed.id);
    Ok(removed)
}
