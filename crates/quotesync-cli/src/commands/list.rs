use quotesync_core::{CategoryFilter, Quote};

use crate::commands::common::{
    format_quote_card, format_quote_lines, open_orchestrator, quote_to_list_item, QuoteListItem,
    RunContext,
};
use crate::error::CliError;

/// Quotes for `category`, or for the remembered filter when omitted
pub async fn list_quotes(
    category: Option<&str>,
    context: &RunContext,
) -> Result<Vec<Quote>, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let store = orchestrator.store();
    let filter = match category {
        Some(category) => CategoryFilter::from(category),
        None => store.selected_category().await?,
    };
    Ok(store.filter(&filter).await?)
}

pub async fn run_list(
    category: Option<&str>,
    as_json: bool,
    context: &RunContext,
) -> Result<(), CliError> {
    let quotes = list_quotes(category, context).await?;

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

    Ok(())
}

pub async fn run_categories(context: &RunContext) -> Result<Vec<String>, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let store = orchestrator.store();
    let selected = store.selected_category().await?;

    let categories = store.categories();
    for category in &categories {
        let marker = if selected == CategoryFilter::from(category.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {category}");
    }
    Ok(categories)
}

pub async fn run_random(context: &RunContext) -> Result<Quote, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let quote = orchestrator
        .store()
        .random_quote(&mut rand::rng())
        .await?
        .ok_or(CliError::NoQuotes)?;

    println!("{}", format_quote_card(&quote));
    Ok(quote)
}
