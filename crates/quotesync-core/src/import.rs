//! Quote import from the portable JSON format.

use serde::Deserialize;

use crate::db::KeyValueStore;
use crate::error::{Error, Result};
use crate::models::{Quote, QuoteDraft};
use crate::store::QuoteStore;
use crate::util::compact_text;

#[derive(Debug, Deserialize)]
struct ImportRecord {
    text: Option<String>,
    author: Option<String>,
    category: Option<String>,
}

/// Parse and validate a JSON array of `{text, author, category}` records.
///
/// A single malformed record rejects the whole document.
pub fn parse_import(raw: &str) -> Result<Vec<QuoteDraft>> {
    let records: Vec<ImportRecord> = serde_json::from_str(raw).map_err(|error| {
        Error::Validation(format!(
            "Invalid file format: {}",
            compact_text(&error.to_string())
        ))
    })?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            QuoteDraft::from_parts(record.text, record.author, record.category).map_err(|_| {
                Error::Validation(format!(
                    "Invalid quote format in record {}: text, author and category are required",
                    index + 1
                ))
            })
        })
        .collect()
}

/// Validate `raw` and add every record to the store in one write.
pub async fn import_quotes<S: KeyValueStore>(
    store: &mut QuoteStore<S>,
    raw: &str,
) -> Result<Vec<Quote>> {
    let drafts = parse_import(raw)?;
    let added = store.add_all(drafts).await?;
    tracing::info!("Imported {} quotes", added.len());
    Ok(added)
}
