//! Quote export helpers.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::Quote;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// The portable `{text, author, category}` record, also accepted by import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportQuote {
    pub text: String,
    pub author: String,
    pub category: String,
}

impl From<&Quote> for ExportQuote {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            author: quote.author.clone(),
            category: quote.category.clone(),
        }
    }
}

/// Render quotes as a pretty-printed JSON array.
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    let items = quotes.iter().map(ExportQuote::from).collect::<Vec<_>>();
    serde_json::to_string_pretty(&items)
}

/// Render quotes as Markdown block quotes.
#[must_use]
pub fn render_markdown_export(quotes: &[Quote]) -> String {
    let mut output = String::from("# Quotes\n");

    for quote in quotes {
        let _ = writeln!(output);
        for line in quote.text.lines() {
            let _ = writeln!(output, "> {line}");
        }
        let _ = writeln!(output, ">");
        let _ = writeln!(output, "> *{}* ({})", quote.author, quote.category);
    }

    output
}

pub fn render_quotes_export(quotes: &[Quote], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(quotes),
        ExportFormat::Markdown => Ok(render_markdown_export(quotes)),
    }
}

/// Default file name for an export taken at `timestamp_ms`.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("quotes-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{QuoteDraft, QuoteId};

    fn quote(text: &str) -> Quote {
        let mut quote = Quote::new(
            QuoteId::new(7),
            QuoteDraft::new(text, "Eleanor Roosevelt", "Dreams").unwrap(),
            Utc::now(),
        );
        quote.conflict = true;
        quote
    }

    #[test]
    fn json_export_keeps_only_portable_fields() {
        let rendered = render_json_export(&[quote("Dream big")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            parsed,
            serde_json::json!([{
                "text": "Dream big",
                "author": "Eleanor Roosevelt",
                "category": "Dreams"
            }])
        );
    }

    #[test]
    fn markdown_export_quotes_each_line() {
        let rendered = render_markdown_export(&[quote("First line\nSecond line")]);
        assert!(rendered.starts_with("# Quotes\n"));
        assert!(rendered.contains("> First line\n> Second line\n>\n"));
        assert!(rendered.contains("> *Eleanor Roosevelt* (Dreams)"));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "quotes-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "quotes-export-456.md"
        );
    }
}
