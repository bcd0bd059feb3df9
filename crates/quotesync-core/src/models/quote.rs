//! Quote model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// A stable quote identifier, unique within a collection and across sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(i64);

impl QuoteId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for QuoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A quote record as stored locally and on the remote mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Stable identifier
    pub id: QuoteId,
    /// Quote text
    pub text: String,
    /// Attributed author
    #[serde(default)]
    pub author: String,
    /// Category used for filtering
    pub category: String,
    /// Wall-clock time of the last accepted write
    #[serde(default)]
    pub last_modified: DateTime<Utc>,
    /// Incremented on every accepted modification
    #[serde(default = "initial_version")]
    pub version: u32,
    /// Local change not yet pushed to the remote mirror
    #[serde(default, skip_serializing_if = "is_false")]
    pub unsynced: bool,
    /// Involved in a sync conflict awaiting resolution
    #[serde(default, skip_serializing_if = "is_false")]
    pub conflict: bool,
}

const fn initial_version() -> u32 {
    1
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl Quote {
    /// Create a new, not yet synced quote from a validated draft
    #[must_use]
    pub fn new(id: QuoteId, draft: QuoteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: draft.text,
            author: draft.author,
            category: draft.category,
            last_modified: now,
            version: initial_version(),
            unsynced: true,
            conflict: false,
        }
    }

    /// Whether any user-visible field differs from `other`
    #[must_use]
    pub fn content_differs(&self, other: &Self) -> bool {
        self.text != other.text || self.author != other.author || self.category != other.category
    }

    /// Record an accepted write: bump the version and refresh the timestamp
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version = self.version.saturating_add(1);
        self.last_modified = now;
    }

    /// Apply a validated patch; returns `false` when nothing changed
    pub fn apply_patch(&mut self, patch: &QuotePatch) -> bool {
        let mut changed = false;
        for (field, value) in [
            (&mut self.text, &patch.text),
            (&mut self.author, &patch.author),
            (&mut self.category, &patch.category),
        ] {
            if let Some(value) = value {
                if *field != *value {
                    field.clone_from(value);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Drop the `unsynced` and `conflict` markers
    pub fn clear_transient_flags(&mut self) {
        self.unsynced = false;
        self.conflict = false;
    }
}

/// User input for a new quote, validated before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub text: String,
    pub author: String,
    pub category: String,
}

impl QuoteDraft {
    /// Build a draft, trimming every field and rejecting blanks
    pub fn new(
        text: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self> {
        Self::from_parts(
            Some(text.into()),
            Some(author.into()),
            Some(category.into()),
        )
    }

    /// Build a draft from optional parts, naming every missing field
    pub fn from_parts(
        text: Option<String>,
        author: Option<String>,
        category: Option<String>,
    ) -> Result<Self> {
        let text = normalize_text_option(text);
        let author = normalize_text_option(author);
        let category = normalize_text_option(category);

        match (text, author, category) {
            (Some(text), Some(author), Some(category)) => Ok(Self {
                text,
                author,
                category,
            }),
            (text, author, category) => {
                let missing = [
                    ("text", text.is_none()),
                    ("author", author.is_none()),
                    ("category", category.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect::<Vec<_>>()
                .join(", ");
                Err(Error::Validation(format!(
                    "Please fill in all fields (missing: {missing})"
                )))
            }
        }
    }
}

/// Partial update for an existing quote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl QuotePatch {
    /// Build a patch; provided fields must not be blank and at least one is required
    pub fn new(
        text: Option<String>,
        author: Option<String>,
        category: Option<String>,
    ) -> Result<Self> {
        let provided = [&text, &author, &category];
        if provided.iter().all(|value| value.is_none()) {
            return Err(Error::Validation(
                "Nothing to update: provide text, author or category".to_string(),
            ));
        }
        if provided
            .iter()
            .any(|value| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        {
            return Err(Error::Validation("Fields cannot be empty".to_string()));
        }

        Ok(Self {
            text: normalize_text_option(text),
            author: normalize_text_option(author),
            category: normalize_text_option(category),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn draft() -> QuoteDraft {
        QuoteDraft::new("Stay hungry", "Steve Jobs", "Life").unwrap()
    }

    #[test]
    fn test_quote_id_parse() {
        let id: QuoteId = " 42 ".parse().unwrap();
        assert_eq!(id, QuoteId::new(42));
        assert!("abc".parse::<QuoteId>().is_err());
    }

    #[test]
    fn test_quote_new_is_unsynced_version_one() {
        let quote = Quote::new(QuoteId::new(1), draft(), ts("2024-01-01T00:00:00Z"));
        assert_eq!(quote.version, 1);
        assert!(quote.unsynced);
        assert!(!quote.conflict);
        assert_eq!(quote.last_modified, ts("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_draft_trims_and_rejects_blank_fields() {
        let draft = QuoteDraft::new("  text ", " author", "cat  ").unwrap();
        assert_eq!(draft.text, "text");
        assert_eq!(draft.author, "author");
        assert_eq!(draft.category, "cat");

        let error = QuoteDraft::new("text", "  ", "").unwrap_err();
        assert!(error.is_validation());
        assert!(error.to_string().contains("author, category"));
    }

    #[test]
    fn test_touch_bumps_version_and_timestamp() {
        let mut quote = Quote::new(QuoteId::new(1), draft(), ts("2024-01-01T00:00:00Z"));
        quote.touch(ts("2024-01-02T00:00:00Z"));
        assert_eq!(quote.version, 2);
        assert_eq!(quote.last_modified, ts("2024-01-02T00:00:00Z"));
    }

    #[test]
    fn test_apply_patch_reports_changes() {
        let mut quote = Quote::new(QuoteId::new(1), draft(), ts("2024-01-01T00:00:00Z"));
        let same = QuotePatch::new(Some("Stay hungry".into()), None, None).unwrap();
        assert!(!quote.apply_patch(&same));

        let patch = QuotePatch::new(None, None, Some("Wisdom".into())).unwrap();
        assert!(quote.apply_patch(&patch));
        assert_eq!(quote.category, "Wisdom");
        assert_eq!(quote.text, "Stay hungry");
    }

    #[test]
    fn test_patch_requires_a_non_blank_field() {
        assert!(QuotePatch::new(None, None, None).is_err());
        assert!(QuotePatch::new(Some("  ".into()), None, None).is_err());
    }

    #[test]
    fn test_deserialize_browser_record_without_metadata() {
        let json = r#"{"id":3,"text":"Life","author":"Someone","category":"Life"}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.version, 1);
        assert_eq!(quote.last_modified, DateTime::<Utc>::default());
        assert!(!quote.unsynced);
    }

    #[test]
    fn test_serialize_uses_camel_case_and_skips_clear_flags() {
        let mut quote = Quote::new(QuoteId::new(7), draft(), ts("2024-01-01T00:00:00Z"));
        quote.clear_transient_flags();
        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("\"lastModified\""));
        assert!(!json.contains("unsynced"));
        assert!(!json.contains("conflict"));
    }
}
