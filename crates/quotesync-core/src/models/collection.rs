//! Quote collections and category filtering

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::quote::{Quote, QuoteId};

/// A set of quotes keyed by id.
///
/// Backed by a `Vec` so iteration order (and therefore every derived
/// collection) is deterministic; callers must not rely on that order for
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteCollection(Vec<Quote>);

impl QuoteCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Quote] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Quote> {
        self.0
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.0.iter().find(|quote| quote.id == id)
    }

    pub fn get_mut(&mut self, id: QuoteId) -> Option<&mut Quote> {
        self.0.iter_mut().find(|quote| quote.id == id)
    }

    pub fn contains(&self, id: QuoteId) -> bool {
        self.get(id).is_some()
    }

    /// Append a quote without checking for an existing id
    pub fn push(&mut self, quote: Quote) {
        self.0.push(quote);
    }

    /// Replace the quote with the same id, or append it
    pub fn upsert(&mut self, quote: Quote) {
        if let Some(existing) = self.get_mut(quote.id) {
            *existing = quote;
        } else {
            self.0.push(quote);
        }
    }

    /// Replace the quote with the same id; returns `false` when absent
    pub fn replace(&mut self, quote: Quote) -> bool {
        let Some(existing) = self.get_mut(quote.id) else {
            return false;
        };
        *existing = quote;
        true
    }

    pub fn remove(&mut self, id: QuoteId) -> Option<Quote> {
        let index = self.0.iter().position(|quote| quote.id == id)?;
        Some(self.0.remove(index))
    }

    /// Largest id in the collection
    pub fn max_id(&self) -> Option<QuoteId> {
        self.0.iter().map(|quote| quote.id).max()
    }

    /// Strip `unsynced`/`conflict` from every record
    pub fn clear_transient_flags(&mut self) {
        self.0.iter_mut().for_each(Quote::clear_transient_flags);
    }

    /// Unique categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .filter(|quote| seen.insert(quote.category.as_str()))
            .map(|quote| quote.category.clone())
            .collect()
    }

    /// Quotes matching the given category filter
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.0
            .iter()
            .filter(|quote| filter.matches(quote))
            .collect()
    }

    /// Number of records still waiting to be pushed
    pub fn unsynced_count(&self) -> usize {
        self.0.iter().filter(|quote| quote.unsynced).count()
    }
}

impl From<Vec<Quote>> for QuoteCollection {
    fn from(quotes: Vec<Quote>) -> Self {
        Self(quotes)
    }
}

impl FromIterator<Quote> for QuoteCollection {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for QuoteCollection {
    type Item = Quote;
    type IntoIter = std::vec::IntoIter<Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuoteCollection {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Category selection; `all` shows every quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Category(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() || value == Self::ALL {
            Ok(Self::All)
        } else {
            Ok(Self::Category(value.to_string()))
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::QuoteDraft;

    fn quote(id: i64, text: &str, category: &str) -> Quote {
        let draft = QuoteDraft::new(text, "Author", category).unwrap();
        Quote::new(QuoteId::new(id), draft, Utc::now())
    }

    #[test]
    fn test_upsert_replaces_or_appends() {
        let mut collection = QuoteCollection::from(vec![quote(1, "A", "Work")]);
        collection.upsert(quote(1, "A2", "Work"));
        collection.upsert(quote(2, "B", "Life"));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(QuoteId::new(1)).unwrap().text, "A2");
    }

    #[test]
    fn test_replace_ignores_missing_id() {
        let mut collection = QuoteCollection::from(vec![quote(1, "A", "Work")]);
        assert!(!collection.replace(quote(9, "Z", "Work")));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_remove_returns_removed_quote() {
        let mut collection = QuoteCollection::from(vec![quote(1, "A", "Work"), quote(2, "B", "Life")]);
        let removed = collection.remove(QuoteId::new(1)).unwrap();
        assert_eq!(removed.text, "A");
        assert!(collection.remove(QuoteId::new(1)).is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_categories_unique_in_first_seen_order() {
        let collection = QuoteCollection::from(vec![
            quote(1, "A", "Work"),
            quote(2, "B", "Life"),
            quote(3, "C", "Work"),
            quote(4, "D", "Dreams"),
        ]);
        assert_eq!(collection.categories(), vec!["Work", "Life", "Dreams"]);
    }

    #[test]
    fn test_filtered_by_category() {
        let collection = QuoteCollection::from(vec![
            quote(1, "A", "Work"),
            quote(2, "B", "Life"),
            quote(3, "C", "Work"),
        ]);

        let work = collection.filtered(&CategoryFilter::from("Work"));
        assert_eq!(work.len(), 2);
        assert!(work.iter().all(|quote| quote.category == "Work"));

        assert_eq!(collection.filtered(&CategoryFilter::All).len(), 3);
        assert!(collection.filtered(&CategoryFilter::from("Nope")).is_empty());
    }

    #[test]
    fn test_category_filter_parses_all_sentinel() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from(" Life "),
            CategoryFilter::Category("Life".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn test_max_id() {
        let collection = QuoteCollection::from(vec![quote(5, "A", "W"), quote(12, "B", "W")]);
        assert_eq!(collection.max_id(), Some(QuoteId::new(12)));
        assert_eq!(QuoteCollection::new().max_id(), None);
    }
}
