//! Conflict detection between the local collection and the remote mirror

use std::collections::HashMap;

use crate::models::{Conflict, Quote, QuoteCollection, QuoteId};

/// Compare `local` against `remote` by id and list every divergence.
///
/// Pure: neither collection is modified. Conflicts are reported in local
/// order, with duplicates (which are keyed by remote records) last.
pub fn detect_conflicts(local: &QuoteCollection, remote: &QuoteCollection) -> Vec<Conflict> {
    let remote_by_id = index_by_id(remote);
    let local_by_id = index_by_id(local);
    let mut conflicts = Vec::new();

    for local_quote in local {
        match remote_by_id.get(&local_quote.id) {
            Some(remote_quote) if is_newer_remote_edit(local_quote, remote_quote) => {
                conflicts.push(Conflict::modified(
                    local_quote.clone(),
                    (*remote_quote).clone(),
                ));
            }
            Some(_) => {}
            // Pending local records are expected to be missing remotely.
            None if !local_quote.unsynced => {
                conflicts.push(Conflict::removed(local_quote.clone()));
            }
            None => {}
        }
    }

    for remote_quote in remote
        .iter()
        .filter(|quote| !local_by_id.contains_key(&quote.id))
    {
        if let Some(local_quote) = local
            .iter()
            .find(|quote| quote.unsynced && quote.text == remote_quote.text)
        {
            conflicts.push(Conflict::duplicate(
                local_quote.clone(),
                remote_quote.clone(),
            ));
        }
    }

    conflicts
}

/// Version and recency must agree, and the content must actually differ
fn is_newer_remote_edit(local: &Quote, remote: &Quote) -> bool {
    remote.version > local.version
        && remote.last_modified > local.last_modified
        && remote.content_differs(local)
}

fn index_by_id(collection: &QuoteCollection) -> HashMap<QuoteId, &Quote> {
    collection.iter().map(|quote| (quote.id, quote)).collect()
}
