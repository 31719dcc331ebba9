//! Last-writer-wins reconciliation of server quotes

use crate::quotes::Quote;
use serde::Serialize;

/// Result of a reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Local quotes whose category was overwritten by the server
    pub conflicts: usize,
    /// Server quotes appended because no local text matched
    pub added: usize,
}

/// Apply `remote` onto `local`.
///
/// Each remote quote is matched to the first local quote with identical
/// text. A category mismatch is resolved in favor of the server and counted
/// as a conflict; an unmatched remote quote is appended.
pub fn reconcile(local: &mut Vec<Quote>, remote: &[Quote]) -> MergeReport {
    let mut report = MergeReport::default();

    for server_quote in remote {
        match local.iter_mut().find(|q| q.text == server_quote.text) {
            Some(existing) => {
                if existing.category != server_quote.category {
                    existing.category = server_quote.category.clone();
                    report.conflicts += 1;
                }
            }
            None => {
                local.push(server_quote.clone());
                report.added += 1;
            }
        }
    }

    report
}
