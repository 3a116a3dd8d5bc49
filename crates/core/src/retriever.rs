//! Token-overlap retrieval over the knowledge store.

use crate::knowledge::{KnowledgeRecord, KnowledgeStore};
use crate::tokenizer::tokenize;

/// Number of records the fallback path asks for.
pub const DEFAULT_TOP_K: usize = 2;

/// Scores knowledge records against a query by token overlap.
///
/// The score of a record is the number of query tokens (duplicates counted
/// per occurrence) that appear in the record's token set. Records scoring zero
/// are dropped; ties keep table order.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: KnowledgeStore,
}

impl Retriever {
    pub fn new(store: KnowledgeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Return up to `k` records ordered by descending overlap score.
    pub fn retrieve(&self, query: &str, k: usize) -> Vec<&KnowledgeRecord> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, &KnowledgeRecord)> = self
            .store
            .indexed()
            .filter_map(|(record, tokens)| {
                let overlap = query_tokens.iter().filter(|t| tokens.contains(*t)).count();
                (overlap > 0).then_some((overlap, record))
            })
            .collect();

        // sort_by is stable, so equal scores stay in table order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(k).map(|(_, record)| record).collect()
    }
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(KnowledgeStore::builtin())
    }
}
