use crate::{DocId, DocumentStatus};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentData {
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Per-document attributes. Ids are kept ordered so iteration is ascending.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, DocumentData>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, doc_id: DocId, data: DocumentData) {
        self.documents.insert(doc_id, data);
    }

    pub fn remove(&mut self, doc_id: DocId) -> Option<DocumentData> {
        self.documents.remove(&doc_id)
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocumentData> { self.documents.get(&doc_id) }

    pub fn contains(&self, doc_id: DocId) -> bool { self.documents.contains_key(&doc_id) }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn ids(&self) -> std::iter::Copied<std::collections::btree_map::Keys<'_, DocId, DocumentData>> {
        self.documents.keys().copied()
    }
}

/// Truncating integer mean, 0 for no ratings.
pub fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    (sum / ratings.len() as i64) as i32
}
