use crate::concurrent_map::ConcurrentMap;
use crate::index::{InvertedIndex, TermId};
use crate::query::Query;
use crate::store::DocumentStore;
use crate::{DocId, Document, DocumentStatus, ExecutionPolicy, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Filter applied to every candidate document before it is scored.
pub trait DocumentPredicate: Sync {
    fn matches(&self, doc_id: DocId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentPredicate for F
where
    F: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    fn matches(&self, doc_id: DocId, status: DocumentStatus, rating: i32) -> bool {
        self(doc_id, status, rating)
    }
}

/// A bare status keeps documents with exactly that status.
impl DocumentPredicate for DocumentStatus {
    fn matches(&self, _doc_id: DocId, status: DocumentStatus, _rating: i32) -> bool {
        *self == status
    }
}

/// Read-only view used to score and match queries.
pub(crate) struct Ranker<'a> {
    pub index: &'a InvertedIndex,
    pub documents: &'a DocumentStore,
    pub shard_count: usize,
}

/// Distinct handles of the words that are present in the index.
fn resolve(index: &InvertedIndex, words: &[&str]) -> Vec<TermId> {
    words
        .iter()
        .filter_map(|word| index.term_id(word))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl<'a> Ranker<'a> {
    fn inverse_document_freq(&self, tid: TermId) -> f64 {
        (self.documents.len() as f64 / self.index.document_frequency(tid) as f64).ln()
    }

    pub fn find_all_documents<P: DocumentPredicate + ?Sized>(
        &self,
        policy: ExecutionPolicy,
        query: &Query<'_>,
        predicate: &P,
    ) -> Vec<Document> {
        let plus = resolve(self.index, &query.plus_words);
        let minus = resolve(self.index, &query.minus_words);
        let relevance = match policy {
            ExecutionPolicy::Sequential => self.accumulate_sequential(&plus, &minus, predicate),
            ExecutionPolicy::Parallel => self.accumulate_parallel(&plus, &minus, predicate),
        };
        tracing::trace!(
            ?policy,
            plus_terms = plus.len(),
            minus_terms = minus.len(),
            candidates = relevance.len(),
            "scored query"
        );
        relevance
            .into_iter()
            .filter_map(|(doc_id, relevance)| {
                let data = self.documents.get(doc_id)?;
                Some(Document::new(doc_id, relevance, data.rating))
            })
            .collect()
    }

    fn accumulate_sequential<P: DocumentPredicate + ?Sized>(
        &self,
        plus: &[TermId],
        minus: &[TermId],
        predicate: &P,
    ) -> BTreeMap<DocId, f64> {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for &tid in plus {
            let idf = self.inverse_document_freq(tid);
            for (&doc_id, &term_freq) in self.index.postings(tid) {
                let Some(data) = self.documents.get(doc_id) else { continue };
                if predicate.matches(doc_id, data.status, data.rating) {
                    *relevance.entry(doc_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }
        for &tid in minus {
            for doc_id in self.index.postings(tid).keys() {
                relevance.remove(doc_id);
            }
        }
        relevance
    }

    // One task per term: a term's postings are never split across tasks.
    fn accumulate_parallel<P: DocumentPredicate + ?Sized>(
        &self,
        plus: &[TermId],
        minus: &[TermId],
        predicate: &P,
    ) -> BTreeMap<DocId, f64> {
        let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(self.shard_count);
        plus.par_iter().for_each(|&tid| {
            let idf = self.inverse_document_freq(tid);
            for (&doc_id, &term_freq) in self.index.postings(tid) {
                let Some(data) = self.documents.get(doc_id) else { continue };
                if predicate.matches(doc_id, data.status, data.rating) {
                    *relevance.access(doc_id) += term_freq * idf;
                }
            }
        });
        minus.par_iter().for_each(|&tid| {
            for doc_id in self.index.postings(tid).keys() {
                relevance.erase(doc_id);
            }
        });
        relevance.into_ordinary_map()
    }

    /// Sorted, deduplicated plus words co-occurring with the document, or an
    /// empty list when a minus word hits it. The caller checks the id exists.
    pub fn match_document(&self, policy: ExecutionPolicy, query: &Query<'_>, doc_id: DocId) -> Vec<&'a str> {
        let index = self.index;
        let hits = |word: &&str| index.term_id(word).filter(|&tid| index.contains(tid, doc_id));
        match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(|word| hits(word).is_some()) {
                    return Vec::new();
                }
                let mut matched: Vec<&'a str> = query
                    .plus_words
                    .iter()
                    .filter_map(|word| hits(word))
                    .map(|tid| index.term(tid))
                    .collect();
                matched.sort_unstable();
                matched.dedup();
                matched
            }
            ExecutionPolicy::Parallel => {
                if query.minus_words.par_iter().any(|word| hits(word).is_some()) {
                    return Vec::new();
                }
                let mut matched: Vec<&'a str> = query
                    .plus_words
                    .par_iter()
                    .filter_map(|word| hits(word))
                    .map(|tid| index.term(tid))
                    .collect();
                matched.par_sort_unstable();
                matched.dedup();
                matched
            }
        }
    }
}

/// Order by relevance descending; relevances closer than `RELEVANCE_EPSILON`
/// tie and fall back to rating descending, then id ascending. Keeps the best
/// `MAX_RESULT_DOCUMENT_COUNT`.
pub fn select_top_documents(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|lhs, rhs| rhs.relevance.total_cmp(&lhs.relevance).then(lhs.id.cmp(&rhs.id)));
    // Swap near-equal neighbours until every tied pair is in rating order.
    // Each swap removes one rating inversion, so this terminates, and pairs
    // further apart than the epsilon never change their relative order.
    let out_of_order = |lhs: &Document, rhs: &Document| {
        (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON && (rhs.rating, lhs.id) > (lhs.rating, rhs.id)
    };
    let mut moved = true;
    while moved {
        moved = false;
        for i in 1..documents.len() {
            if out_of_order(&documents[i - 1], &documents[i]) {
                documents.swap(i - 1, i);
                moved = true;
            }
        }
    }
    documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
    documents
}
