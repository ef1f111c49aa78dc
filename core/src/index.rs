use crate::{DocId, ExecutionPolicy};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub type TermId = u32;

/// Term frequencies of one term, keyed by document id.
pub type Postings = BTreeMap<DocId, f64>;

/// Inverted index over interned terms.
///
/// Every distinct word is stored once in an append-only arena and referenced
/// by its `TermId` everywhere else. Removing the last document of a term
/// empties (and frees) its postings, but the arena slot and its `TermId`
/// stay; `term_id` treats a term with empty postings as absent.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    dictionary: HashMap<Arc<str>, TermId>,
    terms: Vec<Arc<str>>,
    postings: Vec<Postings>, // indexed by TermId, parallel to `terms`
    doc_terms: HashMap<DocId, BTreeMap<TermId, f64>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    fn intern(&mut self, word: &str) -> TermId {
        if let Some(&tid) = self.dictionary.get(word) {
            return tid;
        }
        let tid = self.terms.len() as TermId;
        let term: Arc<str> = Arc::from(word);
        self.terms.push(Arc::clone(&term));
        self.postings.push(Postings::new());
        self.dictionary.insert(term, tid);
        tid
    }

    /// Index already validated, stop-word free words of a document.
    pub fn add_document(&mut self, doc_id: DocId, words: &[&str]) {
        if words.is_empty() { return; }
        let inv_word_count = 1.0 / words.len() as f64;
        let mut frequencies: BTreeMap<TermId, f64> = BTreeMap::new();
        for word in words {
            let tid = self.intern(word);
            *self.postings[tid as usize].entry(doc_id).or_insert(0.0) += inv_word_count;
            *frequencies.entry(tid).or_insert(0.0) += inv_word_count;
        }
        self.doc_terms.insert(doc_id, frequencies);
    }

    /// Drop every posting the document contributed. Returns false if the
    /// document had none.
    pub fn remove_document(&mut self, policy: ExecutionPolicy, doc_id: DocId) -> bool {
        let Some(terms) = self.doc_terms.remove(&doc_id) else {
            return false;
        };
        match policy {
            ExecutionPolicy::Sequential => {
                for tid in terms.keys() {
                    self.postings[*tid as usize].remove(&doc_id);
                }
            }
            ExecutionPolicy::Parallel => {
                // Carve disjoint slots for the document's terms out of the
                // postings table; the ids come from a BTreeMap, so ascending.
                let mut targets: Vec<&mut Postings> = Vec::with_capacity(terms.len());
                let mut rest: &mut [Postings] = &mut self.postings;
                let mut offset = 0;
                for &tid in terms.keys() {
                    let (_, tail) = std::mem::take(&mut rest).split_at_mut(tid as usize - offset);
                    let Some((target, tail)) = tail.split_first_mut() else { break };
                    targets.push(target);
                    rest = tail;
                    offset = tid as usize + 1;
                }
                targets.into_par_iter().for_each(|postings| {
                    postings.remove(&doc_id);
                });
            }
        }
        true
    }

    /// Handle of a term that currently has at least one posting.
    pub fn term_id(&self, word: &str) -> Option<TermId> {
        let tid = *self.dictionary.get(word)?;
        if self.postings[tid as usize].is_empty() { None } else { Some(tid) }
    }

    pub fn term(&self, tid: TermId) -> &str { &self.terms[tid as usize] }

    pub fn postings(&self, tid: TermId) -> &Postings { &self.postings[tid as usize] }

    /// Number of documents containing the term.
    pub fn document_frequency(&self, tid: TermId) -> usize { self.postings[tid as usize].len() }

    pub fn contains(&self, tid: TermId, doc_id: DocId) -> bool {
        self.postings[tid as usize].contains_key(&doc_id)
    }

    pub fn word_frequencies(&self, doc_id: DocId) -> BTreeMap<&str, f64> {
        self.doc_terms
            .get(&doc_id)
            .map(|terms| terms.iter().map(|(tid, freq)| (self.term(*tid), *freq)).collect())
            .unwrap_or_default()
    }

    /// Term handles of a document, ascending. Empty if unknown.
    pub fn document_terms(&self, doc_id: DocId) -> impl Iterator<Item = TermId> + '_ {
        self.doc_terms.get(&doc_id).into_iter().flat_map(|terms| terms.keys().copied())
    }

    /// Number of distinct terms ever interned.
    pub fn interned_terms(&self) -> usize { self.terms.len() }
}
