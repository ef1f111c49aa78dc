use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::{InvertedIndex, TermId};
use crate::query::Query;
use crate::ranking::{select_top_documents, DocumentPredicate, Ranker};
use crate::store::{compute_average_rating, DocumentData, DocumentStore};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};
use crate::{DocId, Document, DocumentStatus, ExecutionPolicy};
use std::collections::BTreeMap;

/// Search server over short text documents.
///
/// Mutation takes `&mut self`; queries take `&self` and may run from many
/// threads at once.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    documents: DocumentStore,
    shard_count: usize,
}

impl SearchServer {
    /// Build with space separated stop words.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWords::from_text(stop_words_text)?, SearchConfig::default().shard_count()))
    }

    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWords::new(stop_words)?, SearchConfig::default().shard_count()))
    }

    pub fn with_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self::with_stop_words(StopWords::new(&config.stop_words)?, config.shard_count()))
    }

    fn with_stop_words(stop_words: StopWords, shard_count: usize) -> Self {
        Self { stop_words, index: InvertedIndex::new(), documents: DocumentStore::new(), shard_count }
    }

    pub fn add_document(&mut self, doc_id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if doc_id < 0 || self.documents.contains(doc_id) {
            return Err(SearchError::DuplicateId(doc_id));
        }
        let words = self.split_into_words_no_stop(text)?;
        self.index.add_document(doc_id, &words);
        let rating = compute_average_rating(ratings);
        self.documents.insert(doc_id, DocumentData { rating, status });
        tracing::debug!(doc_id, words = words.len(), rating, ?status, "added document");
        Ok(())
    }

    // Validates every word, stop words included, before anything is indexed.
    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidTerm(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    fn ranker(&self) -> Ranker<'_> {
        Ranker { index: &self.index, documents: &self.documents, shard_count: self.shard_count }
    }

    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query, DocumentStatus::Actual)
    }

    /// Top documents accepted by `predicate`, which may be a status or a
    /// closure over `(id, status, rating)`.
    pub fn find_top_documents_by<P: DocumentPredicate>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>> {
        self.find_top_documents_with_policy(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_with_policy<P: DocumentPredicate>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let matched = self.ranker().find_all_documents(policy, &query, &predicate);
        Ok(select_top_documents(matched))
    }

    /// Plus words of the query found in the document, sorted, plus its status.
    /// A matching minus word empties the list.
    pub fn match_document(&self, raw_query: &str, doc_id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, doc_id)
    }

    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        doc_id: DocId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let query = match policy {
            ExecutionPolicy::Sequential => Query::parse_deduplicated(raw_query, &self.stop_words)?,
            ExecutionPolicy::Parallel => Query::parse(raw_query, &self.stop_words)?,
        };
        let status = self.documents.get(doc_id).ok_or(SearchError::UnknownDocument(doc_id))?.status;
        Ok((self.ranker().match_document(policy, &query, doc_id), status))
    }

    /// Removing an unknown id does nothing.
    pub fn remove_document(&mut self, doc_id: DocId) {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, doc_id)
    }

    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, doc_id: DocId) {
        if self.documents.remove(doc_id).is_none() {
            return;
        }
        self.index.remove_document(policy, doc_id);
        tracing::debug!(doc_id, ?policy, "removed document");
    }

    /// Word frequencies of a document, empty for an unknown id.
    pub fn word_frequencies(&self, doc_id: DocId) -> BTreeMap<&str, f64> {
        self.index.word_frequencies(doc_id)
    }

    /// Handles of the document's distinct words, ascending.
    pub(crate) fn document_signature(&self, doc_id: DocId) -> Vec<TermId> {
        self.index.document_terms(doc_id).collect()
    }

    pub fn document_count(&self) -> usize { self.documents.len() }

    /// Document ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ { self.documents.ids() }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = std::iter::Copied<std::collections::btree_map::Keys<'a, DocId, DocumentData>>;

    fn into_iter(self) -> Self::IntoIter { self.documents.ids() }
}
