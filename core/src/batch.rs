use crate::error::Result;
use crate::{DocId, Document, SearchServer};
use rayon::prelude::*;
use std::collections::HashSet;

/// Run `find_top_documents` for every query in parallel. Results keep the
/// order of `queries`; the first invalid query fails the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries.par_iter().map(|query| server.find_top_documents(query.as_ref())).collect()
}

/// [`process_queries`] flattened into one list, still in query order.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}

/// Remove documents whose set of words equals that of a document with a
/// smaller id. Frequencies are ignored. Returns the removed ids.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocId> {
    let mut seen = HashSet::new();
    let duplicates: Vec<DocId> = server
        .iter()
        .filter(|&doc_id| !seen.insert(server.document_signature(doc_id)))
        .collect();
    for &doc_id in &duplicates {
        tracing::info!(doc_id, "found duplicate document");
        server.remove_document(doc_id);
    }
    duplicates
}
