//! In-memory TF-IDF search server with plus/minus word queries, document
//! predicates and an optional parallel execution path.

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod ranking;
pub mod search_server;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub use batch::{process_queries, process_queries_joined, remove_duplicates};
pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use document::{Document, DocumentStatus};
pub use error::{Result, SearchError};
pub use ranking::DocumentPredicate;
pub use search_server::SearchServer;

pub type DocId = i32;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are considered equal when ranking.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// How an operation spreads its work. Both variants give the same results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}
