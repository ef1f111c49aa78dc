use search_core::{DocId, Document, DocumentStatus, ExecutionPolicy, SearchError, SearchServer};
use tracing_subscriber::{fmt, EnvFilter};

const EPSILON: f64 = 1e-6;

fn init_tracing() {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}

fn ids(docs: &[Document]) -> Vec<DocId> {
    docs.iter().map(|d| d.id).collect()
}

/// Four documents about pets, one per status, stop words "и в на".
fn pets(statuses: [DocumentStatus; 4]) -> SearchServer {
    init_tracing();
    let mut server = SearchServer::new("и в на").unwrap();
    server.add_document(0, "белый кот и модный ошейник", statuses[0], &[8, -3]).unwrap();
    server.add_document(1, "пушистый кот пушистый хвост", statuses[1], &[7, 2, 7]).unwrap();
    server.add_document(2, "ухоженный пёс выразительные глаза", statuses[2], &[5, -12, 2, 1]).unwrap();
    server.add_document(3, "ухоженный скворец евгений", statuses[3], &[9]).unwrap();
    server
}

#[test]
fn stop_words_are_excluded_from_documents() {
    init_tracing();
    let content = "cat in the city";
    let mut server = SearchServer::new("").unwrap();
    server.add_document(42, content, DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    assert_eq!(ids(&server.find_top_documents("in").unwrap()), vec![42]);

    let mut server = SearchServer::new("in the").unwrap();
    server.add_document(42, content, DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    assert!(server.find_top_documents("in").unwrap().is_empty());
}

#[test]
fn stop_word_only_documents_never_match() {
    let mut server = SearchServer::new("in the on").unwrap();
    server.add_document(1, "in the  on the", DocumentStatus::Actual, &[4]).unwrap();
    assert_eq!(server.document_count(), 1);
    assert!(server.word_frequencies(1).is_empty());
    assert!(server.find_top_documents("in the on").unwrap().is_empty());
    assert!(server.find_top_documents_with_policy(ExecutionPolicy::Parallel, "the -on", DocumentStatus::Actual).unwrap().is_empty());
}

#[test]
fn empty_index_finds_nothing() {
    let mut server = SearchServer::new("and").unwrap();
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        assert!(server.find_top_documents_with_policy(policy, "cat -dog", DocumentStatus::Actual).unwrap().is_empty());
    }

    server.add_document(1, "cat and dog", DocumentStatus::Actual, &[1]).unwrap();
    server.add_document(2, "cat", DocumentStatus::Actual, &[2]).unwrap();
    server.remove_document(1);
    server.remove_document_with_policy(ExecutionPolicy::Parallel, 2);
    assert_eq!(server.document_count(), 0);
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        assert!(server.find_top_documents_with_policy(policy, "cat dog", DocumentStatus::Actual).unwrap().is_empty());
    }
}

#[test]
fn single_document_has_zero_relevance_and_mean_rating() {
    let mut server = SearchServer::new("").unwrap();
    assert_eq!(server.document_count(), 0);
    server.add_document(42, "black cat with collar in the city ", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    let found = server.find_top_documents_by("cat in the city", DocumentStatus::Actual).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 42);
    assert_eq!(found[0].rating, 2);
    assert_eq!(found[0].relevance, 0.0);
}

#[test]
fn minus_words_exclude_documents_from_match() {
    let content = "black cat with collar in the city";
    let mut server = SearchServer::new("").unwrap();
    server.add_document(42, content, DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    let (words, status) = server.match_document("cat in the city for sale -sale -lang -collar", 42).unwrap();
    assert!(words.is_empty());
    assert_eq!(status, DocumentStatus::Actual);

    let mut server = SearchServer::new("in the with").unwrap();
    server.add_document(42, content, DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    let (words, status) = server.match_document("cat in the city for sale -sale -lang", 42).unwrap();
    assert_eq!(words, vec!["cat", "city"]);
    assert_eq!(status, DocumentStatus::Actual);
}

#[test]
fn minus_words_exclude_documents_from_ranking() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(1, "cat cat cat collar", DocumentStatus::Actual, &[10]).unwrap();
    server.add_document(2, "cat dog", DocumentStatus::Actual, &[1]).unwrap();
    server.add_document(3, "parrot", DocumentStatus::Actual, &[1]).unwrap();
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        let found = server.find_top_documents_with_policy(policy, "cat -collar", DocumentStatus::Actual).unwrap();
        assert_eq!(ids(&found), vec![2]);
        // Unknown minus words veto nothing.
        let found = server.find_top_documents_with_policy(policy, "cat -unicorn", DocumentStatus::Actual).unwrap();
        assert_eq!(ids(&found), vec![1, 2]);
    }
}

#[test]
fn ranks_by_relevance_then_rating() {
    let server = pets([DocumentStatus::Actual, DocumentStatus::Actual, DocumentStatus::Actual, DocumentStatus::Banned]);
    let found = server.find_top_documents("пушистый ухоженный кот").unwrap();
    assert_eq!(ids(&found), vec![1, 0, 2]);

    let expected = [(1, 0.866434, 5), (0, 0.173287, 2), (2, 0.173287, -1)];
    for (doc, (id, relevance, rating)) in found.iter().zip(expected) {
        assert_eq!(doc.id, id);
        assert!((doc.relevance - relevance).abs() < EPSILON, "doc {id}: {}", doc.relevance);
        assert_eq!(doc.rating, rating);
    }
}

#[test]
fn filters_by_status() {
    let server = pets([DocumentStatus::Removed, DocumentStatus::Irrelevant, DocumentStatus::Actual, DocumentStatus::Banned]);
    let expected = [
        (DocumentStatus::Removed, 0),
        (DocumentStatus::Irrelevant, 1),
        (DocumentStatus::Actual, 2),
        (DocumentStatus::Banned, 3),
    ];
    for (status, id) in expected {
        let found = server.find_top_documents_by("ухоженный кот", status).unwrap();
        assert_eq!(ids(&found), vec![id], "status {status:?}");
    }
}

#[test]
fn filters_by_predicate() {
    let server = pets([DocumentStatus::Removed, DocumentStatus::Irrelevant, DocumentStatus::Actual, DocumentStatus::Banned]);
    let found = server.find_top_documents_by("ухоженный кот", |_id: DocId, _status: DocumentStatus, rating: i32| rating > 8).unwrap();
    assert_eq!(ids(&found), vec![3]);
    assert!(found.iter().all(|d| d.rating > 8));

    let found = server.find_top_documents_by("ухоженный кот", |id: DocId, _status: DocumentStatus, _rating: i32| id == 1).unwrap();
    assert_eq!(ids(&found), vec![1]);
}

#[test]
fn never_returns_more_than_five() {
    let mut server = SearchServer::new("").unwrap();
    for id in 0..12 {
        server.add_document(id, &format!("cat number{id}"), DocumentStatus::Actual, &[id]).unwrap();
    }
    server.add_document(100, "dog", DocumentStatus::Actual, &[]).unwrap();
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        let found = server.find_top_documents_with_policy(policy, "cat", DocumentStatus::Actual).unwrap();
        // Equal relevance everywhere, so the best ratings win.
        assert_eq!(ids(&found), vec![11, 10, 9, 8, 7]);
    }
}

#[test]
fn remove_document_is_idempotent() {
    for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
        let mut server = SearchServer::new("and").unwrap();
        server.add_document(1, "white cat and collar", DocumentStatus::Actual, &[1]).unwrap();
        server.add_document(2, "fluffy cat", DocumentStatus::Actual, &[2]).unwrap();
        server.add_document(3, "groomed dog", DocumentStatus::Actual, &[3]).unwrap();

        server.remove_document_with_policy(policy, 2);
        let once = server.find_top_documents("cat dog").unwrap();
        server.remove_document_with_policy(policy, 2);
        let twice = server.find_top_documents("cat dog").unwrap();

        assert_eq!(once, twice);
        assert_eq!(server.document_count(), 2);
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(server.word_frequencies(2).is_empty());
        assert!(server.find_top_documents("fluffy").unwrap().is_empty());
        assert_eq!(server.match_document("cat", 2), Err(SearchError::UnknownDocument(2)));
        server.remove_document_with_policy(policy, 77);
        assert_eq!(server.document_count(), 2);
    }
}

#[test]
fn removed_id_can_be_added_again() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(5, "old text", DocumentStatus::Actual, &[1]).unwrap();
    server.remove_document(5);
    server.add_document(5, "new text", DocumentStatus::Banned, &[4, 4]).unwrap();
    let freqs = server.word_frequencies(5);
    assert_eq!(freqs.keys().copied().collect::<Vec<_>>(), vec!["new", "text"]);
    let (words, status) = server.match_document("old new", 5).unwrap();
    assert_eq!(words, vec!["new"]);
    assert_eq!(status, DocumentStatus::Banned);
}

#[test]
fn word_frequencies_sum_per_occurrence() {
    let mut server = SearchServer::new("и").unwrap();
    server.add_document(1, "пушистый кот и пушистый хвост", DocumentStatus::Actual, &[]).unwrap();
    let freqs = server.word_frequencies(1);
    assert_eq!(freqs.len(), 3);
    assert!((freqs["пушистый"] - 0.5).abs() < EPSILON);
    assert!((freqs["хвост"] - 0.25).abs() < EPSILON);
    assert!(server.word_frequencies(99).is_empty());
}

#[test]
fn invalid_queries_are_rejected() {
    let server = pets([DocumentStatus::Actual; 4]);
    for query in ["кот -", "--кот", "кот \u{3}"] {
        assert!(matches!(server.find_top_documents(query), Err(SearchError::InvalidQueryTerm(_))), "{query:?}");
        assert!(matches!(server.match_document(query, 0), Err(SearchError::InvalidQueryTerm(_))), "{query:?}");
    }
}

#[test]
fn match_document_agrees_across_policies() {
    let server = pets([DocumentStatus::Actual; 4]);
    for id in 0..4 {
        for query in ["пушистый кот пушистый хвост", "кот -ошейник", "ухоженный евгений скворец пёс", "-хвост"] {
            let seq = server.match_document_with_policy(ExecutionPolicy::Sequential, query, id).unwrap();
            let par = server.match_document_with_policy(ExecutionPolicy::Parallel, query, id).unwrap();
            assert_eq!(seq, par, "query {query:?} doc {id}");
        }
    }
    let (words, _) = server.match_document_with_policy(ExecutionPolicy::Parallel, "хвост пушистый кот пушистый", 1).unwrap();
    assert_eq!(words, vec!["кот", "пушистый", "хвост"]);
}
