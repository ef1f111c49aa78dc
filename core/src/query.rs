use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};

const MINUS: char = '-';

/// A parsed query. Words borrow the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(text: &'a str, stop_words: &StopWords) -> Result<QueryWord<'a>> {
    if text.is_empty() {
        return Err(SearchError::InvalidQueryTerm(text.to_string()));
    }
    let (word, is_minus) = match text.strip_prefix(MINUS) {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if word.is_empty() || word.starts_with(MINUS) || !is_valid_word(word) {
        return Err(SearchError::InvalidQueryTerm(text.to_string()));
    }
    Ok(QueryWord { data: word, is_minus, is_stop: stop_words.contains(word) })
}

impl<'a> Query<'a> {
    /// Parse keeping duplicates and input order.
    pub fn parse(text: &'a str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for token in split_into_words(text) {
            let word = parse_query_word(token, stop_words)?;
            if word.is_stop { continue; }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }
        Ok(query)
    }

    /// Parse, then sort and deduplicate both word lists.
    pub fn parse_deduplicated(text: &'a str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Self::parse(text, stop_words)?;
        query.plus_words.sort_unstable();
        query.plus_words.dedup();
        query.minus_words.sort_unstable();
        query.minus_words.dedup();
        Ok(query)
    }
}
