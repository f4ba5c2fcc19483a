use crate::query::ast::QuerySpec;

/// Chooses the query shape for a tokenized query.
///
/// Typing shapes (`build_prefix`): one term becomes a fuzzy prefix term, more
/// terms become a phrase whose last term is a prefix. Exact shapes
/// (`build_exact`) are used when the terms are known to be complete words.
/// Zero terms build nothing; the caller must not query the index.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub field: String,
    pub max_distance: u8,
}

impl QueryBuilder {
    pub fn new(field: &str) -> Self {
        QueryBuilder {
            field: field.to_string(),
            max_distance: 0,
        }
    }

    pub fn with_max_distance(mut self, max_distance: u8) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn build_prefix(&self, terms: &[String]) -> Option<QuerySpec> {
        match normalize(terms).as_slice() {
            [] => None,
            [term] => Some(QuerySpec::fuzzy_term(term, &self.field, self.max_distance, true)),
            many => Some(QuerySpec::phrase_prefix(many, &self.field)),
        }
    }

    pub fn build_exact(&self, terms: &[String]) -> Option<QuerySpec> {
        match normalize(terms).as_slice() {
            [] => None,
            [term] => Some(QuerySpec::term(term, &self.field)),
            many => Some(QuerySpec::phrase(many, &self.field)),
        }
    }
}

// The index lowercases at analysis time, so query terms must match that
fn normalize(terms: &[String]) -> Vec<String> {
    terms.iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
