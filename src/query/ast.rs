use serde::{Serialize, Deserialize};

/// The four query shapes handed to the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuerySpec {
    /// Single term, optionally fuzzy, matching as a prefix when `is_prefix`
    #[serde(rename_all = "camelCase")]
    FuzzyPrefixTerm {
        term: String,
        field: String,
        max_distance: u8,
        is_prefix: bool,
    },
    /// Leading terms exact and in sequence, final term by prefix
    PhrasePrefix {
        terms: Vec<String>,
        field: String,
    },
    Term {
        term: String,
        field: String,
    },
    Phrase {
        terms: Vec<String>,
        field: String,
    },
}

impl QuerySpec {
    pub fn fuzzy_term(term: &str, field: &str, max_distance: u8, is_prefix: bool) -> Self {
        QuerySpec::FuzzyPrefixTerm {
            term: term.to_string(),
            field: field.to_string(),
            max_distance,
            is_prefix,
        }
    }

    pub fn phrase_prefix(terms: &[String], field: &str) -> Self {
        QuerySpec::PhrasePrefix { terms: terms.to_vec(), field: field.to_string() }
    }

    pub fn term(term: &str, field: &str) -> Self {
        QuerySpec::Term { term: term.to_string(), field: field.to_string() }
    }

    pub fn phrase(terms: &[String], field: &str) -> Self {
        QuerySpec::Phrase { terms: terms.to_vec(), field: field.to_string() }
    }

    pub fn field(&self) -> &str {
        match self {
            QuerySpec::FuzzyPrefixTerm { field, .. }
            | QuerySpec::PhrasePrefix { field, .. }
            | QuerySpec::Term { field, .. }
            | QuerySpec::Phrase { field, .. } => field,
        }
    }

    /// Query terms in order
    pub fn terms(&self) -> Vec<&str> {
        match self {
            QuerySpec::FuzzyPrefixTerm { term, .. } | QuerySpec::Term { term, .. } => vec![term],
            QuerySpec::PhrasePrefix { terms, .. } | QuerySpec::Phrase { terms, .. } => {
                terms.iter().map(String::as_str).collect()
            }
        }
    }

    /// Whether the final term matches by prefix
    pub fn last_term_is_prefix(&self) -> bool {
        match self {
            QuerySpec::FuzzyPrefixTerm { is_prefix, .. } => *is_prefix,
            QuerySpec::PhrasePrefix { .. } => true,
            QuerySpec::Term { .. } | QuerySpec::Phrase { .. } => false,
        }
    }
}

/// What a caller may hand the search API: raw text still to be tokenized and
/// shaped, or a query it already built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    RawQueryText(String),
    CompiledQuery(QuerySpec),
}

impl From<&str> for QueryInput {
    fn from(text: &str) -> Self {
        QueryInput::RawQueryText(text.to_string())
    }
}

impl From<QuerySpec> for QueryInput {
    fn from(spec: QuerySpec) -> Self {
        QueryInput::CompiledQuery(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let spec = QuerySpec::FuzzyPrefixTerm {
            term: "fur".to_string(),
            field: "title".to_string(),
            max_distance: 0,
            is_prefix: true,
        };
        assert_eq!(serde_json::to_value(&spec).unwrap(), json!({
            "kind": "fuzzyPrefixTerm",
            "term": "fur",
            "field": "title",
            "maxDistance": 0,
            "isPrefix": true
        }));
    }

    #[test]
    fn test_accessors() {
        let spec = QuerySpec::PhrasePrefix {
            terms: vec!["fur".to_string(), "tr".to_string()],
            field: "title".to_string(),
        };
        assert_eq!(spec.field(), "title");
        assert_eq!(spec.terms(), vec!["fur", "tr"]);
        assert!(spec.last_term_is_prefix());

        let exact = QuerySpec::Term { term: "fur".to_string(), field: "title".to_string() };
        assert!(!exact.last_term_is_prefix());
    }
}
