use crate::core::error::Result;
use crate::index::SearchIndex;
use crate::query::ast::{QueryInput, QuerySpec};
use crate::query::builder::QueryBuilder;

/// Turns raw query text into a [`QuerySpec`]
/// Examples:
/// - "fur" -> fuzzy prefix term
/// - "fur tra" -> phrase prefix
/// - "\"fur trade\"" -> exact phrase
///
/// Query text goes through the analyzer the index uses for the target
/// field, so query terms and indexed terms agree.
#[derive(Debug, Clone)]
pub struct QueryParser {
    pub builder: QueryBuilder,
}

impl QueryParser {
    pub fn new(builder: QueryBuilder) -> Self {
        QueryParser { builder }
    }

    /// Analyzed terms of the query text, quotes removed
    pub fn tokenize(&self, index: &dyn SearchIndex, input: &str) -> Result<Vec<String>> {
        let input = input.trim();
        let text = strip_quotes(input).unwrap_or(input);
        let tokens = index.tokenize(&self.builder.field, text)?;
        Ok(tokens.into_iter().map(|t| t.text).collect())
    }

    pub fn parse(&self, index: &dyn SearchIndex, input: &str) -> Result<Option<QuerySpec>> {
        let terms = self.tokenize(index, input)?;

        // Quoted text is a complete phrase, no prefix relaxation
        if strip_quotes(input.trim()).is_some() {
            return Ok(self.builder.build_exact(&terms));
        }

        Ok(self.builder.build_prefix(&terms))
    }

    /// Resolve either input form into the query to run, if any
    pub fn resolve(&self, index: &dyn SearchIndex, input: QueryInput) -> Result<Option<QuerySpec>> {
        match input {
            QueryInput::RawQueryText(text) => self.parse(index, &text),
            QueryInput::CompiledQuery(spec) => Ok(Some(spec)),
        }
    }
}

fn strip_quotes(input: &str) -> Option<&str> {
    input.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| input.strip_prefix('“').and_then(|rest| rest.strip_suffix('”')))
}
