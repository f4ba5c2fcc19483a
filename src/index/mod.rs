use serde::Serialize;
use crate::analysis::token::Token;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::query::ast::QuerySpec;

pub mod collector;
pub mod dictionary;
pub mod fuzzy;
pub mod inverted;
pub mod memory;
pub mod posting;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub top: usize,
    pub explain: bool,
}

impl SearchOptions {
    pub fn top(top: usize) -> Self {
        SearchOptions { top, explain: false }
    }

    pub fn with_explain(mut self) -> Self {
        self.explain = true;
        self
    }
}

/// One ranked hit. Every stored field comes back as a JSON array because
/// fields may repeat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub score: f32,
    pub doc_id: DocId,
    pub stored: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// What the search front end needs from an index
pub trait SearchIndex: Send + Sync {
    /// Tokens for `text` using the analyzer bound to `field`
    fn tokenize(&self, field: &str, text: &str) -> Result<Vec<Token>>;

    fn search(&self, query: &QuerySpec, options: &SearchOptions) -> Result<Vec<SearchHit>>;

    /// Dictionary terms of `field` matched by a regex pattern, sorted
    fn search_terms(&self, field: &str, pattern: &str) -> Result<Vec<String>>;
}
