use std::collections::HashMap;
use std::sync::Arc;
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{LiteraryTokenizer, StandardTokenizer, Tokenizer};
use crate::core::error::{Error, ErrorKind, Result};

pub const LITERARY: &str = "literary";
pub const STANDARD: &str = "standard";

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Sentence-aware prose analyzer
    pub fn literary() -> Self {
        Analyzer::new(LITERARY.to_string(), Box::new(LiteraryTokenizer))
            .add_filter(Box::new(LowercaseFilter))
    }

    /// Unicode word analyzer for metadata fields
    pub fn standard() -> Self {
        Analyzer::new(STANDARD.to_string(), Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(LowercaseFilter))
    }
}

/// Named analyzers bound to an index when it is constructed. The set is
/// assembled with [`AnalyzerSetBuilder`] and never changes afterwards, so
/// index-build time and query time always see the same analysis.
#[derive(Clone)]
pub struct AnalyzerSet {
    analyzers: HashMap<String, Arc<Analyzer>>,
}

#[derive(Default)]
pub struct AnalyzerSetBuilder {
    analyzers: HashMap<String, Arc<Analyzer>>,
}

impl AnalyzerSetBuilder {
    pub fn register(mut self, name: &str, analyzer: Analyzer) -> Self {
        self.analyzers.insert(name.to_string(), Arc::new(analyzer));
        self
    }

    pub fn build(self) -> AnalyzerSet {
        AnalyzerSet { analyzers: self.analyzers }
    }
}

impl AnalyzerSet {
    pub fn builder() -> AnalyzerSetBuilder {
        AnalyzerSetBuilder::default()
    }

    pub fn with_defaults() -> Self {
        AnalyzerSet::builder()
            .register(STANDARD, Analyzer::standard())
            .register(LITERARY, Analyzer::literary())
            .build()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Analyzer>> {
        self.analyzers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.analyzers.contains_key(name)
    }

    pub fn analyze(&self, analyzer_name: &str, text: &str) -> Result<Vec<Token>> {
        self.get(analyzer_name)
            .map(|analyzer| analyzer.analyze(text))
            .ok_or_else(||
                Error {
                    kind: ErrorKind::InvalidState,
                    context: format!("Analyzer '{}' not registered", analyzer_name),
            })
    }
}

impl Default for AnalyzerSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}
