use std::collections::{BTreeMap, HashMap};
use parking_lot::RwLock;
use regex::Regex;
use tracing::{debug, info};
use crate::analysis::analyzer::AnalyzerSet;
use crate::analysis::token::Token;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document};
use crate::index::collector::{ScoredDoc, TopKCollector};
use crate::index::fuzzy::FuzzyAutomaton;
use crate::index::inverted::InvertedIndex;
use crate::index::{SearchHit, SearchIndex, SearchOptions};
use crate::query::ast::QuerySpec;
use crate::schema::schema::Schema;

/// Positions skipped between repeated values of one field, so a phrase never
/// spans two values
const VALUE_POSITION_GAP: u32 = 1;

/// Everything an index is constructed with. Analyzers are resolved by the
/// names the schema gives and cannot change once the index exists.
#[derive(Clone)]
pub struct IndexSettings {
    pub schema: Schema,
    pub analyzers: AnalyzerSet,
}

impl IndexSettings {
    pub fn new(schema: Schema, analyzers: AnalyzerSet) -> Result<Self> {
        for field in schema.indexed_text_fields() {
            let name = field.analyzer.as_deref().unwrap_or_default();
            if !analyzers.contains(name) {
                return Err(Error::new(
                    ErrorKind::InvalidState,
                    format!("Field '{}' uses unregistered analyzer '{}'", field.name, name),
                ));
            }
        }
        Ok(IndexSettings { schema, analyzers })
    }
}

struct IndexState {
    documents: BTreeMap<DocId, Document>,
    pending: Vec<Document>,
    fields: HashMap<String, InvertedIndex>,
    committed: bool,
}

/// Terms a query expanded to and the per-document frequencies they produced
struct Execution {
    terms: Vec<String>,
    frequencies: BTreeMap<DocId, u32>,
}

/// In-process search index: documents are buffered by `add_document` and
/// become searchable at `commit`.
pub struct MemoryIndex {
    settings: IndexSettings,
    state: RwLock<IndexState>,
}

impl MemoryIndex {
    pub fn new(settings: IndexSettings) -> Self {
        let fields = settings.schema.indexed_text_fields()
            .map(|f| (f.name.clone(), InvertedIndex::new()))
            .collect();

        MemoryIndex {
            settings,
            state: RwLock::new(IndexState {
                documents: BTreeMap::new(),
                pending: Vec::new(),
                fields,
                committed: false,
            }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.settings.schema
    }

    pub fn add_document(&self, doc: Document) -> Result<()> {
        let mut state = self.state.write();
        let duplicate = state.documents.contains_key(&doc.id)
            || state.pending.iter().any(|p| p.id == doc.id);
        if duplicate {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Document {} already added", doc.id.0),
            ));
        }
        state.pending.push(doc);
        Ok(())
    }

    /// Index every pending document and rebuild the term dictionaries.
    /// Returns the number of documents indexed.
    pub fn commit(&self) -> Result<usize> {
        let mut state = self.state.write();

        // Analyze before touching the index so a failure leaves it unchanged
        let analyzed = state.pending.iter()
            .map(|doc| {
                self.settings.schema.indexed_text_fields()
                    .map(|field| Ok((field.name.clone(), self.field_tokens(doc, &field.name)?)))
                    .collect::<Result<Vec<(String, Vec<Token>)>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let pending = std::mem::take(&mut state.pending);
        let added = pending.len();

        for (doc, fields) in pending.into_iter().zip(analyzed) {
            for (name, tokens) in fields {
                if let Some(index) = state.fields.get_mut(&name) {
                    index.add_document(doc.id, &tokens);
                }
            }
            state.documents.insert(doc.id, doc);
        }

        for index in state.fields.values_mut() {
            index.build_dictionary()?;
        }
        state.committed = true;

        info!(added, documents = state.documents.len(), "Index committed");
        Ok(added)
    }

    pub fn num_docs(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn document(&self, doc_id: DocId) -> Option<Document> {
        self.state.read().documents.get(&doc_id).cloned()
    }

    fn analyzer_name(&self, field: &str) -> Result<&str> {
        self.settings.schema
            .get_analyzer_for_field(field)
            .map(String::as_str)
            .ok_or_else(|| Error::unknown_field(field))
    }

    /// Tokens of every value of one field, repeated values kept apart
    fn field_tokens(&self, doc: &Document, field: &str) -> Result<Vec<Token>> {
        let analyzer = self.analyzer_name(field)?;
        let mut tokens = Vec::new();
        let mut offset = 0u32;

        for value in doc.get_field(field).unwrap_or_default() {
            let Some(text) = value.as_text() else { continue };
            let analyzed = self.settings.analyzers.analyze(analyzer, text)?;
            let next = analyzed.last().map(|t| t.position + 1 + VALUE_POSITION_GAP);

            tokens.extend(analyzed.into_iter().map(|mut token| {
                token.position += offset;
                token
            }));
            if let Some(next) = next {
                offset += next;
            }
        }

        Ok(tokens)
    }

    fn execute(index: &InvertedIndex, query: &QuerySpec) -> Execution {
        match query {
            QuerySpec::FuzzyPrefixTerm { term, max_distance, is_prefix, .. } => {
                let terms = if *max_distance == 0 && *is_prefix {
                    index.prefix_terms(term)
                } else {
                    let automaton = FuzzyAutomaton::new(term, *max_distance, *is_prefix);
                    index.fuzzy_terms(&automaton)
                };
                let frequencies = index.union_frequencies(&terms);
                Execution { terms, frequencies }
            }
            QuerySpec::Term { term, .. } => {
                let terms = vec![term.clone()];
                let frequencies = index.union_frequencies(&terms);
                Execution { terms, frequencies }
            }
            QuerySpec::Phrase { terms, .. } => {
                let slots: Vec<Vec<String>> = terms.iter().map(|t| vec![t.clone()]).collect();
                Execution {
                    terms: terms.clone(),
                    frequencies: index.phrase_frequencies(&slots),
                }
            }
            QuerySpec::PhrasePrefix { terms, .. } => {
                let Some((last, leading)) = terms.split_last() else {
                    return Execution { terms: Vec::new(), frequencies: BTreeMap::new() };
                };

                let mut slots: Vec<Vec<String>> = leading.iter().map(|t| vec![t.clone()]).collect();
                let expanded = index.prefix_terms(last);
                let mut matched = leading.to_vec();
                matched.extend(expanded.iter().cloned());
                slots.push(expanded);

                Execution {
                    terms: matched,
                    frequencies: index.phrase_frequencies(&slots),
                }
            }
        }
    }
}

impl SearchIndex for MemoryIndex {
    fn tokenize(&self, field: &str, text: &str) -> Result<Vec<Token>> {
        let analyzer = self.analyzer_name(field)?;
        self.settings.analyzers.analyze(analyzer, text)
    }

    fn search(&self, query: &QuerySpec, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let state = self.state.read();
        if !state.committed {
            return Err(Error::index_unavailable("Index has not been committed"));
        }

        let field = query.field();
        let index = state.fields.get(field).ok_or_else(|| Error::unknown_field(field))?;

        let execution = Self::execute(index, query);
        debug!(field, terms = ?execution.terms, hits = execution.frequencies.len(), "Query executed");

        let mut collector = TopKCollector::new(options.top);
        for (&doc_id, &freq) in &execution.frequencies {
            collector.collect(ScoredDoc { doc_id, score: freq as f32 });
        }

        let schema = &self.settings.schema;
        let hits = collector.into_sorted()
            .into_iter()
            .filter_map(|scored| {
                let doc = state.documents.get(&scored.doc_id)?;
                let explanation = options.explain.then(|| format!(
                    "{} = sum of term frequencies of [{}] in field '{}'",
                    scored.score,
                    execution.terms.join(", "),
                    field,
                ));
                Some(SearchHit {
                    score: scored.score,
                    doc_id: scored.doc_id,
                    stored: doc.to_stored_json(|name| schema.is_stored(name)),
                    explanation,
                })
            })
            .collect();

        Ok(hits)
    }

    fn search_terms(&self, field: &str, pattern: &str) -> Result<Vec<String>> {
        let state = self.state.read();
        if !state.committed {
            return Err(Error::index_unavailable("Index has not been committed"));
        }

        let index = state.fields.get(field).ok_or_else(|| Error::unknown_field(field))?;
        let regex = Regex::new(pattern)?;
        Ok(index.regex_terms(&regex))
    }
}
