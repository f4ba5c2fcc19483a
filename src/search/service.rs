use std::sync::Arc;
use std::time::Instant;
use serde::Serialize;
use tracing::{debug, info};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::{SearchHit, SearchIndex, SearchOptions};
use crate::query::ast::{QueryInput, QuerySpec};
use crate::query::builder::QueryBuilder;
use crate::query::cache::{CacheStats, CompletionCache};
use crate::query::parser::QueryParser;
use crate::search::highlight::highlight_terms;
use crate::search::results::DisplayRecord;
use crate::search::typeahead::Completer;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Milliseconds spent building and running the query
    pub time: f64,
    pub items: Vec<DisplayRecord>,
    pub query_tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeaheadResponse {
    pub time: f64,
    pub items: Vec<Vec<String>>,
}

/// Search and typeahead over a paragraph index and its phrase index.
/// Index calls are blocking and run on the blocking thread pool.
pub struct SearchService<I: SearchIndex + 'static> {
    paragraphs: Arc<I>,
    phrases: Arc<I>,
    parser: QueryParser,
    completer: Completer,
    cache: CompletionCache,
    config: Config,
}

impl<I: SearchIndex + 'static> SearchService<I> {
    pub fn new(paragraphs: Arc<I>, phrases: Arc<I>, config: Config) -> Self {
        let builder = QueryBuilder::new(&config.text_field)
            .with_max_distance(config.fuzzy_distance);

        SearchService {
            paragraphs,
            phrases,
            parser: QueryParser::new(builder),
            completer: Completer::from_config(&config),
            cache: CompletionCache::new(config.completion_cache_size),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn search(&self, input: impl Into<QueryInput>) -> Result<SearchResponse> {
        let start = Instant::now();
        let input = input.into();
        let query_text = match &input {
            QueryInput::RawQueryText(text) => text.clone(),
            QueryInput::CompiledQuery(spec) => spec.terms().join(" "),
        };

        let parser = self.parser.clone();
        let index = Arc::clone(&self.paragraphs);
        let options = SearchOptions::top(self.config.search_top);
        let resolved = tokio::task::spawn_blocking(move || -> Result<Option<(QuerySpec, Vec<SearchHit>)>> {
            let Some(spec) = parser.resolve(&*index, input)? else {
                return Ok(None);
            };
            let hits = index.search(&spec, &options)?;
            Ok(Some((spec, hits)))
        })
            .await
            .map_err(join_error)??;

        let Some((spec, hits)) = resolved else {
            debug!(query = %query_text, "Empty query, index not searched");
            return Ok(SearchResponse { time: elapsed_ms(start), items: Vec::new(), query_tokens: Vec::new() });
        };

        let query_tokens: Vec<String> = spec.terms().into_iter().map(String::from).collect();
        let last_is_prefix = spec.last_term_is_prefix();

        let mut items = Vec::with_capacity(hits.len());
        for hit in &hits {
            let record = DisplayRecord::from_hit(hit, &self.config.text_field, self.config.clip_length, &query_text)?;
            let ranges = highlight_terms(&record.text, &query_tokens, last_is_prefix)?;
            items.push(record.with_matches(ranges));
        }

        let time = elapsed_ms(start);
        info!(query = %query_text, hits = items.len(), time, "Search served");
        Ok(SearchResponse { time, items, query_tokens })
    }

    pub async fn typeahead(&self, query: &str) -> Result<TypeaheadResponse> {
        let start = Instant::now();

        if let Some(items) = self.cache.get(query) {
            debug!(query, "Typeahead cache hit");
            return Ok(TypeaheadResponse { time: elapsed_ms(start), items });
        }

        let paragraphs = Arc::clone(&self.paragraphs);
        let phrases = Arc::clone(&self.phrases);
        let completer = self.completer.clone();
        let owned = query.to_string();
        let items = tokio::task::spawn_blocking(move || {
            completer.complete(&*paragraphs, &*phrases, &owned)
        })
            .await
            .map_err(join_error)??;

        self.cache.put(query.to_string(), items.clone());

        let time = elapsed_ms(start);
        info!(query, completions = items.len(), time, "Typeahead served");
        Ok(TypeaheadResponse { time, items })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn join_error(err: tokio::task::JoinError) -> Error {
    Error::new(ErrorKind::Internal, format!("Index task failed: {}", err))
}
