use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::core::error::Result;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub corpus_dir: PathBuf,
    pub bind_addr: String,

    pub text_field: String,                     // Paragraph text, stored + positional
    pub phrase_field: String,                   // Phrase index text field

    pub fuzzy_distance: u8,                     // Single-term edit distance; 0 = strict prefix
    pub search_top: usize,
    pub typeahead_limit: usize,

    pub clip_length: usize,                     // Excerpt length in graphemes, ellipsis included
    pub ngram_min: usize,
    pub ngram_max: usize,

    pub completion_cache_size: usize,
    pub workers: usize,                         // Corpus preparation threads
}

impl Default for Config {
    fn default() -> Self {
        Config {
            corpus_dir: PathBuf::from("./by-paragraph"),
            bind_addr: "127.0.0.1:5174".to_string(),

            text_field: "text".to_string(),
            phrase_field: "phrase".to_string(),

            fuzzy_distance: 0,
            search_top: 10,
            typeahead_limit: 10,

            clip_length: 80,
            ngram_min: 1,
            ngram_max: 3,

            completion_cache_size: 1024,
            workers: num_cpus::get(),
        }
    }
}

impl Config {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply the `PORT` environment override to `bind_addr`
    pub fn with_port_override(mut self, port: Option<String>) -> Self {
        if let Some(port) = port.filter(|p| p.parse::<u16>().is_ok()) {
            let host = self.bind_addr
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "127.0.0.1".to_string());
            self.bind_addr = format!("{}:{}", host, port);
        }
        self
    }
}
