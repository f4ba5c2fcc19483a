use rayon::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};
use crate::analysis::analyzer::AnalyzerSet;
use crate::analysis::ngram::{PhraseDictionary, PhraseEntry};
use crate::analysis::segmenter::{split_sentences, tokenize_sentence};
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, FieldValue};
use crate::index::memory::{IndexSettings, MemoryIndex};
use crate::schema::schema::Schema;

/// Both indexes built from one corpus directory
pub struct PreparedCorpus {
    pub paragraphs: MemoryIndex,
    pub phrases: MemoryIndex,
    pub stats: CorpusStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    pub files: usize,
    pub paragraphs: usize,
    pub phrases: usize,
}

/// Offline corpus preparation: paragraphs are segmented into sentences and
/// n-grams on a dedicated thread pool. Paragraphs are independent, so the
/// order in which batches finish does not matter.
pub struct CorpusPreparer {
    pub workers: usize,
    pub batch_size: usize,
    pub progress: Arc<AtomicUsize>,
    text_field: String,
    phrase_field: String,
    ngram_min: usize,
    ngram_max: usize,
    analyzers: AnalyzerSet,
}

impl CorpusPreparer {
    pub fn from_config(config: &Config) -> Self {
        CorpusPreparer {
            workers: config.workers.max(1),
            batch_size: 256,
            progress: Arc::new(AtomicUsize::new(0)),
            text_field: config.text_field.clone(),
            phrase_field: config.phrase_field.clone(),
            ngram_min: config.ngram_min,
            ngram_max: config.ngram_max,
            analyzers: AnalyzerSet::with_defaults(),
        }
    }

    /// Paragraphs processed by the last `build_phrases` call so far
    pub fn get_progress(&self) -> usize {
        self.progress.load(Ordering::Relaxed)
    }

    /// Load, segment and index everything under `dir`
    pub fn prepare(&self, dir: &Path) -> Result<PreparedCorpus> {
        let files = corpus_files(dir)?;
        let mut records = Vec::new();
        for path in &files {
            let loaded = load_records(path)?;
            debug!(file = %path.display(), records = loaded.len(), "Loaded corpus file");
            records.extend(loaded);
        }

        let documents = records.iter()
            .enumerate()
            .map(|(i, record)| Document::from_json(DocId(i as u64), record))
            .collect::<Result<Vec<_>>>()?;

        let dictionary = self.build_phrases(&documents)?;
        let phrases = self.phrase_index(&dictionary)?;
        let stats = CorpusStats {
            files: files.len(),
            paragraphs: documents.len(),
            phrases: dictionary.len(),
        };
        let paragraphs = self.paragraph_index(documents)?;

        info!(files = stats.files, paragraphs = stats.paragraphs, phrases = stats.phrases, "Corpus prepared");
        Ok(PreparedCorpus { paragraphs, phrases, stats })
    }

    /// Distinct n-gram phrases over the sentences of every paragraph
    pub fn build_phrases(&self, documents: &[Document]) -> Result<PhraseDictionary> {
        self.progress.store(0, Ordering::Relaxed);
        let total = documents.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::new(ErrorKind::Internal, format!("Failed to start worker pool: {}", e)))?;

        let empty = || PhraseDictionary::new(self.ngram_min, self.ngram_max);
        let dictionary = pool.install(|| {
            documents
                .par_chunks(self.batch_size.max(1))
                .map(|batch| {
                    let mut dictionary = empty();
                    for doc in batch {
                        for text in field_texts(doc, &self.text_field) {
                            for sentence in split_sentences(text) {
                                dictionary.insert_sentence(&tokenize_sentence(&sentence));
                            }
                        }
                    }

                    let done = self.progress.fetch_add(batch.len(), Ordering::Relaxed) + batch.len();
                    debug!(done, total, "Phrase extraction progress");
                    dictionary
                })
                .reduce(empty, PhraseDictionary::merge)
        });

        Ok(dictionary)
    }

    pub fn paragraph_index(&self, documents: Vec<Document>) -> Result<MemoryIndex> {
        let settings = IndexSettings::new(Schema::paragraphs(&self.text_field), self.analyzers.clone())?;
        let index = MemoryIndex::new(settings);
        for doc in documents {
            index.add_document(doc)?;
        }
        index.commit()?;
        Ok(index)
    }

    pub fn phrase_index(&self, dictionary: &PhraseDictionary) -> Result<MemoryIndex> {
        let settings = IndexSettings::new(Schema::phrases(&self.phrase_field), self.analyzers.clone())?;
        let index = MemoryIndex::new(settings);
        for (i, entry) in dictionary.iter().enumerate() {
            index.add_document(phrase_document(DocId(i as u64), entry, &self.phrase_field))?;
        }
        index.commit()?;
        Ok(index)
    }
}

pub fn phrase_document(id: DocId, entry: &PhraseEntry, field: &str) -> Document {
    let mut doc = Document::new(id);
    doc.add_text(field, entry.text.clone());
    doc.add_field("words", FieldValue::Number(entry.words as f64));
    doc.add_field("count", FieldValue::Number(entry.count as f64));
    doc
}

fn field_texts<'a>(doc: &'a Document, field: &str) -> impl Iterator<Item = &'a str> {
    doc.get_field(field)
        .unwrap_or_default()
        .iter()
        .filter_map(FieldValue::as_text)
}

/// `*.json` files directly under `dir`, sorted by name
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// One packed corpus file: a JSON array of paragraph records
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str(&raw)? {
        Value::Array(records) => Ok(records),
        _ => Err(Error::new(
            ErrorKind::Parse,
            format!("{} does not hold an array of records", path.display()),
        )),
    }
}
