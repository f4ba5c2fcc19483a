pub mod token;
pub mod segmenter;
pub mod tokenizer;
pub mod filter;
pub mod filters;
pub mod analyzer;
pub mod ngram;
