use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use regex::Regex;
use crate::core::error::Result;
use crate::index::fuzzy::FuzzyAutomaton;

/// FST-backed sorted vocabulary of one field, term -> document frequency
pub struct TermDictionary {
    fst: Map<Vec<u8>>,
}

impl Default for TermDictionary {
    fn default() -> Self {
        TermDictionary { fst: Map::default() }
    }
}

impl TermDictionary {
    /// Build from (term, doc_freq) pairs in any order
    pub fn build<I>(terms: I) -> Result<Self>
    where
        I: Iterator<Item = (String, u32)>,
    {
        let mut sorted_terms: Vec<(String, u32)> = terms.collect();

        // FST requires sorted, unique input
        sorted_terms.sort_by(|a, b| a.0.cmp(&b.0));
        sorted_terms.dedup_by(|a, b| a.0 == b.0);

        let mut builder = MapBuilder::memory();
        for (term, freq) in sorted_terms {
            builder.insert(term.as_bytes(), freq as u64)?;
        }

        Ok(TermDictionary { fst: builder.into_map() })
    }

    pub fn len(&self) -> usize {
        self.fst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// All terms starting with `prefix`, in sorted order
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let prefix_bytes = prefix.as_bytes();

        let mut stream = self.fst.range().ge(prefix_bytes).into_stream();

        while let Some((term_bytes, _freq)) = stream.next() {
            if !term_bytes.starts_with(prefix_bytes) {
                break;
            }

            if let Ok(term) = String::from_utf8(term_bytes.to_vec()) {
                results.push(term);
            }
        }

        results
    }

    /// Terms the pattern matches, in sorted order
    pub fn search_regex(&self, pattern: &Regex) -> Vec<String> {
        self.filter_terms(|term| pattern.is_match(term))
    }

    pub fn search_fuzzy(&self, automaton: &FuzzyAutomaton) -> Vec<String> {
        self.filter_terms(|term| automaton.matches(term))
    }

    fn filter_terms(&self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self.fst.stream();

        while let Some((term_bytes, _)) = stream.next() {
            if let Ok(term) = std::str::from_utf8(term_bytes) {
                if keep(term) {
                    results.push(term.to_string());
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> TermDictionary {
        let terms = ["woman", "world", "apple", "wood", "worldly", "apple"];
        TermDictionary::build(terms.iter().map(|t| (t.to_string(), 1))).unwrap()
    }

    #[test]
    fn test_build_dedups() {
        let dict = dictionary();
        assert_eq!(dict.len(), 5);
        assert_eq!(dict.search_prefix("apple"), vec!["apple"]);
    }

    #[test]
    fn test_prefix_search_is_sorted() {
        assert_eq!(dictionary().search_prefix("wor"), vec!["world", "worldly"]);
        assert!(dictionary().search_prefix("x").is_empty());
        assert_eq!(dictionary().search_prefix("").len(), 5);
    }

    #[test]
    fn test_regex_search() {
        let re = Regex::new("^wo.*").unwrap();
        assert_eq!(dictionary().search_regex(&re), vec!["woman", "wood", "world", "worldly"]);
    }

    #[test]
    fn test_fuzzy_search() {
        let exact = FuzzyAutomaton::new("wprld", 1, false);
        assert_eq!(dictionary().search_fuzzy(&exact), vec!["world"]);

        let prefix = FuzzyAutomaton::new("wprl", 1, true);
        assert_eq!(dictionary().search_fuzzy(&prefix), vec!["world", "worldly"]);
    }
}
