use std::collections::{BTreeMap, HashMap};
use regex::Regex;
use crate::analysis::token::Token;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::index::dictionary::TermDictionary;
use crate::index::fuzzy::FuzzyAutomaton;
use crate::index::posting::{Posting, PostingList};

/// Positional inverted index for a single field
#[derive(Default)]
pub struct InvertedIndex {
    pub dictionary: TermDictionary,
    pub postings: HashMap<String, PostingList>,
    pub doc_count: usize,
    pub total_tokens: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, doc_id: DocId, tokens: &[Token]) {
        let mut term_positions: HashMap<&str, Vec<u32>> = HashMap::new();

        // Group tokens by term
        for token in tokens {
            term_positions.entry(token.text.as_str())
                .or_default()
                .push(token.position);
        }

        for (term, positions) in term_positions {
            let posting = Posting {
                doc_id,
                term_freq: positions.len() as u32,
                positions,
            };

            self.postings.entry(term.to_string())
                .or_default()
                .add_posting(posting);
        }

        self.doc_count += 1;
        self.total_tokens += tokens.len();
    }

    /// Rebuild the sorted term dictionary from the current postings
    pub fn build_dictionary(&mut self) -> Result<()> {
        let terms = self.postings.iter()
            .map(|(term, list)| (term.clone(), list.doc_freq()));
        self.dictionary = TermDictionary::build(terms)?;
        Ok(())
    }

    pub fn search_term(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Every dictionary term starting with `prefix`. Expansion is not
    /// capped: a document matching the prefix must never be lost.
    pub fn prefix_terms(&self, prefix: &str) -> Vec<String> {
        self.dictionary.search_prefix(prefix)
    }

    pub fn fuzzy_terms(&self, automaton: &FuzzyAutomaton) -> Vec<String> {
        self.dictionary.search_fuzzy(automaton)
    }

    pub fn regex_terms(&self, pattern: &Regex) -> Vec<String> {
        self.dictionary.search_regex(pattern)
    }

    /// Per-document term frequency summed over several terms
    pub fn union_frequencies(&self, terms: &[String]) -> BTreeMap<DocId, u32> {
        let mut scores = BTreeMap::new();
        for term in terms {
            if let Some(list) = self.search_term(term) {
                for posting in &list.postings {
                    *scores.entry(posting.doc_id).or_insert(0) += posting.term_freq;
                }
            }
        }
        scores
    }

    /// Count phrase occurrences per document. Each slot lists the terms
    /// accepted at that phrase position; a slot with several terms is an
    /// expanded prefix or fuzzy term.
    pub fn phrase_frequencies(&self, slots: &[Vec<String>]) -> BTreeMap<DocId, u32> {
        let mut result = BTreeMap::new();
        if slots.is_empty() {
            return result;
        }

        // Documents containing at least one term of every slot
        let mut candidates: Option<Vec<DocId>> = None;
        for slot in slots {
            let docs: Vec<DocId> = self.union_frequencies(slot).into_keys().collect();
            candidates = Some(match candidates {
                None => docs,
                Some(previous) => intersect_sorted(&previous, &docs),
            });
        }

        for doc_id in candidates.unwrap_or_default() {
            let slot_positions: Vec<Vec<u32>> = slots.iter()
                .map(|slot| self.positions_in(doc_id, slot))
                .collect();
            let count = count_adjacent(&slot_positions);
            if count > 0 {
                result.insert(doc_id, count);
            }
        }

        result
    }

    fn positions_in(&self, doc_id: DocId, terms: &[String]) -> Vec<u32> {
        let mut positions: Vec<u32> = terms.iter()
            .filter_map(|term| self.search_term(term))
            .filter_map(|list| list.get(doc_id))
            .flat_map(|posting| posting.positions.iter().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }
}

fn intersect_sorted(left: &[DocId], right: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Equal => {
                result.push(left[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }

    result
}

/// Number of start positions p where slot i holds position p + i for every i
fn count_adjacent(slot_positions: &[Vec<u32>]) -> u32 {
    let Some((first, rest)) = slot_positions.split_first() else {
        return 0;
    };

    first.iter()
        .filter(|&&start| {
            rest.iter().enumerate().all(|(i, positions)| {
                positions.binary_search(&(start + i as u32 + 1)).is_ok()
            })
        })
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::Analyzer;

    fn index(docs: &[&str]) -> InvertedIndex {
        let analyzer = Analyzer::literary();
        let mut index = InvertedIndex::new();
        for (i, text) in docs.iter().enumerate() {
            index.add_document(DocId(i as u64), &analyzer.analyze(text));
        }
        index.build_dictionary().unwrap();
        index
    }

    fn slot(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_term_postings() {
        let index = index(&["the fur trade", "fur and fur"]);
        let list = index.search_term("fur").unwrap();
        assert_eq!(list.doc_freq(), 2);
        assert_eq!(list.get(DocId(1)).unwrap().positions, vec![0, 2]);
        assert_eq!(index.doc_count, 2);
        assert_eq!(index.total_tokens, 6);
    }

    #[test]
    fn test_phrase_requires_adjacency() {
        let index = index(&["the fur trade", "trade the fur", "fur. Trade"]);
        let hits = index.phrase_frequencies(&[slot(&["fur"]), slot(&["trade"])]);
        // Positions run across sentences, so doc 2 matches too
        assert_eq!(hits.keys().copied().collect::<Vec<_>>(), vec![DocId(0), DocId(2)]);
    }

    #[test]
    fn test_phrase_with_expanded_last_slot() {
        let index = index(&["the fur trade", "the fur trader", "the fur coat"]);
        let last = index.prefix_terms("tra");
        assert_eq!(last, vec!["trade", "trader"]);

        let hits = index.phrase_frequencies(&[slot(&["fur"]), last]);
        assert_eq!(hits.len(), 2);
        assert!(!hits.contains_key(&DocId(2)));
    }

    #[test]
    fn test_prefix_expansion_is_complete() {
        let mut words: Vec<String> = (0..70).map(|i| format!("aa{:03}", i)).collect();
        words.push("azure".to_string());
        let filler = words.join(" ");
        let index = index(&[&filler, "dear azure sky"]);

        let expanded = index.prefix_terms("a");
        assert_eq!(expanded.len(), 71);
        assert_eq!(expanded.last().map(String::as_str), Some("azure"));

        let hits = index.phrase_frequencies(&[slot(&["dear"]), expanded]);
        assert_eq!(hits.keys().copied().collect::<Vec<_>>(), vec![DocId(1)]);
    }

    #[test]
    fn test_repeated_phrase_counts() {
        let index = index(&["dear Emma, dear Emma"]);
        let hits = index.phrase_frequencies(&[slot(&["dear"]), slot(&["emma"])]);
        assert_eq!(hits.get(&DocId(0)), Some(&2));
    }

    #[test]
    fn test_union_frequencies() {
        let index = index(&["fur fur", "furs"]);
        let scores = index.union_frequencies(&slot(&["fur", "furs"]));
        assert_eq!(scores.get(&DocId(0)), Some(&2));
        assert_eq!(scores.get(&DocId(1)), Some(&1));
    }
}
