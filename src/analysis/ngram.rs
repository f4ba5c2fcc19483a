use std::collections::BTreeMap;

/// All contiguous windows of `min_length..=max_length` tokens, shortest
/// windows first, in text order. Duplicates are kept.
pub fn ngrams<T: Clone>(tokens: &[T], min_length: usize, max_length: usize) -> Vec<Vec<T>> {
    let mut result = Vec::new();

    for n in min_length.max(1)..=max_length {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            result.push(window.to_vec());
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseEntry {
    pub text: String,   // First spelling seen
    pub words: usize,
    pub count: u32,
}

/// Distinct candidate phrases keyed case-insensitively by their joined words
#[derive(Debug, Clone, Default)]
pub struct PhraseDictionary {
    pub min_length: usize,
    pub max_length: usize,
    phrases: BTreeMap<String, PhraseEntry>,
}

impl PhraseDictionary {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        PhraseDictionary {
            min_length,
            max_length,
            phrases: BTreeMap::new(),
        }
    }

    pub fn insert_sentence(&mut self, words: &[String]) {
        for gram in ngrams(words, self.min_length, self.max_length) {
            let text = gram.join(" ");
            self.phrases
                .entry(text.to_lowercase())
                .and_modify(|entry| entry.count += 1)
                .or_insert(PhraseEntry { text, words: gram.len(), count: 1 });
        }
    }

    pub fn merge(mut self, other: PhraseDictionary) -> Self {
        for (key, entry) in other.phrases {
            self.phrases
                .entry(key)
                .and_modify(|existing| existing.count += entry.count)
                .or_insert(entry);
        }
        self
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.contains_key(&phrase.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhraseEntry> {
        self.phrases.values()
    }
}
