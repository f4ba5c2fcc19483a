use tracing::debug;
use crate::analysis::segmenter::EMPHASIS_MARK;
use crate::analysis::token::Token;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::index::{SearchIndex, SearchOptions};
use crate::query::ast::QuerySpec;

/// Keep what the user typed and take the rest from the candidate.
///
/// The longest case-insensitive common prefix (in chars) comes from `typed`,
/// the remainder from `candidate`.
pub fn restore_case(candidate: &str, typed: &str) -> String {
    let common = candidate.chars()
        .zip(typed.chars())
        .take_while(|(c, t)| c.to_lowercase().eq(t.to_lowercase()))
        .count();

    typed.chars().take(common)
        .chain(candidate.chars().skip(common))
        .collect()
}

/// Items whose key starts with `query` first, each group sorted by key
pub fn rank_prefix_first_by<T, F>(query: &str, items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut keyed: Vec<(String, T)> = items.into_iter().map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| {
        let a_prefix = a.0.starts_with(query);
        let b_prefix = b.0.starts_with(query);
        b_prefix.cmp(&a_prefix).then_with(|| a.0.cmp(&b.0))
    });
    keyed.into_iter().map(|(_, item)| item).collect()
}

pub fn rank_prefix_first(query: &str, candidates: Vec<String>) -> Vec<String> {
    rank_prefix_first_by(query, candidates, String::clone)
}

/// Completes the last word of a partially typed phrase
#[derive(Debug, Clone)]
pub struct Completer {
    /// Field whose term dictionary supplies last-word candidates
    pub field: String,
    pub phrase_field: String,
    /// Longest phrase stored in the phrase index
    pub phrase_window: usize,
    pub limit: usize,
}

impl Completer {
    pub fn from_config(config: &Config) -> Self {
        Completer {
            field: config.text_field.clone(),
            phrase_field: config.phrase_field.clone(),
            phrase_window: config.ngram_max,
            limit: config.typeahead_limit,
        }
    }

    /// Ranked completions for `query`, each the confirmed words followed by
    /// one completed last word.
    pub fn complete(
        &self,
        terms: &dyn SearchIndex,
        phrases: &dyn SearchIndex,
        query: &str,
    ) -> Result<Vec<Vec<String>>> {
        // Same analyzer as the indexed text, but keep the words as typed
        let words: Vec<String> = terms.tokenize(&self.field, query)?
            .iter()
            .map(|token| typed_word(query, token))
            .collect();
        let Some((last, confirmed)) = words.split_last() else {
            return Ok(Vec::new());
        };

        let pattern = format!("^{}.*", regex::escape(&last.to_lowercase()));
        let candidates = terms.search_terms(&self.field, &pattern)?;

        // Candidates come in dictionary order, which is the ranked order of
        // the prefix group, so verification stops once the limit is reached
        let context = self.phrase_context(confirmed);
        let mut completions = Vec::new();
        for candidate in candidates {
            if completions.len() >= self.limit {
                break;
            }
            if !context.is_empty() && !self.is_known_phrase(phrases, &context, &candidate)? {
                continue;
            }

            let mut completion = confirmed.to_vec();
            completion.push(restore_case(&candidate, last));
            completions.push(completion);
        }

        debug!(query, completions = completions.len(), "Typeahead resolved");

        let typed = words.join(" ");
        Ok(rank_prefix_first_by(&typed, completions, |words| words.join(" ")))
    }

    /// The confirmed words that fit in one stored phrase next to the last word
    fn phrase_context(&self, confirmed: &[String]) -> Vec<String> {
        let keep = confirmed.len().min(self.phrase_window.saturating_sub(1));
        confirmed[confirmed.len() - keep..]
            .iter()
            .map(|w| w.to_lowercase())
            .collect()
    }

    fn is_known_phrase(&self, phrases: &dyn SearchIndex, context: &[String], candidate: &str) -> Result<bool> {
        let mut words = context.to_vec();
        words.push(candidate.to_string());
        let query = QuerySpec::phrase(&words, &self.phrase_field);
        Ok(!phrases.search(&query, &SearchOptions::top(1))?.is_empty())
    }
}

/// The word a token was analyzed from, markup removed
fn typed_word(query: &str, token: &Token) -> String {
    query.get(token.byte_offset_from..token.byte_offset_to)
        .map(|word| word.chars().filter(|&c| c != EMPHASIS_MARK).collect())
        .unwrap_or_else(|| token.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::AnalyzerSet;
    use crate::core::types::{DocId, Document};
    use crate::index::memory::{IndexSettings, MemoryIndex};
    use crate::schema::schema::Schema;

    fn index(schema: Schema, field: &str, texts: &[&str]) -> MemoryIndex {
        let index = MemoryIndex::new(IndexSettings::new(schema, AnalyzerSet::with_defaults()).unwrap());
        for (i, text) in texts.iter().enumerate() {
            let mut doc = Document::new(DocId(i as u64));
            doc.add_text(field, *text);
            index.add_document(doc).unwrap();
        }
        index.commit().unwrap();
        index
    }

    fn completer() -> Completer {
        Completer {
            field: "text".to_string(),
            phrase_field: "phrase".to_string(),
            phrase_window: 3,
            limit: 10,
        }
    }

    fn fixtures() -> (MemoryIndex, MemoryIndex) {
        let text = index(Schema::paragraphs("text"), "text", &[
            "Dear Emma, said Mr. Knightley.",
            "The emerald was Emily's.",
        ]);
        let phrases = index(Schema::phrases("phrase"), "phrase", &[
            "dear emma", "said mr.", "the emerald",
        ]);
        (text, phrases)
    }

    #[test]
    fn test_restore_case() {
        assert_eq!(restore_case("emma", "Em"), "Emma");
        assert_eq!(restore_case("Knightley", "kn"), "knightley");
        assert_eq!(restore_case("emma", ""), "emma");
        assert_eq!(restore_case("emma", "EMX"), "EMma");
        assert_eq!(restore_case("élan", "É"), "Élan");
    }

    #[test]
    fn test_rank_prefix_first() {
        let ranked = rank_prefix_first("wo", vec!["world".into(), "apple".into(), "woman".into()]);
        assert_eq!(ranked, vec!["woman", "world", "apple"]);
    }

    #[test]
    fn test_single_word_completions() {
        let (text, phrases) = fixtures();
        let items = completer().complete(&text, &phrases, "Em").unwrap();
        assert_eq!(items, vec![vec!["Emerald"], vec!["Emily's"], vec!["Emma"]]);
    }

    #[test]
    fn test_confirmed_words_filter_by_phrase() {
        let (text, phrases) = fixtures();
        let items = completer().complete(&text, &phrases, "dear em").unwrap();
        assert_eq!(items, vec![vec!["dear", "emma"]]);
    }

    #[test]
    fn test_phrase_check_sees_every_candidate() {
        let mut filler: Vec<String> = (0..70).map(|i| format!("aa{:03}", i)).collect();
        filler.push("sky".to_string());
        let filler = filler.join(" ");
        let text = index(Schema::paragraphs("text"), "text", &[&filler, "Dear azure sky."]);
        let phrases = index(Schema::phrases("phrase"), "phrase", &["dear azure", "azure sky"]);

        let items = completer().complete(&text, &phrases, "dear a").unwrap();
        assert_eq!(items, vec![vec!["dear", "azure"]]);
    }

    #[test]
    fn test_punctuated_query_keeps_typed_words() {
        let (text, phrases) = fixtures();
        let items = completer().complete(&text, &phrases, "_Dear_, Em").unwrap();
        assert_eq!(items, vec![vec!["Dear", "Emma"]]);

        // A trailing full stop ends the sentence, not the word
        let items = completer().complete(&text, &phrases, "Emm.").unwrap();
        assert_eq!(items, vec![vec!["Emma"]]);
    }

    #[test]
    fn test_ranked_by_normalized_words() {
        let ranked = rank_prefix_first_by(
            "dear em",
            vec![vec!["apple".to_string()], vec!["dear".to_string(), "emma".to_string()]],
            |words| words.join(" "),
        );
        assert_eq!(ranked[0], vec!["dear", "emma"]);
    }

    #[test]
    fn test_empty_query() {
        let (text, phrases) = fixtures();
        assert!(completer().complete(&text, &phrases, "  ").unwrap().is_empty());
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let (text, phrases) = fixtures();
        assert!(completer().complete(&text, &phrases, "mr.*").unwrap().is_empty());
        assert_eq!(completer().complete(&text, &phrases, "Mr.").unwrap(), vec![vec!["Mr."]]);
    }

    #[test]
    fn test_limit() {
        let (text, phrases) = fixtures();
        let limited = Completer { limit: 1, ..completer() };
        assert_eq!(limited.complete(&text, &phrases, "e").unwrap().len(), 1);
    }
}
