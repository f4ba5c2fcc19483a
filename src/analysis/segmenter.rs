//! Sentence and word segmentation for literary prose.
//!
//! Sentence splitting runs an ordered rule table: honorific abbreviations are
//! protected by swapping their full stop for a one-byte sentinel, the text is
//! split on terminal punctuation, and protected stops are restored. The
//! sentinel has the same byte width as `.`, so spans computed on the protected
//! text index the original text directly.
//!
//! Word splitting treats `_` as emphasis markup (dropped, never a separator)
//! and strips apostrophes used as quotation marks at either end of a word while
//! keeping contractions and possessives whole.

use std::ops::Range;
use std::sync::LazyLock;
use regex::Regex;

/// Stand-in for a protected full stop
pub const SENTINEL: char = '\u{1}';

/// Designated emphasis markup character
pub const EMPHASIS_MARK: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Protect,
    Split,
    Restore,
}

#[derive(Debug)]
pub struct SegmentationRule {
    pub name: &'static str,
    pub action: RuleAction,
    pub pattern: Regex,
    pub replacement: String,
}

/// Ordered protect/split/restore steps, compiled once per process
#[derive(Debug)]
pub struct SegmentationRules {
    rules: Vec<SegmentationRule>,
}

static RULES: LazyLock<SegmentationRules> = LazyLock::new(SegmentationRules::english);

impl SegmentationRules {
    pub fn english() -> Self {
        // Typed queries are often lowercase, so the guard ignores case
        let honorific = r"(?i:\b(rev|[dm]rs?))";
        let rules = vec![
            // "Mrs. B." protects both stops as one unit
            SegmentationRule {
                name: "honorific-initial",
                action: RuleAction::Protect,
                pattern: compile(&format!(r"{}\.(\s+[A-Z])\.", honorific)),
                replacement: format!("${{1}}{}${{2}}{}", SENTINEL, SENTINEL),
            },
            SegmentationRule {
                name: "honorific",
                action: RuleAction::Protect,
                pattern: compile(&format!(r"{}\.", honorific)),
                replacement: format!("${{1}}{}", SENTINEL),
            },
            SegmentationRule {
                name: "terminator",
                action: RuleAction::Split,
                pattern: compile(r#"[.?!][’”"]?"#),
                replacement: String::new(),
            },
            SegmentationRule {
                name: "restore",
                action: RuleAction::Restore,
                pattern: compile(&regex::escape(&SENTINEL.to_string())),
                replacement: ".".to_string(),
            },
        ];
        SegmentationRules { rules }
    }

    pub fn global() -> &'static SegmentationRules {
        &RULES
    }

    pub fn rules(&self) -> &[SegmentationRule] {
        &self.rules
    }

    fn by_action(&self, action: RuleAction) -> impl Iterator<Item = &SegmentationRule> {
        self.rules.iter().filter(move |rule| rule.action == action)
    }

    /// Apply every protect rule in order
    pub fn protect(&self, text: &str) -> String {
        self.by_action(RuleAction::Protect).fold(text.to_string(), |acc, rule| {
            rule.pattern.replace_all(&acc, rule.replacement.as_str()).into_owned()
        })
    }

    /// Byte ranges of the pieces between split-rule matches
    pub fn split(&self, text: &str) -> Vec<Range<usize>> {
        let mut pieces = vec![0..text.len()];
        for rule in self.by_action(RuleAction::Split) {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| {
                    let mut out = Vec::new();
                    let mut start = piece.start;
                    for m in rule.pattern.find_iter(&text[piece.clone()]) {
                        out.push(start..piece.start + m.start());
                        start = piece.start + m.end();
                    }
                    out.push(start..piece.end);
                    out
                })
                .collect();
        }
        pieces
    }

    pub fn restore(&self, text: &str) -> String {
        self.by_action(RuleAction::Restore).fold(text.to_string(), |acc, rule| {
            rule.pattern.replace_all(&acc, rule.replacement.as_str()).into_owned()
        })
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed literals above; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid segmentation rule {}: {}", pattern, e))
}

/// Split prose into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let rules = SegmentationRules::global();
    let normalized = text.replace("\r\n", "\n");
    let protected = rules.protect(&normalized);

    rules.split(&protected)
        .into_iter()
        .map(|range| rules.restore(&protected[range]).trim().to_string())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Byte ranges of the sentences in `text`, trimmed and non-empty, indexing
/// the original (unprotected) text.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let rules = SegmentationRules::global();
    let protected = rules.protect(text);
    debug_assert_eq!(protected.len(), text.len());

    rules.split(&protected)
        .into_iter()
        .filter_map(|range| trim_range(text, range))
        .collect()
}

fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let slice = &text[range.clone()];
    let leading = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        None
    } else {
        let start = range.start + leading;
        Some(start..start + trimmed.len())
    }
}

/// A word located in some text, with markup removed from `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub text: String,
    pub bytes: Range<usize>,
    pub chars: Range<usize>,
}

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(c, '“' | '”' | '"' | '‘' | ',' | ';' | ':' | '—' | '–' | '-' | '(' | ')')
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '’' | '\'')
}

/// Locate words in `text`. Offsets are relative to `text`.
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    let mut words = Vec::new();
    let mut run: Vec<(usize, usize, char)> = Vec::new(); // (byte, char index, char)

    for (char_idx, (byte_idx, c)) in text.char_indices().enumerate() {
        if is_separator(c) {
            flush_word(&mut run, &mut words);
        } else {
            run.push((byte_idx, char_idx, c));
        }
    }
    flush_word(&mut run, &mut words);
    words
}

fn flush_word(run: &mut Vec<(usize, usize, char)>, words: &mut Vec<WordSpan>) {
    // Quotation apostrophes and markup at the edges are not part of the word
    let is_edge = |c: char| is_apostrophe(c) || c == EMPHASIS_MARK;
    let start = run.iter().position(|&(_, _, c)| !is_edge(c));
    let end = run.iter().rposition(|&(_, _, c)| !is_edge(c));

    if let (Some(start), Some(end)) = (start, end) {
        let core = &run[start..=end];
        let text: String = core.iter()
            .map(|&(_, _, c)| c)
            .filter(|&c| c != EMPHASIS_MARK)
            .collect();
        let (first_byte, first_char, _) = core[0];
        let (last_byte, last_char, last) = core[core.len() - 1];
        words.push(WordSpan {
            text,
            bytes: first_byte..last_byte + last.len_utf8(),
            chars: first_char..last_char + 1,
        });
    }
    run.clear();
}

/// Split one sentence into word strings.
pub fn tokenize_sentence(sentence: &str) -> Vec<String> {
    word_spans(sentence).into_iter().map(|w| w.text).collect()
}
