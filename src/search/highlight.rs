//! Highlighting of query matches in stored text.
//!
//! Matches are character spans. [`build_ranges`] turns a sorted,
//! non-overlapping list of them into ranges that cover the whole text exactly
//! once. Malformed spans are rejected rather than repaired, so a bad caller
//! never silently loses part of the text.
//!
//! Emphasis markup (`_word_`) is handled in a second pass over each range, so
//! emphasis and match styling compose.

use serde::Serialize;
use crate::analysis::segmenter::EMPHASIS_MARK;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{LiteraryTokenizer, Tokenizer};
use crate::core::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub char_offset_from: usize,
    pub char_offset_to: usize,
}

impl Match {
    pub fn new(char_offset_from: usize, char_offset_to: usize) -> Self {
        Match { char_offset_from, char_offset_to }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRange {
    pub char_offset_from: usize,
    pub char_offset_to: usize,
    pub is_match: bool,
}

impl HighlightRange {
    pub fn len(&self) -> usize {
        self.char_offset_to - self.char_offset_from
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ranges covering `[0, text_len)` with the matches marked.
///
/// Fails with `MalformedMatchSpan` when a match is empty, ends past
/// `text_len`, or starts before the previous one ended.
pub fn build_ranges(text_len: usize, matches: &[Match]) -> Result<Vec<HighlightRange>> {
    let mut ranges = Vec::with_capacity(matches.len() * 2 + 1);
    let mut covered = 0;

    for m in matches {
        if m.char_offset_from >= m.char_offset_to {
            return Err(Error::malformed_span(format!(
                "Empty match {}..{}", m.char_offset_from, m.char_offset_to
            )));
        }
        if m.char_offset_to > text_len {
            return Err(Error::malformed_span(format!(
                "Match {}..{} exceeds text length {}", m.char_offset_from, m.char_offset_to, text_len
            )));
        }
        if m.char_offset_from < covered {
            return Err(Error::malformed_span(format!(
                "Match {}..{} is unsorted or overlaps offset {}", m.char_offset_from, m.char_offset_to, covered
            )));
        }

        if m.char_offset_from > covered {
            ranges.push(HighlightRange {
                char_offset_from: covered,
                char_offset_to: m.char_offset_from,
                is_match: false,
            });
        }
        ranges.push(HighlightRange {
            char_offset_from: m.char_offset_from,
            char_offset_to: m.char_offset_to,
            is_match: true,
        });
        covered = m.char_offset_to;
    }

    if covered < text_len {
        ranges.push(HighlightRange {
            char_offset_from: covered,
            char_offset_to: text_len,
            is_match: false,
        });
    }

    Ok(ranges)
}

/// Greedy left-to-right scan for runs of text tokens equal to the query
/// words, compared lowercased. After a hit the scan resumes past the whole
/// run, so matches never overlap. With `last_is_prefix` the final query word
/// only needs to start the token.
pub fn find_matches(text_tokens: &[Token], query_words: &[String], last_is_prefix: bool) -> Vec<Match> {
    let query: Vec<String> = query_words.iter().map(|w| w.to_lowercase()).collect();
    let n = query.len();
    let mut matches = Vec::new();
    if n == 0 {
        return matches;
    }

    let mut i = 0;
    while i + n <= text_tokens.len() {
        let window = &text_tokens[i..i + n];
        let hit = window.iter().zip(&query).enumerate().all(|(k, (token, word))| {
            let text = token.text.to_lowercase();
            if last_is_prefix && k == n - 1 {
                text.starts_with(word.as_str())
            } else {
                text == *word
            }
        });

        if hit {
            matches.push(Match::new(window[0].char_offset_from, window[n - 1].char_offset_to));
            i += n;
        } else {
            i += 1;
        }
    }

    matches
}

/// Highlight the literal occurrences of `query` in `text`
pub fn highlight(text: &str, query: &str, last_is_prefix: bool) -> Result<Vec<HighlightRange>> {
    let words: Vec<String> = LiteraryTokenizer.tokenize(query).into_iter().map(|t| t.text).collect();
    highlight_terms(text, &words, last_is_prefix)
}

/// Same as [`highlight`] for a query that is already split into words
pub fn highlight_terms(text: &str, words: &[String], last_is_prefix: bool) -> Result<Vec<HighlightRange>> {
    let tokens = LiteraryTokenizer.tokenize(text);
    let matches = find_matches(&tokens, words, last_is_prefix);
    build_ranges(text.chars().count(), &matches)
}

/// Highlight precomputed match spans in `text`
pub fn highlight_matches(text: &str, matches: &[Match]) -> Result<Vec<HighlightRange>> {
    build_ranges(text.chars().count(), matches)
}

/// A piece of display text with markup removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub text: String,
    pub is_match: bool,
    pub emphasis: bool,
}

/// Split each range further at emphasis marks. The marks are dropped and
/// emphasis state carries over from one range to the next.
pub fn fragments(text: &str, ranges: &[HighlightRange]) -> Vec<Fragment> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut emphasis = false;

    for range in ranges {
        let mut current = String::new();
        let end = range.char_offset_to.min(chars.len());
        let start = range.char_offset_from.min(end);

        for &c in &chars[start..end] {
            if c == EMPHASIS_MARK {
                push_fragment(&mut out, &mut current, range.is_match, emphasis);
                emphasis = !emphasis;
            } else {
                current.push(c);
            }
        }
        push_fragment(&mut out, &mut current, range.is_match, emphasis);
    }

    out
}

fn push_fragment(out: &mut Vec<Fragment>, current: &mut String, is_match: bool, emphasis: bool) {
    if !current.is_empty() {
        out.push(Fragment {
            text: std::mem::take(current),
            is_match,
            emphasis,
        });
    }
}

pub fn render_html(fragments: &[Fragment]) -> String {
    let mut html = String::new();
    for fragment in fragments {
        let mut piece = escape_html(&fragment.text);
        if fragment.emphasis {
            piece = format!("<em>{}</em>", piece);
        }
        if fragment.is_match {
            piece = format!("<strong>{}</strong>", piece);
        }
        html.push_str(&piece);
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
