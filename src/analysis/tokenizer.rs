use crate::analysis::segmenter::{sentence_spans, word_spans};
use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Sentence-aware tokenizer for prose: segments into sentences, then words,
/// with positions running continuously across sentence boundaries.
#[derive(Clone, Default)]
pub struct LiteraryTokenizer;

impl Tokenizer for LiteraryTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;
        // Char count up to `byte_cursor`, advanced incrementally
        let mut byte_cursor = 0usize;
        let mut char_cursor = 0usize;

        for span in sentence_spans(text) {
            char_cursor += text[byte_cursor..span.start].chars().count();
            byte_cursor = span.start;

            for word in word_spans(&text[span.clone()]) {
                tokens.push(Token::new(
                    word.text,
                    position,
                    (span.start + word.bytes.start, span.start + word.bytes.end),
                    (char_cursor + word.chars.start, char_cursor + word.chars.end),
                ));
                position += 1;
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "literary"
    }
}

/// Unicode word tokenizer for short metadata fields (titles, authors)
#[derive(Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;
        let mut byte_cursor = 0usize;
        let mut char_cursor = 0usize;

        for (offset, word) in text.unicode_word_indices() {
            char_cursor += text[byte_cursor..offset].chars().count();
            byte_cursor = offset;

            if word.len() <= self.max_token_length {
                let chars = word.chars().count();
                tokens.push(Token::new(
                    word.to_string(),
                    position,
                    (offset, offset + word.len()),
                    (char_cursor, char_cursor + chars),
                ));
                position += 1;
            }
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literary_offsets_cross_sentences() {
        let text = "Mrs. B. came. “Tis _so_!”";
        let tokens = LiteraryTokenizer.tokenize(text);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Mrs.", "B.", "came", "Tis", "so"]);

        for token in &tokens {
            assert!(token.char_offset_from < token.char_offset_to);
            let slice: String = text.chars()
                .skip(token.char_offset_from)
                .take(token.char_len())
                .filter(|&c| c != '_')
                .collect();
            assert_eq!(slice, token.text);
            assert_eq!(&text[token.byte_offset_from..token.byte_offset_to].replace('_', ""), &token.text);
        }
        let positions: Vec<u32> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_literary_offsets_are_monotonic() {
        let text = "It is a truth universally acknowledged. However little known—the feelings!";
        let tokens = LiteraryTokenizer.tokenize(text);
        for pair in tokens.windows(2) {
            assert!(pair[0].char_offset_to <= pair[1].char_offset_from);
            assert!(pair[0].byte_offset_to <= pair[1].byte_offset_from);
        }
    }

    #[test]
    fn test_standard_tokenizer() {
        let tokens = StandardTokenizer::default().tokenize("The Fur Trade: 1670 to 1870");
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["The", "Fur", "Trade", "1670", "to", "1870"]);
        assert_eq!(tokens[2].char_offset_from, 8);
        assert_eq!(tokens[2].char_offset_to, 13);
    }

    #[test]
    fn test_empty_input() {
        assert!(LiteraryTokenizer.tokenize("").is_empty());
        assert!(LiteraryTokenizer.tokenize(" — . ! ").is_empty());
    }
}
