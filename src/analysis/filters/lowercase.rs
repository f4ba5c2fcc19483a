use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

/// Case normalization applied at index time and to query terms
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .map(|mut token| {
                token.text = token.text.to_lowercase();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_keeps_offsets() {
        let token = Token::new("Knightley".to_string(), 3, (10, 19), (10, 19));
        let filtered = LowercaseFilter.filter(vec![token]);
        assert_eq!(filtered[0].text, "knightley");
        assert_eq!(filtered[0].char_offset_from, 10);
        assert_eq!(filtered[0].position, 3);
    }
}
