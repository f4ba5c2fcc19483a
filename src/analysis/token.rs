use serde::{Serialize, Deserialize};

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,              // Normalized token text (markup removed)
    pub byte_offset_from: usize,   // Byte span in the original text
    pub byte_offset_to: usize,
    pub char_offset_from: usize,   // Char span in the original text
    pub char_offset_to: usize,
    pub position: u32,             // Word position (for phrase queries)
    pub position_length: u32,
}

impl Token {
    pub fn new(text: String, position: u32, bytes: (usize, usize), chars: (usize, usize)) -> Self {
        Token {
            text,
            byte_offset_from: bytes.0,
            byte_offset_to: bytes.1,
            char_offset_from: chars.0,
            char_offset_to: chars.1,
            position,
            position_length: 1,
        }
    }

    pub fn char_len(&self) -> usize {
        self.char_offset_to - self.char_offset_from
    }
}
