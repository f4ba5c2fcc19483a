use serde::{Serialize, Deserialize};
use crate::analysis::analyzer::{LITERARY, STANDARD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
}

/// Field definition with analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub indexed: bool,
    pub stored: bool,
    pub analyzer: Option<String>,  // Analyzer name for indexed text fields
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Schema { fields: Vec::new() }
    }

    pub fn add_text_field(mut self, name: &str, analyzer: &str, stored: bool) -> Self {
        self.fields.push(FieldDefinition {
            name: name.to_string(),
            field_type: FieldType::Text,
            indexed: true,
            stored,
            analyzer: Some(analyzer.to_string()),
        });
        self
    }

    /// Text kept for display only, never searched
    pub fn add_stored_field(mut self, name: &str) -> Self {
        self.fields.push(FieldDefinition {
            name: name.to_string(),
            field_type: FieldType::Text,
            indexed: false,
            stored: true,
            analyzer: None,
        });
        self
    }

    pub fn add_number_field(mut self, name: &str, stored: bool) -> Self {
        self.fields.push(FieldDefinition {
            name: name.to_string(),
            field_type: FieldType::Number,
            indexed: false,
            stored,
            analyzer: None,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_stored(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.stored)
    }

    pub fn get_analyzer_for_field(&self, field_name: &str) -> Option<&String> {
        self.field(field_name)
            .filter(|f| f.indexed)
            .and_then(|f| f.analyzer.as_ref())
    }

    pub fn indexed_text_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.indexed && f.field_type == FieldType::Text)
    }

    /// Paragraph records: metadata plus positional prose text
    pub fn paragraphs(text_field: &str) -> Self {
        Schema::new()
            .add_number_field("_id", false)
            .add_text_field("title", STANDARD, true)
            .add_text_field("author", STANDARD, true)
            .add_stored_field("url")
            .add_number_field("year", true)
            .add_number_field("volume", true)
            .add_stored_field("chapter")
            .add_number_field("paragraph", true)
            .add_text_field(text_field, LITERARY, true)
    }

    /// One document per candidate phrase
    pub fn phrases(phrase_field: &str) -> Self {
        Schema::new()
            .add_text_field(phrase_field, LITERARY, true)
            .add_number_field("words", true)
            .add_number_field("count", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_schema() {
        let schema = Schema::paragraphs("text");
        assert_eq!(schema.get_analyzer_for_field("text").map(String::as_str), Some(LITERARY));
        assert_eq!(schema.get_analyzer_for_field("title").map(String::as_str), Some(STANDARD));
        assert!(schema.get_analyzer_for_field("url").is_none());
        assert!(schema.is_stored("url"));
        assert!(!schema.is_stored("_id"));
        assert!(!schema.is_stored("raw"));

        let indexed: Vec<&str> = schema.indexed_text_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(indexed, vec!["title", "author", "text"]);
    }
}
