use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use crate::core::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u64);

impl DocId {
    pub fn new(id: u64) -> Self {
        DocId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for DocId {
    fn from(id: u64) -> Self {
        DocId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Number(_) => None,
        }
    }

    fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            _ => None,
        }
    }
}

/// A document whose fields may repeat, so every field holds a list of values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub fields: BTreeMap<String, Vec<FieldValue>>,
}

impl Document {
    pub fn new(id: DocId) -> Self {
        Document {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn add_field(&mut self, name: &str, value: FieldValue) {
        self.fields.entry(name.to_string()).or_default().push(value);
    }

    pub fn add_text(&mut self, name: &str, text: impl Into<String>) {
        self.add_field(name, FieldValue::Text(text.into()));
    }

    pub fn get_field(&self, name: &str) -> Option<&[FieldValue]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Build a document from a flat JSON record. Arrays become repeated values,
    /// nulls and nested objects are skipped.
    pub fn from_json(id: DocId, record: &Value) -> Result<Self> {
        let object = record.as_object().ok_or_else(|| Error::new(
            ErrorKind::Parse,
            format!("Document {} is not a JSON object", id.0),
        ))?;

        let mut doc = Document::new(id);
        for (name, value) in object {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(v) = FieldValue::from_json(item) {
                            doc.add_field(name, v);
                        }
                    }
                }
                other => {
                    if let Some(v) = FieldValue::from_json(other) {
                        doc.add_field(name, v);
                    }
                }
            }
        }
        Ok(doc)
    }

    /// Stored-field view: every field rendered as a JSON array
    pub fn to_stored_json(&self, stored: impl Fn(&str) -> bool) -> Value {
        let mut object = Map::new();
        for (name, values) in &self.fields {
            if !stored(name) {
                continue;
            }
            let items = values.iter()
                .map(|v| match v {
                    FieldValue::Text(s) => Value::String(s.clone()),
                    FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                })
                .collect();
            object.insert(name.clone(), Value::Array(items));
        }
        Value::Object(object)
    }
}
