use serde::Serialize;
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::SearchHit;
use crate::search::highlight::{fragments, render_html, HighlightRange};

const ELLIPSIS: &str = "...";

/// Flat record for one hit, as the client displays it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub icon: String,
    pub title: String,
    pub author: Option<String>,
    pub text: String,
    pub clip: String,
    pub volume: Option<String>,
    pub chapter: Option<String>,
    pub paragraph: Option<String>,
    pub year: Option<String>,
    pub url: Option<String>,
    pub score: f32,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<HighlightRange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl DisplayRecord {
    /// Flatten the array-valued stored fields of a hit, keeping the first
    /// value of each.
    pub fn from_hit(hit: &SearchHit, text_field: &str, clip_length: usize, query: &str) -> Result<Self> {
        let stored = hit.stored.as_object().ok_or_else(|| Error::new(
            ErrorKind::Parse,
            format!("Stored fields of document {} are not an object", hit.doc_id.0),
        ))?;
        let first = |name: &str| stored.get(name).and_then(first_value);

        let title = first("title").unwrap_or_default();
        let text = first(text_field).unwrap_or_default();

        Ok(DisplayRecord {
            icon: icon_name(&title),
            clip: clip(&text, clip_length),
            author: first("author"),
            volume: first("volume"),
            chapter: first("chapter"),
            paragraph: first("paragraph"),
            year: first("year"),
            url: first("url"),
            score: hit.score,
            query: query.to_string(),
            matches: None,
            html: None,
            title,
            text,
        })
    }

    /// Attach highlight ranges of `text` and their rendered markup
    pub fn with_matches(mut self, ranges: Vec<HighlightRange>) -> Self {
        self.html = Some(render_html(&fragments(&self.text, &ranges)));
        self.matches = Some(ranges);
        self
    }

    /// "Vol. 2, Ch. 5"; the volume part is left out when there is none, and
    /// a chapter that does not start with a number is shown as is.
    pub fn citation(&self) -> String {
        let volume = self.volume.as_ref()
            .map(|v| format!("Vol. {}, ", v))
            .unwrap_or_default();
        let chapter = self.chapter.as_deref().unwrap_or_default();
        format!("{}{}", volume, chapter_name(chapter))
    }
}

fn first_value(value: &Value) -> Option<String> {
    let value = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

/// Cover image name: "Pride and Prejudice" -> "pride-and-prejudice.jpg"
pub fn icon_name(title: &str) -> String {
    format!("{}.jpg", title.replace(' ', "-").to_lowercase())
}

/// Excerpt of at most `max_len` graphemes, ellipsis included
pub fn clip(text: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    format!("{}{}", graphemes[..keep].concat(), ELLIPSIS)
}

fn chapter_name(chapter: &str) -> String {
    let digits: String = chapter.trim_start().chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(n) => format!("Ch. {}", n),
        Err(_) => chapter.to_string(),
    }
}
