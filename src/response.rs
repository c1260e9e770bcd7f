use chrono::NaiveDateTime;
use std::collections::HashMap;

/// A single answer cell as it came out of the export.
#[derive(Debug, Clone, PartialEq)]
pub enum RawAnswer {
    Number(f64),
    Text(String),
    Missing,
}

impl RawAnswer {
    /// Classifies a cell: blank is missing, anything `f64` accepts is a
    /// number, everything else is text.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return RawAnswer::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => RawAnswer::Number(n),
            Err(_) => RawAnswer::Text(trimmed.to_string()),
        }
    }
}

/// One survey submission.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Sequential, starting at 1, in input order.
    pub id: u32,
    pub group: Option<String>,
    pub submitted_at: Option<NaiveDateTime>,
    /// Keyed by metric name.
    pub answers: HashMap<String, RawAnswer>,
    /// In schema column order; blank cells are kept as empty strings.
    pub free_text: Vec<String>,
    /// Keyed by tally name; blank cells are omitted.
    pub tallies: HashMap<String, String>,
}

impl Response {
    pub fn new(id: u32) -> Self {
        Response {
            id,
            ..Default::default()
        }
    }

    pub fn answer(&self, metric: &str) -> &RawAnswer {
        static MISSING: RawAnswer = RawAnswer::Missing;
        self.answers.get(metric).unwrap_or(&MISSING)
    }

    /// All free-text answers joined with a single space.
    pub fn combined_text(&self) -> String {
        self.free_text.join(" ")
    }

    pub fn with_group(mut self, group: &str) -> Self {
        let group = group.trim();
        self.group = (!group.is_empty()).then(|| group.to_string());
        self
    }

    pub fn with_answer(mut self, metric: &str, answer: RawAnswer) -> Self {
        self.answers.insert(metric.to_string(), answer);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.free_text.push(text.to_string());
        self
    }
}
