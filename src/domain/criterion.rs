use chrono::NaiveDateTime;
use serde::Serialize;

/// One atomic (criterion, value) pair produced by extraction.
///
/// Both fields are trimmed and non-empty; the extractor rejects completions
/// violating this before the pair ever reaches callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedCriterion {
    pub criterion: String,
    pub value: String,
}

/// A stored analysis row: an extracted criterion together with the embedding
/// of its name and the provenance of the raw text it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedCriterion {
    pub id: i32,
    pub bank_id: i32,
    pub product_id: i32,
    pub criterion: String,
    pub embedding: Vec<f32>,
    pub source_url: String,
    pub value: String,
    pub captured_at: NaiveDateTime,
}

/// An analysis row that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewProcessedCriterion {
    pub bank_id: i32,
    pub product_id: i32,
    pub criterion: String,
    pub embedding: Vec<f32>,
    pub source_url: String,
    pub value: String,
    pub captured_at: NaiveDateTime,
}
