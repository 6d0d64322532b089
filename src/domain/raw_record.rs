use chrono::NaiveDateTime;
use serde::Serialize;

/// A row of the append-only raw buffer: unprocessed text captured for one
/// (bank, product) pair. Rows are never updated once written.
#[derive(Debug, Clone, Serialize)]
pub struct RawRecord {
    pub id: i32,
    pub bank_id: i32,
    pub product_id: i32,
    pub raw_text: String,
    pub source_url: String,
    pub captured_at: NaiveDateTime,
}

/// A raw buffer row that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewRawRecord {
    pub bank_id: i32,
    pub product_id: i32,
    pub raw_text: String,
    pub source_url: String,
    pub captured_at: NaiveDateTime,
}
