use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::raw_record::NewRawRecord;

/// Longest source URL accepted into the raw buffer.
pub const MAX_SOURCE_URL_LEN: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("bank_id must be positive, got {0}")]
    InvalidBankId(i32),
    #[error("product_id must be positive, got {0}")]
    InvalidProductId(i32),
    #[error("capture must contain at least one item")]
    NoItems,
    #[error("item {index}: source must be an http(s) URL")]
    InvalidSource { index: usize },
    #[error("item {index}: source URL is too long")]
    SourceTooLong { index: usize },
}

/// One captured source: where the text came from and the text itself.
#[derive(Debug, Clone)]
pub struct SearchCaptureItem {
    pub source_url: String,
    pub content: String,
}

/// A validated web-search payload for one (bank, product) pair.
///
/// This is the only way collaborators feed the raw buffer: construction
/// checks ids and sources, and a valid capture converts into one
/// [`NewRawRecord`] per item.
#[derive(Debug, Clone)]
pub struct SearchCapture {
    bank_id: i32,
    product_id: i32,
    items: Vec<SearchCaptureItem>,
    captured_at: NaiveDateTime,
}

impl SearchCapture {
    pub fn new(
        bank_id: i32,
        product_id: i32,
        items: Vec<SearchCaptureItem>,
        captured_at: NaiveDateTime,
    ) -> Result<Self, CaptureError> {
        if bank_id <= 0 {
            return Err(CaptureError::InvalidBankId(bank_id));
        }
        if product_id <= 0 {
            return Err(CaptureError::InvalidProductId(product_id));
        }
        if items.is_empty() {
            return Err(CaptureError::NoItems);
        }
        for (index, item) in items.iter().enumerate() {
            let source = item.source_url.trim();
            if !source.starts_with("http://") && !source.starts_with("https://") {
                return Err(CaptureError::InvalidSource { index });
            }
            if source.len() > MAX_SOURCE_URL_LEN {
                return Err(CaptureError::SourceTooLong { index });
            }
        }

        Ok(Self {
            bank_id,
            product_id,
            items,
            captured_at,
        })
    }

    pub fn bank_id(&self) -> i32 {
        self.bank_id
    }

    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    pub fn items(&self) -> &[SearchCaptureItem] {
        &self.items
    }

    pub fn captured_at(&self) -> NaiveDateTime {
        self.captured_at
    }

    /// Converts the capture into raw buffer rows, one per captured source.
    pub fn into_raw_records(self) -> Vec<NewRawRecord> {
        let Self {
            bank_id,
            product_id,
            items,
            captured_at,
        } = self;

        items
            .into_iter()
            .map(|item| NewRawRecord {
                bank_id,
                product_id,
                raw_text: item.content,
                source_url: item.source_url.trim().to_string(),
                captured_at,
            })
            .collect()
    }
}
