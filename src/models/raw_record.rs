use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::raw_record::{NewRawRecord as DomainNewRawRecord, RawRecord as DomainRawRecord};
use crate::schema::raw_records;

#[derive(Debug, Queryable)]
pub struct RawRecord {
    pub id: i32,
    pub bank_id: i32,
    pub product_id: i32,
    pub raw_text: String,
    pub source_url: String,
    pub captured_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = raw_records)]
pub struct NewRawRecord {
    pub bank_id: i32,
    pub product_id: i32,
    pub raw_text: String,
    pub source_url: String,
    pub captured_at: NaiveDateTime,
}

impl From<RawRecord> for DomainRawRecord {
    fn from(record: RawRecord) -> Self {
        Self {
            id: record.id,
            bank_id: record.bank_id,
            product_id: record.product_id,
            raw_text: record.raw_text,
            source_url: record.source_url,
            captured_at: record.captured_at,
        }
    }
}

impl From<DomainNewRawRecord> for NewRawRecord {
    fn from(record: DomainNewRawRecord) -> Self {
        Self {
            bank_id: record.bank_id,
            product_id: record.product_id,
            raw_text: record.raw_text,
            source_url: record.source_url,
            captured_at: record.captured_at,
        }
    }
}
