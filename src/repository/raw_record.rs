use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::raw_record::{NewRawRecord, RawRecord};
use crate::models::raw_record::{NewRawRecord as DbNewRawRecord, RawRecord as DbRawRecord};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, RawRecordFilter, RawRecordReader, RawRecordWriter};

/// Inclusive bounds of a UTC day at microsecond precision, matching the
/// resolution the ingestion side writes.
fn day_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap();
    (day.and_time(NaiveTime::MIN), day.and_time(end))
}

impl RawRecordReader for DieselRepository {
    fn list_raw_records(&self, filter: &RawRecordFilter) -> RepositoryResult<Vec<RawRecord>> {
        use crate::schema::raw_records;

        let mut conn = self.conn()?;

        let mut query = raw_records::table.into_boxed();

        if let Some(bank_id) = filter.bank_id {
            query = query.filter(raw_records::bank_id.eq(bank_id));
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(raw_records::product_id.eq(product_id));
        }
        if let Some(day) = filter.day {
            let (start, end) = day_window(day);
            query = query
                .filter(raw_records::captured_at.ge(start))
                .filter(raw_records::captured_at.le(end));
        }

        let rows = query
            .order((
                raw_records::bank_id.asc(),
                raw_records::product_id.asc(),
                raw_records::id.asc(),
            ))
            .load::<DbRawRecord>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl RawRecordWriter for DieselRepository {
    fn create_raw_records(&self, records: &[NewRawRecord]) -> RepositoryResult<usize> {
        use crate::schema::raw_records;

        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let db_records: Vec<DbNewRawRecord> =
            records.iter().cloned().map(Into::into).collect();

        let inserted = conn.transaction(|conn| {
            diesel::insert_into(raw_records::table)
                .values(&db_records)
                .execute(conn)
        })?;

        Ok(inserted)
    }
}
