use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::bank::Bank;
use crate::domain::criterion::{NewProcessedCriterion, ProcessedCriterion};
use crate::domain::product::Product;
use crate::domain::raw_record::{NewRawRecord, RawRecord};
use crate::repository::errors::RepositoryResult;

pub mod criterion;
pub mod errors;
pub mod raw_record;
pub mod reference;

/// Narrows which raw buffer rows a listing returns.
///
/// `day` selects the inclusive UTC window `[00:00:00, 23:59:59.999999]` of
/// that date.
#[derive(Debug, Clone, Default)]
pub struct RawRecordFilter {
    pub bank_id: Option<i32>,
    pub product_id: Option<i32>,
    pub day: Option<NaiveDate>,
}

pub trait RawRecordReader {
    fn list_raw_records(&self, filter: &RawRecordFilter) -> RepositoryResult<Vec<RawRecord>>;
}

pub trait RawRecordWriter {
    fn create_raw_records(&self, records: &[NewRawRecord]) -> RepositoryResult<usize>;
}

pub trait CriterionReader {
    fn list_criteria_for_pair(
        &self,
        bank_id: i32,
        product_id: i32,
    ) -> RepositoryResult<Vec<ProcessedCriterion>>;
}

pub trait CriterionWriter {
    fn create_criteria(&self, criteria: &[NewProcessedCriterion]) -> RepositoryResult<usize>;
}

pub trait ReferenceReader {
    fn list_banks(&self) -> RepositoryResult<Vec<Bank>>;
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
}

/// Diesel-backed implementation of every repository trait.
///
/// Holds an `r2d2` pool and acquires one connection per operation.
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}
