use diesel::prelude::*;

use crate::domain::criterion::{NewProcessedCriterion, ProcessedCriterion};
use crate::models::criterion::{
    NewProcessedCriterion as DbNewProcessedCriterion, ProcessedCriterion as DbProcessedCriterion,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CriterionReader, CriterionWriter, DieselRepository};

impl CriterionReader for DieselRepository {
    fn list_criteria_for_pair(
        &self,
        bank_id: i32,
        product_id: i32,
    ) -> RepositoryResult<Vec<ProcessedCriterion>> {
        use crate::schema::processed_criteria;

        let mut conn = self.conn()?;

        let rows = processed_criteria::table
            .filter(processed_criteria::bank_id.eq(bank_id))
            .filter(processed_criteria::product_id.eq(product_id))
            .order(processed_criteria::id.asc())
            .load::<DbProcessedCriterion>(&mut conn)?;

        rows.into_iter()
            .map(ProcessedCriterion::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::ValidationError)
    }
}

impl CriterionWriter for DieselRepository {
    fn create_criteria(&self, criteria: &[NewProcessedCriterion]) -> RepositoryResult<usize> {
        use crate::schema::processed_criteria;

        if criteria.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let db_rows: Vec<DbNewProcessedCriterion> =
            criteria.iter().cloned().map(Into::into).collect();

        // Append-only: duplicates of (bank_id, product_id, criterion) are
        // allowed and re-runs create new rows.
        let inserted = conn.transaction(|conn| {
            diesel::insert_into(processed_criteria::table)
                .values(&db_rows)
                .execute(conn)
        })?;

        Ok(inserted)
    }
}
