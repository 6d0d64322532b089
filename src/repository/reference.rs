use diesel::prelude::*;

use crate::domain::bank::Bank;
use crate::domain::product::Product;
use crate::models::reference::{Bank as DbBank, Product as DbProduct};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ReferenceReader};

impl ReferenceReader for DieselRepository {
    fn list_banks(&self) -> RepositoryResult<Vec<Bank>> {
        use crate::schema::banks;

        let mut conn = self.conn()?;

        let rows = banks::table
            .order(banks::id.asc())
            .load::<DbBank>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let rows = products::table
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
