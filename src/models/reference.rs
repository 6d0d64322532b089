use diesel::prelude::*;

use crate::domain::bank::Bank as DomainBank;
use crate::domain::product::Product as DomainProduct;

#[derive(Debug, Queryable)]
pub struct Bank {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Queryable)]
pub struct Product {
    pub id: i32,
    pub name: String,
}

impl From<Bank> for DomainBank {
    fn from(bank: Bank) -> Self {
        Self {
            id: bank.id,
            name: bank.name,
        }
    }
}

impl From<Product> for DomainProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
        }
    }
}
