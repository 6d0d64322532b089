use serde::Serialize;

/// Reference entry for a bank product type, e.g. "вклад" or "ипотека".
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
}
