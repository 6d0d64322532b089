use serde::Serialize;

/// Reference entry for a bank. The worker never writes this table.
#[derive(Debug, Clone, Serialize)]
pub struct Bank {
    pub id: i32,
    pub name: String,
}
