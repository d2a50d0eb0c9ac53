use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Cliente {
    pub id: i64,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub idade: i32,
}

/// Validated customer fields, used for both inserts and updates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCliente {
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub idade: i32,
}
