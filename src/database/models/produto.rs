use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    pub descricao: String,
    pub preco: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduto {
    pub nome: String,
    pub descricao: String,
    pub preco: f64,
}
