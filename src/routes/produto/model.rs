use serde::Deserialize;
use serde_json::Value;

use crate::database::models::NewProduto;
use crate::error::AppError;
use crate::routes::validation::{numeric, required_text};

#[derive(Debug, Default, Deserialize)]
pub struct ProdutoRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Value>,
}

impl ProdutoRequest {
    pub fn validate(self) -> Result<NewProduto, AppError> {
        let mut errors = Vec::new();

        let nome = required_text(self.nome, "nome is required", &mut errors);
        let descricao = required_text(self.descricao, "descricao is required", &mut errors);

        let preco = match self.preco.as_ref().filter(|v| !v.is_null()) {
            None => {
                errors.push("preco is required".into());
                None
            }
            Some(value) => match numeric(value) {
                Some(p) if p > 0.0 => Some(p),
                _ => {
                    errors.push("preco must be a positive number".into());
                    None
                }
            },
        };

        match (nome, descricao, preco) {
            (Some(nome), Some(descricao), Some(preco)) if errors.is_empty() => Ok(NewProduto {
                nome,
                descricao,
                preco,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}
