use serde::Deserialize;
use serde_json::Value;

use crate::database::models::NewCliente;
use crate::error::AppError;
use crate::routes::validation::{is_email, numeric, required_text};

#[derive(Debug, Default, Deserialize)]
pub struct ClienteRequest {
    pub nome: Option<String>,
    pub sobrenome: Option<String>,
    pub email: Option<String>,
    pub idade: Option<Value>,
}

impl ClienteRequest {
    pub fn validate(self) -> Result<NewCliente, AppError> {
        let mut errors = Vec::new();

        let nome = required_text(self.nome, "nome is required", &mut errors);
        let sobrenome = required_text(self.sobrenome, "sobrenome is required", &mut errors);
        let email = required_text(self.email, "email is required", &mut errors);
        if email.as_deref().is_some_and(|e| !is_email(e)) {
            errors.push("email is invalid".into());
        }

        let idade = match self.idade.as_ref().filter(|v| !v.is_null()) {
            None => {
                errors.push("idade is required".into());
                None
            }
            Some(value) => match numeric(value) {
                Some(n) if n >= 0.0 && n <= f64::from(i32::MAX) => Some(n.trunc() as i32),
                _ => {
                    errors.push("idade must be a positive number".into());
                    None
                }
            },
        };

        match (nome, sobrenome, email, idade) {
            (Some(nome), Some(sobrenome), Some(email), Some(idade)) if errors.is_empty() => {
                Ok(NewCliente {
                    nome,
                    sobrenome,
                    email,
                    idade,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}
