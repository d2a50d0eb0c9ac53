use serde::Deserialize;

use crate::error::AppError;

const USUARIO_MIN: usize = 3;
const USUARIO_MAX: usize = 100;
const SENHA_MIN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct CreateUsuarioRequest {
    pub usuario: Option<String>,
    pub senha: Option<String>,
}

impl CreateUsuarioRequest {
    /// Returns the trimmed username and the password.
    pub fn validate(self) -> Result<(String, String), AppError> {
        let mut errors = Vec::new();

        let usuario = self.usuario.map(|u| u.trim().to_owned()).unwrap_or_default();
        let len = usuario.chars().count();
        if !(USUARIO_MIN..=USUARIO_MAX).contains(&len) {
            errors.push(format!(
                "usuario must be between {USUARIO_MIN} and {USUARIO_MAX} characters"
            ));
        }

        let senha = self.senha.unwrap_or_default();
        if senha.chars().count() < SENHA_MIN {
            errors.push(format!("senha must be at least {SENHA_MIN} characters"));
        }

        if errors.is_empty() {
            Ok((usuario, senha))
        } else {
            Err(AppError::Validation(errors))
        }
    }
}
