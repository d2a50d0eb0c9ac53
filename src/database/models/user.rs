use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Identity;

/// Row of the `usuarios` table. `token` holds the most recently issued
/// token, overwritten on every login and cleared on logout.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub usuario: String,
    pub senha: String,
    pub token: Option<String>,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            usuario: self.usuario.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub usuario: String,
}
