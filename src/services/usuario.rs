use std::sync::Arc;

use crate::database::StoreError;
use crate::database::models::UserSummary;
use crate::database::repositories::CredentialStore;
use crate::error::AppError;
use crate::utils::hash_password_with_cost;

#[derive(Clone)]
pub struct UsuarioService {
    store: Arc<dyn CredentialStore>,
    password_cost: u32,
}

impl UsuarioService {
    pub fn new(store: Arc<dyn CredentialStore>, password_cost: u32) -> Self {
        Self {
            store,
            password_cost,
        }
    }

    pub async fn signup(&self, usuario: &str, senha: &str) -> Result<UserSummary, AppError> {
        let password = senha.to_owned();
        let cost = self.password_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_with_cost(&password, cost))
                .await
                .map_err(|e| AppError::Internal(format!("password hashing aborted: {e}")))?
                .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        match self.store.create_user(usuario, &password_hash).await {
            Ok(user) => Ok(user),
            Err(StoreError::Conflict(_)) => {
                tracing::info!(usuario, "signup rejected: duplicate user");
                Err(AppError::Conflict("usuario already exists".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, AppError> {
        Ok(self.store.list_users().await?)
    }
}
