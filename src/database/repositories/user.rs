use async_trait::async_trait;
use sqlx::PgPool;

use super::CredentialStore;
use crate::database::StoreResult;
use crate::database::models::{User, UserSummary};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgUserRepository {
    async fn create_user(&self, usuario: &str, password_hash: &str) -> StoreResult<UserSummary> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            INSERT INTO usuarios (usuario, senha)
            VALUES ($1, $2)
            RETURNING id, usuario
            "#,
        )
        .bind(usuario)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(usuario = %user.usuario, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, usuario: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, usuario, senha, token
            FROM usuarios
            WHERE usuario = $1
            "#,
        )
        .bind(usuario)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_token(&self, usuario: &str, token: Option<&str>) -> StoreResult<()> {
        sqlx::query("UPDATE usuarios SET token = $1 WHERE usuario = $2")
            .bind(token)
            .bind(usuario)
            .execute(&self.pool)
            .await?;

        tracing::debug!(usuario, cleared = token.is_none(), "stored token updated");
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserSummary>> {
        let users =
            sqlx::query_as::<_, UserSummary>("SELECT id, usuario FROM usuarios ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(users)
    }
}
