use async_trait::async_trait;
use sqlx::PgPool;

use super::ClienteRepository;
use crate::database::StoreResult;
use crate::database::models::{Cliente, NewCliente};

#[derive(Clone)]
pub struct PgClienteRepository {
    pool: PgPool,
}

impl PgClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClienteRepository for PgClienteRepository {
    async fn list(&self) -> StoreResult<Vec<Cliente>> {
        let clientes = sqlx::query_as::<_, Cliente>(
            "SELECT id, nome, sobrenome, email, idade FROM clientes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clientes)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cliente>> {
        let cliente = sqlx::query_as::<_, Cliente>(
            "SELECT id, nome, sobrenome, email, idade FROM clientes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cliente)
    }

    async fn create(&self, cliente: &NewCliente) -> StoreResult<Cliente> {
        let created = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nome, sobrenome, email, idade)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nome, sobrenome, email, idade
            "#,
        )
        .bind(&cliente.nome)
        .bind(&cliente.sobrenome)
        .bind(&cliente.email)
        .bind(cliente.idade)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, cliente: &NewCliente) -> StoreResult<Option<Cliente>> {
        let updated = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes
            SET nome = $1, sobrenome = $2, email = $3, idade = $4
            WHERE id = $5
            RETURNING id, nome, sobrenome, email, idade
            "#,
        )
        .bind(&cliente.nome)
        .bind(&cliente.sobrenome)
        .bind(&cliente.email)
        .bind(cliente.idade)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
