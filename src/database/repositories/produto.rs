use async_trait::async_trait;
use sqlx::PgPool;

use super::ProdutoRepository;
use crate::database::StoreResult;
use crate::database::models::{NewProduto, Produto};

#[derive(Clone)]
pub struct PgProdutoRepository {
    pool: PgPool,
}

impl PgProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProdutoRepository for PgProdutoRepository {
    async fn list(&self) -> StoreResult<Vec<Produto>> {
        let produtos = sqlx::query_as::<_, Produto>(
            "SELECT id, nome, descricao, preco FROM produtos ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(produtos)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Produto>> {
        let produto = sqlx::query_as::<_, Produto>(
            "SELECT id, nome, descricao, preco FROM produtos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(produto)
    }

    async fn create(&self, produto: &NewProduto) -> StoreResult<Produto> {
        let created = sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos (nome, descricao, preco)
            VALUES ($1, $2, $3)
            RETURNING id, nome, descricao, preco
            "#,
        )
        .bind(&produto.nome)
        .bind(&produto.descricao)
        .bind(produto.preco)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, produto: &NewProduto) -> StoreResult<Option<Produto>> {
        let updated = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos
            SET nome = $1, descricao = $2, preco = $3
            WHERE id = $4
            RETURNING id, nome, descricao, preco
            "#,
        )
        .bind(&produto.nome)
        .bind(&produto.descricao)
        .bind(produto.preco)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
