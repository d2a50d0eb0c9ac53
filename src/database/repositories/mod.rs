use async_trait::async_trait;

use super::StoreResult;
use super::models::{Cliente, NewCliente, NewProduto, Produto, User, UserSummary};

mod cliente;
mod produto;
mod token_blacklist;
mod user;

pub use cliente::PgClienteRepository;
pub use produto::PgProdutoRepository;
pub use token_blacklist::PgTokenBlacklist;
pub use user::PgUserRepository;

/// User records plus the per-user pointer to the last issued token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create_user(&self, usuario: &str, password_hash: &str) -> StoreResult<UserSummary>;
    async fn find_by_username(&self, usuario: &str) -> StoreResult<Option<User>>;
    /// Overwrites the stored token, `None` clears it.
    async fn set_token(&self, usuario: &str, token: Option<&str>) -> StoreResult<()>;
    async fn list_users(&self) -> StoreResult<Vec<UserSummary>>;
}

#[async_trait]
pub trait ClienteRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Cliente>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cliente>>;
    async fn create(&self, cliente: &NewCliente) -> StoreResult<Cliente>;
    async fn update(&self, id: i64, cliente: &NewCliente) -> StoreResult<Option<Cliente>>;
    /// Returns `false` when no row had that id.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ProdutoRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Produto>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Produto>>;
    async fn create(&self, produto: &NewProduto) -> StoreResult<Produto>;
    async fn update(&self, id: i64, produto: &NewProduto) -> StoreResult<Option<Produto>>;
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}
