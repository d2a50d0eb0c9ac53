use std::sync::Arc;

use sqlx::PgPool;

use auth::{AuthGate, RevocationLedger, SessionService, TokenAuthority};
use cache::TtlCache;
use config::Config;
use database::repositories::{
    ClienteRepository, CredentialStore, PgClienteRepository, PgProdutoRepository,
    PgTokenBlacklist, PgUserRepository, ProdutoRepository,
};
use services::{ClienteService, UsuarioService};

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

/// The external stores the service runs against.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub ledger: Arc<dyn RevocationLedger>,
    pub clientes: Arc<dyn ClienteRepository>,
    pub produtos: Arc<dyn ProdutoRepository>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            credentials: Arc::new(PgUserRepository::new(pool.clone())),
            ledger: Arc::new(PgTokenBlacklist::new(pool.clone())),
            clientes: Arc::new(PgClienteRepository::new(pool.clone())),
            produtos: Arc::new(PgProdutoRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gate: AuthGate,
    pub sessions: SessionService,
    pub usuarios: UsuarioService,
    pub clientes: ClienteService,
    pub produtos: Arc<dyn ProdutoRepository>,
    pub ledger: Arc<dyn RevocationLedger>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        let authority = Arc::new(TokenAuthority::from_config(&config));
        let cache = Arc::new(TtlCache::new(config.cache_ttl()));

        Self {
            gate: AuthGate::new(Arc::clone(&authority), Arc::clone(&stores.ledger)),
            sessions: SessionService::new(
                Arc::clone(&stores.credentials),
                authority,
                Arc::clone(&stores.ledger),
                config.password_cost,
            ),
            usuarios: UsuarioService::new(stores.credentials, config.password_cost),
            clientes: ClienteService::new(stores.clientes, cache),
            produtos: stores.produtos,
            ledger: stores.ledger,
            config: Arc::new(config),
        }
    }
}
