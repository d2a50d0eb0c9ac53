#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use clientes_api::{
    AppState, Stores,
    config::Config,
    database::memory::{
        MemoryClienteRepository, MemoryCredentialStore, MemoryProdutoRepository,
        MemoryRevocationLedger,
    },
    routes,
};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub credentials: Arc<MemoryCredentialStore>,
    pub ledger: Arc<MemoryRevocationLedger>,
    pub clientes: Arc<MemoryClienteRepository>,
    pub produtos: Arc<MemoryProdutoRepository>,
}

pub fn config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        database_max_connections: 1,
        jwt_secret: SECRET.into(),
        jwt_expiration_secs: 3600,
        password_cost: 4,
        cache_ttl_secs: 30,
        server_host: "127.0.0.1".into(),
        server_port: 0,
    }
}

pub fn app() -> TestApp {
    let credentials = Arc::new(MemoryCredentialStore::default());
    let ledger = Arc::new(MemoryRevocationLedger::default());
    let clientes = Arc::new(MemoryClienteRepository::default());
    let produtos = Arc::new(MemoryProdutoRepository::default());

    let stores = Stores {
        credentials: credentials.clone(),
        ledger: ledger.clone(),
        clientes: clientes.clone(),
        produtos: produtos.clone(),
    };

    TestApp {
        router: routes::router(AppState::new(config(), stores)),
        credentials,
        ledger,
        clientes,
        produtos,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Signs up `usuario` and returns a fresh login token.
    pub async fn signup_and_login(&self, usuario: &str, senha: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/usuarios",
                None,
                Some(serde_json::json!({ "usuario": usuario, "senha": senha })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                Method::POST,
                "/login",
                None,
                Some(serde_json::json!({ "usuario": usuario, "senha": senha })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    }
}
