//! In-process stores with the same contracts as the Postgres ones. Each
//! can be switched into an "unavailable" mode to exercise outage paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{Cliente, NewCliente, NewProduto, Produto, User, UserSummary};
use super::repositories::{ClienteRepository, CredentialStore, ProdutoRepository};
use super::{StoreError, StoreResult};
use crate::auth::RevocationLedger;

#[derive(Debug, Default)]
struct Outage(AtomicBool);

impl Outage {
    fn set(&self, down: bool) {
        self.0.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.0.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store marked unavailable".into()));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
}

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: Mutex<Table<User>>,
    outage: Outage,
}

impl MemoryCredentialStore {
    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }

    pub fn stored_token(&self, usuario: &str) -> Option<String> {
        let users = self.users.lock().ok()?;
        users
            .rows
            .values()
            .find(|u| u.usuario == usuario)
            .and_then(|u| u.token.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, usuario: &str, password_hash: &str) -> StoreResult<UserSummary> {
        self.outage.check()?;
        let mut users = lock(&self.users)?;
        if users.rows.values().any(|u| u.usuario == usuario) {
            return Err(StoreError::Conflict(format!("usuario {usuario} already exists")));
        }

        let id = users.next_id();
        users.rows.insert(
            id,
            User {
                id,
                usuario: usuario.to_owned(),
                senha: password_hash.to_owned(),
                token: None,
            },
        );
        Ok(UserSummary {
            id,
            usuario: usuario.to_owned(),
        })
    }

    async fn find_by_username(&self, usuario: &str) -> StoreResult<Option<User>> {
        self.outage.check()?;
        let users = lock(&self.users)?;
        Ok(users.rows.values().find(|u| u.usuario == usuario).cloned())
    }

    async fn set_token(&self, usuario: &str, token: Option<&str>) -> StoreResult<()> {
        self.outage.check()?;
        let mut users = lock(&self.users)?;
        if let Some(user) = users.rows.values_mut().find(|u| u.usuario == usuario) {
            user.token = token.map(str::to_owned);
        }
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<UserSummary>> {
        self.outage.check()?;
        let users = lock(&self.users)?;
        Ok(users
            .rows
            .values()
            .map(|u| UserSummary {
                id: u.id,
                usuario: u.usuario.clone(),
            })
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRevocationLedger {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    outage: Outage,
}

impl MemoryRevocationLedger {
    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }

    pub fn revoked_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }
}

#[async_trait]
impl RevocationLedger for MemoryRevocationLedger {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
        self.outage.check()?;
        lock(&self.entries)?
            .entry(token.to_owned())
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> StoreResult<bool> {
        self.outage.check()?;
        Ok(lock(&self.entries)?.contains_key(token))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        self.outage.check()?;
        let mut entries = lock(&self.entries)?;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        Ok((before - entries.len()) as u64)
    }
}

#[derive(Debug, Default)]
pub struct MemoryClienteRepository {
    table: Mutex<Table<Cliente>>,
    list_calls: AtomicUsize,
    outage: Outage,
}

impl MemoryClienteRepository {
    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }

    /// How many times the full collection has been read.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

fn cliente_row(id: i64, cliente: &NewCliente) -> Cliente {
    Cliente {
        id,
        nome: cliente.nome.clone(),
        sobrenome: cliente.sobrenome.clone(),
        email: cliente.email.clone(),
        idade: cliente.idade,
    }
}

#[async_trait]
impl ClienteRepository for MemoryClienteRepository {
    async fn list(&self) -> StoreResult<Vec<Cliente>> {
        self.outage.check()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.table)?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cliente>> {
        self.outage.check()?;
        Ok(lock(&self.table)?.rows.get(&id).cloned())
    }

    async fn create(&self, cliente: &NewCliente) -> StoreResult<Cliente> {
        self.outage.check()?;
        let mut table = lock(&self.table)?;
        let id = table.next_id();
        let row = cliente_row(id, cliente);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, cliente: &NewCliente) -> StoreResult<Option<Cliente>> {
        self.outage.check()?;
        let mut table = lock(&self.table)?;
        Ok(table.rows.get_mut(&id).map(|row| {
            *row = cliente_row(id, cliente);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.outage.check()?;
        Ok(lock(&self.table)?.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProdutoRepository {
    table: Mutex<Table<Produto>>,
    outage: Outage,
}

impl MemoryProdutoRepository {
    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }
}

fn produto_row(id: i64, produto: &NewProduto) -> Produto {
    Produto {
        id,
        nome: produto.nome.clone(),
        descricao: produto.descricao.clone(),
        preco: produto.preco,
    }
}

#[async_trait]
impl ProdutoRepository for MemoryProdutoRepository {
    async fn list(&self) -> StoreResult<Vec<Produto>> {
        self.outage.check()?;
        Ok(lock(&self.table)?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Produto>> {
        self.outage.check()?;
        Ok(lock(&self.table)?.rows.get(&id).cloned())
    }

    async fn create(&self, produto: &NewProduto) -> StoreResult<Produto> {
        self.outage.check()?;
        let mut table = lock(&self.table)?;
        let id = table.next_id();
        let row = produto_row(id, produto);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, produto: &NewProduto) -> StoreResult<Option<Produto>> {
        self.outage.check()?;
        let mut table = lock(&self.table)?;
        Ok(table.rows.get_mut(&id).map(|row| {
            *row = produto_row(id, produto);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.outage.check()?;
        Ok(lock(&self.table)?.rows.remove(&id).is_some())
    }
}
