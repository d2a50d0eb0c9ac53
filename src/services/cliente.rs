use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{TtlCache, keys::ALL_CLIENTES};
use crate::database::StoreResult;
use crate::database::models::{Cliente, NewCliente};
use crate::database::repositories::ClienteRepository;
use crate::error::AppError;

/// Customer operations with the full listing served through the
/// read-through cache.
///
/// Every successful write invalidates `ALL_CLIENTES` before returning, and
/// the write plus its invalidation run on a detached task so that a
/// cancelled request cannot commit one without the other.
#[derive(Clone)]
pub struct ClienteService {
    repo: Arc<dyn ClienteRepository>,
    cache: Arc<TtlCache<Vec<Cliente>>>,
}

impl ClienteService {
    pub fn new(repo: Arc<dyn ClienteRepository>, cache: Arc<TtlCache<Vec<Cliente>>>) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &TtlCache<Vec<Cliente>> {
        &self.cache
    }

    pub async fn get_all(&self) -> Result<Vec<Cliente>, AppError> {
        if let Some(clientes) = self.cache.get(ALL_CLIENTES) {
            debug!(count = clientes.len(), "clientes served from cache");
            return Ok(clientes);
        }

        let observed = self.cache.generation(ALL_CLIENTES);
        let clientes = self.repo.list().await?;
        if self
            .cache
            .set_if_current(ALL_CLIENTES, clientes.clone(), observed, None)
        {
            debug!(count = clientes.len(), "clientes cached");
        } else {
            debug!("clientes changed during fetch, result not cached");
        }
        Ok(clientes)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Cliente, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, cliente: NewCliente) -> Result<Cliente, AppError> {
        let repo = Arc::clone(&self.repo);
        self.write(async move { repo.create(&cliente).await }).await
    }

    pub async fn update(&self, id: i64, cliente: NewCliente) -> Result<Cliente, AppError> {
        let repo = Arc::clone(&self.repo);
        self.write(async move { repo.update(id, &cliente).await })
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let repo = Arc::clone(&self.repo);
        if self.write(async move { repo.delete(id).await }).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    async fn write<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let result = tokio::spawn(async move {
            let result = op.await;
            if result.is_ok() {
                cache.invalidate(ALL_CLIENTES);
                debug!("clientes cache invalidated");
            }
            result
        })
        .await
        .map_err(|e| AppError::Internal(format!("cliente write aborted: {e}")))?;

        Ok(result?)
    }
}

fn not_found(id: i64) -> AppError {
    tracing::info!(id, "cliente not found");
    AppError::NotFound("cliente not found".into())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::database::memory::MemoryClienteRepository;

    /// Wraps the memory repository and can park `list` (after it has read
    /// its snapshot) or `create` (before it commits) until released.
    #[derive(Default)]
    struct GatedRepo {
        inner: MemoryClienteRepository,
        hold_lists: AtomicBool,
        hold_creates: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl GatedRepo {
        async fn park(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    #[async_trait]
    impl ClienteRepository for GatedRepo {
        async fn list(&self) -> StoreResult<Vec<Cliente>> {
            let snapshot = self.inner.list().await;
            if self.hold_lists.load(Ordering::SeqCst) {
                self.park().await;
            }
            snapshot
        }

        async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cliente>> {
            self.inner.find_by_id(id).await
        }

        async fn create(&self, cliente: &NewCliente) -> StoreResult<Cliente> {
            if self.hold_creates.load(Ordering::SeqCst) {
                self.park().await;
            }
            self.inner.create(cliente).await
        }

        async fn update(&self, id: i64, cliente: &NewCliente) -> StoreResult<Option<Cliente>> {
            self.inner.update(id, cliente).await
        }

        async fn delete(&self, id: i64) -> StoreResult<bool> {
            self.inner.delete(id).await
        }
    }

    fn gated_service() -> (ClienteService, Arc<GatedRepo>) {
        let repo = Arc::new(GatedRepo::default());
        let cache = Arc::new(TtlCache::new(Duration::from_secs(30)));
        (ClienteService::new(repo.clone(), cache), repo)
    }

    fn service() -> (ClienteService, Arc<MemoryClienteRepository>) {
        let repo = Arc::new(MemoryClienteRepository::default());
        let cache = Arc::new(TtlCache::new(Duration::from_secs(30)));
        (ClienteService::new(repo.clone(), cache), repo)
    }

    fn ana() -> NewCliente {
        NewCliente {
            nome: "Ana".into(),
            sobrenome: "Souza".into(),
            email: "ana@example.com".into(),
            idade: 31,
        }
    }

    #[tokio::test]
    async fn listing_is_served_from_cache_until_a_write() {
        let (service, repo) = service();

        assert!(service.get_all().await.unwrap().is_empty());
        assert!(service.get_all().await.unwrap().is_empty());
        assert_eq!(repo.list_calls(), 1);

        let created = service.create(ana()).await.unwrap();
        let listed = service.get_all().await.unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(repo.list_calls(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_invalidate() {
        let (service, _) = service();
        let created = service.create(ana()).await.unwrap();
        service.get_all().await.unwrap();

        let mut changed = ana();
        changed.idade = 32;
        service.update(created.id, changed).await.unwrap();
        assert_eq!(service.get_all().await.unwrap()[0].idade, 32);

        service.delete(created.id).await.unwrap();
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let (service, _) = service();
        assert!(matches!(service.get_by_id(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.update(9, ana()).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(9).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn failed_write_keeps_cache_and_surfaces_store_error() {
        let (service, repo) = service();
        service.get_all().await.unwrap();

        repo.set_unavailable(true);
        assert!(matches!(
            service.create(ana()).await,
            Err(AppError::StoreUnavailable(_))
        ));
        assert_eq!(service.cache().stats().keys, 1);
    }

    #[tokio::test]
    async fn store_outage_on_read_is_an_error_not_stale_data() {
        let (service, repo) = service();
        repo.set_unavailable(true);
        assert!(matches!(
            service.get_all().await,
            Err(AppError::StoreUnavailable(_))
        ));
        assert_eq!(service.cache().stats().keys, 0);
    }

    #[tokio::test]
    async fn cancelled_create_still_commits_and_invalidates() {
        let (service, repo) = gated_service();
        assert!(service.get_all().await.unwrap().is_empty());

        repo.hold_creates.store(true, Ordering::SeqCst);
        let writer = service.clone();
        let request = tokio::spawn(async move { writer.create(ana()).await });
        repo.entered.notified().await;

        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());
        repo.release.notify_one();

        tokio::time::timeout(Duration::from_secs(1), async {
            while service.cache().stats().keys > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("detached write never invalidated the listing");

        let listed = service.get_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "ana@example.com");
    }

    #[tokio::test]
    async fn fill_overlapping_a_write_is_not_cached() {
        let (service, repo) = gated_service();

        repo.hold_lists.store(true, Ordering::SeqCst);
        let reader = service.clone();
        let slow_read = tokio::spawn(async move { reader.get_all().await });
        repo.entered.notified().await;
        repo.hold_lists.store(false, Ordering::SeqCst);

        let created = service.create(ana()).await.unwrap();
        repo.release.notify_one();

        // The slow reader returns what it saw, but must not cache it.
        assert!(slow_read.await.unwrap().unwrap().is_empty());
        assert_eq!(service.cache().stats().keys, 0);
        assert_eq!(service.get_all().await.unwrap(), vec![created]);
    }
}
