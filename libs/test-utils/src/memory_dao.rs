use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use catalog_models::{CatalogEntity, Lifecycle, ParentScoped};
use chrono::Utc;
use dao_utils::DaoError;
use database_traits::{Counted, LifecycleDao, ListView, PageRequest, ParentScopedDao};
use tokio::sync::RwLock;

type Build<M, C> = dyn Fn(i64, C) -> M + Send + Sync;
type Apply<M, U> = dyn Fn(&mut M, U) + Send + Sync;

/// Lifecycle-correct repository kept in memory.
///
/// Mirrors the SQL repositories: `trash` only matches active rows while
/// `restore` and `purge` only match trashed rows.
/// Counts every read so tests can tell cache hits from store reads, and
/// can be switched into a failing mode.
pub struct InMemoryDao<M, C, U> {
    rows: RwLock<BTreeMap<i64, M>>,
    next_id: RwLock<i64>,
    build: Arc<Build<M, C>>,
    apply: Arc<Apply<M, U>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl<M, C, U> InMemoryDao<M, C, U>
where
    M: CatalogEntity,
{
    /// `build` creates a record from its new id and a create request,
    /// `apply` writes an update request over a record.
    pub fn new(
        build: impl Fn(i64, C) -> M + Send + Sync + 'static,
        apply: impl Fn(&mut M, U) + Send + Sync + 'static,
    ) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
            build: Arc::new(build),
            apply: Arc::new(apply),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Inserts a record as-is, keeping its id and lifecycle marker.
    pub async fn seed(&self, record: M) {
        let mut next_id = self.next_id.write().await;
        *next_id = (*next_id).max(record.id() + 1);
        self.rows.write().await.insert(record.id(), record);
    }

    pub async fn get(&self, id: i64) -> Option<M> { self.rows.read().await.get(&id).cloned() }

    pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }

    pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

    /// Every following call fails with [`DaoError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DaoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DaoError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }

    fn read(&self) -> Result<(), DaoError> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(&self) -> Result<(), DaoError> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn page_of(
        &self, page: &PageRequest, keep: impl Fn(&M) -> bool,
    ) -> Vec<Counted<M>> {
        let needle = page.search.to_lowercase();
        let rows = self.rows.read().await;
        let matching: Vec<&M> = rows
            .values()
            .filter(|row| keep(row))
            .filter(|row| {
                needle.is_empty() || row.search_text().to_lowercase().contains(&needle)
            })
            .collect();

        let total = matching.len() as i64;
        matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|row| Counted::new(row.clone(), total))
            .collect()
    }

    async fn list(&self, view: ListView, page: &PageRequest) -> Vec<Counted<M>> {
        self.page_of(page, |row| {
            match view {
                ListView::All => true,
                ListView::Active => row.lifecycle() == Lifecycle::Active,
                ListView::Trashed => row.lifecycle() == Lifecycle::Trashed,
            }
        })
        .await
    }

    async fn transition(&self, id: i64, from: Lifecycle) -> Result<M, DaoError> {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .filter(|row| row.lifecycle() == from)
            .ok_or(DaoError::NotFound)?;

        match from {
            Lifecycle::Active => row.set_deleted_at(Some(Utc::now())),
            Lifecycle::Trashed => row.set_deleted_at(None),
        }
        Ok(row.clone())
    }
}

#[async_trait]
impl<M, C, U> LifecycleDao for InMemoryDao<M, C, U>
where
    M: CatalogEntity,
    C: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    type CreateRequest = C;
    type Error = DaoError;
    type Model = M;
    type UpdateRequest = U;

    async fn find_all(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.read()?;
        Ok(self.list(ListView::All, page).await)
    }

    async fn find_active(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.read()?;
        Ok(self.list(ListView::Active, page).await)
    }

    async fn find_trashed(&self, page: &PageRequest) -> Result<Vec<Counted<M>>, DaoError> {
        self.read()?;
        Ok(self.list(ListView::Trashed, page).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<M, DaoError> {
        self.read()?;
        self.get(id).await.ok_or(DaoError::NotFound)
    }

    async fn create(&self, req: C) -> Result<M, DaoError> {
        self.write()?;
        let id = {
            let mut next_id = self.next_id.write().await;
            let id = *next_id;
            *next_id += 1;
            id
        };
        let record = (self.build)(id, req);
        self.rows.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, req: U) -> Result<M, DaoError> {
        self.write()?;
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(DaoError::NotFound)?;
        (self.apply)(row, req);
        Ok(row.clone())
    }

    async fn trash(&self, id: i64) -> Result<M, DaoError> {
        self.write()?;
        self.transition(id, Lifecycle::Active).await
    }

    async fn restore(&self, id: i64) -> Result<M, DaoError> {
        self.write()?;
        self.transition(id, Lifecycle::Trashed).await
    }

    async fn purge(&self, id: i64) -> Result<(), DaoError> {
        self.write()?;
        let mut rows = self.rows.write().await;
        match rows.get(&id) {
            Some(row) if row.lifecycle() == Lifecycle::Trashed => {
                rows.remove(&id);
                Ok(())
            }
            _ => Err(DaoError::NotFound),
        }
    }

    async fn restore_all(&self) -> Result<u64, DaoError> {
        self.write()?;
        let mut rows = self.rows.write().await;
        let mut restored = 0;
        for row in rows.values_mut() {
            if row.lifecycle() == Lifecycle::Trashed {
                row.set_deleted_at(None);
                restored += 1;
            }
        }
        Ok(restored)
    }

    async fn purge_all(&self) -> Result<u64, DaoError> {
        self.write()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, row| row.lifecycle() == Lifecycle::Active);
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl<M, C, U> ParentScopedDao for InMemoryDao<M, C, U>
where
    M: ParentScoped,
    C: Send + Sync + 'static,
    U: Send + Sync + 'static,
{
    async fn find_by_parent(
        &self, parent_id: i64, page: &PageRequest,
    ) -> Result<Vec<Counted<M>>, DaoError> {
        self.read()?;
        Ok(self
            .page_of(page, |row| {
                row.parent_id() == parent_id && row.lifecycle() == Lifecycle::Active
            })
            .await)
    }
}
