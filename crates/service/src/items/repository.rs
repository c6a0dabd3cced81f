use std::sync::Arc;

use models::mapper::{from_fields, to_fields};
use models::Item;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::{KvStore, StoreInfo};

/// Prefix of the per-record hash keys: `items:{id}`.
pub const KEY_PREFIX: &str = "items";
/// Set holding every known item id.
pub const INDEX_SET_KEY: &str = "items";

pub fn record_key(id: &str) -> String {
    format!("{KEY_PREFIX}:{id}")
}

/// Item persistence on top of a [`KvStore`]: one hash per record plus an
/// index set standing in for a collection scan.
///
/// The hash write and the index update are two separate commands. A failure
/// between them leaves the two out of step; reads tolerate that.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use models::{item::now, Item};
/// use service::{storage::MemoryStore, ItemRepository};
///
/// let repo = ItemRepository::new(Arc::new(MemoryStore::new()));
/// let saved = tokio_test::block_on(repo.save(Item::new("", "test-key", "v", now()))).unwrap();
/// assert!(!saved.id.is_empty());
/// let found = tokio_test::block_on(repo.find_by_id(&saved.id)).unwrap();
/// assert_eq!(found, Some(saved));
/// ```
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn KvStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self { Self { store } }

    /// Persist `item`, assigning a fresh UUID when its id is empty.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn save(&self, mut item: Item) -> Result<Item, ServiceError> {
        if !item.has_id() {
            item.id = Uuid::new_v4().to_string();
            debug!(id = %item.id, "assigned item id");
        }

        self.store.hset_all(&record_key(&item.id), &to_fields(&item)).await?;
        self.store.sadd(INDEX_SET_KEY, &item.id).await?;

        Ok(item)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Item>, ServiceError> {
        let fields = self.store.hget_all(&record_key(id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(from_fields(&fields)))
    }

    /// Like [`ItemRepository::find_by_id`], but a missing record is a
    /// [`ServiceError::NotFound`].
    pub async fn get(&self, id: &str) -> Result<Item, ServiceError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("item {id}")))
    }

    /// Every item reachable through the index set, in no particular order.
    /// Index entries without a record are skipped.
    pub async fn find_all(&self) -> Result<Vec<Item>, ServiceError> {
        let ids = self.store.smembers(INDEX_SET_KEY).await?;
        let mut items = Vec::with_capacity(ids.len());

        for id in ids {
            match self.find_by_id(&id).await? {
                Some(item) => items.push(item),
                None => debug!(%id, "index entry without record; skipped"),
            }
        }

        Ok(items)
    }

    /// Case-insensitive exact match on `name`. Scans every item.
    ///
    /// Both sides are upper-cased: final and medial sigma fold to the same `Σ`.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, ServiceError> {
        let wanted = name.to_uppercase();
        let all = self.find_all().await?;
        Ok(all.into_iter().filter(|i| i.name.to_uppercase() == wanted).collect())
    }

    pub async fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        self.store.exists(&record_key(id)).await
    }

    /// Delete the record and drop `id` from the index. The index removal runs
    /// even when there was no record. Returns whether a record was deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.store.del(&record_key(id)).await?;
        self.store.srem(INDEX_SET_KEY, id).await?;
        Ok(deleted)
    }

    /// Size of the index set. Can differ from `find_all().len()` when the
    /// index and the records disagree.
    pub async fn count(&self) -> Result<u64, ServiceError> {
        self.store.scard(INDEX_SET_KEY).await
    }

    pub async fn server_info(&self) -> Result<StoreInfo, ServiceError> {
        self.store.server_info().await
    }
}
