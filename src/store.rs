use crate::errors::StoreError;
use crate::models::{AppData, DailyRecords, ProductStat};
use crate::storage::{load_data, persist_data};
use std::path::PathBuf;
use tokio::sync::{watch, Mutex};
use tracing::info;

/// Data access for the product catalog and the per-day records.
///
/// Subscribers receive whole snapshots; a new value replaces the previous one.
/// Mutations publish only after they have been committed.
pub trait OrderStore: Send + Sync + 'static {
    fn subscribe_product_catalog(&self) -> watch::Receiver<Vec<String>>;

    fn subscribe_daily_records(&self) -> watch::Receiver<DailyRecords>;

    /// Replaces `product`'s entry for `date`, keeping the other products of that day.
    fn save_product_stat(
        &self,
        date: &str,
        product: &str,
        stat: ProductStat,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn add_product(&self, name: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Drops `name` from the catalog. Daily records are left as they are.
    fn remove_product(&self, name: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes every daily record in one commit; the catalog is untouched.
    fn delete_all_daily_records(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Store backed by a single JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<AppData>,
    catalog_tx: watch::Sender<Vec<String>>,
    records_tx: watch::Sender<DailyRecords>,
}

impl JsonFileStore {
    /// Loads `path`, creating an empty document on first run.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let exists = tokio::fs::try_exists(&path).await?;
        let data = load_data(&path).await;
        if !exists {
            persist_data(&path, &data).await?;
            info!("created data file at {}", path.display());
        }
        Ok(Self::with_data(path, data))
    }

    pub fn with_data(path: PathBuf, data: AppData) -> Self {
        let (catalog_tx, _) = watch::channel(data.products.clone());
        let (records_tx, _) = watch::channel(data.daily.clone());
        Self {
            path,
            data: Mutex::new(data),
            catalog_tx,
            records_tx,
        }
    }

    /// Applies `change` to a copy of the document, persists it and then
    /// publishes whatever part changed. `change` returns false for a no-op.
    async fn commit<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut AppData) -> bool,
    {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        if !change(&mut next) {
            return Ok(());
        }

        persist_data(&self.path, &next).await?;

        if next.products != data.products {
            self.catalog_tx.send_replace(next.products.clone());
        }
        if next.daily != data.daily {
            self.records_tx.send_replace(next.daily.clone());
        }
        *data = next;
        Ok(())
    }
}

impl OrderStore for JsonFileStore {
    fn subscribe_product_catalog(&self) -> watch::Receiver<Vec<String>> {
        self.catalog_tx.subscribe()
    }

    fn subscribe_daily_records(&self) -> watch::Receiver<DailyRecords> {
        self.records_tx.subscribe()
    }

    async fn save_product_stat(
        &self,
        date: &str,
        product: &str,
        stat: ProductStat,
    ) -> Result<(), StoreError> {
        self.commit(|data| {
            data.daily
                .entry(date.to_string())
                .or_default()
                .products
                .insert(product.to_string(), stat);
            true
        })
        .await?;
        info!(date, product, "saved product stats");
        Ok(())
    }

    async fn add_product(&self, name: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            if data.products.iter().any(|existing| existing == name) {
                return false;
            }
            data.products.push(name.to_string());
            true
        })
        .await?;
        info!(product = name, "product added");
        Ok(())
    }

    async fn remove_product(&self, name: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            let before = data.products.len();
            data.products.retain(|existing| existing != name);
            data.products.len() != before
        })
        .await?;
        info!(product = name, "product removed");
        Ok(())
    }

    async fn delete_all_daily_records(&self) -> Result<(), StoreError> {
        let mut deleted = 0;
        self.commit(|data| {
            deleted = data.daily.len();
            data.daily.clear();
            deleted > 0
        })
        .await?;
        info!(deleted, "daily records reset");
        Ok(())
    }
}
