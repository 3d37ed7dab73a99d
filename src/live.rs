use crate::models::DailyRecords;
use crate::store::OrderStore;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Callback registered on a subscription. Dropping it stops the callback.
pub struct Listener {
    handle: JoinHandle<()>,
}

impl Listener {
    /// Calls `on_change` with the current snapshot, then with every new one.
    pub fn spawn<T, F>(mut rx: watch::Receiver<T>, mut on_change: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                let snapshot = rx.borrow_and_update().clone();
                on_change(snapshot);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Read-through view of the store's catalog and daily records.
#[derive(Clone)]
pub struct LiveView {
    catalog: watch::Receiver<Vec<String>>,
    records: watch::Receiver<DailyRecords>,
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl LiveView {
    pub fn attach<S: OrderStore>(store: &S) -> Self {
        Self {
            catalog: store.subscribe_product_catalog(),
            records: store.subscribe_daily_records(),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn catalog(&self) -> Vec<String> {
        self.catalog.borrow().clone()
    }

    pub fn has_product(&self, name: &str) -> bool {
        self.catalog.borrow().iter().any(|product| product == name)
    }

    /// Runs `f` against the latest records snapshot.
    pub fn with_records<R>(&self, f: impl FnOnce(&DailyRecords) -> R) -> R {
        f(&self.records.borrow())
    }

    pub async fn on_catalog_change<F>(&self, on_change: F)
    where
        F: FnMut(Vec<String>) + Send + 'static,
    {
        let listener = Listener::spawn(self.catalog.clone(), on_change);
        self.listeners.lock().await.push(listener);
    }

    pub async fn on_records_change<F>(&self, on_change: F)
    where
        F: FnMut(DailyRecords) + Send + 'static,
    {
        let listener = Listener::spawn(self.records.clone(), on_change);
        self.listeners.lock().await.push(listener);
    }

    /// Stops every registered listener.
    pub async fn shutdown(&self) {
        self.listeners.lock().await.clear();
    }

    pub async fn listener_count(&self) -> usize {
        self.listeners.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::store::JsonFileStore;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn store() -> JsonFileStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "order_tracker_live_{}_{nanos}.json",
            std::process::id()
        ));
        JsonFileStore::with_data(path, AppData::default())
    }

    #[tokio::test]
    async fn listener_receives_current_and_later_snapshots() {
        let store = store();
        let live = LiveView::attach(&store);
        let (tx, mut rx) = mpsc::unbounded_channel();
        live.on_catalog_change(move |products| {
            let _ = tx.send(products);
        })
        .await;

        let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert!(first.is_empty());

        store.add_product("Kettle").await.unwrap();
        let second = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        assert_eq!(second, vec!["Kettle"]);
        assert!(live.has_product("Kettle"));
    }

    #[tokio::test]
    async fn records_view_replaces_whole_snapshot() {
        let store = store();
        let live = LiveView::attach(&store);
        let stat = crate::models::ProductStat {
            total_for_day: 2,
            ..Default::default()
        };
        store.save_product_stat("2024-06-01", "A", stat).await.unwrap();
        store.save_product_stat("2024-06-02", "A", stat).await.unwrap();

        assert_eq!(live.with_records(|records| records.len()), 2);
        store.delete_all_daily_records().await.unwrap();
        assert_eq!(live.with_records(|records| records.len()), 0);
    }

    #[tokio::test]
    async fn shutdown_stops_listeners() {
        let store = store();
        let live = LiveView::attach(&store);
        let (tx, mut rx) = mpsc::unbounded_channel();
        live.on_records_change(move |records| {
            let _ = tx.send(records.len());
        })
        .await;
        assert_eq!(timeout(Duration::from_secs(1), rx.recv()).await.unwrap(), Some(0));
        assert_eq!(live.listener_count().await, 1);

        live.shutdown().await;
        assert_eq!(live.listener_count().await, 0);

        // the aborted task drops its sender, closing the channel
        let closed = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(closed, None);
    }
}
