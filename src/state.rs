use crate::live::LiveView;
use crate::notify::{Notifications, Toast, ToastKind};
use crate::selection::reconcile_selection;
use crate::store::{JsonFileStore, OrderStore};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState<S = JsonFileStore> {
    pub store: Arc<S>,
    pub live: LiveView,
    pub selected: Arc<Mutex<Option<String>>>,
    pub notifications: Arc<Mutex<Notifications>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            live: self.live.clone(),
            selected: Arc::clone(&self.selected),
            notifications: Arc::clone(&self.notifications),
        }
    }
}

impl<S: OrderStore> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        let live = LiveView::attach(store.as_ref());
        Self {
            store,
            live,
            selected: Arc::new(Mutex::new(None)),
            notifications: Arc::new(Mutex::new(Notifications::default())),
        }
    }

    /// Current product selection, re-checked against the live catalog.
    pub async fn selection(&self) -> Option<String> {
        let catalog = self.live.catalog();
        let mut selected = self.selected.lock().await;
        *selected = reconcile_selection(selected.as_deref(), &catalog);
        selected.clone()
    }

    pub async fn select(&self, product: Option<String>) {
        *self.selected.lock().await = product;
    }

    pub async fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        self.notifications.lock().await.push(kind, message);
    }

    pub async fn active_notifications(&self) -> Vec<Toast> {
        self.notifications.lock().await.active()
    }
}
