use serde::Serialize;
use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    #[serde(skip)]
    created_at: Instant,
}

/// Short-lived user notifications.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        self.prune(now);
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            created_at: now,
        });
        id
    }

    pub fn active(&mut self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    /// Drops expired toasts and returns the rest, oldest first.
    pub fn active_at(&mut self, now: Instant) -> Vec<Toast> {
        self.prune(now);
        self.toasts.clone()
    }

    fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.created_at) < TOAST_TTL);
    }
}
