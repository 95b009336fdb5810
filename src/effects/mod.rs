//! User-facing side channels of the views: toast notifications and external navigation.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient, human-readable notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Shows toasts to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Opens URLs in a new browsing context.
pub trait Navigator: Send + Sync {
    fn open_external(&self, url: &str);
}

/// Collects effects so they can be returned with a response.
#[derive(Debug, Default)]
pub struct RecordedEffects {
    toasts: Mutex<Vec<Toast>>,
    opened: Mutex<Vec<String>>,
}

impl RecordedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }

    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }

    #[cfg(test)]
    pub fn errors(&self) -> usize {
        lock(&self.toasts)
            .iter()
            .filter(|t| t.kind == ToastKind::Error)
            .count()
    }

    #[cfg(test)]
    pub fn successes(&self) -> usize {
        lock(&self.toasts)
            .iter()
            .filter(|t| t.kind == ToastKind::Success)
            .count()
    }
}

impl Notifier for RecordedEffects {
    fn notify(&self, toast: Toast) {
        lock(&self.toasts).push(toast);
    }
}

impl Navigator for RecordedEffects {
    fn open_external(&self, url: &str) {
        lock(&self.opened).push(url.to_string());
    }
}

// A panic while holding the lock cannot leave a Vec half-written.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
