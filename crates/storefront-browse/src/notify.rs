//! User-facing notifications.
//!
//! The orchestrator never renders anything itself; it hands a [`Toast`] to
//! whatever [`Notifier`] the caller injected and moves on.

use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastVariant {
    #[default]
    Default,
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    /// Destructive toast titled "Error".
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_owned(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Success,
        }
    }
}

/// Fire-and-forget sink for toasts.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, toast: Toast);
}

impl<N: Notifier> Notifier for Arc<N> {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast);
    }
}

/// Writes toasts to the `tracing` pipeline. Used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Destructive => {
                tracing::error!(title = %toast.title, "{}", toast.description);
            }
            ToastVariant::Default | ToastVariant::Success => {
                tracing::info!(title = %toast.title, "{}", toast.description);
            }
        }
    }
}
