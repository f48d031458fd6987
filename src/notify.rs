//! Toast queue the host drains into its notification surface.
//!
//! The host launcher owns rendering; this module owns what gets shown. API
//! and connectivity failures funnel through [`api_failure`], which logs the
//! structured event and enqueues the user-facing translation.

use std::collections::VecDeque;
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::error;

use crate::error::{ErrorSeverity, ZendeskError};

/// Toast variant determines the visual style and icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    /// Success toast (green) - checkmark icon
    Success,
    /// Warning toast (yellow/amber) - warning icon
    Warning,
    /// Error toast (red) - X icon
    Error,
    /// Info toast (blue) - info icon
    #[default]
    Info,
}

impl ToastVariant {
    /// Get the icon character for this variant
    pub fn icon(&self) -> &'static str {
        match self {
            ToastVariant::Success => "✓",
            ToastVariant::Warning => "⚠",
            ToastVariant::Error => "✕",
            ToastVariant::Info => "ℹ",
        }
    }

    pub fn from_severity(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Info => ToastVariant::Info,
            ErrorSeverity::Warning => ToastVariant::Warning,
            ErrorSeverity::Error => ToastVariant::Error,
            ErrorSeverity::Critical => ToastVariant::Error,
        }
    }
}

/// One pending notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub variant: ToastVariant,
    pub title: String,
    /// Expandable detail line (e.g. the API error body)
    pub detail: Option<String>,
}

impl Toast {
    pub fn success(title: impl Into<String>) -> Self {
        Toast {
            variant: ToastVariant::Success,
            title: title.into(),
            detail: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Toast {
            variant: ToastVariant::Error,
            title: title.into(),
            detail: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Toast {
            variant: ToastVariant::Info,
            title: title.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

const MAX_PENDING_TOASTS: usize = 16;

fn queue() -> &'static Mutex<VecDeque<Toast>> {
    static QUEUE: OnceLock<Mutex<VecDeque<Toast>>> = OnceLock::new();
    QUEUE.get_or_init(|| Mutex::new(VecDeque::with_capacity(MAX_PENDING_TOASTS)))
}

/// Enqueue a toast for the host to render. The queue is bounded; under a
/// flood the oldest pending toast is dropped first.
pub fn push(toast: Toast) {
    let mut pending = queue().lock();
    if pending.len() == MAX_PENDING_TOASTS {
        pending.pop_front();
    }
    pending.push_back(toast);
}

/// Take every pending toast, oldest first. The host calls this each frame.
pub fn drain() -> Vec<Toast> {
    queue().lock().drain(..).collect()
}

/// Translate a failed API operation into a toast and a structured log
/// event. `context` names the operation for the user ("Ticket search",
/// "Update user", ...). The caller resets the affected view to an empty
/// result set.
pub fn api_failure(context: &str, err: &ZendeskError) {
    error!(
        event_type = "api_failure",
        context = context,
        error = %err,
        "Zendesk operation failed"
    );

    let mut toast = Toast {
        variant: ToastVariant::from_severity(err.severity()),
        title: format!("{}: {}", context, err.user_message()),
        detail: None,
    };
    toast.detail = err.detail();
    push(toast);
}
