use std::sync::Arc;

/// User-facing notifications emitted by remote list operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The operation succeeded
    Success { message: String },

    /// The operation failed; the message is meant for display
    Error { message: String },
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The human-readable message carried by this notification
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Error { message } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Sink for transient user notifications ("toasts").
///
/// Implementations are fire-and-forget: they must not fail and are not
/// expected to block.
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    fn notify(&self, notification: Notification);
}

/// A shared reference to a notifier
pub type SharedNotifier = Arc<dyn Notifier>;

/// A notifier that silently drops everything.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

impl NoopNotifier {
    /// Create a new NoopNotifier wrapped in an Arc
    pub fn shared() -> SharedNotifier {
        Arc::new(Self)
    }
}
