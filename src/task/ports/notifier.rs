//! User-facing notification port.
//!
//! Notifications are fire-and-forget: they are never a correctness
//! dependency, and a failing notifier must never block or roll back an
//! otherwise-successful lifecycle transition. The port is therefore
//! infallible; adapters swallow their own delivery failures.

/// Visual kind of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The attempted action took effect.
    Success,
    /// The attempted action failed and the task is unchanged.
    Error,
}

/// A user-facing toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message shown to the actor.
    pub message: String,
    /// Visual kind.
    pub kind: NoticeKind,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Success,
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Fire-and-forget toast reporting channel.
pub trait Notifier: Send + Sync {
    /// Delivers the notice to the actor's user interface.
    fn notify(&self, notice: &Notice);
}
