//! User-facing notifications (toasts).
//!
//! The controller reports mutation outcomes through a [`Notifier`]. The CLI
//! prints them; tests record them.

use std::fmt;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A single message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        });
    }

    fn warning(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        });
    }

    fn error(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }
}

/// Prints notifications to the terminal.
///
/// Successes go to stdout, warnings and errors to stderr. Each notice is
/// also traced at debug level under the `notify` target.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(target: "notify", level = %notice.level, "{}", notice.message);
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Warning => eprintln!("! {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

/// Keeps every notification in memory, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: parking_lot::Mutex<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_set_level() {
        let notifier = RecordingNotifier::default();
        notifier.success("done");
        notifier.warning("careful");
        notifier.error("broken");

        let levels: Vec<_> = notifier.notices().iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Success, NoticeLevel::Warning, NoticeLevel::Error]
        );
        assert_eq!(notifier.last().unwrap().message, "broken");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NoticeLevel::Warning.to_string(), "warning");
    }
}
