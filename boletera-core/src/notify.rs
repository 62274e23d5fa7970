use std::sync::Mutex;

use crate::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A dismissable, non-blocking notification. Every operation failure ends
/// here; none crashes the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&BookingError> for Notice {
    fn from(err: &BookingError) -> Self {
        Notice::error(err.to_string())
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices in memory. The presentation layer drains it into
/// toasts; tests inspect it directly.
#[derive(Default)]
pub struct BufferedNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .ok()
            .and_then(|n| n.last().cloned())
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
