//! User-facing notices.
//!
//! Notices are fire-and-forget: a notifier never reports delivery back, and
//! a dropped receiver does not affect the operation that emitted them.

use tokio::sync::mpsc;
use tracing::{error, info};

/// Transient notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Work started; shown until dismissed or replaced.
    Loading(String),
    Success(String),
    Error(String),
    Info(String),
    /// Clear any loading indicator.
    Dismiss,
}

/// Receives notices from the core.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Loading(msg) | Notice::Success(msg) | Notice::Info(msg) => info!("{}", msg),
            Notice::Error(msg) => error!("{}", msg),
            Notice::Dismiss => {}
        }
    }
}

/// Forwards notices over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}

/// Drain every notice currently queued on `rx`.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
