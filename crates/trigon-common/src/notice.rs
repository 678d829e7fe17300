//! Transient user-facing notices (the snackbar channel).
//!
//! Pipeline stages never fail hard on a remote error; they emit a `Notice`
//! over a broadcast channel for whatever presentation layer is listening and
//! degrade to "no data retrieved".

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

const GENERAL_WARNING: &str =
    "Error occurred when requesting data. Please adjust your query settings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// The generic fetch-failure warning shown when no specific message
    /// applies.
    pub fn general_warning() -> Self {
        Self::warning(GENERAL_WARNING)
    }
}

/// Cloneable notice emitter; a `None` inner sender silently drops notices
/// (useful in tests and headless runs).
#[derive(Debug, Clone, Default)]
pub struct NoticeSender {
    tx: Option<broadcast::Sender<Notice>>,
}

impl NoticeSender {
    pub fn new(tx: broadcast::Sender<Notice>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sender/receiver pair with a bounded backlog.
    pub fn channel(capacity: usize) -> (Self, broadcast::Receiver<Notice>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn send(&self, notice: Notice) {
        match self.tx {
            Some(ref tx) => {
                // Receivers may have gone away; that is not an error here.
                if let Err(err) = tx.send(notice) {
                    debug!(text = %err.0.text, "notice dropped; no receivers");
                }
            }
            None => debug!(text = %notice.text, "notice dropped; sender detached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_notices() {
        let (sender, mut rx) = NoticeSender::channel(8);
        sender.send(Notice::general_warning());
        let got = rx.try_recv().unwrap();
        assert_eq!(got.level, NoticeLevel::Warning);
        assert!(got.text.contains("adjust your query settings"));
    }

    #[test]
    fn test_detached_sender_drops_silently() {
        let sender = NoticeSender::default();
        sender.send(Notice::info("ignored"));
    }

    #[test]
    fn test_send_without_receivers_drops_silently() {
        let (sender, rx) = NoticeSender::channel(8);
        drop(rx);
        sender.send(Notice::general_warning());
    }
}
