//! Notifier that records every message instead of delivering it

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use stockmaster::alerts::NotificationPort;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipient: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: Option<String>,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send returns `false` (nothing is recorded)
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
        body_text: Option<&str>,
    ) -> bool {
        if self.fail.load(Ordering::SeqCst) {
            return false;
        }

        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
            body_text: body_text.map(str::to_string),
        });
        true
    }
}
