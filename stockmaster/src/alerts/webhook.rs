use super::NotificationPort;
use crate::constants::notifications::WEBHOOK_TIMEOUT_SECONDS;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<'a> {
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body_html: &'a str,
    pub body_text: Option<&'a str>,
    pub sent_at: DateTime<Utc>,
}

/// Hands messages to a mail relay over a JSON webhook.
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> Self {
        // Builder only fails on TLS backend init; fall back to the default client
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build webhook client with timeout, using default: {}", e);
                Client::new()
            });

        Self {
            webhook_url,
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

#[async_trait]
impl NotificationPort for WebhookNotifier {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
        body_text: Option<&str>,
    ) -> bool {
        if self.webhook_url.is_empty() {
            debug!("No webhook URL configured, skipping message '{}'", subject);
            return false;
        }

        let payload = WebhookPayload {
            recipient,
            subject,
            body_html,
            body_text,
            sent_at: Utc::now(),
        };

        match timeout(
            Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS),
            self.client.post(&self.webhook_url).json(&payload).send(),
        )
        .await
        {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    info!("Message sent to {}: {}", recipient, subject);
                    true
                } else {
                    warn!(
                        "Notification webhook returned status {} for '{}'",
                        response.status(),
                        subject
                    );
                    false
                }
            }
            Ok(Err(e)) => {
                warn!("Failed to send '{}' to {}: {}", subject, recipient, e);
                false
            }
            Err(_) => {
                warn!("Notification webhook timeout for '{}'", subject);
                false
            }
        }
    }
}
