//! Mock webhook server for testing message delivery
//!
//! This simulates the mail relay endpoint that receives alerts,
//! allowing tests to verify messages are sent correctly.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock webhook server that captures relay requests
pub struct MockWebhookServer {
    pub server: MockServer,
    pub base_url: String,
    captured_requests: Arc<Mutex<Vec<Value>>>,
}

impl MockWebhookServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();

        Self {
            server,
            base_url,
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.base_url)
    }

    /// Accept every message and keep its JSON body
    pub async fn mock_success(&self) {
        let requests = self.captured_requests.clone();

        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(move |req: &Request| {
                if let Ok(body) = req.body_json::<Value>() {
                    requests.lock().unwrap().push(body);
                }
                ResponseTemplate::new(200)
            })
            .mount(&self.server)
            .await;
    }

    pub async fn mock_failure(&self, status_code: u16) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    /// Respond after the notifier's 10 s timeout
    pub async fn mock_timeout(&self) {
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(15)))
            .mount(&self.server)
            .await;
    }

    pub fn captured_requests(&self) -> Vec<Value> {
        self.captured_requests.lock().unwrap().clone()
    }
}
