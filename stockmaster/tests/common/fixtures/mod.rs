//! This module provides reusable test utilities:
//! - In-memory remote snapshot store
//! - Recording notifier and scripted inventory scanner
//! - Mock webhook server (wiremock)
//! - Test configuration builder
//! - Temporary SQLite databases
//! - Common test data

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_notifier;
pub mod fake_remote;
pub mod fake_scanner;
pub mod mock_webhook;
pub mod test_config;
pub mod test_data;
pub mod test_database;

// Re-export commonly used items
pub use fake_notifier::{RecordingNotifier, SentMessage};
pub use fake_remote::FakeRemoteStore;
pub use fake_scanner::FakeScanner;
pub use mock_webhook::MockWebhookServer;
pub use test_config::{TestConfigBuilder, TEST_RECIPIENT};
pub use test_data::*;
pub use test_database::TestDatabase;
