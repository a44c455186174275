//! Shared wiremock fixtures for end-to-end poll cycle tests

use homework_status_bot::config::{Config, Credentials};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";
pub const BOT_TOKEN: &str = "123456:test-token";
pub const CHAT_ID: &str = "100500";

/// Mock review API and Bot API servers
pub struct Servers {
    pub practicum: MockServer,
    pub telegram: MockServer,
}

impl Servers {
    pub async fn start() -> Self {
        Self {
            practicum: MockServer::start().await,
            telegram: MockServer::start().await,
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::new(Credentials {
            practicum_token: "practicum-token".to_string(),
            telegram_token: BOT_TOKEN.to_string(),
            telegram_chat_id: CHAT_ID.to_string(),
        });
        config.poll.endpoint = format!("{}{}", self.practicum.uri(), STATUSES_PATH);
        config.poll.telegram_api_url = self.telegram.uri();
        config.poll.request_timeout = Duration::from_secs(5);
        config
    }

    /// Answer every review API request with `status` and `body`
    pub async fn respond_with(&self, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(STATUSES_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.practicum)
            .await;
    }

    /// Accept every sendMessage call
    pub async fn accept_messages(&self) {
        Mock::given(method("POST"))
            .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&self.telegram)
            .await;
    }

    /// Reject every sendMessage call the way the Bot API does
    pub async fn reject_messages(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&self.telegram)
            .await;
    }

    /// Texts of every message the bot tried to send
    pub async fn sent_texts(&self) -> Vec<String> {
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                assert_eq!(body["chat_id"], CHAT_ID);
                body["text"].as_str().unwrap().to_string()
            })
            .collect()
    }
}
