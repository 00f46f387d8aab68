use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::AppResult;

/// The external text-improvement service, seen as an opaque JSON-in,
/// JSON-out call. A trait so tests can install a stub and count calls.
#[async_trait]
pub trait ImproveService: Send + Sync {
    async fn improve(&self, instruction: &str, title: &str, description: &str)
        -> AppResult<Value>;
}

/// Cloneable handle stored in [`crate::AppState`].
#[derive(Clone)]
pub struct Assist(pub Arc<dyn ImproveService>);

pub struct HttpImproveService {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpImproveService {
    pub fn from_env() -> anyhow::Result<HttpImproveService> {
        let timeout = dotenv::var("ASSIST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Ok(HttpImproveService {
            client: reqwest::ClientBuilder::new()
                .timeout(Duration::from_secs(timeout))
                .build()?,
            url: dotenv::var("ASSIST_URL")
                .unwrap_or_else(|_| "http://localhost:8091/improve".to_owned()),
            api_key: dotenv::var("ASSIST_API_KEY").ok(),
        })
    }
}

#[async_trait]
impl ImproveService for HttpImproveService {
    async fn improve(
        &self,
        instruction: &str,
        title: &str,
        description: &str,
    ) -> AppResult<Value> {
        let mut request = self.client.post(&self.url).json(&json!({
            "instruction": instruction,
            "title": title,
            "description": description,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let payload = response.json().await?;
        Ok(payload)
    }
}
