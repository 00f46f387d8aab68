use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ideabox::error::AppResult;
use ideabox::{AppState, Assist, Config, ImproveService};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// Stub for the external text-improvement service. Counts calls so tests
/// can prove the rate limiter short-circuits before the wire.
pub struct StubAssist {
    pub calls: AtomicUsize,
    response: Value,
}

impl StubAssist {
    pub fn answering(response: Value) -> Arc<StubAssist> {
        Arc::new(StubAssist {
            calls: AtomicUsize::new(0),
            response,
        })
    }

    pub fn well_formed() -> Arc<StubAssist> {
        Self::answering(json!({
            "improvedText": "A crisper pitch for the same idea.",
            "tags": ["energy", "kitchen"],
        }))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImproveService for StubAssist {
    async fn improve(&self, _: &str, _: &str, _: &str) -> AppResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub db_pool: SqlitePool,
}

impl TestApp {
    pub async fn spawn(assist: Arc<dyn ImproveService>) -> TestApp {
        Self::spawn_with_limit(assist, 5).await
    }

    pub async fn spawn_with_limit(assist: Arc<dyn ImproveService>, limit: i64) -> TestApp {
        let db_pool = ideabox::db::connect_memory().await.unwrap();
        let state = AppState {
            db_pool: db_pool.clone(),
            assist: Assist(assist),
            config: Config {
                assist_daily_limit: limit,
            },
        };
        let app = ideabox::app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        TestApp { addr, db_pool }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh client with its own cookie jar, signed in as `identity`.
    /// Returns the client and the created user's id.
    pub async fn login(&self, identity: &str) -> (reqwest::Client, String) {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();
        let response = client
            .post(self.url("/auth/login"))
            .json(&json!({ "identity": identity }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        let user_id = body["data"]["id"].as_str().unwrap().to_owned();
        (client, user_id)
    }

    /// Role promotion is out-of-band by design; tests do it straight in the
    /// database.
    pub async fn promote_admin(&self, user_id: &str) {
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(user_id)
            .execute(&self.db_pool)
            .await
            .unwrap();
    }

    pub async fn create_idea(&self, client: &reqwest::Client, title: &str) -> String {
        let response = client
            .post(self.url("/ideas"))
            .json(&json!({ "title": title, "description": "a description", "tags": ["one"] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_owned()
    }

    pub async fn submit_idea(&self, client: &reqwest::Client, idea_id: &str) {
        let response = client
            .post(self.url(&format!("/ideas/{idea_id}/submit")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    pub async fn inbox(&self, client: &reqwest::Client) -> Vec<Value> {
        let response = client.get(self.url("/inbox")).send().await.unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        body["data"].as_array().unwrap().clone()
    }
}
