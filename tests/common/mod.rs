#![allow(dead_code)]

use std::time::Duration;

use chirp::{get_random_free_port, make_router, run_app, Config};
use serde_json::{json, Value};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
    pub username: String,
}

/// Starts the server on a free port against a fresh SQLite file and waits
/// until it answers the health check.
pub async fn spawn_app() -> TestApp {
    let (port, bind_address) = get_random_free_port();
    let db_path = std::env::temp_dir().join(format!(
        "chirp-test-{}-{}.db",
        std::process::id(),
        rand::random::<u64>()
    ));
    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        jwt_secret: "integration-test-secret".to_string(),
        bind_address,
        max_connections: 5,
        jwt_expiry_days: 1,
    };
    tokio::spawn(async move {
        if let Err(error) = run_app(make_router(), config).await {
            eprintln!("test server failed: {:#}", error);
        }
    });

    let app = TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    };
    for _ in 0..200 {
        if let Ok(response) = app.client.get(app.url("/check_health")).send().await {
            if response.status().is_success() {
                return app;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("server on port {} never became healthy", port);
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "password123",
            }))
            .send()
            .await
            .expect("register request failed");
        assert_eq!(response.status(), 201, "could not register {}", username);
        let body: Value = response.json().await.unwrap();
        TestUser {
            id: body["user"]["id"].as_i64().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
            username: username.to_string(),
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("GET request failed")
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("POST request failed")
    }

    pub async fn patch_json(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self.client.patch(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("PATCH request failed")
    }

    pub async fn toggle_follow(&self, actor: &TestUser, target: i64) -> reqwest::Response {
        self.post_json(
            &format!("/users/{}/toggle-follow", target),
            Some(&actor.token),
            json!({ "followerId": actor.id }),
        )
        .await
    }

    pub async fn create_post(&self, author: &TestUser, content: &str) -> i64 {
        let response = self
            .post_json("/posts", Some(&author.token), json!({ "content": content }))
            .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        body["post"]["id"].as_i64().unwrap()
    }
}
