// tests/session_tests.rs

use std::sync::Arc;

use journeys::{
    config::Config,
    routes,
    state::AppState,
    store::{MemoryStore, seed::seed_demo},
};
use serde_json::{Value, json};

async fn spawn_app(auto_advance: bool) -> String {
    let store = Arc::new(MemoryStore::new());
    seed_demo(store.as_ref()).await.expect("Failed to seed demo journey");

    let config = Config {
        database_url: None,
        jwt_secret: "session_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        auto_advance,
        admin_username: None,
        admin_password: None,
    };

    let app = routes::create_router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

struct Learner {
    client: reqwest::Client,
    address: String,
    token: String,
}

impl Learner {
    async fn sign_up(address: &str) -> Self {
        let client = reqwest::Client::new();
        let username = format!("s_{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let credentials = json!({ "username": username, "password": "password123" });

        client
            .post(format!("{}/api/auth/register", address))
            .json(&credentials)
            .send()
            .await
            .expect("Register failed");
        let login: Value = client
            .post(format!("{}/api/auth/login", address))
            .json(&credentials)
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .unwrap();

        Self {
            client,
            address: address.to_string(),
            token: login["token"].as_str().expect("Token not found").to_string(),
        }
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> Value {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(&self.token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Starts the demo journey; returns the session id and the first snapshot.
    async fn start(&self) -> (String, Value) {
        let journeys: Value = self.get("/api/journeys").await;
        let journey_id = journeys[0]["id"].as_i64().unwrap();

        let resp = self.post("/api/sessions", json!({ "journey_id": journey_id })).await;
        assert_eq!(resp.status().as_u16(), 201);
        let body: Value = resp.json().await.unwrap();

        (body["session_id"].as_str().unwrap().to_string(), body["session"].clone())
    }

    async fn submit(&self, session_id: &str, submission: Value) -> Value {
        let resp = self
            .post(
                &format!("/api/sessions/{}/submit", session_id),
                json!({ "submission": submission }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200);
        resp.json().await.unwrap()
    }
}

/// Correct submissions for the current demo challenge. Matching needs one per pair.
fn correct_answers(current: &Value) -> Vec<Value> {
    match current["title"].as_str().unwrap() {
        "Clickbait or news?" => vec![json!({ "type": "option", "option_id": 2 })],
        "Name the fallacies" => vec![json!({ "type": "options", "option_ids": [1, 2] })],
        "Loaded words" => vec![json!({ "type": "words", "words": ["radical", "destroy"] })],
        "Claims and their support" => (1..=3)
            .map(|id| json!({ "type": "pair", "claim_id": id, "evidence_id": id }))
            .collect(),
        "Find the leap" => vec![json!({
            "type": "spans",
            "spans": [{ "text": "so this must be the best toothpaste" }]
        })],
        other => panic!("unexpected demo challenge {}", other),
    }
}

fn wrong_answer(current: &Value) -> Value {
    match current["title"].as_str().unwrap() {
        "Clickbait or news?" => json!({ "type": "option", "option_id": 1 }),
        "Name the fallacies" => json!({ "type": "options", "option_ids": [1] }),
        "Loaded words" => json!({ "type": "words", "words": ["peaceful"] }),
        "Claims and their support" => json!({ "type": "pair", "claim_id": 1, "evidence_id": 2 }),
        "Find the leap" => json!({ "type": "spans", "spans": [{ "text": "Nine out of ten" }] }),
        other => panic!("unexpected demo challenge {}", other),
    }
}

/// Submits every correct answer for the current challenge; returns the last response.
async fn pass_current(learner: &Learner, session_id: &str, current: &Value) -> Value {
    let mut last = Value::Null;
    for answer in correct_answers(current) {
        last = learner.submit(session_id, answer).await;
    }
    last
}

#[tokio::test]
async fn reveal_unlocks_after_three_wrong_attempts() {
    let address = spawn_app(false).await;
    let learner = Learner::sign_up(&address).await;
    let (session_id, snapshot) = learner.start().await;
    let current = snapshot["current"].clone();

    let locked = learner
        .post(&format!("/api/sessions/{}/reveal", session_id), json!({}))
        .await;
    assert_eq!(locked.status().as_u16(), 400);

    for attempt in 1..=3 {
        let result = learner.submit(&session_id, wrong_answer(&current)).await;
        assert_eq!(result["verdict"], "incorrect");
        assert_eq!(result["wrong_attempts"], attempt);
        assert_eq!(result["can_reveal"], attempt >= 3);
    }

    // A fourth wrong answer keeps counting and keeps the reveal available
    let fourth = learner.submit(&session_id, wrong_answer(&current)).await;
    assert_eq!(fourth["wrong_attempts"], 4);
    assert_eq!(fourth["can_reveal"], true);

    let revealed = learner
        .post(&format!("/api/sessions/{}/reveal", session_id), json!({}))
        .await;
    assert_eq!(revealed.status().as_u16(), 200);
    let revealed: Value = revealed.json().await.unwrap();
    assert_eq!(revealed["answer"]["type"], current["type"]);
    assert_eq!(revealed["session"]["answer_revealed"], true);

    // Skipping a revealed challenge records nothing
    let advanced = learner
        .post(&format!("/api/sessions/{}/advance", session_id), json!({}))
        .await;
    assert_eq!(advanced.status().as_u16(), 200);
    let advanced: Value = advanced.json().await.unwrap();
    assert_eq!(advanced["session"]["current_index"], 1);
    assert_eq!(advanced["session"]["wrong_attempts"], 0);

    let achievements = learner.get("/api/me/achievements").await;
    assert_eq!(achievements["total_challenges_completed"], 0);
}

#[tokio::test]
async fn correct_answer_records_completion_once() {
    let address = spawn_app(false).await;
    let learner = Learner::sign_up(&address).await;
    let (session_id, snapshot) = learner.start().await;
    let current = snapshot["current"].clone();

    learner.submit(&session_id, wrong_answer(&current)).await;
    let passed = pass_current(&learner, &session_id, &current).await;

    assert_eq!(passed["verdict"], "correct");
    assert_eq!(passed["wrong_attempts"], 0);
    assert_eq!(passed["phase"], "correct");
    assert_eq!(passed["summary"]["already_completed"], false);
    assert_eq!(passed["summary"]["xp_earned"], current["xp_reward"]);
    assert!(
        passed["summary"]["totals"]["badges_awarded"]
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b == "First Steps")
    );

    // Submitting again before advancing is not a second completion
    let repeat = learner
        .submit(&session_id, correct_answers(&current).pop().unwrap())
        .await;
    assert_eq!(repeat["verdict"], "correct");
    assert_eq!(repeat["summary"]["already_completed"], true);
    assert_eq!(repeat["summary"]["xp_earned"], 0);

    let achievements = learner.get("/api/me/achievements").await;
    assert_eq!(achievements["total_challenges_completed"], 1);
    assert_eq!(achievements["total_xp"], current["xp_reward"]);
    assert_eq!(achievements["streak_count"], 1);
}

#[tokio::test]
async fn advance_requires_an_answer() {
    let address = spawn_app(false).await;
    let learner = Learner::sign_up(&address).await;
    let (session_id, _) = learner.start().await;

    let resp = learner
        .post(&format!("/api/sessions/{}/advance", session_id), json!({}))
        .await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn empty_and_mismatched_submissions_are_rejected() {
    let address = spawn_app(false).await;
    let learner = Learner::sign_up(&address).await;
    let (session_id, snapshot) = learner.start().await;

    let mismatched = match snapshot["current"]["type"].as_str().unwrap() {
        "word-selection" => json!({ "type": "option", "option_id": 1 }),
        _ => json!({ "type": "words", "words": ["anything"] }),
    };

    let empty = learner
        .post(
            &format!("/api/sessions/{}/submit", session_id),
            json!({ "submission": { "type": "spans", "spans": [] } }),
        )
        .await;
    assert_eq!(empty.status().as_u16(), 400);

    let wrong_kind = learner
        .post(
            &format!("/api/sessions/{}/submit", session_id),
            json!({ "submission": mismatched }),
        )
        .await;
    assert_eq!(wrong_kind.status().as_u16(), 400);

    let session = learner.get(&format!("/api/sessions/{}", session_id)).await;
    assert_eq!(session["wrong_attempts"], 0);
}

#[tokio::test]
async fn sessions_belong_to_their_learner() {
    let address = spawn_app(false).await;
    let owner = Learner::sign_up(&address).await;
    let other = Learner::sign_up(&address).await;
    let (session_id, _) = owner.start().await;

    let resp = other
        .client
        .get(format!("{}/api/sessions/{}", address, session_id))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn full_journey_with_auto_advance() {
    let address = spawn_app(true).await;
    let learner = Learner::sign_up(&address).await;
    let (session_id, mut snapshot) = learner.start().await;
    assert_eq!(snapshot["total"], 5);

    let mut last = Value::Null;
    while snapshot["phase"] == "answering" {
        last = pass_current(&learner, &session_id, &snapshot["current"]).await;
        assert_eq!(last["verdict"], "correct");
        assert_eq!(last["advanced"], true);
        snapshot = last["session"].clone();
    }

    assert_eq!(snapshot["phase"], "completed");
    assert!(snapshot["current"].is_null());
    assert_eq!(snapshot["completed_ids"].as_array().unwrap().len(), 5);
    assert!(last["journey_badges"].is_object());

    let achievements = learner.get("/api/me/achievements").await;
    assert_eq!(achievements["total_challenges_completed"], 5);
    assert_eq!(achievements["total_xp"], 70);

    let badges: Vec<&str> = achievements["badges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert!(badges.contains(&"First Steps"));
    assert!(badges.contains(&"Perfect Score"));
    assert!(!badges.contains(&"Journey Pioneer"));

    // A finished session is released
    let after = learner
        .post(
            &format!("/api/sessions/{}/submit", session_id),
            json!({ "submission": { "type": "option", "option_id": 1 } }),
        )
        .await;
    assert_eq!(after.status().as_u16(), 404);
}

#[tokio::test]
async fn restarting_a_journey_replaces_the_session() {
    let address = spawn_app(false).await;
    let learner = Learner::sign_up(&address).await;
    let (first, _) = learner.start().await;
    let (second, _) = learner.start().await;

    let old = learner
        .client
        .get(format!("{}/api/sessions/{}", address, first))
        .bearer_auth(&learner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(old.status().as_u16(), 404);

    let current = learner.get(&format!("/api/sessions/{}", second)).await;
    assert_eq!(current["phase"], "answering");
}
