#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use healthsurvey_client::models::User;
use healthsurvey_client::{
    Gateway, GatewayConfig, MemoryNavigator, MemoryStorage, RecordingNotifier, SessionStore,
};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub store: Arc<SessionStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<MemoryNavigator>,
    pub gateway: Gateway,
}

impl Harness {
    pub async fn start(at: &str) -> Self {
        Self::with_timeout(at, Duration::from_secs(5)).await
    }

    pub async fn with_timeout(at: &str, timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let base = Url::parse(&format!("{}/api", server.uri())).expect("mock url");
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new_shared(storage.clone());
        store.hydrate();
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(MemoryNavigator::new(at));
        let gateway = Gateway::new(
            GatewayConfig::new(base).with_timeout(timeout),
            store.clone(),
            notifier.clone(),
            navigator.clone(),
        )
        .expect("gateway");
        Self {
            server,
            storage,
            store,
            notifier,
            navigator,
            gateway,
        }
    }

    pub fn login_as(&self, id: i64, role: &str, token: &str) {
        self.store.login(user(id, role), token).expect("login");
    }

    /// `Authorization` header values of every request the mock received.
    pub async fn auth_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

pub fn user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "username": format!("user{id}"),
        "email": format!("user{id}@clinic.test"),
        "first_name": "Sam",
        "last_name": "Reed",
        "role": role,
        "is_active": true
    })
}

pub fn user(id: i64, role: &str) -> User {
    serde_json::from_value(user_json(id, role)).expect("user fixture")
}

pub fn survey_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "category": "general",
        "status": "draft",
        "is_anonymous": false,
        "allow_multiple_responses": false,
        "estimated_duration": 5,
        "target_roles": ["patient"],
        "target_departments": [],
        "total_questions": 0,
        "total_responses": 0,
        "created_at": "2024-05-01T09:30:00Z"
    })
}

pub fn question_json(id: i64, text: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "type": "rating",
        "order": 1,
        "is_required": true,
        "options": [],
        "min_value": 1,
        "max_value": 5
    })
}

pub fn response_json(id: i64, survey: i64) -> Value {
    json!({
        "id": id,
        "survey": survey,
        "survey_title": "Intake",
        "is_complete": true,
        "answers": [
            {"id": 1, "question": 10, "question_text": "Pain level", "question_type": "rating", "number_answer": 3}
        ]
    })
}
