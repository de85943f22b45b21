mod common;

use std::sync::Arc;

use common::{Harness, user, user_json};
use healthsurvey_client::models::{Credentials, UserUpdate};
use healthsurvey_client::{
    ClientConfig, FileStorage, GuardDecision, HealthSurveyClient, MemoryNavigator,
    RecordingNotifier, SessionStorage, SessionStore,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn login_then_hydrate_restores_equal_session() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let storage: Arc<dyn SessionStorage> =
        Arc::new(FileStorage::for_profile(Some(dir.path()), "default").unwrap());

    let first = SessionStore::new(storage.clone());
    first.hydrate();
    first.login(user(3, "researcher"), "tok-3").unwrap();

    let second = SessionStore::new(storage.clone());
    assert!(second.hydrate());
    assert_eq!(second.session(), first.session());
    assert_eq!(second.token().as_deref(), Some("tok-3"));

    second.logout();
    let third = SessionStore::new(storage);
    assert!(!third.hydrate());
    assert!(!third.is_authenticated());
}

#[tokio::test]
async fn login_flow_moves_public_route_to_landing() {
    let h = Harness::start("/login").await;
    let guard = healthsurvey_client::RouteGuard::new(h.store.clone(), Default::default());
    assert_eq!(guard.admit("/login").await, GuardDecision::Render);

    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user": user_json(6, "patient"), "token": "t-6"})),
        )
        .mount(&h.server)
        .await;

    let auth = h
        .gateway
        .auth()
        .login(&Credentials {
            username: "user6".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    h.store.login(auth.user, auth.token).unwrap();

    assert_eq!(
        guard.admit("/login").await,
        GuardDecision::Redirect("/dashboard".into())
    );
    assert_eq!(
        guard.admit("/users").await,
        GuardDecision::Redirect("/dashboard".into())
    );
    assert_eq!(guard.admit("/responses").await, GuardDecision::Render);
}

#[tokio::test]
async fn profile_update_keeps_token() {
    let h = Harness::start("/settings").await;
    h.login_as(4, "healthcare_provider", "tok-4");
    let mut updates = h.store.subscribe();
    updates.borrow_and_update();

    let mut refreshed = user_json(4, "healthcare_provider");
    refreshed["department"] = json!("Cardiology");
    Mock::given(method("PUT"))
        .and(path("/api/users/profile/update/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(refreshed))
        .mount(&h.server)
        .await;

    let profile = h
        .gateway
        .auth()
        .update_profile(&UserUpdate {
            department: Some("Cardiology".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(h.store.update_user(profile).unwrap());

    assert!(updates.has_changed().unwrap());
    assert_eq!(h.store.token().as_deref(), Some("tok-4"));
    let stored = h.store.user().unwrap();
    assert_eq!(stored.department.as_deref(), Some("Cardiology"));
    assert_eq!(stored.username, "user4");
}

#[tokio::test]
async fn client_wires_store_gateway_and_guard() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let storage = FileStorage::for_profile(Some(dir.path()), "default").unwrap();
    storage
        .save(
            "persisted",
            &serde_json::to_string(&user(1, "admin")).unwrap(),
        )
        .unwrap();

    let mut config = ClientConfig::default();
    config.storage.dir = Some(dir.path().to_path_buf());

    let client = HealthSurveyClient::from_config(
        &config,
        Arc::new(RecordingNotifier::new()),
        Arc::new(MemoryNavigator::new("/")),
    )
    .unwrap();

    assert!(client.store.is_hydrated());
    assert_eq!(client.store.token().as_deref(), Some("persisted"));
    assert_eq!(client.guard.admit("/users").await, GuardDecision::Render);
    assert_eq!(client.gateway.base_url(), "http://localhost:8000/api");
}
