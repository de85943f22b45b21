//! Carries out the side effects a [`Disposition`] asks for.

use std::sync::Arc;

use crate::gateway::classify::{ClassifyContext, Directive, Disposition};
use crate::nav::{Navigator, is_login_path};
use crate::notify::{Notice, Notifier};
use crate::session::SessionStore;

pub struct Dispatcher {
    store: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl Dispatcher {
    pub fn new(
        store: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Context for classifying a response that just arrived.
    pub fn context(&self, had_token: bool) -> ClassifyContext {
        ClassifyContext {
            had_token,
            on_login_view: is_login_path(&self.navigator.current_path(), &self.login_path),
        }
    }

    /// `token` is the bearer token the failed request carried.
    pub fn apply(&self, disposition: &Disposition, token: Option<&str>) {
        match disposition.directive {
            Directive::Silent => {}
            Directive::Notify => self.notifier.notify(Notice::error(&disposition.message)),
            Directive::ExpireSession { announce } => {
                // Only the response that actually cleared the session speaks.
                let Some(token) = token else { return };
                if !self.store.expire(token) {
                    tracing::debug!("session already cleared by an earlier response");
                    return;
                }
                tracing::info!("session expired by backend");
                if announce {
                    self.notifier.notify(Notice::error(&disposition.message));
                    self.navigator.navigate(&self.login_path);
                }
            }
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::gateway::classify::{ResponseShape, classify};
    use crate::models::{Role, User};
    use crate::nav::MemoryNavigator;
    use crate::notify::RecordingNotifier;
    use crate::session::storage::MemoryStorage;

    struct Fixture {
        store: Arc<SessionStore>,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<MemoryNavigator>,
        dispatcher: Dispatcher,
    }

    fn fixture(start: &str) -> Fixture {
        let store = SessionStore::new_shared(Arc::new(MemoryStorage::new()));
        store.hydrate();
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(MemoryNavigator::new(start));
        let dispatcher = Dispatcher::new(
            store.clone(),
            notifier.clone(),
            navigator.clone(),
            "/login",
        );
        Fixture {
            store,
            notifier,
            navigator,
            dispatcher,
        }
    }

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "username": "nurse",
            "email": "nurse@example.org",
            "first_name": "Ada",
            "last_name": "Lee",
            "role": "healthcare_provider"
        }))
        .unwrap()
    }

    #[test]
    fn expiry_clears_once_and_announces_once() {
        let f = fixture("/surveys");
        f.store.login(user(), "tok").unwrap();

        let ctx = f.dispatcher.context(true);
        let shape = ResponseShape::Status {
            status: 401,
            body: None,
        };
        let d = classify(ctx, shape);
        assert_eq!(d.kind, FailureKind::Unauthenticated);

        f.dispatcher.apply(&d, Some("tok"));
        f.dispatcher.apply(&d, Some("tok"));

        assert!(!f.store.is_authenticated());
        assert_eq!(f.notifier.messages().len(), 1);
        assert_eq!(f.navigator.history(), vec!["/login".to_string()]);
    }

    #[test]
    fn stale_token_does_not_clear_new_session() {
        let f = fixture("/dashboard");
        f.store.login(user(), "new-token").unwrap();
        let d = classify(
            f.dispatcher.context(true),
            ResponseShape::Status {
                status: 401,
                body: None,
            },
        );
        f.dispatcher.apply(&d, Some("old-token"));
        assert_eq!(f.store.token().as_deref(), Some("new-token"));
        assert!(f.notifier.notices().is_empty());
        assert_eq!(f.store.role(), Some(Role::HealthcareProvider));
    }

    #[test]
    fn expiry_on_login_view_is_quiet() {
        let f = fixture("/login");
        f.store.login(user(), "tok").unwrap();
        let d = classify(
            f.dispatcher.context(true),
            ResponseShape::Status {
                status: 401,
                body: None,
            },
        );
        f.dispatcher.apply(&d, Some("tok"));
        assert!(!f.store.is_authenticated());
        assert!(f.notifier.notices().is_empty());
        assert!(f.navigator.history().is_empty());
    }
}
