//! Client core for the HealthSurvey dashboard.
//!
//! Three pieces make up the contract every front end relies on:
//!
//! - [`SessionStore`]: who is logged in, with which bearer token.
//! - [`Gateway`]: the only way to reach the backend. Attaches the token,
//!   classifies every failure into a [`FailureKind`] and performs the
//!   user-visible side effects (notices, session expiry, redirect to login).
//! - [`RouteGuard`]: admits or redirects each navigation based on the
//!   session.
//!
//! [`HealthSurveyClient`] wires the three together from a [`ClientConfig`].

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod nav;
pub mod notify;
pub mod session;
pub mod view;

use std::sync::Arc;

pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, FailureKind, Outcome, SessionError, StorageError};
pub use gateway::monitor::{ConnectionMonitor, ConnectionStatus};
pub use gateway::{Gateway, GatewayConfig};
pub use guard::{Access, GuardDecision, MenuItem, RouteGuard, RouteRule, RouteTable, menu_for};
pub use nav::{MemoryNavigator, Navigator};
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use session::{
    FileStorage, MemoryStorage, Session, SessionSnapshot, SessionStorage, SessionStore,
};
pub use view::{Settled, Ticket, ViewSlot};

/// A hydrated session store, a gateway over it and the default route guard.
#[derive(Debug, Clone)]
pub struct HealthSurveyClient {
    pub store: Arc<SessionStore>,
    pub gateway: Gateway,
    pub guard: RouteGuard,
}

impl HealthSurveyClient {
    /// Builds the client over `storage` and hydrates the session from it.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let store = SessionStore::new_shared(storage);
        let gateway = Gateway::new(config.gateway_config()?, store.clone(), notifier, navigator)?;
        let guard = RouteGuard::new(store.clone(), RouteTable::default_table());
        let restored = store.hydrate();
        tracing::debug!(restored, base_url = gateway.base_url(), "client ready");
        Ok(Self {
            store,
            gateway,
            guard,
        })
    }

    /// Same as [`HealthSurveyClient::new`] with the configured file storage.
    pub fn from_config(
        config: &ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let storage = Arc::new(config.session_storage()?);
        Self::new(config, storage, notifier, navigator)
    }

    pub fn monitor(&self, config: &ClientConfig) -> ConnectionMonitor {
        ConnectionMonitor::new(self.gateway.clone(), config.probe_interval())
    }
}
