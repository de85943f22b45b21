//! The single HTTP client for the survey backend.
//!
//! Every request takes the same path. The bearer token is read from the
//! [`SessionStore`] and attached, the response is classified by
//! [`classify::classify`], and the [`dispatch::Dispatcher`] carries out the
//! resulting side effects before the caller sees the outcome.

pub mod classify;
pub mod dispatch;
pub mod monitor;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use url::Url;

use crate::api::{AuthApi, QuestionsApi, ResponsesApi, SurveysApi, UsersApi};
use crate::error::{ApiError, ConfigError, FailureKind, Outcome};
use crate::nav::Navigator;
use crate::notify::Notifier;
use crate::session::SessionStore;

use self::classify::{Directive, ResponseShape, classify};
use self::dispatch::Dispatcher;
use self::monitor::ConnectionStatus;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Path probed by [`Gateway::probe`].
pub const PROBE_PATH: &str = "/users/";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub timeout: Duration,
    /// Route of the login view; used to silence notices while it is showing
    /// and as the redirect target on session expiry.
    pub login_path: String,
}

impl GatewayConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Whether a failed request may raise notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notices {
    Shown,
    /// Session expiry still applies; plain error notices are dropped.
    Muted,
}

/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        store: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                dispatcher: Dispatcher::new(store, notifier, navigator, config.login_path),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        self.inner.dispatcher.store()
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        self.inner.dispatcher.notifier()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn surveys(&self) -> SurveysApi<'_> {
        SurveysApi::new(self)
    }

    pub fn questions(&self) -> QuestionsApi<'_> {
        QuestionsApi::new(self)
    }

    pub fn responses(&self) -> ResponsesApi<'_> {
        ResponsesApi::new(self)
    }

    /// Checks whether the backend answers. 200, 401 and 403 all prove it is
    /// up; anything else (including transport failures) counts as down.
    ///
    /// Failures raise no error notices. A 401 on a request that carried a
    /// token still expires the session.
    pub async fn probe(&self) -> ConnectionStatus {
        let outcome = self
            .exchange::<IgnoredAny>(Method::GET, PROBE_PATH, Notices::Muted, |req| req)
            .await;
        match outcome {
            Ok(_) => ConnectionStatus::Connected,
            Err(e) if matches!(e.status, Some(401 | 403)) => ConnectionStatus::Connected,
            Err(_) => ConnectionStatus::Failed,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Outcome<T> {
        self.send(Method::GET, path, |req| req).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Outcome<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, |req| req.query(query)).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Outcome<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, |req| req.json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Outcome<T> {
        self.send(Method::POST, path, |req| req).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Outcome<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, |req| req.json(body)).await
    }

    /// DELETE ignores whatever body the backend sends back.
    pub(crate) async fn delete(&self, path: &str) -> Outcome<()> {
        self.send::<IgnoredAny>(Method::DELETE, path, |req| req)
            .await
            .map(|_| ())
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Outcome<T>
    where
        T: DeserializeOwned,
    {
        self.exchange(method, path, Notices::Shown, build).await
    }

    async fn exchange<T>(
        &self,
        method: Method,
        path: &str,
        notices: Notices,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> Outcome<T>
    where
        T: DeserializeOwned,
    {
        let token = self.store().token();
        let url = format!("{}{}", self.inner.base_url, path);

        let mut req = self.inner.http.request(method.clone(), &url);
        if let Some(token) = &token {
            req = req.bearer_auth(token);
        }
        let req = build(req);

        tracing::debug!(%method, path, authenticated = token.is_some(), "request");

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "transport failure");
                let shape = transport_shape(&e);
                return Err(self.fail(&method, path, token.as_deref(), notices, shape));
            }
        };
        let status = resp.status();
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "failed to read response body");
                let shape = transport_shape(&e);
                return Err(self.fail(&method, path, token.as_deref(), notices, shape));
            }
        };

        if status.is_success() {
            let payload: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return match serde_json::from_slice::<T>(payload) {
                Ok(value) => {
                    tracing::debug!(%method, path, status = status.as_u16(), "response");
                    Ok(value)
                }
                Err(e) => {
                    tracing::warn!(%method, path, error = %e, "response body did not match");
                    Err(self.fail(
                        &method,
                        path,
                        token.as_deref(),
                        notices,
                        ResponseShape::Undecodable {
                            status: status.as_u16(),
                        },
                    ))
                }
            };
        }

        let body: Option<Value> = serde_json::from_slice(&bytes).ok();
        Err(self.fail(
            &method,
            path,
            token.as_deref(),
            notices,
            ResponseShape::Status {
                status: status.as_u16(),
                body: body.as_ref(),
            },
        ))
    }

    fn fail(
        &self,
        method: &Method,
        path: &str,
        token: Option<&str>,
        notices: Notices,
        shape: ResponseShape<'_>,
    ) -> ApiError {
        let dispatcher = &self.inner.dispatcher;
        let disposition = classify(dispatcher.context(token.is_some()), shape);
        match disposition.kind {
            FailureKind::ClientError | FailureKind::Unauthenticated => tracing::debug!(
                %method, path, kind = %disposition.kind, "request rejected"
            ),
            _ => tracing::warn!(%method, path, kind = %disposition.kind, "request failed"),
        }
        if notices == Notices::Shown || disposition.directive != Directive::Notify {
            dispatcher.apply(&disposition, token);
        }
        disposition.into_error(shape)
    }
}

fn transport_shape(e: &reqwest::Error) -> ResponseShape<'static> {
    if e.is_timeout() {
        ResponseShape::TimedOut
    } else {
        ResponseShape::NoResponse
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
