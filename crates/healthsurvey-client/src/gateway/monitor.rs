//! Periodic backend reachability checks.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use super::Gateway;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Failed,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking..."),
            Self::Connected => write!(f, "Backend Connected"),
            Self::Failed => write!(f, "Backend Disconnected"),
        }
    }
}

/// Publishes the backend's reachability to subscribers, re-probing on a
/// fixed interval once started.
pub struct ConnectionMonitor {
    gateway: Gateway,
    every: Duration,
    status: watch::Sender<ConnectionStatus>,
}

impl ConnectionMonitor {
    pub fn new(gateway: Gateway, every: Duration) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Checking);
        Self {
            gateway,
            every,
            status,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Probes once and publishes the result.
    pub async fn check_now(&self) -> ConnectionStatus {
        self.status.send_replace(ConnectionStatus::Checking);
        let status = self.gateway.probe().await;
        debug!(%status, "connection probe");
        self.status.send_replace(status);
        status
    }

    /// Runs the probe loop in a background task. The first probe happens
    /// immediately.
    ///
    /// Returns a shutdown sender; sending `true` stops the loop.
    pub fn start(self) -> (watch::Receiver<ConnectionStatus>, watch::Sender<bool>) {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let status_rx = self.subscribe();

        tokio::spawn(async move {
            info!(interval_secs = self.every.as_secs(), "connection monitor started");
            let mut ticker = interval(self.every);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.check_now().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("connection monitor shutting down");
                            break;
                        }
                    }
                }
            }
        });

        (status_rx, shutdown_tx)
    }
}
