pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod questions;
pub mod responses;
pub mod status;
pub mod surveys;
pub mod users;

use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use healthsurvey_client::guard::Access;
use healthsurvey_client::{
    ClientConfig, Gateway, GuardDecision, HealthSurveyClient, MemoryNavigator, Navigator,
};
use serde::de::DeserializeOwned;

use crate::cli::OutputFormat;

/// Everything a command needs.
pub struct Context {
    pub client: HealthSurveyClient,
    pub config: ClientConfig,
    pub navigator: Arc<MemoryNavigator>,
    pub format: OutputFormat,
}

impl Context {
    pub fn gateway(&self) -> &Gateway {
        &self.client.gateway
    }
}

/// Runs the route guard for the view a command stands in for.
pub async fn admit(ctx: &Context, route: &str) -> Result<()> {
    match ctx.client.guard.admit(route).await {
        GuardDecision::Render => Ok(()),
        GuardDecision::Pending => anyhow::bail!("Session is not ready yet"),
        GuardDecision::Redirect(to) => {
            ctx.navigator.navigate(&to);
            let table = ctx.client.guard.table();
            let public = table
                .rule_for(route)
                .is_some_and(|rule| rule.access == Access::Public);
            if to == table.login_path() {
                anyhow::bail!("Not signed in. Run: healthsurvey login");
            }
            if public {
                let who = ctx
                    .client
                    .store
                    .user()
                    .map(|u| u.username)
                    .unwrap_or_default();
                anyhow::bail!("Already signed in as {who}. Run: healthsurvey logout");
            }
            let role = ctx
                .client
                .store
                .role()
                .map(|r| r.label())
                .unwrap_or("Unknown");
            anyhow::bail!("{role} accounts cannot open {route}")
        }
    }
}

/// Reads a JSON document from `file`, or from stdin when `file` is `-`.
pub fn read_json<T: DeserializeOwned>(file: &str) -> Result<T> {
    let content = if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        fs::read_to_string(file).with_context(|| format!("Failed to read file: {file}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {file}"))
}
