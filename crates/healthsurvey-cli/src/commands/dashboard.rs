//! The landing view: role-specific counters and the most recent surveys.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use healthsurvey_client::models::{DashboardStats, Listing, Survey, SurveyFilters};
use healthsurvey_client::{Settled, ViewSlot};
use serde::Serialize;

use super::Context;
use crate::cli::{DashboardArgs, OutputFormat};
use crate::output::{label, print_json, print_surveys};

const RECENT_SURVEYS: usize = 5;

#[derive(Serialize)]
struct DashboardView<'a> {
    stats: Option<&'a DashboardStats>,
    recent_surveys: &'a [Survey],
}

struct Dashboard {
    stats: ViewSlot<DashboardStats>,
    surveys: ViewSlot<Listing<Survey>>,
}

impl Dashboard {
    fn new() -> Self {
        Self {
            stats: ViewSlot::new(),
            surveys: ViewSlot::new(),
        }
    }

    /// Loads both panels concurrently. A failed panel keeps what it showed.
    async fn refresh(&self, ctx: &Context) -> bool {
        let stats_ticket = self.stats.begin();
        let surveys_ticket = self.surveys.begin();
        let api = ctx.gateway().surveys();
        let filters = SurveyFilters::default();
        let (stats, surveys) = tokio::join!(api.dashboard_stats(), api.list(&filters));
        let stats = self.stats.settle(stats_ticket, stats);
        let surveys = self.surveys.settle(surveys_ticket, surveys);
        stats == Settled::Updated || surveys == Settled::Updated
    }

    fn render(&self, ctx: &Context) {
        let stats = self.stats.value();
        let surveys: Vec<Survey> = self
            .surveys
            .value()
            .map(|l| l.into_items().into_iter().take(RECENT_SURVEYS).collect())
            .unwrap_or_default();

        if ctx.format == OutputFormat::Json {
            return print_json(&DashboardView {
                stats: stats.as_ref(),
                recent_surveys: &surveys,
            });
        }

        if let Some(user) = ctx.client.store.user() {
            println!(
                "{} {} ({})",
                "Welcome,".bold(),
                user.display_name().bold(),
                user.role.label()
            );
        }
        match stats {
            Some(stats) => {
                for (name, value) in stats.counters() {
                    label(name, value);
                }
            }
            None => println!("Statistics unavailable."),
        }
        println!("\n{}", "Recent surveys".bold());
        print_surveys(&Listing::Items(surveys), OutputFormat::Table);
    }
}

pub async fn run(ctx: &Context, args: &DashboardArgs) -> Result<()> {
    let dashboard = Dashboard::new();
    dashboard.refresh(ctx).await;
    dashboard.render(ctx);

    let Some(secs) = args.refresh else {
        return Ok(());
    };
    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !ctx.client.store.is_authenticated() {
                    anyhow::bail!("Session ended");
                }
                if dashboard.refresh(ctx).await {
                    println!();
                    dashboard.render(ctx);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                dashboard.stats.unmount();
                dashboard.surveys.unmount();
                return Ok(());
            }
        }
    }
}
