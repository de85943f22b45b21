use anyhow::Result;
use colored::Colorize;
use healthsurvey_client::{ConnectionStatus, menu_for};

use super::Context;
use crate::cli::{OutputFormat, StatusArgs};
use crate::output::{label, print_json};

fn show(status: ConnectionStatus) {
    let text = status.to_string();
    match status {
        ConnectionStatus::Connected => println!("{} {}", "●".green(), text.green()),
        ConnectionStatus::Failed => println!("{} {}", "●".red(), text.red()),
        ConnectionStatus::Checking => println!("{} {}", "●".yellow(), text.yellow()),
    }
}

pub async fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    label("Server", ctx.gateway().base_url());
    if !args.watch {
        let status = ctx.gateway().probe().await;
        // The failure line comes from the error report.
        if status == ConnectionStatus::Failed {
            anyhow::bail!("{status}");
        }
        show(status);
        return Ok(());
    }

    let (mut status, shutdown) = ctx.client.monitor(&ctx.config).start();
    show(*status.borrow_and_update());
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                show(current);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    let _ = shutdown.send(true);
    Ok(())
}

/// Prints the navigation entries for the signed-in role.
pub fn menu(ctx: &Context) -> Result<()> {
    let current = ctx.client.guard.table().landing_path().to_string();
    let items = menu_for(ctx.client.store.role());
    if ctx.format == OutputFormat::Json {
        let entries: Vec<_> = items
            .iter()
            .map(|m| serde_json::json!({"label": m.label, "path": m.path}))
            .collect();
        print_json(&entries);
        return Ok(());
    }
    for item in items {
        if item.is_active(&current) {
            println!("{} {:<16} {}", "▸".cyan(), item.label.bold(), item.path.dimmed());
        } else {
            println!("  {:<16} {}", item.label, item.path.dimmed());
        }
    }
    Ok(())
}
