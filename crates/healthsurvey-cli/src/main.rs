mod banner;
mod cli;
mod commands;
mod observability;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use healthsurvey_client::config::loader;
use healthsurvey_client::guard::{LANDING_PATH, LOGIN_PATH};
use healthsurvey_client::{
    ApiError, ClientConfig, FailureKind, HealthSurveyClient, MemoryNavigator,
};

use banner::BannerNotifier;
use cli::{Cli, Commands};
use commands::Context;
use output::{print_error, print_info};

#[tokio::main]
async fn main() {
    // Load .env if present; a missing file is fine.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Failed to load .env: {e}");
    }

    let cli = Cli::parse();
    observability::init_tracing_with_level("warn");

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(2);
        }
    };
    observability::apply_logging_level(&config.logging.level);

    let route = cli.command.route();
    let banner = Arc::new(BannerNotifier::new());
    let navigator = Arc::new(MemoryNavigator::new(
        route.clone().unwrap_or_else(|| LANDING_PATH.to_string()),
    ));
    let client = match HealthSurveyClient::from_config(&config, banner.clone(), navigator.clone())
    {
        Ok(client) => client,
        Err(e) => {
            print_error(&format!("Failed to start: {e}"));
            std::process::exit(2);
        }
    };

    let ctx = Context {
        client,
        config,
        navigator: navigator.clone(),
        format: cli.format.unwrap_or_default(),
    };

    if let Err(e) = run(&ctx, &cli.command, route.as_deref()).await {
        report(&e, &banner);
        let expired = e
            .downcast_ref::<ApiError>()
            .is_some_and(|api| api.kind == FailureKind::Unauthenticated);
        if expired && navigator.history().iter().any(|p| p == LOGIN_PATH) {
            print_info("Sign in again with: healthsurvey login");
        }
        std::process::exit(1);
    }
}

/// Config file and environment first, then command-line overrides.
fn load_settings(cli: &Cli) -> Result<ClientConfig> {
    let mut config = loader::load_config(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(profile) = &cli.profile {
        config.storage.profile = profile.clone();
    }
    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

/// Prints a failed command's error unless the gateway already announced it.
fn report(e: &anyhow::Error, banner: &BannerNotifier) {
    match e.downcast_ref::<ApiError>() {
        Some(api) => {
            if banner.errors_shown() == 0 {
                print_error(&api.message);
            }
            for (field, message) in api.field_errors() {
                eprintln!("  {field}: {message}");
            }
        }
        None => print_error(&format!("{e:#}")),
    }
}

async fn run(ctx: &Context, command: &Commands, route: Option<&str>) -> Result<()> {
    if let Some(route) = route {
        commands::admit(ctx, route).await?;
    }

    match command {
        Commands::Login(args) => commands::auth::login(ctx, args).await,
        Commands::Register(args) => commands::auth::register(ctx, args).await,
        Commands::Logout => commands::auth::logout(ctx).await,
        Commands::Whoami => commands::auth::whoami(ctx),
        Commands::Profile(args) => commands::profile::run(ctx, args.command.as_ref()).await,
        Commands::Dashboard(args) => commands::dashboard::run(ctx, args).await,
        Commands::Surveys(args) => commands::surveys::run(ctx, &args.command).await,
        Commands::Questions(args) => commands::questions::run(ctx, &args.command).await,
        Commands::Responses(args) => commands::responses::run(ctx, &args.command).await,
        Commands::Users(args) => commands::users::run(ctx, &args.command).await,
        Commands::Status(args) => commands::status::run(ctx, args).await,
        Commands::Menu => commands::status::menu(ctx),
    }
}
