use anyhow::{Context as _, Result};
use colored::Colorize;
use healthsurvey_client::Navigator;
use healthsurvey_client::guard::LANDING_PATH;
use healthsurvey_client::models::{Credentials, NewUser};

use super::Context;
use crate::cli::{LoginArgs, RegisterArgs};
use crate::output::{label, print_error, print_success, print_user};

pub async fn login(ctx: &Context, args: &LoginArgs) -> Result<()> {
    let credentials = Credentials {
        username: args.username.clone(),
        password: args.password.clone(),
    };
    let auth = ctx.gateway().auth().login(&credentials).await?;
    let name = auth.user.display_name().to_string();
    ctx.client
        .store
        .login(auth.user, auth.token)
        .context("Failed to store session")?;
    ctx.navigator.navigate(LANDING_PATH);
    print_success(&format!("Welcome back, {name}!"));
    Ok(())
}

pub fn new_user(args: &RegisterArgs) -> NewUser {
    NewUser {
        username: args.username.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        role: Some(args.role),
        phone: args.phone.clone(),
        date_of_birth: args.date_of_birth.clone(),
        department: args.department.clone(),
        specialization: args.specialization.clone(),
        medical_id: args.medical_id.clone(),
    }
}

pub async fn register(ctx: &Context, args: &RegisterArgs) -> Result<()> {
    let auth = ctx.gateway().auth().register(&new_user(args)).await?;
    let name = auth.user.display_name().to_string();
    ctx.client
        .store
        .login(auth.user, auth.token)
        .context("Failed to store session")?;
    ctx.navigator.navigate(LANDING_PATH);
    print_success(&format!("Welcome to HealthSurvey, {name}!"));
    Ok(())
}

/// Tells the backend, then always clears the local session.
pub async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.client.store.is_authenticated() {
        println!(
            "Not signed in (profile \"{}\")",
            ctx.config.storage.profile
        );
        return Ok(());
    }
    if let Err(e) = ctx.gateway().auth().logout().await {
        tracing::debug!(error = %e, "backend logout failed");
    }
    ctx.client.store.logout();
    print_success("Logged out successfully");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.client.store.session();
    let (Some(user), Some(token)) = (session.user(), session.token()) else {
        print_error(&format!(
            "Not signed in (profile \"{}\")",
            ctx.config.storage.profile
        ));
        return Ok(());
    };
    print_user(user, ctx.format);
    label("Profile", &ctx.config.storage.profile);
    label("Server", ctx.gateway().base_url().cyan());
    label("Token", token_preview(token));
    Ok(())
}

fn token_preview(token: &str) -> String {
    if token.len() > 20 && token.is_ascii() {
        format!("{}...{}", &token[..6], &token[token.len() - 4..])
    } else {
        "*".repeat(token.len().min(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_preview_hides_most_of_the_token() {
        let t = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";
        assert_eq!(token_preview(t), "9944b0...ee4b");
        assert_eq!(token_preview("short"), "*****");
    }
}
