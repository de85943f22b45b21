use anyhow::{Context as _, Result};
use healthsurvey_client::models::{PasswordChange, UserUpdate};

use super::Context;
use crate::cli::{PasswordArgs, ProfileCommands, ProfileUpdateArgs};
use crate::output::{print_success, print_user};

pub async fn run(ctx: &Context, command: Option<&ProfileCommands>) -> Result<()> {
    match command {
        None | Some(ProfileCommands::Show) => show(ctx).await,
        Some(ProfileCommands::Update(args)) => update(ctx, args).await,
        Some(ProfileCommands::Password(args)) => password(ctx, args).await,
    }
}

/// Fetches the profile and refreshes the stored user with it.
async fn show(ctx: &Context) -> Result<()> {
    let profile = ctx.gateway().auth().profile().await?;
    ctx.client
        .store
        .update_user(profile.clone())
        .context("Failed to store profile")?;
    print_user(&profile, ctx.format);
    Ok(())
}

pub fn profile_update(args: &ProfileUpdateArgs) -> UserUpdate {
    UserUpdate {
        email: args.email.clone(),
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        phone: args.phone.clone(),
        department: args.department.clone(),
        specialization: args.specialization.clone(),
        ..Default::default()
    }
}

async fn update(ctx: &Context, args: &ProfileUpdateArgs) -> Result<()> {
    let update = profile_update(args);
    let profile = ctx.gateway().auth().update_profile(&update).await?;
    ctx.client
        .store
        .update_user(profile.clone())
        .context("Failed to store profile")?;
    print_success("Profile updated successfully");
    print_user(&profile, ctx.format);
    Ok(())
}

async fn password(ctx: &Context, args: &PasswordArgs) -> Result<()> {
    if args.new != args.confirm {
        anyhow::bail!("New passwords do not match");
    }
    let change = PasswordChange {
        current_password: args.current.clone(),
        new_password: args.new.clone(),
        confirm_password: args.confirm.clone(),
    };
    ctx.gateway().auth().change_password(&change).await?;
    print_success("Password changed successfully");
    Ok(())
}
