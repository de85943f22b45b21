use anyhow::Result;
use healthsurvey_client::models::UserFilters;

use super::Context;
use super::auth::new_user;
use super::profile::profile_update;
use crate::cli::{OutputFormat, UserCommands};
use crate::output::{label, print_json, print_success, print_user, print_users};

pub async fn run(ctx: &Context, command: &UserCommands) -> Result<()> {
    let api = ctx.gateway().users();
    match command {
        UserCommands::List { role, search } => {
            let filters = UserFilters {
                role: *role,
                search: search.clone(),
            };
            let listing = api.list(&filters).await?;
            print_users(&listing, ctx.format);
        }
        UserCommands::Get { id } => {
            let user = api.get(*id).await?;
            print_user(&user, ctx.format);
        }
        UserCommands::Create(args) => {
            let user = api.create(&new_user(args)).await?;
            print_success(&format!("User created successfully (id {})", user.id));
        }
        UserCommands::Update(args) => {
            let mut update = profile_update(&args.profile);
            update.role = args.role;
            update.is_active = args.active;
            update.password = args.password.clone();
            api.update(args.id, &update).await?;
            print_success("User updated successfully");
        }
        UserCommands::Delete { id } => {
            api.delete(*id).await?;
            print_success("User deleted successfully");
        }
        UserCommands::Stats => {
            let stats = api.stats().await?;
            if ctx.format == OutputFormat::Json {
                print_json(&stats);
                return Ok(());
            }
            label("Total users", stats.total_users);
            label("Active users", stats.active_users);
            for (role, count) in &stats.users_by_role {
                let name = role
                    .parse::<healthsurvey_client::models::Role>()
                    .map(|r| r.label())
                    .unwrap_or(role.as_str());
                label(name, count);
            }
        }
    }
    Ok(())
}
