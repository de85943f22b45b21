use anyhow::Result;
use healthsurvey_client::models::{ResponseFilters, ResponseInput, ResponseUpdate};

use super::{Context, read_json};
use crate::cli::ResponseCommands;
use crate::output::{print_response, print_responses, print_success};

pub async fn run(ctx: &Context, command: &ResponseCommands) -> Result<()> {
    let api = ctx.gateway().responses();
    match command {
        ResponseCommands::List(args) => {
            let filters = ResponseFilters {
                is_complete: args.complete,
                search: args.search.clone(),
            };
            let listing = api.list(args.survey, &filters).await?;
            print_responses(&listing, ctx.format);
        }
        ResponseCommands::Get { id } => {
            let response = api.get(*id).await?;
            print_response(&response, ctx.format);
        }
        ResponseCommands::Create { file } => {
            let input: ResponseInput = read_json(file)?;
            let response = api.create(&input).await?;
            print_success(&format!("Response submitted (id {})", response.id));
        }
        ResponseCommands::Update { id, complete } => {
            let update = ResponseUpdate {
                is_complete: Some(*complete),
                ..Default::default()
            };
            api.update(*id, &update).await?;
            print_success("Response updated successfully");
        }
        ResponseCommands::Delete { id } => {
            api.delete(*id).await?;
            print_success("Response deleted successfully");
        }
    }
    Ok(())
}
