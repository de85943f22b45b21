use anyhow::Result;
use healthsurvey_client::models::{SurveyFilters, SurveyInput};

use super::{Context, read_json};
use crate::cli::{SurveyCommands, SurveyFormArgs, SurveyListArgs};
use crate::output::{print_analytics, print_success, print_survey, print_surveys};

pub async fn run(ctx: &Context, command: &SurveyCommands) -> Result<()> {
    let api = ctx.gateway().surveys();
    match command {
        SurveyCommands::List(args) => {
            let listing = api.list(&filters(args)).await?;
            print_surveys(&listing, ctx.format);
        }
        SurveyCommands::Get { id } => {
            let survey = api.get(*id).await?;
            print_survey(&survey, ctx.format);
        }
        SurveyCommands::Create(args) => {
            let survey = api.create(&survey_input(args)?).await?;
            print_success(&format!("Survey created successfully (id {})", survey.id));
        }
        SurveyCommands::Update(args) => {
            let survey = api.update(args.id, &survey_input(&args.form)?).await?;
            print_success(&format!("Survey \"{}\" updated successfully", survey.title));
        }
        SurveyCommands::Delete { id } => {
            api.delete(*id).await?;
            print_success("Survey deleted successfully");
        }
        SurveyCommands::Duplicate { id } => {
            let copy = api.duplicate(*id).await?;
            print_success(&format!(
                "Survey duplicated successfully (new id {})",
                copy.id
            ));
        }
        SurveyCommands::Analytics { id } => {
            let analytics = api.analytics(*id).await?;
            print_analytics(&analytics, ctx.format);
        }
    }
    Ok(())
}

fn filters(args: &SurveyListArgs) -> SurveyFilters {
    SurveyFilters {
        status: args.status,
        category: args.category,
        search: args.search.clone(),
    }
}

/// Survey body from `--file`, or from the individual flags.
fn survey_input(args: &SurveyFormArgs) -> Result<SurveyInput> {
    if let Some(file) = &args.file {
        return read_json(file);
    }
    let Some(title) = args.title.clone().filter(|t| !t.trim().is_empty()) else {
        anyhow::bail!("A survey needs a title");
    };
    Ok(SurveyInput {
        title,
        description: args.description.clone().unwrap_or_default(),
        category: args.category.unwrap_or_default(),
        status: args.status.unwrap_or_default(),
        is_anonymous: args.anonymous,
        allow_multiple_responses: args.allow_multiple,
        start_date: None,
        end_date: None,
        estimated_duration: args.duration.unwrap_or(5),
        target_roles: args.target_roles.clone(),
        target_departments: Vec::new(),
    })
}
