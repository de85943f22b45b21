use anyhow::{Context as _, Result};
use healthsurvey_client::models::{QuestionInput, QuestionType};
use serde_json::Value;

use super::{Context, read_json};
use crate::cli::{QuestionCommands, QuestionCreateArgs};
use crate::output::{print_questions, print_success};

pub async fn run(ctx: &Context, command: &QuestionCommands) -> Result<()> {
    let api = ctx.gateway().questions();
    match command {
        QuestionCommands::List { survey } => {
            let listing = api.list(*survey).await?;
            print_questions(listing.items(), ctx.format);
        }
        QuestionCommands::Get { id } => {
            let question = api.get(*id).await?;
            print_questions(std::slice::from_ref(&question), ctx.format);
        }
        QuestionCommands::Create(args) => {
            let question = api.create(args.survey, &question_input(args)?).await?;
            print_success(&format!("Question added (id {})", question.id));
        }
        QuestionCommands::Update { id, file } => {
            let input: QuestionInput = read_json(file)?;
            api.update(*id, &input).await?;
            print_success("Question updated successfully");
        }
        QuestionCommands::Delete { id } => {
            api.delete(*id).await?;
            print_success("Question deleted successfully");
        }
        QuestionCommands::Bulk { survey, file } => {
            let inputs: Vec<QuestionInput> = read_json(file)?;
            let created = api.bulk_create(*survey, inputs).await?;
            print_success(&format!("{} questions added", created.len()));
        }
    }
    Ok(())
}

fn question_type(name: &str) -> Result<QuestionType> {
    serde_json::from_value(Value::String(name.to_ascii_lowercase()))
        .with_context(|| format!("Unknown question type: {name}"))
}

fn question_input(args: &QuestionCreateArgs) -> Result<QuestionInput> {
    if let Some(file) = &args.file {
        return read_json(file);
    }
    let question_type = question_type(&args.question_type)?;
    if question_type.is_choice() && args.options.is_empty() {
        anyhow::bail!("{} questions need at least one --option", args.question_type);
    }
    Ok(QuestionInput {
        text: args.text.clone().unwrap_or_default(),
        question_type,
        order: None,
        is_required: args.required,
        options: args.options.iter().cloned().map(Value::String).collect(),
        min_value: args.min,
        max_value: args.max,
        placeholder: String::new(),
        help_text: String::new(),
        show_if_question: None,
        show_if_answer: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: &str, options: &[&str]) -> QuestionCreateArgs {
        QuestionCreateArgs {
            survey: 1,
            file: None,
            text: Some("How do you feel?".into()),
            question_type: kind.into(),
            required: true,
            options: options.iter().map(|s| s.to_string()).collect(),
            min: None,
            max: None,
        }
    }

    #[test]
    fn choice_questions_need_options() {
        assert!(question_input(&args("radio", &[])).is_err());
        let q = question_input(&args("Radio", &["Good", "Bad"])).unwrap();
        assert_eq!(q.question_type, QuestionType::Radio);
        assert_eq!(q.options.len(), 2);
    }

    #[test]
    fn unknown_type_is_reported() {
        let err = question_input(&args("slider", &[])).unwrap_err();
        assert!(err.to_string().contains("slider"));
    }
}
