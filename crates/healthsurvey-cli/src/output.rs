use colored::Colorize;
use healthsurvey_client::models::{
    Listing, Question, Survey, SurveyAnalytics, SurveyResponse, User,
};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "•".cyan(), msg);
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => print_error(&format!("Failed to encode output: {e}")),
    }
}

pub fn label(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name.cyan(), value);
}

fn date(value: Option<OffsetDateTime>) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    value
        .and_then(|d| d.format(fmt).ok())
        .unwrap_or_else(|| "-".into())
}

fn table(builder: Builder) {
    println!("{}", builder.build().with(Style::rounded()));
}

fn footer<T>(listing: &Listing<T>) {
    let shown = listing.items().len() as u64;
    let total = listing.total();
    if total > shown {
        println!("Showing {shown} of {total}");
    } else {
        println!("Total: {total}");
    }
}

pub fn print_surveys(listing: &Listing<Survey>, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(listing);
    }
    if listing.items().is_empty() {
        println!("No surveys found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Title", "Category", "Status", "Questions", "Responses", "Created"]);
    for s in listing.items() {
        builder.push_record([
            s.id.to_string(),
            s.title.clone(),
            s.category.as_str().to_string(),
            s.status.as_str().to_string(),
            s.total_questions.to_string(),
            s.total_responses.to_string(),
            date(s.created_at),
        ]);
    }
    table(builder);
    footer(listing);
}

pub fn print_survey(survey: &Survey, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(survey);
    }
    println!("{} {}", format!("#{}", survey.id).cyan(), survey.title.bold());
    if !survey.description.is_empty() {
        println!("{}", survey.description);
    }
    label("Category", survey.category.as_str());
    label("Status", survey.status.as_str());
    label("Duration", format!("{} min", survey.estimated_duration));
    label("Anonymous", survey.is_anonymous);
    if !survey.target_roles.is_empty() {
        let roles: Vec<&str> = survey.target_roles.iter().map(|r| r.label()).collect();
        label("Target roles", roles.join(", "));
    }
    if let Some(author) = &survey.created_by {
        label("Created by", author.display_name());
    }
    if !survey.questions.is_empty() {
        println!();
        print_questions(&survey.questions, OutputFormat::Table);
    }
}

pub fn print_questions(questions: &[Question], format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(&questions);
    }
    if questions.is_empty() {
        println!("No questions yet.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "#", "Text", "Type", "Required", "Options"]);
    for q in questions {
        let options: Vec<String> = q
            .options
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect();
        builder.push_record([
            q.id.to_string(),
            q.order.to_string(),
            q.text.clone(),
            serde_json::to_value(q.question_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            if q.is_required { "yes".into() } else { "no".into() },
            options.join(", "),
        ]);
    }
    table(builder);
}

pub fn print_users(listing: &Listing<User>, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(listing);
    }
    if listing.items().is_empty() {
        println!("No users found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Username", "Name", "Email", "Role", "Active"]);
    for u in listing.items() {
        builder.push_record([
            u.id.to_string(),
            u.username.clone(),
            format!("{} {}", u.first_name, u.last_name).trim().to_string(),
            u.email.clone(),
            u.role.label().to_string(),
            match u.is_active {
                Some(false) => "no".into(),
                _ => "yes".into(),
            },
        ]);
    }
    table(builder);
    footer(listing);
}

pub fn print_user(user: &User, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(user);
    }
    label("ID", user.id);
    label("Username", &user.username);
    label("Name", format!("{} {}", user.first_name, user.last_name).trim());
    label("Email", &user.email);
    label("Role", user.role.label());
    let optional = [
        ("Phone", &user.phone),
        ("Date of birth", &user.date_of_birth),
        ("Department", &user.department),
        ("Specialization", &user.specialization),
        ("Medical ID", &user.medical_id),
    ];
    for (name, value) in optional {
        if let Some(v) = value {
            label(name, v);
        }
    }
    if user.created_at.is_some() {
        label("Member since", date(user.created_at));
    }
}

pub fn print_responses(listing: &Listing<SurveyResponse>, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(listing);
    }
    if listing.items().is_empty() {
        println!("No responses found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Survey", "Respondent", "Status", "Started", "Minutes"]);
    for r in listing.items() {
        builder.push_record([
            r.id.to_string(),
            r.survey_title.clone(),
            r.respondent
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "Anonymous".into()),
            if r.is_complete {
                "complete".into()
            } else {
                "in progress".into()
            },
            date(r.started_at),
            r.completion_time
                .map(|m| format!("{m:.1}"))
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    table(builder);
    footer(listing);
}

pub fn print_response(response: &SurveyResponse, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(response);
    }
    println!(
        "{} {}",
        format!("Response #{}", response.id).cyan(),
        response.survey_title.bold()
    );
    label(
        "Status",
        if response.is_complete {
            "complete"
        } else {
            "in progress"
        },
    );
    label("Started", date(response.started_at));
    if response.answers.is_empty() {
        println!("No answers.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Question", "Answer"]);
    for a in &response.answers {
        builder.push_record([
            a.question_text
                .clone()
                .unwrap_or_else(|| format!("Question {}", a.question)),
            a.display_value(),
        ]);
    }
    table(builder);
}

pub fn print_analytics(analytics: &SurveyAnalytics, format: OutputFormat) {
    if format == OutputFormat::Json {
        return print_json(analytics);
    }
    label("Total responses", analytics.total_responses);
    label("Completed", analytics.completed_responses);
    label("Completion rate", format!("{:.1}%", analytics.completion_rate));
    label(
        "Avg. completion time",
        format!("{:.1} min", analytics.average_completion_time),
    );
    if !analytics.responses_by_date.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Date", "Responses"]);
        for d in &analytics.responses_by_date {
            builder.push_record([d.date.clone(), d.count.to_string()]);
        }
        table(builder);
    }
    for q in &analytics.question_analytics {
        println!(
            "\n{} ({}, {:.0}% answered)",
            q.question_text.bold(),
            q.question_type,
            q.response_rate
        );
        if let Some(avg) = q.average_rating {
            label("  Average rating", format!("{avg:.2}"));
        }
        let dist = q.choice_distribution.as_ref().or(q.rating_distribution.as_ref());
        if let Some(dist) = dist {
            for (choice, count) in dist {
                println!("  {choice}: {count}");
            }
        }
    }
}
