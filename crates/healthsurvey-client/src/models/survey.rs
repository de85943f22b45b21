use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Active,
    Inactive,
    Archived,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown survey status \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyCategory {
    #[default]
    General,
    MentalHealth,
    ChronicCare,
    Preventive,
    PostTreatment,
    Satisfaction,
    Research,
}

impl SurveyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::MentalHealth => "mental_health",
            Self::ChronicCare => "chronic_care",
            Self::Preventive => "preventive",
            Self::PostTreatment => "post_treatment",
            Self::Satisfaction => "satisfaction",
            Self::Research => "research",
        }
    }
}

impl std::str::FromStr for SurveyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.to_string()))
            .map_err(|_| format!("unknown survey category \"{s}\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Dropdown,
    Rating,
    Date,
    Number,
    Email,
    Phone,
    Boolean,
}

impl QuestionType {
    /// Choice questions carry an `options` list.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox | Self::Dropdown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default)]
    pub min_value: Option<i32>,
    #[serde(default)]
    pub max_value: Option<i32>,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub show_if_question: Option<i64>,
    #[serde(default)]
    pub show_if_answer: Option<Value>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
}

/// Body for creating or replacing a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if_question: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if_answer: Option<Value>,
}

/// Body of `POST /surveys/{id}/questions/bulk/`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkQuestions {
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: SurveyCategory,
    #[serde(default)]
    pub status: SurveyStatus,
    #[serde(default)]
    pub created_by: Option<User>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub allow_multiple_responses: bool,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub end_date: Option<OffsetDateTime>,
    /// Minutes.
    #[serde(default)]
    pub estimated_duration: u32,
    #[serde(default)]
    pub target_roles: Vec<Role>,
    #[serde(default)]
    pub target_departments: Vec<String>,
    /// Only present on detail reads; list reads omit it.
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub total_responses: u32,
}

/// Body for creating or replacing a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: SurveyCategory,
    #[serde(default)]
    pub status: SurveyStatus,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub allow_multiple_responses: bool,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default = "default_duration")]
    pub estimated_duration: u32,
    #[serde(default)]
    pub target_roles: Vec<Role>,
    #[serde(default)]
    pub target_departments: Vec<String>,
}

fn default_duration() -> u32 {
    5
}

/// Query filters for `GET /surveys/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurveyFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SurveyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SurveyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_item_decodes_without_questions() {
        let survey: Survey = serde_json::from_value(json!({
            "id": 3,
            "title": "Post-op follow-up",
            "description": "",
            "category": "post_treatment",
            "status": "active",
            "created_by": {"id": 1, "username": "admin", "role": "admin"},
            "created_at": "2024-06-01T08:00:00.123456Z",
            "estimated_duration": 10,
            "total_questions": 4,
            "total_responses": 12
        }))
        .unwrap();
        assert_eq!(survey.category, SurveyCategory::PostTreatment);
        assert_eq!(survey.status, SurveyStatus::Active);
        assert!(survey.questions.is_empty());
        assert_eq!(survey.total_responses, 12);
    }

    #[test]
    fn question_input_uses_type_key() {
        let input = QuestionInput {
            text: "How do you feel?".into(),
            question_type: QuestionType::Rating,
            order: Some(1),
            is_required: true,
            options: vec![],
            min_value: Some(1),
            max_value: Some(5),
            placeholder: String::new(),
            help_text: String::new(),
            show_if_question: None,
            show_if_answer: None,
        };
        let v = serde_json::to_value(&input).unwrap();
        assert_eq!(v["type"], "rating");
        assert!(v.get("options").is_none());
        assert!(v.get("placeholder").is_none());
    }

    #[test]
    fn category_parses_from_cli_text() {
        assert_eq!(
            "mental_health".parse::<SurveyCategory>(),
            Ok(SurveyCategory::MentalHealth)
        );
        assert!("dental".parse::<SurveyCategory>().is_err());
        assert!(QuestionType::Dropdown.is_choice());
        assert!(!QuestionType::Rating.is_choice());
    }
}
