use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::survey::QuestionType;
use super::user::User;

/// One answer inside a survey response. Exactly one `*_answer` field is
/// expected to be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub question: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_answer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_answer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_answer: Option<Value>,
}

impl Answer {
    /// The answer rendered as text, whichever field carries it.
    pub fn display_value(&self) -> String {
        if !self.text_answer.is_empty() {
            return self.text_answer.clone();
        }
        if let Some(n) = self.number_answer {
            return n.to_string();
        }
        if let Some(d) = &self.date_answer {
            return d.clone();
        }
        if let Some(b) = self.boolean_answer {
            return if b { "Yes".into() } else { "No".into() };
        }
        match &self.json_answer {
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            Some(v) => v.to_string(),
            None => "No answer".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub survey: i64,
    #[serde(default)]
    pub survey_title: String,
    #[serde(default)]
    pub respondent: Option<User>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_complete: bool,
    /// Minutes from start to completion.
    #[serde(default)]
    pub completion_time: Option<f64>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Body of `POST /surveys/responses/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInput {
    pub survey: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Body of `PUT /surveys/responses/{id}/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

/// Query filters for response listings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_value_picks_populated_field() {
        let mut a: Answer = serde_json::from_value(json!({"question": 1, "number_answer": 4.0}))
            .unwrap();
        assert_eq!(a.display_value(), "4");
        a.number_answer = None;
        a.json_answer = Some(json!(["Headache", "Nausea"]));
        assert_eq!(a.display_value(), "Headache, Nausea");
        a.json_answer = None;
        a.boolean_answer = Some(false);
        assert_eq!(a.display_value(), "No");
        a.boolean_answer = None;
        assert_eq!(a.display_value(), "No answer");
    }

    #[test]
    fn response_decodes_anonymous_entry() {
        let r: SurveyResponse = serde_json::from_value(json!({
            "id": 11,
            "survey": 3,
            "survey_title": "Sleep quality",
            "respondent": null,
            "session_id": "anon-42",
            "started_at": "2024-06-02T10:00:00Z",
            "completed_at": null,
            "is_complete": false,
            "completion_time": null,
            "answers": [{"id": 1, "question": 9, "question_type": "text", "text_answer": "ok"}]
        }))
        .unwrap();
        assert!(r.respondent.is_none());
        assert_eq!(r.answers[0].question_type, Some(QuestionType::Text));
    }
}
