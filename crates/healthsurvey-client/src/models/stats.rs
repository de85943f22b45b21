use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply of `GET /users/stats/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub users_by_role: BTreeMap<String, u64>,
}

/// Reply of `GET /surveys/dashboard/stats/`.
///
/// The backend returns a different subset of counters per role, so every
/// counter is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_surveys: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_surveys: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_responses: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_responses: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_surveys: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_responses: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_surveys: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_surveys: Option<u64>,
}

impl DashboardStats {
    /// Present counters as `(label, value)` pairs in display order.
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        [
            ("Total surveys", self.total_surveys),
            ("My surveys", self.my_surveys),
            ("Available surveys", self.available_surveys),
            ("Active surveys", self.active_surveys),
            ("Total responses", self.total_responses),
            ("My responses", self.my_responses),
            ("Completed responses", self.completed_responses),
            ("Completed surveys", self.completed_surveys),
        ]
        .into_iter()
        .filter_map(|(label, v)| v.map(|v| (label, v)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalytics {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub total_responses: u64,
    #[serde(default)]
    pub response_rate: f64,
    #[serde(default)]
    pub choice_distribution: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_distribution: Option<BTreeMap<String, u64>>,
}

/// Reply of `GET /surveys/{id}/analytics/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnalytics {
    #[serde(default)]
    pub total_responses: u64,
    #[serde(default)]
    pub completed_responses: u64,
    /// Minutes.
    #[serde(default)]
    pub average_completion_time: f64,
    /// Percent.
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub responses_by_date: Vec<DailyCount>,
    #[serde(default)]
    pub question_analytics: Vec<QuestionAnalytics>,
    #[serde(default)]
    pub demographic_breakdown: BTreeMap<String, Value>,
}

/// Plain `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patient_dashboard_counters() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "available_surveys": 4,
            "my_responses": 2,
            "completed_surveys": 1
        }))
        .unwrap();
        assert_eq!(
            stats.counters(),
            vec![
                ("Available surveys", 4),
                ("My responses", 2),
                ("Completed surveys", 1)
            ]
        );
    }

    #[test]
    fn analytics_tolerates_empty_breakdown() {
        let a: SurveyAnalytics = serde_json::from_value(json!({
            "total_responses": 10,
            "completed_responses": 8,
            "average_completion_time": 4.5,
            "completion_rate": 80.0,
            "responses_by_date": [{"date": "2024-06-01", "count": 3}],
            "question_analytics": [{
                "question_id": 1,
                "question_text": "Pain level",
                "question_type": "rating",
                "total_responses": 8,
                "response_rate": 80.0,
                "average_rating": 3.25,
                "rating_distribution": {"1": 0, "2": 2, "3": 2, "4": 4, "5": 0}
            }],
            "demographic_breakdown": {}
        }))
        .unwrap();
        assert_eq!(a.question_analytics[0].average_rating, Some(3.25));
        assert!(a.demographic_breakdown.is_empty());
    }
}
