//! Typed payloads of the survey backend's REST contract.

mod response;
mod stats;
mod survey;
mod user;

use serde::{Deserialize, Serialize};

pub use response::{Answer, ResponseFilters, ResponseInput, ResponseUpdate, SurveyResponse};
pub use stats::{
    Ack, DailyCount, DashboardStats, QuestionAnalytics, SurveyAnalytics, UserStats,
};
pub use survey::{
    BulkQuestions, Question, QuestionInput, QuestionType, Survey, SurveyCategory, SurveyFilters,
    SurveyInput, SurveyStatus,
};
pub use user::{
    AuthSession, Credentials, NewUser, PasswordChange, Role, User, UserFilters, UserUpdate,
};

/// A list endpoint reply. Paginated deployments wrap the items in an
/// envelope, others return a bare array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Self::Page { results, .. } => results,
            Self::Items(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Page { results, .. } => results,
            Self::Items(items) => items,
        }
    }

    /// Total reported by the server, or the number of items received.
    pub fn total(&self) -> u64 {
        match self {
            Self::Page {
                count: Some(c), ..
            } => *c,
            _ => self.items().len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_accepts_both_shapes() {
        let bare: Listing<i64> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(bare.total(), 3);

        let paged: Listing<i64> = serde_json::from_value(json!({
            "count": 40, "next": "http://x/?page=2", "previous": null, "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(paged.items(), &[1, 2]);
        assert_eq!(paged.total(), 40);
        assert_eq!(paged.into_items(), vec![1, 2]);
    }
}
