use crate::error::Outcome;
use crate::gateway::Gateway;
use crate::models::{DashboardStats, Listing, Survey, SurveyAnalytics, SurveyFilters, SurveyInput};

#[derive(Debug, Clone, Copy)]
pub struct SurveysApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> SurveysApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, filters: &SurveyFilters) -> Outcome<Listing<Survey>> {
        self.gateway.get_query("/surveys/", filters).await
    }

    pub async fn get(&self, id: i64) -> Outcome<Survey> {
        self.gateway.get(&format!("/surveys/{id}/")).await
    }

    pub async fn create(&self, survey: &SurveyInput) -> Outcome<Survey> {
        self.gateway.post("/surveys/", survey).await
    }

    pub async fn update(&self, id: i64, survey: &SurveyInput) -> Outcome<Survey> {
        self.gateway.put(&format!("/surveys/{id}/"), survey).await
    }

    pub async fn delete(&self, id: i64) -> Outcome<()> {
        self.gateway.delete(&format!("/surveys/{id}/")).await
    }

    /// Copies the survey and its questions into a new draft.
    pub async fn duplicate(&self, id: i64) -> Outcome<Survey> {
        self.gateway
            .post_empty(&format!("/surveys/{id}/duplicate/"))
            .await
    }

    pub async fn analytics(&self, id: i64) -> Outcome<SurveyAnalytics> {
        self.gateway.get(&format!("/surveys/{id}/analytics/")).await
    }

    /// Counters for the caller's role.
    pub async fn dashboard_stats(&self) -> Outcome<DashboardStats> {
        self.gateway.get("/surveys/dashboard/stats/").await
    }
}
