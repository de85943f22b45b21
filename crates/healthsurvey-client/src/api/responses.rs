use crate::error::Outcome;
use crate::gateway::Gateway;
use crate::models::{Listing, ResponseFilters, ResponseInput, ResponseUpdate, SurveyResponse};

#[derive(Debug, Clone, Copy)]
pub struct ResponsesApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> ResponsesApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Responses to one survey, or every response visible to the caller when
    /// `survey_id` is `None`.
    pub async fn list(
        &self,
        survey_id: Option<i64>,
        filters: &ResponseFilters,
    ) -> Outcome<Listing<SurveyResponse>> {
        let path = match survey_id {
            Some(id) => format!("/surveys/{id}/responses/"),
            None => "/surveys/responses/".to_string(),
        };
        self.gateway.get_query(&path, filters).await
    }

    pub async fn get(&self, id: i64) -> Outcome<SurveyResponse> {
        self.gateway.get(&format!("/surveys/responses/{id}/")).await
    }

    pub async fn create(&self, response: &ResponseInput) -> Outcome<SurveyResponse> {
        self.gateway.post("/surveys/responses/", response).await
    }

    pub async fn update(&self, id: i64, update: &ResponseUpdate) -> Outcome<SurveyResponse> {
        self.gateway
            .put(&format!("/surveys/responses/{id}/"), update)
            .await
    }

    pub async fn delete(&self, id: i64) -> Outcome<()> {
        self.gateway
            .delete(&format!("/surveys/responses/{id}/"))
            .await
    }
}
