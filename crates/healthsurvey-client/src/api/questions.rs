use crate::error::Outcome;
use crate::gateway::Gateway;
use crate::models::{BulkQuestions, Listing, Question, QuestionInput};

/// Questions of a survey. Reads and writes of a single question address it
/// by id alone.
#[derive(Debug, Clone, Copy)]
pub struct QuestionsApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> QuestionsApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, survey_id: i64) -> Outcome<Listing<Question>> {
        self.gateway
            .get(&format!("/surveys/{survey_id}/questions/"))
            .await
    }

    pub async fn get(&self, id: i64) -> Outcome<Question> {
        self.gateway.get(&format!("/surveys/questions/{id}/")).await
    }

    pub async fn create(&self, survey_id: i64, question: &QuestionInput) -> Outcome<Question> {
        self.gateway
            .post(&format!("/surveys/{survey_id}/questions/"), question)
            .await
    }

    pub async fn update(&self, id: i64, question: &QuestionInput) -> Outcome<Question> {
        self.gateway
            .put(&format!("/surveys/questions/{id}/"), question)
            .await
    }

    pub async fn delete(&self, id: i64) -> Outcome<()> {
        self.gateway
            .delete(&format!("/surveys/questions/{id}/"))
            .await
    }

    pub async fn bulk_create(
        &self,
        survey_id: i64,
        questions: Vec<QuestionInput>,
    ) -> Outcome<Vec<Question>> {
        self.gateway
            .post(
                &format!("/surveys/{survey_id}/questions/bulk/"),
                &BulkQuestions { questions },
            )
            .await
    }
}
