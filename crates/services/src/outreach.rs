//! Donor outreach drafts: one generation call, JSON answer, nothing stored.

use std::sync::Arc;

use domains::{AppError, FundraisingStore, GenerationParams, TextGenerator};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::extract::extract_json_as;
use crate::prompts::outreach_prompt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Warm,
    Professional,
    Urgent,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Warm => "warm",
            Tone::Professional => "professional",
            Tone::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachDraft {
    pub subject: String,
    pub body: String,
}

pub struct OutreachService {
    store: Arc<dyn FundraisingStore>,
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl OutreachService {
    pub fn new(
        store: Arc<dyn FundraisingStore>,
        generator: Arc<dyn TextGenerator>,
        params: GenerationParams,
    ) -> Self {
        Self {
            store,
            generator,
            params,
        }
    }

    #[instrument(skip(self))]
    pub async fn draft(&self, donor_id: Uuid, tone: Tone) -> Result<OutreachDraft, AppError> {
        let donor = self
            .store
            .get_donor(donor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Donor".into(), donor_id.to_string()))?;

        let prompt = outreach_prompt(&donor, tone);
        let text = self.generator.generate(&prompt, &self.params).await?;
        let draft: OutreachDraft = extract_json_as(&text)?;

        info!(%donor_id, "outreach draft generated");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{Donor, MockFundraisingStore, MockTextGenerator};

    fn donor(id: Uuid) -> Donor {
        Donor {
            id,
            organization_id: Uuid::nil(),
            first_name: "Dee".into(),
            last_name: "Okafor".into(),
            email: Some("dee@example.org".into()),
            phone: None,
            donor_type: "individual".into(),
            tags: vec!["major_donor".into()],
            total_donated: 10_000.0,
            donation_count: 12,
            first_donation_date: None,
            last_donation_date: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn draft_parses_generated_json() {
        let id = Uuid::new_v4();
        let mut store = MockFundraisingStore::new();
        store
            .expect_get_donor()
            .returning(move |_| Ok(Some(donor(id))));
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt, _| prompt.contains("Dee Okafor") && prompt.contains("urgent"))
            .times(1)
            .returning(|_, _| {
                Ok("```json\n{\"subject\": \"Thank you, Dee\", \"body\": \"...\"}\n```".into())
            });

        let service = OutreachService::new(
            Arc::new(store),
            Arc::new(generator),
            GenerationParams::default(),
        );
        let draft = service.draft(id, Tone::Urgent).await.unwrap();
        assert_eq!(draft.subject, "Thank you, Dee");
    }

    #[tokio::test]
    async fn unknown_donor_never_reaches_the_model() {
        let mut store = MockFundraisingStore::new();
        store.expect_get_donor().returning(|_| Ok(None));
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let service = OutreachService::new(
            Arc::new(store),
            Arc::new(generator),
            GenerationParams::default(),
        );
        let err = service.draft(Uuid::new_v4(), Tone::Warm).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(..)));
    }

    #[tokio::test]
    async fn prose_answer_is_a_parse_error() {
        let id = Uuid::new_v4();
        let mut store = MockFundraisingStore::new();
        store
            .expect_get_donor()
            .returning(move |_| Ok(Some(donor(id))));
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Ok("Dear Dee, thank you so much.".into()));

        let service = OutreachService::new(
            Arc::new(store),
            Arc::new(generator),
            GenerationParams::default(),
        );
        let err = service.draft(id, Tone::Warm).await.unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
