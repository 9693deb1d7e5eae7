use chrono::{NaiveDate, Utc};
use derive_more::Display;
use tracing::{debug, error, info};
use validator::Validate;

use crate::{
    entities::skill::{ChatSkillRequest, ChatSkillResponse, SkillSummary},
    errors::AppError,
    extraction::{build_extraction_prompt, parse_candidates, validate_candidate},
    interfaces::inference::InferenceClient,
    repositories::skill::SkillRepository,
};

/// Where a chat extraction request is in its flow; carried on log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExtractionStage {
    #[display("received")]
    Received,
    #[display("prompted")]
    Prompted,
    #[display("inferred")]
    Inferred,
    #[display("parsed")]
    Parsed,
    #[display("persisting")]
    Persisting,
    #[display("responded")]
    Responded,
}

/// Turns free-form "I learned X" messages into stored skill records.
///
/// Only a malformed request or a failed inference call end the request with an error.
/// Everything after a successful inference call degrades towards fewer saved skills.
pub struct ChatSkillHandler<R, C>
where
    R: SkillRepository,
    C: InferenceClient,
{
    pub skill_repo: R,
    pub inference: C,
}

impl<R, C> ChatSkillHandler<R, C>
where
    R: SkillRepository,
    C: InferenceClient,
{
    pub fn new(skill_repo: R, inference: C) -> Self {
        ChatSkillHandler { skill_repo, inference }
    }

    pub async fn extract_skills(&self, request: ChatSkillRequest) -> Result<ChatSkillResponse, AppError> {
        self.extract_skills_on(request, Utc::now().date_naive()).await
    }

    /// Same as [`Self::extract_skills`] with an explicit extraction date.
    pub async fn extract_skills_on(
        &self,
        request: ChatSkillRequest,
        today: NaiveDate,
    ) -> Result<ChatSkillResponse, AppError> {
        request.validate()?;
        let (Some(owner_id), Some(message)) = (request.owner_id, request.message) else {
            return Err(AppError::InvalidInput("missing or invalid required fields".to_string()));
        };
        let owner_id = owner_id.trim().to_string();
        debug!(stage = %ExtractionStage::Received, owner_id = %owner_id, "Chat skill request accepted");

        let prompt = build_extraction_prompt(&message, today);
        debug!(stage = %ExtractionStage::Prompted, prompt_chars = prompt.len());

        let raw = self.inference.generate(&prompt).await.map_err(|e| {
            error!(stage = %ExtractionStage::Inferred, error = %e, "Inference call failed");
            AppError::from(e)
        })?;
        debug!(stage = %ExtractionStage::Inferred, raw_output = %raw, "Model replied");

        let candidates = parse_candidates(&raw);
        debug!(stage = %ExtractionStage::Parsed, candidates = candidates.len());

        let default_date = today.format("%Y-%m-%d").to_string();
        let mut saved_skills = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let Some(skill) = validate_candidate(candidate, &owner_id, &default_date) else {
                debug!(stage = %ExtractionStage::Persisting, index, "Skipping candidate without a usable name");
                continue;
            };

            // A failed write only drops this record.
            match self.skill_repo.create_skill(&skill).await {
                Ok(_) => saved_skills.push(SkillSummary::from(&skill)),
                Err(e) => error!(
                    stage = %ExtractionStage::Persisting,
                    index,
                    skill = %skill.name,
                    error = %e,
                    "Failed to save extracted skill"
                ),
            }
        }

        if saved_skills.len() < candidates.len() {
            debug!(
                candidates = candidates.len(),
                saved = saved_skills.len(),
                "Some candidates were rejected or failed to save"
            );
        }
        info!(
            stage = %ExtractionStage::Responded,
            owner_id = %owner_id,
            saved = saved_skills.len(),
            "Chat skill extraction complete"
        );

        Ok(ChatSkillResponse::new(saved_skills))
    }
}
