use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, extraction, use_cases};
pub use interfaces::{handlers, inference, repositories, routes};
pub use infrastructure::{db, llm, utils};

use errors::InferenceError;
use inference::InferenceClient;
use llm::gemini::GeminiClient;
use repositories::{skill::SkillRepository, sqlx_repo::SqlxSkillRepo};
use use_cases::{chat_skill::ChatSkillHandler, skills::SkillHandler};

pub type DynSkillRepo = Arc<dyn SkillRepository>;
pub type DynInferenceClient = Arc<dyn InferenceClient>;

pub type AppSkillHandler = SkillHandler<DynSkillRepo>;
pub type AppChatSkillHandler = ChatSkillHandler<DynSkillRepo, DynInferenceClient>;

pub struct AppState {
    pub skill_handler: AppSkillHandler,
    pub chat_skill_handler: AppChatSkillHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Result<Self, InferenceError> {
        let skill_repo: DynSkillRepo = Arc::new(SqlxSkillRepo::new(pool));
        let inference: DynInferenceClient = Arc::new(GeminiClient::new(config)?);

        Ok(Self::with_collaborators(skill_repo, inference))
    }

    /// Wires handlers around already-built store and inference handles; both are shared, not copied.
    pub fn with_collaborators(skill_repo: DynSkillRepo, inference: DynInferenceClient) -> Self {
        AppState {
            skill_handler: SkillHandler::new(skill_repo.clone()),
            chat_skill_handler: ChatSkillHandler::new(skill_repo, inference),
        }
    }
}
