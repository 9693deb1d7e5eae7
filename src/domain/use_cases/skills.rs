use chrono::Utc;
use validator::Validate;

use crate::{
    entities::skill::{NewSkillRequest, SkillFilter, SkillRecord, UpdateSkillRequest},
    errors::AppError,
    repositories::skill::SkillRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct SkillHandler<R>
where
    R: SkillRepository,
{
    pub skill_repo: R,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository,
{
    pub fn new(skill_repo: R) -> Self {
        SkillHandler { skill_repo }
    }

    /// Records a skill entered by hand
    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<SkillRecord, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert(Utc::now().date_naive());
        self.skill_repo.create_skill(&insert).await
    }

    pub async fn get_skill_by_id(&self, skill_id: &str) -> Result<SkillRecord, AppError> {
        let valid_id = valid_uuid(skill_id)?;

        self.skill_repo.get_skill_by_id(&valid_id).await
            .map_err(not_found_as_skill)
    }

    pub async fn get_all_skills(&self, filter: &SkillFilter) -> Result<Vec<SkillRecord>, AppError> {
        self.skill_repo.get_all_skills(filter).await
    }

    /// Applies a partial update; omitted fields are left as they are
    pub async fn update_skill(
        &self,
        skill_id: &str,
        request: UpdateSkillRequest,
    ) -> Result<SkillRecord, AppError> {
        let valid_id = valid_uuid(skill_id)?;

        if !request.has_changes() {
            return Err(AppError::InvalidInput("No valid fields to update".to_string()));
        }
        request.validate()?;

        self.skill_repo.update_skill(&valid_id, &request.normalized()).await
            .map_err(not_found_as_skill)
    }

    pub async fn delete_skill(&self, skill_id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(skill_id)?;

        self.skill_repo.delete_skill(&valid_id).await
            .map_err(not_found_as_skill)
    }
}

fn not_found_as_skill(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Skill not found".to_string()),
        _ => e,
    }
}
