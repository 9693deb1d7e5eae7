use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::skill::{ChatSkillRequest, NewSkillRequest, SkillFilter, UpdateSkillRequest},
    errors::AppError,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    pub owner: Option<String>,
}

#[instrument(skip(state, data))]
pub async fn chat_skill(
    state: web::Data<AppState>,
    data: web::Json<ChatSkillRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.chat_skill_handler
        .extract_skills(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, data))]
pub async fn create_skill(
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler
        .create_skill(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(skill))
}

#[instrument(skip(state, query))]
pub async fn get_all_skills(
    state: web::Data<AppState>,
    query: web::Query<SkillListQuery>,
) -> Result<impl Responder, AppError> {
    let filter = SkillFilter {
        owner_id: query.into_inner().owner
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty()),
    };

    let skills = state.skill_handler.get_all_skills(&filter).await?;
    Ok(HttpResponse::Ok().json(skills))
}

#[instrument(skip(state))]
pub async fn get_skill_by_id(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.get_skill_by_id(&skill_id).await?;
    Ok(HttpResponse::Ok().json(skill))
}

#[instrument(skip(state, data))]
pub async fn update_skill(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler
        .update_skill(&skill_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Skill updated",
        "skill": skill
    })))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.skill_handler.delete_skill(&skill_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Skill deleted"})))
}
