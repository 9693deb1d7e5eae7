
use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::json;
use skill_journal::{entities::option_fields::Patch, errors::AppError};
use test_utils::*;
use uuid::Uuid;

#[actix_rt::test]
async fn create_skill_returns_201_with_defaults() {
    let mut repo = MockSkillRepo::new();
    repo.expect_create_skill()
        .withf(|skill| skill.name == "Rust" && skill.owner_id == "user-1" && skill.level == Some(4))
        .times(1)
        .returning(|skill| Ok(record_from(skill)));

    let state = app_state(repo, MockInference::new());
    let req = TestRequest::post().uri("/api/v1/skills").set_json(json!({
        "ownerId": " user-1 ",
        "name": " Rust ",
        "level": 4
    }));
    let (status, body) = send(state, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Rust");
    assert_eq!(body["source"], "manual");
    assert_eq!(body["acquiredOn"], server_today());
}

#[actix_rt::test]
async fn create_skill_rejects_out_of_range_level() {
    let state = app_state(MockSkillRepo::new(), MockInference::new());
    let req = TestRequest::post().uri("/api/v1/skills").set_json(json!({
        "ownerId": "user-1",
        "name": "Rust",
        "level": 11,
        "acquiredOn": "yesterday"
    }));
    let (status, body) = send(state, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
}

#[actix_rt::test]
async fn get_skill_rejects_malformed_id() {
    let state = app_state(MockSkillRepo::new(), MockInference::new());
    let (status, body) = send(state, TestRequest::get().uri("/api/v1/skills/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid skill id format");
}

#[actix_rt::test]
async fn get_skill_maps_missing_rows_to_404() {
    let mut repo = MockSkillRepo::new();
    repo.expect_get_skill_by_id()
        .times(1)
        .returning(|_| Err(AppError::NotFound("Record not found".into())));

    let state = app_state(repo, MockInference::new());
    let uri = format!("/api/v1/skills/{}", Uuid::new_v4());
    let (status, body) = send(state, TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Skill not found");
}

#[actix_rt::test]
async fn get_skill_returns_record() {
    let record = sample_record("user-1", "Docker");
    let id = record.id;

    let mut repo = MockSkillRepo::new();
    repo.expect_get_skill_by_id()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(move |_| Ok(record.clone()));

    let state = app_state(repo, MockInference::new());
    let uri = format!("/api/v1/skills/{id}");
    let (status, body) = send(state, TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Docker");
    assert_eq!(body["ownerId"], "user-1");
}

#[actix_rt::test]
async fn list_skills_filters_by_owner() {
    let mut repo = MockSkillRepo::new();
    repo.expect_get_all_skills()
        .withf(|filter| filter.owner_id.as_deref() == Some("user-1"))
        .times(1)
        .returning(|_| Ok(vec![sample_record("user-1", "Go"), sample_record("user-1", "SQL")]));

    let state = app_state(repo, MockInference::new());
    let (status, body) = send(state, TestRequest::get().uri("/api/v1/skills?owner=user-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[actix_rt::test]
async fn list_skills_ignores_blank_owner() {
    let mut repo = MockSkillRepo::new();
    repo.expect_get_all_skills()
        .withf(|filter| filter.owner_id.is_none())
        .times(1)
        .returning(|_| Ok(vec![]));

    let state = app_state(repo, MockInference::new());
    let (status, body) = send(state, TestRequest::get().uri("/api/v1/skills?owner=%20")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn empty_patch_is_rejected() {
    let state = app_state(MockSkillRepo::new(), MockInference::new());
    let uri = format!("/api/v1/skills/{}", Uuid::new_v4());
    let (status, body) = send(state, TestRequest::patch().uri(&uri).set_json(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid fields to update");
}

#[actix_rt::test]
async fn patch_updates_and_clears_fields() {
    let mut repo = MockSkillRepo::new();
    repo.expect_update_skill()
        .withf(|_, changes| {
            changes.name == Patch::Set("Rust 2024".to_string())
                && changes.level == Patch::Clear
                && changes.description == Patch::Clear
                && changes.acquired_on.is_unchanged()
        })
        .times(1)
        .returning(|_, _| Ok(sample_record("user-1", "Rust 2024")));

    let state = app_state(repo, MockInference::new());
    let uri = format!("/api/v1/skills/{}", Uuid::new_v4());
    let req = TestRequest::patch().uri(&uri).set_json(json!({
        "name": " Rust 2024 ",
        "level": null,
        "description": "   "
    }));
    let (status, body) = send(state, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Skill updated");
    assert_eq!(body["skill"]["name"], "Rust 2024");
}

#[actix_rt::test]
async fn patch_rejects_clearing_name() {
    let state = app_state(MockSkillRepo::new(), MockInference::new());
    let uri = format!("/api/v1/skills/{}", Uuid::new_v4());
    let (status, body) = send(state, TestRequest::patch().uri(&uri).set_json(json!({"name": null}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[actix_rt::test]
async fn delete_skill_reports_outcome() {
    let mut repo = MockSkillRepo::new();
    repo.expect_delete_skill().times(1).returning(|_| Ok(()));

    let state = app_state(repo, MockInference::new());
    let uri = format!("/api/v1/skills/{}", Uuid::new_v4());
    let (status, body) = send(state, TestRequest::delete().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Skill deleted");

    let mut repo = MockSkillRepo::new();
    repo.expect_delete_skill()
        .times(1)
        .returning(|_| Err(AppError::NotFound("Record not found".into())));

    let state = app_state(repo, MockInference::new());
    let (status, body) = send(state, TestRequest::delete().uri(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Skill not found");
}

#[actix_rt::test]
async fn health_reports_database_and_model() {
    let mut repo = MockSkillRepo::new();
    repo.expect_check_connection().times(1).returning(|| Ok(()));

    let mut inference = MockInference::new();
    inference
        .expect_model_name()
        .return_const("gemini-2.5-flash".to_string());

    let state = app_state(repo, inference);
    let (status, body) = send(state, TestRequest::get().uri("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "OK");
    assert_eq!(body["inference_model"], "gemini-2.5-flash");
}

#[actix_rt::test]
async fn health_degrades_when_database_is_down() {
    let mut repo = MockSkillRepo::new();
    repo.expect_check_connection()
        .times(1)
        .returning(|| Err(AppError::InternalError("pool timed out".into())));

    let mut inference = MockInference::new();
    inference
        .expect_model_name()
        .return_const("gemini-2.5-flash".to_string());

    let state = app_state(repo, inference);
    let (status, body) = send(state, TestRequest::get().uri("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "Unavailable");
}
