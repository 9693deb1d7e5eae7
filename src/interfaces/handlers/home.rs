use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Skill Journal API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "skills": "/api/v1/skills",
            "chat": "/api/v1/skills/chat",
            "health": "/api/v1/health"
        }
    }))
}
