pub mod skill;
pub mod sqlx_repo;
