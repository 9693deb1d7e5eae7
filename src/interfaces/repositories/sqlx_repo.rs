use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: PgPool,
}
