use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        option_fields::Patch,
        skill::{SkillFilter, SkillInsert, SkillRecord, UpdateSkillRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

const SKILL_COLUMNS: &str =
    "id, owner_id, name, level, description, acquired_on, source, created_at, updated_at";

#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Writes one record under its own id
    async fn create_skill(&self, skill: &SkillInsert) -> Result<SkillRecord, AppError>;

    async fn get_skill_by_id(&self, id: &Uuid) -> Result<SkillRecord, AppError>;

    /// Full scan, newest first
    async fn get_all_skills(&self, filter: &SkillFilter) -> Result<Vec<SkillRecord>, AppError>;

    async fn update_skill(&self, id: &Uuid, changes: &UpdateSkillRequest) -> Result<SkillRecord, AppError>;

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError>;

    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T> SkillRepository for Arc<T>
where
    T: SkillRepository + ?Sized,
{
    async fn create_skill(&self, skill: &SkillInsert) -> Result<SkillRecord, AppError> {
        (**self).create_skill(skill).await
    }

    async fn get_skill_by_id(&self, id: &Uuid) -> Result<SkillRecord, AppError> {
        (**self).get_skill_by_id(id).await
    }

    async fn get_all_skills(&self, filter: &SkillFilter) -> Result<Vec<SkillRecord>, AppError> {
        (**self).get_all_skills(filter).await
    }

    async fn update_skill(&self, id: &Uuid, changes: &UpdateSkillRequest) -> Result<SkillRecord, AppError> {
        (**self).update_skill(id, changes).await
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_skill(id).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

impl SqlxSkillRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<SkillRecord, AppError> {
        let record = sqlx::query_as::<_, SkillRecord>(&format!(
            r#"
            INSERT INTO skills (id, owner_id, name, level, description, acquired_on, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SKILL_COLUMNS}
            "#
        ))
        .bind(skill.id)
        .bind(&skill.owner_id)
        .bind(&skill.name)
        .bind(skill.level)
        .bind(&skill.description)
        .bind(&skill.acquired_on)
        .bind(skill.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_skill_by_id(&self, id: &Uuid) -> Result<SkillRecord, AppError> {
        let record = sqlx::query_as::<_, SkillRecord>(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_all_skills(&self, filter: &SkillFilter) -> Result<Vec<SkillRecord>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {SKILL_COLUMNS} FROM skills"));

        if let Some(owner_id) = &filter.owner_id {
            builder.push(" WHERE owner_id = ").push_bind(owner_id.clone());
        }

        builder.push(" ORDER BY created_at DESC");

        let records = builder
            .build_query_as::<SkillRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn update_skill(&self, id: &Uuid, changes: &UpdateSkillRequest) -> Result<SkillRecord, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE skills SET ");
        let mut set = builder.separated(", ");

        if let Patch::Set(owner_id) = &changes.owner_id {
            set.push("owner_id = ").push_bind_unseparated(owner_id.clone());
        }
        if let Patch::Set(name) = &changes.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(level) = changes.level.as_ref_option() {
            set.push("level = ").push_bind_unseparated(level.copied());
        }
        if let Some(description) = changes.description.as_ref_option() {
            set.push("description = ").push_bind_unseparated(description.cloned());
        }
        if let Patch::Set(acquired_on) = &changes.acquired_on {
            set.push("acquired_on = ").push_bind_unseparated(acquired_on.clone());
        }
        set.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(format!(" RETURNING {SKILL_COLUMNS}"));

        let record = builder
            .build_query_as::<SkillRecord>()
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }

        Ok(())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
