use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::option_fields::Patch;

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_NAME_LENGTH: u64 = 120;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MIN_LEVEL: i16 = 1;
pub const MAX_LEVEL: i16 = 10;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    Manual,
    Chat,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub acquired_on: String,
    pub source: SkillSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated record ready to be written. The id is minted here, never taken from input.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillInsert {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub level: Option<i16>,
    pub description: Option<String>,
    pub acquired_on: String,
    pub source: SkillSource,
}

#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    pub owner_id: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub id: Uuid,
    pub name: String,
    pub acquired_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&SkillInsert> for SkillSummary {
    fn from(skill: &SkillInsert) -> Self {
        Self {
            id: skill.id,
            name: skill.name.clone(),
            acquired_on: skill.acquired_on.clone(),
            level: skill.level,
            description: skill.description.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSkillResponse {
    pub saved_skills: Vec<SkillSummary>,
    pub message: String,
}

impl ChatSkillResponse {
    pub fn new(saved_skills: Vec<SkillSummary>) -> Self {
        let message = match saved_skills.len() {
            0 => "No new skills found to save.".to_string(),
            1 => "Saved 1 skill to your journal.".to_string(),
            n => format!("Saved {} skills to your journal.", n),
        };

        Self { saved_skills, message }
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatSkillRequest {
    #[serde(default, alias = "owner_id", alias = "user")]
    #[validate(
        required(message = "ownerId is required"),
        custom(function = "validate_not_blank")
    )]
    pub owner_id: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "message is required"),
        custom(function = "validate_not_blank")
    )]
    pub message: Option<String>,
}

impl ChatSkillRequest {
    pub fn new(owner_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSkillRequest {
    #[serde(alias = "owner_id", alias = "user")]
    #[validate(custom(function = "validate_not_blank"))]
    pub owner_id: String,

    #[serde(alias = "skill")]
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Name is too long"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(range(min = MIN_LEVEL, max = MAX_LEVEL, message = "Level must be between 1 and 10"))]
    pub level: Option<i16>,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default, alias = "acquired_on")]
    #[validate(custom(function = "validate_acquired_on"))]
    pub acquired_on: Option<String>,
}

impl NewSkillRequest {
    pub fn prepare_for_insert(&self, today: NaiveDate) -> SkillInsert {
        SkillInsert {
            id: Uuid::new_v4(),
            owner_id: self.owner_id.trim().to_string(),
            name: self.name.trim().to_string(),
            level: self.level,
            description: self.description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            acquired_on: self.acquired_on
                .as_deref()
                .map(str::trim)
                .map(str::to_string)
                .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            source: SkillSource::Manual,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSkillRequest {
    #[serde(alias = "owner_id", alias = "user")]
    #[validate(custom(function = "validate_required_patch"))]
    pub owner_id: Patch<String>,

    #[serde(alias = "skill")]
    #[validate(custom(function = "validate_name_patch"))]
    pub name: Patch<String>,

    #[validate(custom(function = "validate_level_patch"))]
    pub level: Patch<i16>,

    #[validate(custom(function = "validate_description_patch"))]
    pub description: Patch<String>,

    #[serde(alias = "acquired_on")]
    #[validate(custom(function = "validate_acquired_on_patch"))]
    pub acquired_on: Patch<String>,
}

impl UpdateSkillRequest {
    pub fn has_changes(&self) -> bool {
        !(self.owner_id.is_unchanged()
            && self.name.is_unchanged()
            && self.level.is_unchanged()
            && self.description.is_unchanged()
            && self.acquired_on.is_unchanged())
    }

    /// Trims text fields; a blank description becomes a clear.
    pub fn normalized(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        Self {
            owner_id: self.owner_id.map_value(trim),
            name: self.name.map_value(trim),
            level: self.level,
            description: match self.description.map_value(trim) {
                Patch::Set(d) if d.is_empty() => Patch::Clear,
                other => other,
            },
            acquired_on: self.acquired_on.map_value(trim),
        }
    }
}

// ───── Helper Functions ─────────────────────────────────────────────

/// Shape check for `YYYY-MM-DD`: three dash-separated digit groups, the first exactly four long.
pub fn is_valid_date_shape(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();

    parts.len() == 3
        && parts[0].len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "must not be blank"));
    }
    Ok(())
}

fn validate_acquired_on(value: &str) -> Result<(), ValidationError> {
    if !is_valid_date_shape(value.trim()) {
        return Err(invalid("invalid_date", "Date must be in YYYY-MM-DD form"));
    }
    Ok(())
}

fn validate_required_patch(value: &Patch<String>) -> Result<(), ValidationError> {
    match value {
        Patch::Unchanged => Ok(()),
        Patch::Clear => Err(invalid("required", "cannot be cleared")),
        Patch::Set(v) => validate_not_blank(v),
    }
}

fn validate_name_patch(value: &Patch<String>) -> Result<(), ValidationError> {
    validate_required_patch(value)?;
    if let Patch::Set(name) = value {
        if name.trim().chars().count() as u64 > MAX_NAME_LENGTH {
            return Err(invalid("length", "Name is too long"));
        }
    }
    Ok(())
}

fn validate_level_patch(value: &Patch<i16>) -> Result<(), ValidationError> {
    match value {
        Patch::Set(level) if !(MIN_LEVEL..=MAX_LEVEL).contains(level) => {
            Err(invalid("range", "Level must be between 1 and 10"))
        }
        _ => Ok(()),
    }
}

fn validate_description_patch(value: &Patch<String>) -> Result<(), ValidationError> {
    match value {
        Patch::Set(d) if d.trim().chars().count() > MAX_DESCRIPTION_CHARS => {
            Err(invalid("length", "Description must be at most 500 characters"))
        }
        _ => Ok(()),
    }
}

fn validate_acquired_on_patch(value: &Patch<String>) -> Result<(), ValidationError> {
    match value {
        Patch::Unchanged => Ok(()),
        Patch::Clear => Err(invalid("required", "cannot be cleared")),
        Patch::Set(v) => validate_acquired_on(v),
    }
}
