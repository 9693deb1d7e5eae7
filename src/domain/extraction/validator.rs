use serde_json::Value;
use uuid::Uuid;

use crate::entities::skill::{
    is_valid_date_shape, SkillInsert, SkillSource, MAX_DESCRIPTION_CHARS, MAX_LEVEL, MIN_LEVEL,
};

use super::parser::CandidateRecord;

/// Normalizes one candidate into an insertable record, or `None` when it has no usable name.
///
/// Field problems other than the name never reject the candidate: a bad level is dropped and a
/// bad date falls back to `default_date`. The id is always freshly generated.
pub fn validate_candidate(
    candidate: &CandidateRecord,
    owner_id: &str,
    default_date: &str,
) -> Option<SkillInsert> {
    let name = candidate
        .skill
        .as_ref()
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    Some(SkillInsert {
        id: Uuid::new_v4(),
        owner_id: owner_id.to_string(),
        name: name.to_string(),
        level: candidate.level.as_ref().and_then(coerce_level),
        description: candidate.description.as_ref().and_then(normalize_description),
        acquired_on: candidate
            .date
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|date| is_valid_date_shape(date))
            .unwrap_or(default_date)
            .to_string(),
        source: SkillSource::Chat,
    })
}

/// Integer coercion: whole numbers and numeric strings. Anything else, or out of range, is absent.
fn coerce_level(value: &Value) -> Option<i16> {
    let level = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (i64::from(MIN_LEVEL)..=i64::from(MAX_LEVEL))
        .contains(&level)
        .then_some(level as i16)
}

fn normalize_description(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => Some(trimmed[..cut].to_string()),
        None => Some(trimmed.to_string()),
    }
}

impl From<&SkillInsert> for CandidateRecord {
    fn from(skill: &SkillInsert) -> Self {
        Self {
            skill: Some(Value::String(skill.name.clone())),
            level: skill.level.map(Value::from),
            description: skill.description.clone().map(Value::String),
            date: Some(Value::String(skill.acquired_on.clone())),
        }
    }
}
