use serde_json::{Map, Value};

/// An untrusted skill entry lifted from model output. Every field may be missing or wrong-typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub skill: Option<Value>,
    pub level: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
}

impl From<Map<String, Value>> for CandidateRecord {
    fn from(mut object: Map<String, Value>) -> Self {
        Self {
            skill: object.remove("skill"),
            level: object.remove("level"),
            description: object.remove("description"),
            date: object.remove("date"),
        }
    }
}

/// Turns raw model text into candidate records, in the order the model produced them.
///
/// Never fails: text that holds no recoverable JSON array yields an empty list.
pub fn parse_candidates(raw: &str) -> Vec<CandidateRecord> {
    let Some(items) = extract_array(raw) else {
        tracing::debug!("No JSON array recovered from model output");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(object) => Some(CandidateRecord::from(object)),
            other => {
                tracing::debug!(element = %other, "Discarding non-object array element");
                None
            }
        })
        .collect()
}

/// Strict parse first, then the structure opened by the first `{` or `[`.
fn extract_array(raw: &str) -> Option<Vec<Value>> {
    let trimmed = raw.trim();

    if let Some(items) = parse_array(trimmed) {
        return Some(items);
    }

    let start = trimmed.find(['{', '['])?;
    let close = if trimmed[start..].starts_with('{') { '}' } else { ']' };
    let end = trimmed.rfind(close)?;

    // An object here is not a list of skills, even if one is nested inside.
    (start < end).then(|| &trimmed[start..=end]).and_then(parse_array)
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skills(candidates: &[CandidateRecord]) -> Vec<Value> {
        candidates
            .iter()
            .map(|c| c.skill.clone().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn parses_clean_array() {
        let candidates = parse_candidates(r#"[{"skill":"React"},{"skill":"Redux"}]"#);
        assert_eq!(skills(&candidates), vec![json!("React"), json!("Redux")]);
    }

    #[test]
    fn keeps_all_recognised_fields() {
        let candidates =
            parse_candidates(r#"[{"skill":"Python","level":7,"date":"2024-03-01","description":"async","extra":1}]"#);
        assert_eq!(
            candidates,
            vec![CandidateRecord {
                skill: Some(json!("Python")),
                level: Some(json!(7)),
                description: Some(json!("async")),
                date: Some(json!("2024-03-01")),
            }]
        );
    }

    #[test]
    fn recovers_array_from_code_fence() {
        let raw = "```json\n[{\"skill\": \"Docker\"}]\n```";
        assert_eq!(skills(&parse_candidates(raw)), vec![json!("Docker")]);
    }

    #[test]
    fn recovers_array_surrounded_by_commentary() {
        let raw = "Here is what I found: [{\"skill\": \"SQL\"}] Hope this helps!";
        assert_eq!(skills(&parse_candidates(raw)), vec![json!("SQL")]);
    }

    #[test]
    fn object_wrapped_array_yields_nothing() {
        assert!(parse_candidates(r#"{"skills":[{"skill":"Python"}],"note":"ok"}"#).is_empty());
    }

    #[test]
    fn brace_first_prose_yields_nothing() {
        assert!(parse_candidates(r#"Sure {"skill":"Rust"} and also [{"skill":"Go"}]"#).is_empty());
        assert!(parse_candidates(r#"Format {skill} as requested: [{"skill": "Go"}]"#).is_empty());
    }

    #[test]
    fn plain_prose_yields_nothing() {
        assert!(parse_candidates("Mi dispiace, non ho capito.").is_empty());
    }

    #[test]
    fn bare_object_yields_nothing() {
        assert!(parse_candidates(r#"{"skill":"Rust"}"#).is_empty());
    }

    #[test]
    fn legacy_envelope_yields_nothing() {
        assert!(parse_candidates(r#"{"action":"learn_skill","skills":["Python"]}"#).is_empty());
    }

    #[test]
    fn empty_and_whitespace_yield_nothing() {
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates("   \n ").is_empty());
        assert!(parse_candidates("[]").is_empty());
    }

    #[test]
    fn truncated_json_yields_nothing() {
        assert!(parse_candidates(r#"[{"skill":"Rust"}, {"skill":"#).is_empty());
    }

    #[test]
    fn non_object_elements_are_dropped_in_order() {
        let raw = r#"["Python", {"skill":"A"}, 3, null, {"skill":"B"}, [1]]"#;
        assert_eq!(skills(&parse_candidates(raw)), vec![json!("A"), json!("B")]);
    }
}
