use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state field for PATCH requests.
///
/// - `Unchanged` → key absent from the body
/// - `Clear` → key present with `null`
/// - `Set` → key present with a value
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

// Only reached when the key exists; absent keys fall back to `Default` via `#[serde(default)]`.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        })
    }
}

// Validation errors echo the offending value; only `Set` carries one.
impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(v) => v.serialize(serializer),
            Patch::Unchanged | Patch::Clear => serializer.serialize_none(),
        }
    }
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Borrowed nested option:
    /// - `None` → unchanged
    /// - `Some(None)` → clear
    /// - `Some(Some(&T))` → set to value
    pub fn as_ref_option(&self) -> Option<Option<&T>> {
        match self {
            Self::Unchanged => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }

    pub fn map_value<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Self::Unchanged => Patch::Unchanged,
            Self::Clear => Patch::Clear,
            Self::Set(v) => Patch::Set(f(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default)]
        level: Patch<i16>,
    }

    #[test]
    fn absent_key_is_unchanged() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.level, Patch::Unchanged);
    }

    #[test]
    fn null_clears() {
        let body: Body = serde_json::from_str(r#"{"level": null}"#).unwrap();
        assert_eq!(body.level, Patch::Clear);
    }

    #[test]
    fn value_sets() {
        let body: Body = serde_json::from_str(r#"{"level": 4}"#).unwrap();
        assert_eq!(body.level, Patch::Set(4));
    }

    #[test]
    fn serializes_as_plain_value_or_null() {
        assert_eq!(serde_json::to_value(Patch::Set(4)).unwrap(), serde_json::json!(4));
        assert_eq!(serde_json::to_value(Patch::<i16>::Clear).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Patch::<i16>::Unchanged).unwrap(), serde_json::Value::Null);
    }
}
