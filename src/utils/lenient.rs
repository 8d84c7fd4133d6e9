use serde::{Deserialize, Deserializer};

/// Reads a counter that may arrive as a number, a numeric string, `null`, or
/// something else entirely. Anything unusable becomes `None`.
pub fn deserialize_count_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountLike {
        Int(i64),
        Float(f64),
        String(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<CountLike>::deserialize(deserializer)? {
        Some(CountLike::Int(i)) => Some(i),
        Some(CountLike::Float(f)) if f.is_finite() => Some(f.trunc() as i64),
        Some(CountLike::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Same idea for booleans, which some endpoints send as `0`/`1` or strings.
pub fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
        String(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<BoolOrInt>::deserialize(deserializer)? {
        Some(BoolOrInt::Bool(b)) => b,
        Some(BoolOrInt::Int(i)) => i != 0,
        Some(BoolOrInt::String(s)) => matches!(s.trim(), "true" | "1"),
        Some(BoolOrInt::Other(_)) | None => false,
    })
}
