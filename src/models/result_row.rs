use super::numeric::parse_leading_int;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One matched item as returned by the scan service.
///
/// The service emits whatever its result file holds, so every text field is
/// optional and the numeric fields accept numbers or numeric strings. Rows
/// are never rejected for missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub realm: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub item_id: Option<String>,

    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub item_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub slot: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub stat1: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub stat2: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub ilvl: i64,

    /// Whole gold; the service drops the copper remainder.
    #[serde(default, deserialize_with = "lenient_int")]
    pub buyout_gold: i64,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_leading_int(&s).unwrap_or(0),
        _ => 0,
    })
}
