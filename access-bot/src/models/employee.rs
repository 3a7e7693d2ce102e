//! Staff records as returned by the Directus `staff` collection.
//!
//! Deserialization is lenient on purpose: shape problems in the nested
//! `keys` relation are resolved here, once, so nothing downstream has to
//! re-check optional fields.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Directus publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Published,
    Draft,
    Archived,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PublicationStatus {
    pub fn is_published(self) -> bool {
        self == Self::Published
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Employee {
    /// Numeric Telegram user id. Directus serializes bigInteger columns as strings.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub telegram_id: Option<i64>,
    /// Stored with a leading "@"
    #[serde(default, deserialize_with = "non_empty")]
    pub telegram_name: Option<String>,
    #[serde(rename = "fio", default, deserialize_with = "string_or_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub position: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub department: String,
    #[serde(default)]
    pub status: PublicationStatus,
    #[serde(rename = "keys", default, deserialize_with = "lenient_grants")]
    pub grants: Vec<AccessGrant>,
}

/// Row of the staff <-> access junction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessGrant {
    /// `None` when the relation was not expanded or points nowhere
    #[serde(rename = "staff_materials_id", default, deserialize_with = "lenient_item")]
    pub item: Option<AccessItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccessItem {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub link: Option<String>,
    #[serde(default)]
    pub status: PublicationStatus,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(deserializer)?.unwrap_or_default())
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_grants<'de, D>(deserializer: D) -> Result<Vec<AccessGrant>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(rows)) = value else {
        return Ok(Vec::new());
    };

    Ok(rows
        .into_iter()
        .map(|row| serde_json::from_value::<AccessGrant>(row).unwrap_or_default())
        .collect())
}

fn lenient_item<'de, D>(deserializer: D) -> Result<Option<AccessItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        // A bare id means the relation was not expanded
        Some(obj @ Value::Object(_)) => serde_json::from_value(obj).ok(),
        _ => None,
    })
}
