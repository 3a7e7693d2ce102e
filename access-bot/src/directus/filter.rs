//! Directus filter objects for staff lookups

use serde_json::{json, Value};

const PUBLISHED: &str = "published";

/// Stored usernames carry a leading "@"; accept input with or without it
pub fn normalize_username(username: &str) -> String {
    let trimmed = username.trim();
    format!("@{}", trimmed.strip_prefix('@').unwrap_or(trimmed))
}

pub fn by_telegram_id(external_id: i64) -> Value {
    json!({
        "status": { "_eq": PUBLISHED },
        "telegram_id": { "_eq": external_id }
    })
}

pub fn by_telegram_name(username: &str) -> Value {
    json!({
        "status": { "_eq": PUBLISHED },
        "telegram_name": { "_eq": normalize_username(username) }
    })
}
