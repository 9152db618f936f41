//! Serde helpers for database rows.

use serde::{Deserialize, Deserializer};

/// Deserialize an identifier that the database may return either as a
/// string (uuid primary keys) or as a number (bigserial primary keys).
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}
