//! Wire DTOs for the authentication endpoints.
//!
//! DESIGN
//! ======
//! `User` keeps every field the API sends. The session core only cares
//! whether a user exists, so unknown fields ride along in `extra` and views
//! can read them without this module growing a field per backend change.
//! The typed fields never reject a payload: a missing, `null` or oddly typed
//! value decodes to its empty default.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// An authenticated user as returned by `/auth/me`, `/auth/login` and
/// `/auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server identifier. Numeric ids are normalized to their decimal string.
    #[serde(default, deserialize_with = "deserialize_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    /// Login identifier.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub email: String,
    /// Subscription plan, if the backend reports one.
    #[serde(
        default,
        rename = "planType",
        alias = "plan_type",
        deserialize_with = "deserialize_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub plan_type: Option<String>,
    /// Any additional fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of a successful login or registration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// JSON body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    })
}

fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_text(deserializer).map(Option::unwrap_or_default)
}
