//! # User model and auth payloads
//!
//! [`UserProfile`] is the signed-in user as the server returns it from
//! `/auth/login`, `/auth/register` and `/employees/me`. It is also the shape
//! persisted in the session vault, so it must deserialize whatever the server
//! sends: ids may be numbers or strings ([`RecordId`]), the profile screen's
//! `name`/`position` fields may or may not be present, and unknown fields are
//! ignored.
//!
//! [`Credentials`], [`RegisterRequest`] and [`AuthResponse`] are the request and
//! response bodies of the two auth endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a server record. The REST backend uses integers, other
/// backends use string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Account role. Decides where the user lands after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    /// Route the user is sent to after login.
    pub fn home_route(&self) -> &'static str {
        match self {
            Self::Admin => "/dashboard",
            Self::Employee => "/profile",
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: RecordId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub company_id: Option<RecordId>,
    /// Full name as stored by the profile endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl UserProfile {
    /// Get display name: first + last name, then `name`, then email.
    pub fn display_name(&self) -> String {
        let joined = super::join_name(&self.first_name, &self.last_name);
        if !joined.is_empty() {
            return joined;
        }
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.email.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub role: Role,
}

/// Response of both auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}
