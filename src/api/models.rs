//! Wire payloads exchanged with the remote service.
//!
//! These types are separate from the domain models so the JSON shape of a
//! request can change without touching the rest of the crate.

use crate::domain::{Credentials, Registration};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            email: &credentials.email,
            password: &credentials.password,
        }
    }
}

/// Body of `POST /user`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub repeat_password: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
}

impl<'a> From<&'a Registration> for RegisterRequest<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            email: &registration.email,
            password: &registration.password,
            repeat_password: &registration.repeat_password,
            name: &registration.name,
            surname: &registration.surname,
        }
    }
}

/// `{ "result": bool }` returned by the auth endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ApiResult {
    #[serde(default)]
    pub result: Option<bool>,
}

impl ApiResult {
    /// `true` only when the service explicitly answered `"result": false`.
    ///
    /// A body without a `result` field is not a rejection.
    #[must_use]
    pub fn is_rejected(body: &str) -> bool {
        serde_json::from_str::<Self>(body).is_ok_and(|r| r.result == Some(false))
    }
}

/// `{ "error": "..." }` body of a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// Extracts a non-empty `error` message from a response body.
    ///
    /// Bodies that are not JSON, or whose `error` is missing or blank, yield `None`.
    #[must_use]
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|payload| payload.error)
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
    }
}
