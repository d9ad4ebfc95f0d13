use serde::{Deserialize, Serialize};

/// A backend user, as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(rename = "avatarUrl", skip_serializing_if = "Option::is_none", default)]
    pub avatar_url: Option<String>,
}

/// The authenticated session: identity plus bearer credential.
///
/// Created from a login response, held for the lifetime of the app,
/// destroyed on logout or on an unauthorized response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user.id
    }
}

/// Login response body: `{ "token": ..., "user": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
