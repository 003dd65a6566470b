//! Session user and login exchange

use serde::{Deserialize, Serialize};

use super::wire;

/// The signed-in staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Body of the login call
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUserWire {
    #[serde(default, alias = "_id", deserialize_with = "wire::string")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub email: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub name: String,
}

/// Login response (schema v1)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponseWire {
    #[serde(default, deserialize_with = "wire::string")]
    pub token: String,
    #[serde(default)]
    pub user: Option<LoginUserWire>,
}

impl LoginResponseWire {
    /// Token and user, or `None` when any required field is missing
    pub fn into_session(self) -> Option<(String, SessionUser)> {
        let user = self.user?;
        if self.token.trim().is_empty() || user.id.trim().is_empty() || user.email.trim().is_empty() {
            return None;
        }

        let name = if user.name.trim().is_empty() {
            user.email.split('@').next().unwrap_or_default().to_string()
        } else {
            user.name
        };

        Some((
            self.token,
            SessionUser {
                id: user.id,
                email: user.email,
                name,
            },
        ))
    }
}
