use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Stored user. The password is kept as sent; nothing hashes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Self-registration payload after presence checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

const REQUIRED: [&str; 4] = ["username", "email", "password", "role"];

impl NewUser {
    /// Every required field must be a non-empty string; the error lists all that are not.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, ModelError> {
        let present = |key: &str| -> Option<String> {
            match body.get(key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            }
        };

        let missing: Vec<&'static str> = REQUIRED.iter().copied().filter(|k| present(k).is_none()).collect();
        if !missing.is_empty() {
            return Err(ModelError::MissingFields(missing));
        }

        Ok(Self {
            username: present("username").unwrap_or_default(),
            email: present("email").unwrap_or_default(),
            password: present("password").unwrap_or_default(),
            role: present("role").unwrap_or_default(),
        })
    }

    pub fn into_user(self, id: i64) -> User {
        User { id, username: self.username, email: self.email, password: self.password, role: self.role }
    }
}
