pub mod password;

use serde::Deserialize;

pub use password::{hash_password, verify_dummy, verify_password};

/// Payload of `POST /auth/login`. `name` is accepted as a legacy alias.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// The user name to look up, falling back to the `name` alias.
    pub fn login_name(&self) -> &str {
        if self.user_name.trim().is_empty() {
            &self.name
        } else {
            &self.user_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_name_prefers_user_name() {
        let both: LoginRequest =
            serde_json::from_str(r#"{"user_name":"alice","name":"ally","password":"x"}"#).unwrap();
        assert_eq!(both.login_name(), "alice");

        let legacy: LoginRequest =
            serde_json::from_str(r#"{"name":"ally","password":"x"}"#).unwrap();
        assert_eq!(legacy.login_name(), "ally");

        let blank: LoginRequest =
            serde_json::from_str(r#"{"user_name":"  ","name":"bob","password":"x"}"#).unwrap();
        assert_eq!(blank.login_name(), "bob");

        let neither = LoginRequest::default();
        assert_eq!(neither.login_name(), "");
    }
}
