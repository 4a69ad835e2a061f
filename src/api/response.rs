use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response code the service uses for success
pub const CODE_OK: i64 = 0;

/// JSON envelope returned by every versioned endpoint:
/// `{ "code": 0, "msg": "OK", "detail": "...", "data": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }

    /// Look up a nested field of `data` by dot-separated path, e.g. `"token"`
    /// or `"user.language"`
    pub fn data_field(&self, path: &str) -> Option<&Value> {
        let mut current = self.data.as_ref()?;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    pub fn data_str(&self, path: &str) -> Option<&str> {
        self.data_field(path).and_then(Value::as_str)
    }
}

impl std::fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "{{code: {}}}", self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_success_envelope() {
        let resp: ApiResponse = serde_json::from_value(json!({
            "code": 0,
            "msg": "OK",
            "data": { "token": "abc", "user": { "language": "en-US" } }
        }))
        .unwrap();

        assert!(resp.is_ok());
        assert_eq!(resp.data_str("token"), Some("abc"));
        assert_eq!(resp.data_str("user.language"), Some("en-US"));
        assert_eq!(resp.data_field("missing"), None);
    }

    #[test]
    fn decodes_error_envelope_without_data() {
        let resp: ApiResponse = serde_json::from_value(json!({
            "code": 2,
            "msg": "Authentication Error",
            "detail": "Token is required"
        }))
        .unwrap();

        assert!(!resp.is_ok());
        assert_eq!(resp.detail.as_deref(), Some("Token is required"));
        assert_eq!(resp.data_str("token"), None);
    }
}
