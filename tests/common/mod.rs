#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use websentry_functional::database::{DatabaseError, VerificationCodes};
use websentry_functional::service::ServiceProcess;
use wiremock::ResponseTemplate;

/// In-memory stand-in for the verification table
#[derive(Default)]
pub struct FakeCodes {
    codes: HashMap<String, String>,
}

impl FakeCodes {
    pub fn with(email: &str, code: &str) -> Self {
        let mut codes = HashMap::new();
        codes.insert(email.to_string(), code.to_string());
        Self { codes }
    }
}

#[async_trait]
impl VerificationCodes for FakeCodes {
    async fn fetch_verification_code(&self, email: &str) -> Result<String, DatabaseError> {
        self.codes
            .get(email)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(email.to_string()))
    }
}

/// `{"code": 0, "msg": "OK"}` plus optional data, as the service answers
pub fn ok_response(data: Option<Value>) -> ResponseTemplate {
    let mut body = json!({ "code": 0, "msg": "OK" });
    if let Some(data) = data {
        body["data"] = data;
    }
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn error_response(code: i64, msg: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "code": code, "msg": msg }))
}

/// Poll until the process has exited so tests do not race its shutdown
pub async fn wait_for_exit(process: &mut ServiceProcess) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if process.has_exited().expect("try_wait failed").is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("process did not exit within 5s");
}
