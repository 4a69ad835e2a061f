// Assertions on service responses. Failures are errors, not panics, so the
// runner can report them and stop the suite.
use anyhow::{anyhow, ensure};

use crate::api::ApiResponse;

pub fn expect_ok(resp: &ApiResponse) -> anyhow::Result<()> {
    ensure!(resp.is_ok(), "expected code 0, got {}: {}", resp.code, resp);
    Ok(())
}

/// `data.<path>` as a non-empty string
pub fn require_data_str<'a>(resp: &'a ApiResponse, path: &str) -> anyhow::Result<&'a str> {
    let value = resp
        .data_str(path)
        .ok_or_else(|| anyhow!("response has no string data.{}: {}", path, resp))?;
    ensure!(!value.is_empty(), "data.{} is empty: {}", path, resp);
    Ok(value)
}

pub fn expect_data_str(resp: &ApiResponse, path: &str, expected: &str) -> anyhow::Result<()> {
    let actual = resp.data_str(path);
    ensure!(
        actual == Some(expected),
        "expected data.{} == {:?}, got {:?}: {}",
        path,
        expected,
        actual,
        resp
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> ApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn non_zero_code_fails() {
        let resp = response(json!({ "code": 3, "msg": "Wrong parameter" }));
        let err = expect_ok(&resp).unwrap_err();
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let resp = response(json!({ "code": 0, "data": { "token": "" } }));
        assert!(require_data_str(&resp, "token").is_err());

        let resp = response(json!({ "code": 0, "data": { "token": "t0k" } }));
        assert_eq!(require_data_str(&resp, "token").unwrap(), "t0k");
    }

    #[test]
    fn field_mismatch_reports_both_values() {
        let resp = response(json!({ "code": 0, "data": { "language": "en-US" } }));
        assert!(expect_data_str(&resp, "language", "en-US").is_ok());

        let err = expect_data_str(&resp, "language", "zh-Hans").unwrap_err().to_string();
        assert!(err.contains("zh-Hans") && err.contains("en-US"));
    }
}
