use anyhow::Context as _;
use reqwest::Client;
use url::Url;

use crate::api::response::ApiResponse;
use crate::error::HarnessError;

/// Header carrying the user token on authenticated endpoints
pub const USER_TOKEN_HEADER: &str = "WS-User-Token";

/// Literal body the liveness endpoint answers with
pub const PONG: &str = "pong";

/// Fields for `POST /v1/create_user`
#[derive(Debug, Clone, Default)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub verification: &'a str,
    pub password: &'a str,
    pub time_zone: Option<&'a str>,
    pub language: Option<&'a str>,
}

/// Partial update for `POST /v1/user/update`; unset fields are left alone
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSettings<'a> {
    pub time_zone: Option<&'a str>,
    pub language: Option<&'a str>,
}

impl<'a> UserSettings<'a> {
    fn query(&self) -> Vec<(&'static str, &'a str)> {
        let mut query = Vec::new();
        if let Some(tz) = self.time_zone {
            query.push(("tz", tz));
        }
        if let Some(lang) = self.language {
            query.push(("lang", lang));
        }
        query
    }
}

/// Typed HTTP client for the service under test
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
}

impl ServiceClient {
    pub fn new(base_url: &str) -> Result<Self, HarnessError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Client for a service listening on the loopback interface
    pub fn local(port: u16) -> Result<Self, HarnessError> {
        Self::new(&format!("http://127.0.0.1:{}/", port))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, HarnessError> {
        Ok(self.base_url.join(path)?)
    }

    /// GET /ping and return the raw body
    pub async fn ping(&self) -> Result<String, HarnessError> {
        let url = self.endpoint("ping")?;
        let body = self.http.get(url).send().await?.text().await?;
        Ok(body)
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, &str)],
        form: Option<&[(&str, &str)]>,
        token: Option<&str>,
    ) -> anyhow::Result<ApiResponse> {
        let url = self.endpoint(path)?;
        let mut request = self.http.post(url).query(query);
        if let Some(form) = form {
            request = request.form(form);
        }
        if let Some(token) = token {
            request = request.header(USER_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        let status = response.status();
        let body: ApiResponse = response
            .json()
            .await
            .with_context(|| format!("POST {} returned a non-JSON body (status {})", path, status))?;

        tracing::debug!(path, %status, response = %body, "Service response");
        Ok(body)
    }

    pub async fn get_verification(&self, email: &str) -> anyhow::Result<ApiResponse> {
        self.post("v1/get_verification", &[("email", email)], None, None)
            .await
    }

    pub async fn create_user(&self, user: &NewUser<'_>) -> anyhow::Result<ApiResponse> {
        let mut query = vec![("email", user.email), ("verification", user.verification)];
        if let Some(tz) = user.time_zone {
            query.push(("tz", tz));
        }
        if let Some(lang) = user.language {
            query.push(("lang", lang));
        }

        self.post(
            "v1/create_user",
            &query,
            Some(&[("password", user.password)]),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<ApiResponse> {
        self.post(
            "v1/login",
            &[("email", email)],
            Some(&[("password", password)]),
            None,
        )
        .await
    }

    pub async fn user_info(&self, token: &str) -> anyhow::Result<ApiResponse> {
        self.post("v1/user/info", &[], None, Some(token)).await
    }

    pub async fn update_user(
        &self,
        token: &str,
        settings: UserSettings<'_>,
    ) -> anyhow::Result<ApiResponse> {
        self.post("v1/user/update", &settings.query(), None, Some(token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base_with_or_without_slash() {
        let with_slash = ServiceClient::new("http://127.0.0.1:9000/").unwrap();
        let without_slash = ServiceClient::new("http://127.0.0.1:9000").unwrap();

        for client in [with_slash, without_slash] {
            assert_eq!(
                client.endpoint("v1/login").unwrap().as_str(),
                "http://127.0.0.1:9000/v1/login"
            );
        }
    }

    #[test]
    fn local_client_targets_loopback() {
        let client = ServiceClient::local(4321).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:4321/");
    }

    #[test]
    fn settings_only_send_fields_that_are_set() {
        let tz_only = UserSettings { time_zone: Some("Australia/Melbourne"), language: None };
        assert_eq!(tz_only.query(), vec![("tz", "Australia/Melbourne")]);

        let both = UserSettings { time_zone: Some("UTC"), language: Some("zh-Hans") };
        assert_eq!(both.query(), vec![("tz", "UTC"), ("lang", "zh-Hans")]);

        assert!(UserSettings::default().query().is_empty());
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(ServiceClient::new("not a url"), Err(HarnessError::Url(_))));
    }
}
