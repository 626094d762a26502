//! Password generation through the API Ninjas password generator.

use reqwest::Client;
use serde::Deserialize;

use crate::credential::local::{meets_minimums, MIN_DIGITS, MIN_LOWERCASE, MIN_UPPERCASE};
use crate::error::{RemoteError, RemoteResult};
use crate::models::Credential;
use crate::remote::{ensure_success, probe_service, transport_error};

/// Password generator endpoint.
pub const DEFAULT_PASSWORD_API_URL: &str = "https://api.api-ninjas.com/v1/passwordgenerator";

/// Page used for the startup availability check.
pub const PASSWORD_API_STATUS_URL: &str = "https://api-ninjas.com/";

/// Length requested from the service.
pub const REMOTE_PASSWORD_LENGTH: usize = 12;

/// Service name used in logs and errors.
pub const PASSWORD_SERVICE: &str = "Password Generation";

#[derive(Debug, Deserialize)]
struct PasswordResponse {
    random_password: Option<String>,
}

/// API client. Requests carry no timeout.
#[derive(Clone)]
pub struct RemotePasswordClient {
    client: Client,
    url: String,
    status_url: String,
    api_key: String,
}

impl RemotePasswordClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_urls(api_key, DEFAULT_PASSWORD_API_URL, PASSWORD_API_STATUS_URL)
    }

    pub fn with_urls(
        api_key: impl Into<String>,
        url: impl Into<String>,
        status_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            status_url: status_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Startup availability check.
    pub async fn probe(&self) -> RemoteResult<()> {
        probe_service(&self.client, &self.status_url, PASSWORD_SERVICE).await
    }

    pub async fn generate(&self) -> RemoteResult<Credential> {
        let length = REMOTE_PASSWORD_LENGTH.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("length", length.as_str()),
                ("uppercase", "true"),
                ("lowercase", "true"),
                ("numbers", "true"),
                ("special", "true"),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(PASSWORD_SERVICE, e))?;

        let body = ensure_success(PASSWORD_SERVICE, response)
            .await?
            .text()
            .await
            .map_err(|e| transport_error(PASSWORD_SERVICE, e))?;

        parse_password(&body)
    }
}

fn parse_password(body: &str) -> RemoteResult<Credential> {
    let parsed: PasswordResponse =
        serde_json::from_str(body).map_err(|e| RemoteError::InvalidResponse {
            service: PASSWORD_SERVICE,
            message: e.to_string(),
        })?;

    let password = parsed.random_password.ok_or(RemoteError::MissingField {
        service: PASSWORD_SERVICE,
        field: "random_password",
    })?;

    let length = password.chars().count();
    if length != REMOTE_PASSWORD_LENGTH {
        return Err(RemoteError::InvalidResponse {
            service: PASSWORD_SERVICE,
            message: format!(
                "expected a {}-character password, got {} characters",
                REMOTE_PASSWORD_LENGTH, length
            ),
        });
    }

    if !meets_minimums(&password) {
        return Err(RemoteError::InvalidResponse {
            service: PASSWORD_SERVICE,
            message: format!(
                "password lacks {} lowercase, {} uppercase or {} digit characters",
                MIN_LOWERCASE, MIN_UPPERCASE, MIN_DIGITS
            ),
        });
    }

    Ok(Credential { password })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_parse_password() {
        let cred = parse_password(r#"{"random_password": "aB3$dE6&gHxy"}"#).unwrap();
        assert_eq!(cred.password, "aB3$dE6&gHxy");
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_password(r#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::MissingField { field: "random_password", .. }));
    }

    #[test]
    fn test_parse_wrong_length() {
        let err = parse_password(r#"{"random_password": ""}"#).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse { .. }));
    }

    #[test]
    fn test_parse_weak_password_rejected() {
        let err = parse_password(r#"{"random_password": "aaaaaaaaaaaa"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse { .. }));
        assert!(err.to_string().contains("lowercase"));

        // right length, only one digit
        let err = parse_password(r#"{"random_password": "abcdEFgh!@#1"}"#).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_generate_sends_key_and_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/passwordgenerator")
            .match_header("x-api-key", "secret-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("length".into(), "12".into()),
                Matcher::UrlEncoded("uppercase".into(), "true".into()),
                Matcher::UrlEncoded("lowercase".into(), "true".into()),
                Matcher::UrlEncoded("numbers".into(), "true".into()),
                Matcher::UrlEncoded("special".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"random_password": "Xy7#kLm2!pQr"}"#)
            .create_async()
            .await;

        let client = RemotePasswordClient::with_urls(
            "secret-key",
            format!("{}/v1/passwordgenerator", server.url()),
            server.url(),
        );
        let cred = client.generate().await.unwrap();

        assert_eq!(cred.password, "Xy7#kLm2!pQr");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_rejected_key_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/passwordgenerator")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": "Invalid API Key."}"#)
            .create_async()
            .await;

        let client = RemotePasswordClient::with_urls(
            "bad-key",
            format!("{}/v1/passwordgenerator", server.url()),
            server.url(),
        );
        let err = client.generate().await.unwrap_err();

        assert!(matches!(err, RemoteError::Status { status: 400, .. }));
        assert!(err.to_string().contains("Invalid API Key"));
    }
}
