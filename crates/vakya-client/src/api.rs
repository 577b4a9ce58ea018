//! HTTP client for the auth, sentence and verb game services.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use vakya_core::auth::{AuthResponse, LoginRequest, RegisterRequest};
use vakya_core::error::AuthError;
use vakya_core::model::SentenceRecord;
use vakya_core::traits::{SentenceSource, VerbQuizSource};
use vakya_core::verb_quiz::VerbQuiz;

use crate::config::VakyaConfig;
use crate::error::{server_message, ServiceError};

/// Talks to the three remote services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    auth_url: String,
    sentence_url: String,
    verb_quiz_url: String,
    timeout_secs: u64,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &VakyaConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            auth_url: trim_base(&config.auth_url),
            sentence_url: trim_base(&config.sentence_url),
            verb_quiz_url: trim_base(&config.verb_quiz_url),
            timeout_secs: config.timeout_secs,
            token: None,
            client,
        })
    }

    /// Attaches a bearer token to authenticated calls.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `POST {auth_url}/login`. The form is validated before anything is sent.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        let url = format!("{}/login", self.auth_url);
        self.post_json(&url, request)
            .await
            .map_err(|e| auth_failure(e, "Login failed"))
    }

    /// `POST {auth_url}/register`. The form is validated before anything is sent.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        let url = format!("{}/register", self.auth_url);
        self.post_json(&url, request)
            .await
            .map_err(|e| auth_failure(e, "Registration failed"))
    }

    /// `GET {auth_url}/profile` with the bearer token.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<serde_json::Value, ServiceError> {
        let token = self.token.as_deref().ok_or(ServiceError::NotAuthenticated)?;
        let response = self
            .client
            .get(format!("{}/profile", self.auth_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(e, self.timeout_secs))?;
        self.read_json(response).await
    }

    /// `GET {sentence_url}/get_random_sentence`.
    #[instrument(skip(self))]
    pub async fn random_sentence(&self) -> Result<SentenceRecord, ServiceError> {
        self.get_json(&format!("{}/get_random_sentence", self.sentence_url))
            .await
    }

    /// `GET {verb_quiz_url}/api/get-game`.
    #[instrument(skip(self))]
    pub async fn verb_quiz(&self) -> Result<VerbQuiz, ServiceError> {
        self.get_json(&format!("{}/api/get-game", self.verb_quiz_url))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(e, self.timeout_secs))?;
        self.read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(e, self.timeout_secs))?;
        self.read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body);
            tracing::debug!(status, %message, "service returned an error");
            return Err(if status == 401 || status == 403 {
                ServiceError::Unauthorized(message)
            } else {
                ServiceError::ApiError { status, message }
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// A rejection without a message still gets a readable one.
fn auth_failure(err: ServiceError, fallback: &str) -> AuthError {
    let rejected = matches!(
        err,
        ServiceError::ApiError { .. } | ServiceError::Unauthorized(_)
    );
    match AuthError::from(err) {
        AuthError::Unexpected if rejected => AuthError::Rejected(fallback.to_string()),
        other => other,
    }
}

#[async_trait]
impl SentenceSource for ApiClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_sentence(&self) -> anyhow::Result<SentenceRecord> {
        Ok(self.random_sentence().await?)
    }
}

#[async_trait]
impl VerbQuizSource for ApiClient {
    async fn fetch_verb_quiz(&self) -> anyhow::Result<VerbQuiz> {
        Ok(self.verb_quiz().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use vakya_core::auth::FILL_ALL_FIELDS;
    use vakya_core::model::Role;

    fn client_for(server: &MockServer) -> ApiClient {
        let config = VakyaConfig {
            auth_url: format!("{}/api/", server.uri()),
            sentence_url: server.uri(),
            verb_quiz_url: server.uri(),
            timeout_secs: 5,
            ..VakyaConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn unreachable_client() -> ApiClient {
        let config = VakyaConfig {
            auth_url: "http://127.0.0.1:1/api".into(),
            sentence_url: "http://127.0.0.1:1".into(),
            verb_quiz_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..VakyaConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn login_request() -> LoginRequest {
        LoginRequest {
            email: "arjuna@example.com".into(),
            password: "gandiva".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"email": "arjuna@example.com", "password": "gandiva"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-123",
                "user": {"email": "arjuna@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).login(&login_request()).await.unwrap();
        assert_eq!(response.token, "jwt-123");
        assert_eq!(response.user["email"], "arjuna@example.com");
    }

    #[tokio::test]
    async fn login_rejection_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"message": "Invalid email or password"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .login(&login_request())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Rejected("Invalid email or password".into()));
    }

    #[tokio::test]
    async fn register_rejection_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
            .mount(&server)
            .await;

        let request = RegisterRequest {
            full_name: "Arjuna".into(),
            email: "arjuna@example.com".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        };
        let err = client_for(&server).register(&request).await.unwrap_err();
        assert_eq!(err, AuthError::Rejected("Registration failed".into()));
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = LoginRequest {
            email: String::new(),
            password: "x".into(),
        };
        let err = client_for(&server).login(&request).await.unwrap_err();
        assert_eq!(err, AuthError::Validation(FILL_ALL_FIELDS.into()));
    }

    #[tokio::test]
    async fn unreachable_auth_service() {
        let err = unreachable_client()
            .login(&login_request())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Unreachable);
    }

    #[tokio::test]
    async fn profile_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .and(header("authorization", "Bearer jwt-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fullName": "Arjuna"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.profile().await,
            Err(ServiceError::NotAuthenticated)
        ));

        let profile = client.with_token("jwt-123").profile().await.unwrap();
        assert_eq!(profile["fullName"], "Arjuna");
    }

    #[tokio::test]
    async fn fetches_sentence_with_loose_scalars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_random_sentence"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sentence": "बालः फलं खादति",
                "subject": {"form": "बालः", "root": "बाल", "gender": "masculine", "number": "singular"},
                "object": {"form": "फलं", "root": "फल", "gender": "neuter", "number": "singular"},
                "verb": {"form": "खादति", "root": "खाद्", "class": 1, "meaning": "eats", "person": 3, "number": "singular"},
                "hint": {"verb": {"class": 1, "meaning": "eats"}}
            })))
            .mount(&server)
            .await;

        let record = client_for(&server).fetch_sentence().await.unwrap();
        assert_eq!(record.answer_form(Role::Object), Some("फलं"));
        let verb = record.verb.unwrap();
        assert_eq!(verb.class.as_deref(), Some("1"));
        assert_eq!(verb.person.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn sentence_service_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_random_sentence"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "No sentences found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).random_sentence().await.unwrap_err();
        match err {
            ServiceError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No sentences found");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(unreachable_client().random_sentence().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn malformed_sentence_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_random_sentence"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server).random_sentence().await,
            Err(ServiceError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn fetches_verb_quiz() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/get-game"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sentence": "अहं _____",
                "options": ["गच्छामि", "गच्छति"],
                "correct": "गच्छामि",
                "explanation": "First person singular.",
                "hint": "Hint: Subject 'अहं' is First person singular."
            })))
            .mount(&server)
            .await;

        let quiz = client_for(&server).fetch_verb_quiz().await.unwrap();
        assert_eq!(quiz.correct, "गच्छामि");
        assert_eq!(quiz.options.len(), 2);
    }
}
