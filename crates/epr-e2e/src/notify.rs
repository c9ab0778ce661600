//! External verification bridge: the notifications feed.
//!
//! Account creation triggers a verification email through a notification
//! service. This client signs a short-lived bearer token, lists recent
//! notifications, and extracts the 6-digit verification code from the first
//! message addressed to the target email.
//!
//! Delivery is asynchronous, so a single poll returning nothing is normal:
//! "not found" and non-2xx responses come back as an empty body rather than
//! an error, and [`NotificationsClient::fetch_verification_code`] wraps the
//! poll in a bounded retry.

use crate::result::{EprError, EprResult};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default number of verification-code polls
pub const DEFAULT_CODE_ATTEMPTS: u32 = 6;

/// Default delay between verification-code polls
pub const DEFAULT_CODE_DELAY: Duration = Duration::from_secs(5);

const CODE_START_MARKER: &str = "6-digit verification code:";
const CODE_END_MARKER: &str = "This code will expire in 10 minutes";

/// Configuration for the notification service API
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Token issuer / API key ID
    pub issuer: String,
    /// Shared secret used to sign the bearer token
    pub secret: String,
    /// API base URL
    pub base_url: String,
    /// Listing endpoint path
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    iat: i64,
}

impl NotifyConfig {
    /// Create a config against the production notification service
    #[must_use]
    pub fn new(issuer: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            secret: secret.into(),
            base_url: "https://api.notifications.service.gov.uk".to_string(),
            endpoint: "v2/notifications".to_string(),
        }
    }

    /// Point the client at a different API host (tests, stubs)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the signed, time-stamped bearer token (HS256, `iss` + `iat`)
    ///
    /// # Errors
    ///
    /// Returns [`EprError::Jwt`] if signing fails.
    pub fn bearer_token(&self) -> EprResult<String> {
        let claims = Claims {
            iss: self.issuer.clone(),
            iat: chrono::Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }
}

#[derive(Debug, Default, Deserialize)]
struct NotificationList {
    #[serde(default)]
    notifications: Vec<Notification>,
}

#[derive(Debug, Default, Deserialize)]
struct Notification {
    #[serde(default)]
    email_address: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Client for the notifications feed
#[derive(Debug, Clone)]
pub struct NotificationsClient {
    config: NotifyConfig,
    http: reqwest::Client,
}

impl NotificationsClient {
    /// Create a client
    #[must_use]
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the body of the first notification addressed to `target_email`.
    ///
    /// A non-2xx response or an empty listing means the message has not
    /// arrived yet and returns `""` — callers treat the empty string as
    /// "retry later", not as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`EprError::Jwt`] if the bearer token cannot be signed, or
    /// [`EprError::Http`] on a transport-level failure.
    pub async fn fetch_notification_body(&self, target_email: &str) -> EprResult<String> {
        let token = self.config.bearer_token()?;
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.endpoint
        );

        let response = self.http.get(url).bearer_auth(token).send().await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "notification listing not available yet");
            return Ok(String::new());
        }

        let list: NotificationList = response.json().await?;
        let body = list
            .notifications
            .into_iter()
            .find(|n| n.email_address.as_deref() == Some(target_email))
            .and_then(|n| n.body)
            .unwrap_or_default();
        Ok(body)
    }

    /// Extract the verification code from a notification body.
    ///
    /// Takes the text between the fixed code marker and the expiry marker,
    /// stripping a leading `#` and surrounding whitespace. Returns `""` when
    /// either marker is absent.
    #[must_use]
    pub fn extract_verification_code(notification_body: &str) -> String {
        let re = Regex::new(&format!(
            "(?s){}(.*?){}",
            regex::escape(CODE_START_MARKER),
            regex::escape(CODE_END_MARKER),
        ))
        .expect("valid regex");

        let Some(captures) = re.captures(notification_body) else {
            return String::new();
        };
        let code = captures
            .get(1)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();
        code.strip_prefix('#').unwrap_or(code).trim().to_string()
    }

    /// Poll for the verification code with the default bounded retry
    ///
    /// # Errors
    ///
    /// Returns [`EprError::MissingData`] if no code arrives within the
    /// retry budget.
    pub async fn fetch_verification_code(&self, target_email: &str) -> EprResult<String> {
        self.fetch_verification_code_with(target_email, DEFAULT_CODE_ATTEMPTS, DEFAULT_CODE_DELAY)
            .await
    }

    /// Poll for the verification code with an explicit retry budget.
    ///
    /// Emails arrive with delay; each attempt lists the feed once and an
    /// empty extraction means "not yet". Exhausting the budget fails with
    /// the last body seen so the message shape can be diagnosed.
    ///
    /// # Errors
    ///
    /// Returns [`EprError::MissingData`] on exhaustion, or any transport
    /// error from the underlying poll.
    pub async fn fetch_verification_code_with(
        &self,
        target_email: &str,
        attempts: u32,
        delay: Duration,
    ) -> EprResult<String> {
        let mut last_body = String::new();
        for attempt in 1..=attempts.max(1) {
            let body = self.fetch_notification_body(target_email).await?;
            let code = Self::extract_verification_code(&body);
            if !code.is_empty() {
                return Ok(code);
            }
            debug!(attempt, target_email, "verification code not yet available");
            last_body = body;
            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }
        Err(EprError::MissingData {
            what: "verification code",
            source_text: last_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    mod extraction_tests {
        use super::*;

        #[test]
        fn code_between_markers_is_extracted() {
            let body = "Use this 6-digit verification code:\n#123456\nThis code will expire in 10 minutes.";
            assert_eq!(NotificationsClient::extract_verification_code(body), "123456");
        }

        #[test]
        fn code_without_hash_prefix_is_extracted() {
            let body = "6-digit verification code: 654321 This code will expire in 10 minutes";
            assert_eq!(NotificationsClient::extract_verification_code(body), "654321");
        }

        #[test]
        fn missing_start_marker_yields_empty() {
            let body = "your code is 123456. This code will expire in 10 minutes";
            assert_eq!(NotificationsClient::extract_verification_code(body), "");
        }

        #[test]
        fn missing_end_marker_yields_empty() {
            let body = "6-digit verification code: #123456";
            assert_eq!(NotificationsClient::extract_verification_code(body), "");
        }
    }

    mod token_tests {
        use super::*;
        use jsonwebtoken::{decode, DecodingKey, Validation};
        use serde::Deserialize;

        #[derive(Debug, Deserialize)]
        struct DecodedClaims {
            iss: String,
            iat: i64,
        }

        #[test]
        fn bearer_token_carries_issuer_and_issued_at() {
            let config = NotifyConfig::new("issuer-id", "shared-secret");
            let token = config.bearer_token().unwrap();

            let mut validation = Validation::new(Algorithm::HS256);
            validation.validate_exp = false;
            validation.required_spec_claims.clear();
            let decoded = decode::<DecodedClaims>(
                &token,
                &DecodingKey::from_secret(b"shared-secret"),
                &validation,
            )
            .unwrap();

            assert_eq!(decoded.claims.iss, "issuer-id");
            assert!(decoded.claims.iat > 0);
        }
    }

    mod fetch_tests {
        use super::*;

        fn listing_json() -> serde_json::Value {
            serde_json::json!({
                "notifications": [
                    {
                        "email_address": "other@example.test",
                        "body": "unrelated message"
                    },
                    {
                        "email_address": "target@example.test",
                        "body": "6-digit verification code:\n#987654\nThis code will expire in 10 minutes"
                    }
                ]
            })
        }

        #[tokio::test]
        async fn body_of_first_matching_notification_is_returned() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/notifications"))
                .and(header_exists("authorization"))
                .respond_with(ResponseTemplate::new(200).set_body_json(listing_json()))
                .mount(&server)
                .await;

            let client = NotificationsClient::new(
                NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
            );
            let body = client
                .fetch_notification_body("target@example.test")
                .await
                .unwrap();
            assert!(body.contains("987654"));
        }

        #[tokio::test]
        async fn non_2xx_is_the_not_yet_sentinel() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/notifications"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server)
                .await;

            let client = NotificationsClient::new(
                NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
            );
            let body = client
                .fetch_notification_body("target@example.test")
                .await
                .unwrap();
            assert_eq!(body, "");
        }

        #[tokio::test]
        async fn retry_exhaustion_is_missing_data() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/notifications"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "notifications": [] })),
                )
                .mount(&server)
                .await;

            let client = NotificationsClient::new(
                NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
            );
            let err = client
                .fetch_verification_code_with("target@example.test", 2, Duration::ZERO)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                EprError::MissingData {
                    what: "verification code",
                    ..
                }
            ));
        }

        #[tokio::test]
        async fn code_is_fetched_through_the_retry_wrapper() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v2/notifications"))
                .respond_with(ResponseTemplate::new(200).set_body_json(listing_json()))
                .mount(&server)
                .await;

            let client = NotificationsClient::new(
                NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
            );
            let code = client
                .fetch_verification_code_with("target@example.test", 1, Duration::ZERO)
                .await
                .unwrap();
            assert_eq!(code, "987654");
        }
    }
}
