//! Company registry lookup.
//!
//! The registry exposes company-change events as an unbounded stream of
//! newline-delimited JSON. The client collects the first N events that carry
//! both a company number and a company name, then drops the response body,
//! which closes the stream promptly.

use crate::result::{EprError, EprResult};
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

/// Configuration for the company registry streaming API
#[derive(Debug, Clone)]
pub struct CompaniesHouseConfig {
    /// Basic API token
    pub api_token: String,
    /// Stream base URL
    pub base_url: String,
}

impl CompaniesHouseConfig {
    /// Create a config against the production stream
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: "https://stream.companieshouse.gov.uk".to_string(),
        }
    }

    /// Point the client at a different stream host (tests, stubs)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth_header(&self) -> String {
        format!("Basic {}", self.api_token)
    }
}

/// One company sourced from the registry, consumed read-only
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyRecord {
    /// Registry number
    pub company_number: String,
    /// Legal name
    pub company_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyEvent {
    #[serde(default)]
    data: CompanyEventData,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyEventData {
    #[serde(default)]
    company_number: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
}

/// Client for the company registry stream
#[derive(Debug, Clone)]
pub struct CompaniesHouseClient {
    config: CompaniesHouseConfig,
    http: reqwest::Client,
}

impl CompaniesHouseClient {
    /// Create a client
    #[must_use]
    pub fn new(config: CompaniesHouseConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Collect up to `max_records` companies carrying both a number and a
    /// name, stopping as soon as enough are seen.
    ///
    /// # Errors
    ///
    /// Returns [`EprError::ExternalLookup`] on a non-2xx response (auth and
    /// connection failures are fatal, never retried), [`EprError::Http`] on
    /// transport failure, or [`EprError::Json`] on a malformed event.
    pub async fn fetch_companies(&self, max_records: usize) -> EprResult<Vec<CompanyRecord>> {
        if max_records == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}/companies", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.config.auth_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EprError::ExternalLookup {
                service: "company registry",
                message: format!("stream request failed with status {status}"),
            });
        }

        let mut companies = Vec::new();
        let mut buffer: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        'read: while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                Self::collect_line(&line[..line.len() - 1], &mut companies)?;
                if companies.len() >= max_records {
                    debug!(count = companies.len(), "company lookup satisfied");
                    break 'read;
                }
            }
        }

        // A final line without a trailing newline still counts
        if companies.len() < max_records && !buffer.is_empty() {
            Self::collect_line(&buffer, &mut companies)?;
        }

        Ok(companies)
    }

    /// Parse one stream line, pushing it when it carries both fields
    fn collect_line(line: &[u8], companies: &mut Vec<CompanyRecord>) -> EprResult<()> {
        let text = String::from_utf8_lossy(line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let event: CompanyEvent = serde_json::from_str(trimmed)?;
        if let (Some(company_number), Some(company_name)) =
            (event.data.company_number, event.data.company_name)
        {
            companies.push(CompanyRecord {
                company_number,
                company_name,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn three_company_feed() -> String {
        [
            r#"{"data":{"company_number":"00000001","company_name":"First Ltd"}}"#,
            r#"{"data":{"company_number":"00000002","company_name":"Second Ltd"}}"#,
            r#"{"data":{"company_number":"00000003","company_name":"Third Ltd"}}"#,
        ]
        .join("\n")
    }

    #[tokio::test]
    async fn lookup_stops_after_max_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(three_company_feed()))
            .mount(&server)
            .await;

        let client =
            CompaniesHouseClient::new(CompaniesHouseConfig::new("token").with_base_url(server.uri()));
        let companies = client.fetch_companies(1).await.unwrap();

        assert_eq!(
            companies,
            vec![CompanyRecord {
                company_number: "00000001".to_string(),
                company_name: "First Ltd".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn events_without_both_fields_are_skipped() {
        let server = MockServer::start().await;
        let feed = [
            r#"{"data":{"company_number":"00000001"}}"#,
            r#"{"data":{"company_name":"Nameless Ltd"}}"#,
            r#"{"data":{"company_number":"00000002","company_name":"Complete Ltd"}}"#,
        ]
        .join("\n");
        Mock::given(method("GET"))
            .and(path("/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;

        let client =
            CompaniesHouseClient::new(CompaniesHouseConfig::new("token").with_base_url(server.uri()));
        let companies = client.fetch_companies(5).await.unwrap();

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].company_name, "Complete Ltd");
    }

    #[tokio::test]
    async fn auth_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client =
            CompaniesHouseClient::new(CompaniesHouseConfig::new("bad").with_base_url(server.uri()));
        let err = client.fetch_companies(1).await.unwrap_err();

        assert!(matches!(
            err,
            EprError::ExternalLookup {
                service: "company registry",
                ..
            }
        ));
    }
}
