//! HTTP transport for the speech endpoints.
//!
//! Both clients are generic over [`SpeechTransport`] so the request shaping
//! and response parsing can be tested without a network.

use async_trait::async_trait;
use url::Url;

use crate::config::SpeechConfig;
use crate::error::{SpeechError, SpeechResult};

/// A single POST to a speech endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub url: Url,
    pub content_type: String,
    /// Value for `X-Microsoft-OutputFormat`, synthesis only.
    pub output_format: Option<&'static str>,
    pub body: Vec<u8>,
}

/// Sends speech requests and returns the raw response body.
#[async_trait]
pub trait SpeechTransport: Send + Sync {
    /// POST the request; non-2xx answers are [`SpeechError::ServiceFailed`].
    async fn send(&self, request: SpeechRequest) -> SpeechResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// Production transport using reqwest and a subscription key.
pub struct ReqwestTransport {
    client: reqwest::Client,
    key: String,
}

impl ReqwestTransport {
    /// Build a transport; fails without a key and region.
    pub fn new(config: &SpeechConfig) -> SpeechResult<Self> {
        if !config.is_configured() {
            return Err(SpeechError::MissingCredentials);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            key: config.key.clone(),
        })
    }
}

#[async_trait]
impl SpeechTransport for ReqwestTransport {
    async fn send(&self, request: SpeechRequest) -> SpeechResult<Vec<u8>> {
        let bytes = request.body.len();
        let mut builder = self
            .client
            .post(request.url.as_str())
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(reqwest::header::CONTENT_TYPE, &request.content_type)
            .body(request.body);
        if let Some(format) = request.output_format {
            builder = builder.header(OUTPUT_FORMAT_HEADER, format);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %request.url, bytes, status = status.as_u16(), "Speech response");

        if !status.is_success() {
            return Err(SpeechError::ServiceFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ============================================================================
// Fake Transport for Testing
// ============================================================================
