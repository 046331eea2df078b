//! HTTP backend abstraction for the dialogue gateway.
//!
//! The client is generic over [`HttpBackend`] so tests can swap in canned
//! responses. The production backend uses reqwest and retries read-back
//! GETs on transient errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that exchange JSON with the gateway.
///
/// This is an implementation detail; external code uses the
/// `DialogueGateway` port.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GatewayResult<T>;

    /// POST a JSON body and deserialize the JSON reply.
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> GatewayResult<T>;

    /// GET a URL and discard the body; succeeds on any 2xx.
    async fn probe(&self, url: &Url) -> GatewayResult<()>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// Send a request, retrying GETs on 5xx and network errors.
    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<serde_json::Value>,
    ) -> GatewayResult<reqwest::Response> {
        let retries = if method == Method::GET {
            self.max_retries
        } else {
            0
        };
        let mut last_error: Option<GatewayError> = None;

        for attempt in 0..=retries {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tracing::debug!(%url, attempt, delay_ms = delay.as_millis(), "Retrying gateway request");
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.request(method.clone(), url.as_str());
            if let Some(ref body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!(%method, %url, status = status.as_u16(), "Gateway response");
                    if status.is_success() {
                        return Ok(response);
                    }

                    let error = GatewayError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                        body: response.text().await.unwrap_or_default(),
                    };

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < retries {
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GatewayResult<T> {
        let response = self.send(Method::GET, url, None).await?;
        let data: T = response.json().await?;
        Ok(data)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        body: &B,
    ) -> GatewayResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(Method::POST, url, Some(body)).await?;
        let data: T = response.json().await?;
        Ok(data)
    }

    async fn probe(&self, url: &Url) -> GatewayResult<()> {
        self.send(Method::GET, url, None).await?;
        Ok(())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        /// 2xx with this JSON body.
        Json(serde_json::Value),
        /// Non-2xx with this status and body.
        Status(u16, String),
    }

    /// A request the fake backend received.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    /// A fake HTTP backend that returns canned responses by URL suffix.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Vec<(String, CannedResponse)>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer requests whose path ends with `path_suffix`.
        pub fn with_response(mut self, path_suffix: &str, response: CannedResponse) -> Self {
            self.responses.push((path_suffix.to_string(), response));
            self
        }

        pub fn with_json(self, path_suffix: &str, json: serde_json::Value) -> Self {
            self.with_response(path_suffix, CannedResponse::Json(json))
        }

        /// Everything received so far, oldest first.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn answer(
            &self,
            method: &'static str,
            url: &Url,
            body: Option<serde_json::Value>,
        ) -> GatewayResult<serde_json::Value> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method,
                url: url.to_string(),
                body,
            });

            let response = self
                .responses
                .iter()
                .find(|(suffix, _)| url.path().ends_with(suffix.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| CannedResponse::Status(404, String::new()));

            match response {
                CannedResponse::Json(json) => Ok(json),
                CannedResponse::Status(status, body) => Err(GatewayError::ApiRequestFailed {
                    status,
                    url: url.to_string(),
                    body,
                }),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> GatewayResult<T> {
            let json = self.answer("GET", url, None)?;
            serde_json::from_value(json).map_err(Into::into)
        }

        async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(
            &self,
            url: &Url,
            body: &B,
        ) -> GatewayResult<T> {
            let body = serde_json::to_value(body)?;
            let json = self.answer("POST", url, Some(body))?;
            serde_json::from_value(json).map_err(Into::into)
        }

        async fn probe(&self, url: &Url) -> GatewayResult<()> {
            self.answer("GET", url, None).map(|_| ())
        }
    }
}
