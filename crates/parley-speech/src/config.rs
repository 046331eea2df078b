//! Configuration for the Azure Speech clients.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{SpeechError, SpeechResult};

/// Recognition language used unless overridden.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Output format requested from the synthesis endpoint.
pub const SYNTHESIS_OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Credentials and endpoints for Azure Speech.
///
/// The subscription key is never printed by the `Debug` impl.
#[derive(Clone)]
pub struct SpeechConfig {
    pub(crate) key: String,
    pub(crate) region: String,
    pub(crate) language: String,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    recognition_endpoint: Option<String>,
    synthesis_endpoint: Option<String>,
}

impl SpeechConfig {
    /// Create a configuration for `region` (e.g. `westeurope`).
    pub fn new(key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            region: region.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("parley-speech/", env!("CARGO_PKG_VERSION")).to_string(),
            recognition_endpoint: None,
            synthesis_endpoint: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom recognition endpoint instead of the regional one.
    #[must_use]
    pub fn with_recognition_endpoint(mut self, url: impl Into<String>) -> Self {
        self.recognition_endpoint = Some(url.into());
        self
    }

    /// Use a custom synthesis endpoint instead of the regional one.
    #[must_use]
    pub fn with_synthesis_endpoint(mut self, url: impl Into<String>) -> Self {
        self.synthesis_endpoint = Some(url.into());
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Both a key and a region are present.
    pub fn is_configured(&self) -> bool {
        !self.key.trim().is_empty() && !self.region.trim().is_empty()
    }

    /// Short-audio recognition URL with language and `format=simple`.
    pub fn recognition_url(&self) -> SpeechResult<Url> {
        let mut url = match &self.recognition_endpoint {
            Some(endpoint) => Url::parse(endpoint)?,
            None => Url::parse(&format!(
                "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
                self.checked_region()?
            ))?,
        };
        url.query_pairs_mut()
            .append_pair("language", &self.language)
            .append_pair("format", "simple");
        Ok(url)
    }

    /// Synthesis URL.
    pub fn synthesis_url(&self) -> SpeechResult<Url> {
        match &self.synthesis_endpoint {
            Some(endpoint) => Ok(Url::parse(endpoint)?),
            None => Ok(Url::parse(&format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                self.checked_region()?
            ))?),
        }
    }

    fn checked_region(&self) -> SpeechResult<&str> {
        let region = self.region.trim();
        if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SpeechError::InvalidRegion {
                region: self.region.clone(),
            });
        }
        Ok(region)
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("key", &if self.key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("region", &self.region)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("recognition_endpoint", &self.recognition_endpoint)
            .field("synthesis_endpoint", &self.synthesis_endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regional_urls() {
        let config = SpeechConfig::new("key", "westeurope");
        assert_eq!(
            config.recognition_url().unwrap().as_str(),
            "https://westeurope.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language=en-US&format=simple"
        );
        assert_eq!(
            config.synthesis_url().unwrap().as_str(),
            "https://westeurope.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = SpeechConfig::new("key", "")
            .with_language("en-GB")
            .with_recognition_endpoint("http://localhost:5000/stt")
            .with_synthesis_endpoint("http://localhost:5000/tts");
        assert_eq!(
            config.recognition_url().unwrap().as_str(),
            "http://localhost:5000/stt?language=en-GB&format=simple"
        );
        assert_eq!(
            config.synthesis_url().unwrap().as_str(),
            "http://localhost:5000/tts"
        );
    }

    #[test]
    fn test_invalid_region() {
        let config = SpeechConfig::new("key", "west europe");
        assert!(matches!(
            config.synthesis_url(),
            Err(SpeechError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_is_configured() {
        assert!(SpeechConfig::new("key", "eastus").is_configured());
        assert!(!SpeechConfig::new("", "eastus").is_configured());
        assert!(!SpeechConfig::new("key", " ").is_configured());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", SpeechConfig::new("secret-key", "eastus"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
