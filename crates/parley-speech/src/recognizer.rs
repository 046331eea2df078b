//! Azure short-audio speech recognition.

use async_trait::async_trait;
use parley_core::{RecognitionClient, RecognitionOutcome, SealedClip, TurnError};
use serde::Deserialize;
use url::Url;

use crate::config::SpeechConfig;
use crate::error::{SpeechError, SpeechResult};
use crate::transport::{ReqwestTransport, SpeechRequest, SpeechTransport};
use crate::wav;

/// Recognizer using the reqwest transport.
pub type DefaultAzureRecognizer = AzureRecognizer<ReqwestTransport>;

/// `format=simple` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SimpleRecognition {
    recognition_status: String,
    #[serde(default)]
    display_text: String,
}

/// Interpret a `format=simple` recognition response.
pub fn parse_recognition_response(body: &[u8]) -> SpeechResult<RecognitionOutcome> {
    let parsed: SimpleRecognition = serde_json::from_slice(body)?;
    let outcome = match parsed.recognition_status.as_str() {
        "Success" => RecognitionOutcome::Recognized(parsed.display_text),
        "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => RecognitionOutcome::NoMatch,
        other => RecognitionOutcome::Canceled {
            reason: other.to_string(),
            details: Some(parsed.display_text).filter(|d| !d.is_empty()),
        },
    };
    Ok(outcome)
}

/// Speech-to-text client for sealed clips.
pub struct AzureRecognizer<T: SpeechTransport> {
    transport: T,
    url: Url,
}

impl DefaultAzureRecognizer {
    pub fn new(config: &SpeechConfig) -> SpeechResult<Self> {
        Self::with_transport(config, ReqwestTransport::new(config)?)
    }
}

impl<T: SpeechTransport> AzureRecognizer<T> {
    /// Use a custom transport.
    pub fn with_transport(config: &SpeechConfig, transport: T) -> SpeechResult<Self> {
        Ok(Self {
            transport,
            url: config.recognition_url()?,
        })
    }

    async fn recognize_clip(&self, clip: &SealedClip) -> SpeechResult<RecognitionOutcome> {
        let body = wav::encode_clip(clip)?;
        let request = SpeechRequest {
            url: self.url.clone(),
            content_type: format!(
                "audio/wav; codecs=audio/pcm; samplerate={}",
                clip.sample_rate()
            ),
            output_format: None,
            body,
        };
        let response = self.transport.send(request).await?;
        parse_recognition_response(&response)
    }
}

#[async_trait]
impl<T: SpeechTransport> RecognitionClient for AzureRecognizer<T> {
    async fn recognize(&self, clip: &SealedClip) -> Result<RecognitionOutcome, TurnError> {
        if clip.is_empty() {
            return Ok(RecognitionOutcome::NoMatch);
        }
        tracing::debug!(
            samples = clip.len(),
            sample_rate = clip.sample_rate(),
            "Sending clip for recognition"
        );
        match self.recognize_clip(clip).await {
            Ok(outcome) => Ok(outcome),
            Err(SpeechError::Wav(e)) => Err(TurnError::RecognitionCanceled {
                reason: e.to_string(),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Recognition request failed");
                Err(TurnError::TransportFailure {
                    code: e.status(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{CannedReply, FakeTransport};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn recognizer(transport: FakeTransport) -> AzureRecognizer<FakeTransport> {
        AzureRecognizer::with_transport(&SpeechConfig::new("key", "eastus"), transport).unwrap()
    }

    fn clip() -> SealedClip {
        SealedClip::new(vec![0.2; 1_600], 16_000)
    }

    #[test]
    fn test_parse_success() {
        let body = br#"{"RecognitionStatus":"Success","DisplayText":"Hello there.","Offset":100,"Duration":500}"#;
        assert_eq!(
            parse_recognition_response(body).unwrap(),
            RecognitionOutcome::Recognized("Hello there.".to_string())
        );
    }

    #[test]
    fn test_parse_no_match_variants() {
        for status in ["NoMatch", "InitialSilenceTimeout", "BabbleTimeout"] {
            let body = json!({"RecognitionStatus": status}).to_string();
            assert_eq!(
                parse_recognition_response(body.as_bytes()).unwrap(),
                RecognitionOutcome::NoMatch
            );
        }
    }

    #[test]
    fn test_parse_other_status_is_canceled() {
        let body = br#"{"RecognitionStatus":"Error"}"#;
        assert_eq!(
            parse_recognition_response(body).unwrap(),
            RecognitionOutcome::Canceled {
                reason: "Error".to_string(),
                details: None,
            }
        );
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_recognition_response(b"<html>"),
            Err(SpeechError::JsonParse(_))
        ));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = FakeTransport::new()
            .with_json(&json!({"RecognitionStatus": "Success", "DisplayText": "Hi"}));
        let recognizer = recognizer(transport);

        let outcome = assert_ok!(recognizer.recognize(&clip()).await);
        assert_eq!(outcome.text(), Some("Hi"));

        let sent = &recognizer.transport.requests()[0];
        assert_eq!(
            sent.content_type,
            "audio/wav; codecs=audio/pcm; samplerate=16000"
        );
        assert_eq!(sent.body.len(), 44 + 3_200);
        assert_eq!(sent.url.query(), Some("language=en-US&format=simple"));
    }

    #[tokio::test]
    async fn test_empty_clip_skips_the_network() {
        let recognizer = recognizer(FakeTransport::new());
        let outcome =
            assert_ok!(recognizer.recognize(&SealedClip::new(Vec::new(), 16_000)).await);
        assert_eq!(outcome, RecognitionOutcome::NoMatch);
        assert!(recognizer.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_service_error_is_transport_failure() {
        let transport =
            FakeTransport::new().with_reply(CannedReply::Status(401, "Access denied".to_string()));
        let err = assert_err!(recognizer(transport).recognize(&clip()).await);
        assert!(matches!(
            err,
            TurnError::TransportFailure {
                code: Some(401),
                ..
            }
        ));
    }
}
