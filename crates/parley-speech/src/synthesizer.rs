//! Azure neural text-to-speech.

use async_trait::async_trait;
use parley_core::{SynthesisClient, SynthesizedAudio, TurnError, VoiceName};
use url::Url;

use crate::config::{SYNTHESIS_OUTPUT_FORMAT, SpeechConfig};
use crate::error::{SpeechError, SpeechResult};
use crate::transport::{ReqwestTransport, SpeechRequest, SpeechTransport};
use crate::wav;

/// Synthesizer using the reqwest transport.
pub type DefaultAzureSynthesizer = AzureSynthesizer<ReqwestTransport>;

/// Build the SSML document for `text` spoken by `voice`.
pub fn build_ssml(text: &str, voice: VoiceName) -> String {
    format!(
        "<speak version='1.0' xml:lang='{locale}'><voice name='{name}'>{text}</voice></speak>",
        locale = voice.locale(),
        name = voice.as_str(),
        text = escape_xml(text.trim()),
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Text-to-speech client producing decoded mono audio.
pub struct AzureSynthesizer<T: SpeechTransport> {
    transport: T,
    url: Url,
}

impl DefaultAzureSynthesizer {
    pub fn new(config: &SpeechConfig) -> SpeechResult<Self> {
        Self::with_transport(config, ReqwestTransport::new(config)?)
    }
}

impl<T: SpeechTransport> AzureSynthesizer<T> {
    /// Use a custom transport.
    pub fn with_transport(config: &SpeechConfig, transport: T) -> SpeechResult<Self> {
        Ok(Self {
            transport,
            url: config.synthesis_url()?,
        })
    }

    async fn synthesize_text(&self, text: &str, voice: VoiceName) -> SpeechResult<SynthesizedAudio> {
        let request = SpeechRequest {
            url: self.url.clone(),
            content_type: "application/ssml+xml".to_string(),
            output_format: Some(SYNTHESIS_OUTPUT_FORMAT),
            body: build_ssml(text, voice).into_bytes(),
        };
        let response = self.transport.send(request).await?;
        Ok(wav::decode(&response)?.into())
    }
}

#[async_trait]
impl<T: SpeechTransport> SynthesisClient for AzureSynthesizer<T> {
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceName,
    ) -> Result<SynthesizedAudio, TurnError> {
        if text.trim().is_empty() {
            return Err(TurnError::SynthesisCanceled {
                reason: "nothing to say".to_string(),
            });
        }
        tracing::debug!(chars = text.len(), voice = %voice, "Synthesizing reply");

        match self.synthesize_text(text, voice).await {
            Ok(audio) => {
                tracing::debug!(
                    samples = audio.samples.len(),
                    sample_rate = audio.sample_rate,
                    "Synthesis complete"
                );
                Ok(audio)
            }
            Err(e @ SpeechError::Network(_)) => Err(TurnError::TransportFailure {
                code: e.status(),
                message: e.to_string(),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Synthesis canceled");
                Err(TurnError::SynthesisCanceled {
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{CannedReply, FakeTransport};
    use tokio_test::{assert_err, assert_ok};

    fn synthesizer(transport: FakeTransport) -> AzureSynthesizer<FakeTransport> {
        AzureSynthesizer::with_transport(&SpeechConfig::new("key", "eastus"), transport).unwrap()
    }

    #[test]
    fn test_build_ssml() {
        assert_eq!(
            build_ssml(" Hello ", VoiceName::AriaUs),
            "<speak version='1.0' xml:lang='en-US'><voice name='en-US-AriaNeural'>Hello</voice></speak>"
        );
    }

    #[test]
    fn test_ssml_escapes_markup() {
        let ssml = build_ssml("Tom & Jerry's <tag>", VoiceName::RyanUk);
        assert!(ssml.contains("Tom &amp; Jerry&apos;s &lt;tag&gt;"));
        assert!(ssml.contains("xml:lang='en-GB'"));
    }

    #[tokio::test]
    async fn test_synthesize_decodes_reply() {
        let reply = wav::encode_pcm16(&[0.1; 240], 24_000).unwrap();
        let synthesizer = synthesizer(FakeTransport::new().with_reply(CannedReply::Body(reply)));

        let audio = assert_ok!(synthesizer.synthesize("Welcome", VoiceName::default()).await);
        assert_eq!(audio.sample_rate, 24_000);
        assert_eq!(audio.samples.len(), 240);

        let sent = &synthesizer.transport.requests()[0];
        assert_eq!(sent.content_type, "application/ssml+xml");
        assert_eq!(sent.output_format, Some("riff-24khz-16bit-mono-pcm"));
        assert!(String::from_utf8_lossy(&sent.body).contains("en-IN-AaravNeural"));
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_canceled() {
        let synthesizer =
            synthesizer(FakeTransport::new().with_reply(CannedReply::Body(b"nope".to_vec())));
        let err = assert_err!(synthesizer.synthesize("Hello", VoiceName::default()).await);
        assert!(matches!(err, TurnError::SynthesisCanceled { .. }));
    }

    #[tokio::test]
    async fn test_service_error_is_canceled() {
        let synthesizer = synthesizer(
            FakeTransport::new().with_reply(CannedReply::Status(400, "bad voice".to_string())),
        );
        let err = synthesizer
            .synthesize("Hello", VoiceName::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TurnError::SynthesisCanceled { reason } if reason.contains("bad voice")
        ));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_locally() {
        let synthesizer = synthesizer(FakeTransport::new());
        assert_err!(synthesizer.synthesize("   ", VoiceName::default()).await);
        assert!(synthesizer.transport.requests().is_empty());
    }
}
