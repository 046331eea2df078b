//! CLI bootstrap - the composition root.
//!
//! This module is the only place where concrete adapters are wired
//! together: settings file, dialogue gateway client, speech clients and the
//! offline stand-ins used when no speech credentials are available.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use parley_core::{
    DialogueGateway, RecognitionClient, Settings, SynthesisClient, validate_settings,
};
use parley_gateway::{DefaultGatewayClient, GatewayConfig};
use parley_speech::{AzureRecognizer, AzureSynthesizer, DEFAULT_LANGUAGE, SpeechConfig};
use parley_voice::{DriverPorts, TurnConfig};

use crate::error::CliError;
use crate::offline::{ScriptedRecognizer, SilentSynthesizer};
use crate::parser::Cli;

/// Speech service options shared by the conversation commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SpeechArgs {
    /// Azure Speech subscription key
    #[arg(long, env = "AZURE_SPEECH_KEY", hide_env_values = true)]
    pub speech_key: Option<String>,
    /// Azure Speech region, e.g. westeurope
    #[arg(long, env = "AZURE_SPEECH_REGION")]
    pub speech_region: Option<String>,
    /// Recognition language
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,
    /// Never call the speech service, even with credentials
    #[arg(long)]
    pub offline: bool,
}

impl SpeechArgs {
    /// Speech configuration, if online use is requested and possible.
    fn speech_config(&self, settings: &Settings) -> Option<SpeechConfig> {
        if self.offline {
            return None;
        }
        let key = self.speech_key.as_deref()?;
        let region = self.speech_region.as_deref()?;
        let config = SpeechConfig::new(key, region)
            .with_language(&self.language)
            .with_timeout(settings.effective_request_timeout());
        config.is_configured().then_some(config)
    }
}

/// Default settings file: `<config dir>/parley/settings.json`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parley").join("settings.json"))
}

/// Load and validate settings.
///
/// A missing default file yields defaults; a missing explicit file is an
/// error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => match default_settings_path() {
            Some(path) => (path, false),
            None => return Ok(Settings::default()),
        },
    };

    if !path.exists() {
        if explicit {
            return Err(CliError::Config(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), "No settings file; using defaults");
        return Ok(Settings::default());
    }

    let raw = std::fs::read_to_string(&path)?;
    let settings: Settings = serde_json::from_str(&raw)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    validate_settings(&settings)?;
    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
    pub gateway: Arc<DefaultGatewayClient>,
}

impl CliContext {
    pub fn turn_config(&self) -> TurnConfig {
        TurnConfig::from_settings(&self.settings)
    }

    /// Gateway as the port the coordinator sees.
    pub fn dialogue(&self) -> Arc<dyn DialogueGateway> {
        Arc::clone(&self.gateway) as Arc<dyn DialogueGateway>
    }

    /// Recognition and synthesis clients, online when credentials allow.
    pub fn speech_clients(
        &self,
        speech: &SpeechArgs,
        transcripts: Vec<String>,
    ) -> Result<(Arc<dyn RecognitionClient>, Arc<dyn SynthesisClient>), CliError> {
        if let Some(config) = speech.speech_config(&self.settings) {
            tracing::info!(region = config.region(), language = config.language(), "Using Azure Speech");
            let recognizer: Arc<dyn RecognitionClient> = Arc::new(AzureRecognizer::new(&config)?);
            let synthesizer: Arc<dyn SynthesisClient> = Arc::new(AzureSynthesizer::new(&config)?);
            return Ok((recognizer, synthesizer));
        }

        if !speech.offline {
            tracing::warn!("No speech credentials; recognizing from --transcript and speaking silence");
        }
        let recognizer: Arc<dyn RecognitionClient> = Arc::new(ScriptedRecognizer::new(transcripts));
        let synthesizer: Arc<dyn SynthesisClient> =
            Arc::new(SilentSynthesizer::new(self.settings.effective_sample_rate()));
        Ok((recognizer, synthesizer))
    }

    pub fn driver_ports(
        &self,
        speech: &SpeechArgs,
        transcripts: Vec<String>,
    ) -> Result<DriverPorts, CliError> {
        let (recognizer, synthesizer) = self.speech_clients(speech, transcripts)?;
        Ok(DriverPorts {
            recognizer,
            synthesizer,
            gateway: self.dialogue(),
        })
    }
}

/// Bootstrap the CLI context.
pub fn bootstrap(cli: &Cli) -> Result<CliContext, CliError> {
    let settings = load_settings(cli.settings.as_deref())?;
    let gateway_config = GatewayConfig::new()
        .with_base_url(cli.gateway_url.trim())
        .with_timeout(settings.effective_request_timeout());
    let gateway = DefaultGatewayClient::new(&gateway_config)?;
    tracing::debug!(gateway = %gateway.base_url(), "Gateway client ready");

    Ok(CliContext {
        settings,
        settings_path: cli.settings.clone().or_else(default_settings_path),
        gateway: Arc::new(gateway),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_missing_explicit_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_settings(Some(&dir.path().join("missing.json")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_partial_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"voice_threshold": 0.05, "auto_send": false}"#).unwrap();

        let settings = assert_ok!(load_settings(Some(&path)));
        assert!((settings.effective_voice_threshold() - 0.05).abs() < f32::EPSILON);
        assert!(!settings.effective_auto_send());
        assert_eq!(settings.effective_sample_rate(), 16_000);
    }

    #[test]
    fn test_invalid_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"sample_rate": 4000}"#).unwrap();

        let err = assert_err!(load_settings(Some(&path)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_offline_speech_config() {
        let args = SpeechArgs {
            speech_key: Some("key".to_string()),
            speech_region: Some("eastus".to_string()),
            language: DEFAULT_LANGUAGE.to_string(),
            offline: true,
        };
        assert!(args.speech_config(&Settings::default()).is_none());

        let online = SpeechArgs {
            offline: false,
            ..args
        };
        assert!(online.speech_config(&Settings::default()).is_some());
    }
}
