//! Synthesis voices offered to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Neural voices supported by the synthesis client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoiceName {
    #[default]
    #[serde(rename = "en-IN-AaravNeural")]
    AaravIndia,
    #[serde(rename = "en-IN-AnanyaNeural")]
    AnanyaIndia,
    #[serde(rename = "en-US-DavisNeural")]
    DavisUs,
    #[serde(rename = "en-US-AriaNeural")]
    AriaUs,
    #[serde(rename = "en-GB-RyanNeural")]
    RyanUk,
    #[serde(rename = "en-GB-SoniaNeural")]
    SoniaUk,
}

impl VoiceName {
    pub const ALL: [Self; 6] = [
        Self::AaravIndia,
        Self::AnanyaIndia,
        Self::DavisUs,
        Self::AriaUs,
        Self::RyanUk,
        Self::SoniaUk,
    ];

    /// Service identifier, e.g. `en-IN-AaravNeural`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AaravIndia => "en-IN-AaravNeural",
            Self::AnanyaIndia => "en-IN-AnanyaNeural",
            Self::DavisUs => "en-US-DavisNeural",
            Self::AriaUs => "en-US-AriaNeural",
            Self::RyanUk => "en-GB-RyanNeural",
            Self::SoniaUk => "en-GB-SoniaNeural",
        }
    }

    /// BCP-47 locale of the voice, e.g. `en-IN`.
    pub fn locale(self) -> &'static str {
        let name = self.as_str();
        name.get(..5).unwrap_or(name)
    }
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown voice identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown voice '{0}'")]
pub struct UnknownVoice(pub String);

impl FromStr for VoiceName {
    type Err = UnknownVoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|voice| voice.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVoice(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_names() {
        assert_eq!(
            "en-GB-SoniaNeural".parse::<VoiceName>(),
            Ok(VoiceName::SoniaUk)
        );
        assert_eq!(
            "en-us-arianeural".parse::<VoiceName>(),
            Ok(VoiceName::AriaUs)
        );
        assert!("en-XX-Nobody".parse::<VoiceName>().is_err());
    }

    #[test]
    fn serde_uses_service_names() {
        let json = serde_json::to_string(&VoiceName::DavisUs).unwrap();
        assert_eq!(json, "\"en-US-DavisNeural\"");
        let back: VoiceName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VoiceName::DavisUs);
    }

    #[test]
    fn locale_is_the_name_prefix() {
        assert_eq!(VoiceName::default().locale(), "en-IN");
        assert_eq!(VoiceName::RyanUk.locale(), "en-GB");
    }
}
