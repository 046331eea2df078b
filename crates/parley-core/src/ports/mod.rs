//! Port definitions for the boundary collaborators.
//!
//! The turn coordinator never talks to a network service directly. It
//! produces effects; the conversation driver executes them through these
//! traits and feeds completions back. Implementations live in adapter crates:
//!
//! | Port | Implementation |
//! |---|---|
//! | [`DialogueGateway`] | `parley-gateway` (REST/JSON) |
//! | [`RecognitionClient`] | `parley-speech` (Azure speech-to-text REST) |
//! | [`SynthesisClient`] | `parley-speech` (Azure text-to-speech REST) |

mod dialogue;
mod recognition;
mod synthesis;

pub use dialogue::DialogueGateway;
pub use recognition::{RecognitionClient, RecognitionOutcome};
pub use synthesis::SynthesisClient;
