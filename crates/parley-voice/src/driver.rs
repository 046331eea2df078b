//! `ConversationDriver`: runs a [`TurnCoordinator`] against real ports.
//!
//! The driver is the only place that touches the clock, the audio devices
//! and the network. On every tick it drains completions, reads one audio
//! frame and executes whatever [`Effect`]s the coordinator asked for:
//!
//! - recognition and dialogue calls run on spawned tasks and report back
//!   through the coordinator's inbox;
//! - synthesis runs on a spawned task and hands audio to the sink; a new
//!   utterance or a cancel aborts the one in progress;
//! - microphone changes are forwarded to the audio source.
//!
//! Commands from the interface layer arrive over a [`DriverHandle`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parley_core::{
    DialogueGateway, RecognitionClient, SessionProfile, SynthesisClient, TurnError, TurnPhase,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::audio_io::{AudioSink, AudioSource};
use crate::config::TurnConfig;
use crate::coordinator::{CoordinatorEvent, Effect, TurnCoordinator};
use crate::inbox::Completion;
use crate::microphone::MicrophoneMode;

/// Default cadence of the tick loop.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Boundary collaborators the driver executes effects through.
#[derive(Clone)]
pub struct DriverPorts {
    pub recognizer: Arc<dyn RecognitionClient>,
    pub synthesizer: Arc<dyn SynthesisClient>,
    pub gateway: Arc<dyn DialogueGateway>,
}

/// Commands accepted by a running driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    /// Submit typed text.
    SendMessage(String),
    /// Clear a listening pause and arm the microphone.
    ResumeListening,
    /// Turn conversation mode on or off.
    SetConversationMode(bool),
    /// End the conversation now.
    ForceEnd,
}

/// Cloneable handle for sending [`DriverCommand`]s.
#[derive(Debug, Clone)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<DriverCommand>,
}

impl DriverHandle {
    /// Send a command. Returns `false` once the driver has stopped.
    pub fn send(&self, command: DriverCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn send_message(&self, text: impl Into<String>) -> bool {
        self.send(DriverCommand::SendMessage(text.into()))
    }

    pub fn resume_listening(&self) -> bool {
        self.send(DriverCommand::ResumeListening)
    }

    pub fn set_conversation_mode(&self, enabled: bool) -> bool {
        self.send(DriverCommand::SetConversationMode(enabled))
    }

    pub fn force_end(&self) -> bool {
        self.send(DriverCommand::ForceEnd)
    }
}

/// Owns a coordinator and executes its effects until the conversation ends.
pub struct ConversationDriver {
    coordinator: TurnCoordinator,
    ports: DriverPorts,
    source: Box<dyn AudioSource>,
    sink: Arc<dyn AudioSink>,
    commands: mpsc::UnboundedReceiver<DriverCommand>,
    tick_interval: Duration,
    end_when_exhausted: bool,
    /// Cleared once every `DriverHandle` is gone.
    commands_open: bool,
    /// Synthesis task for the current utterance.
    playback: Option<JoinHandle<()>>,
}

impl ConversationDriver {
    /// Create a driver, its command handle and the coordinator event stream.
    pub fn new(
        config: TurnConfig,
        ports: DriverPorts,
        source: Box<dyn AudioSource>,
        sink: Arc<dyn AudioSink>,
    ) -> (
        Self,
        DriverHandle,
        mpsc::UnboundedReceiver<CoordinatorEvent>,
    ) {
        let (coordinator, events) = TurnCoordinator::new(config);
        let (tx, commands) = mpsc::unbounded_channel();

        let driver = Self {
            coordinator,
            ports,
            source,
            sink,
            commands,
            tick_interval: DEFAULT_TICK_INTERVAL,
            end_when_exhausted: true,
            commands_open: true,
            playback: None,
        };
        (driver, DriverHandle { tx }, events)
    }

    /// Change the tick cadence.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Whether an exhausted audio source ends the conversation once it is
    /// back to listening. On by default; turn it off when turns are typed.
    #[must_use]
    pub const fn with_end_when_exhausted(mut self, enabled: bool) -> Self {
        self.end_when_exhausted = enabled;
        self
    }

    /// Open a session, run the conversation to its end and hand back the
    /// coordinator for inspection.
    ///
    /// Fails only if the session could not be opened. The conversation also
    /// ends when it is listening with the microphone released and every
    /// [`DriverHandle`] has been dropped, since nothing could re-arm it.
    pub async fn run(mut self, profile: &SessionProfile) -> Result<TurnCoordinator, TurnError> {
        tracing::info!(
            candidate = %profile.candidate_name,
            position = %profile.position,
            "Opening interview session"
        );
        let start = match self.ports.gateway.start_session(profile).await {
            Ok(start) => start,
            Err(error) => {
                self.coordinator.reject_start(error.clone());
                return Err(error);
            }
        };

        let effects = self.coordinator.begin(now(), start)?;
        self.execute(effects);

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.coordinator.phase() != TurnPhase::Idle {
            let effects = tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                command = self.commands.recv(), if self.commands_open => match command {
                    Some(command) => self.on_command(command),
                    None => {
                        tracing::debug!("All driver handles dropped");
                        self.commands_open = false;
                        Vec::new()
                    }
                },
            };
            self.execute(effects);
        }

        self.cancel_playback();
        tracing::info!(metrics = ?self.coordinator.metrics(), "Conversation driver stopped");
        Ok(self.coordinator)
    }

    fn on_tick(&mut self) -> Vec<Effect> {
        let now = now();
        let mut effects = self.coordinator.tick(now);

        match self.source.read_frame() {
            Ok(Some(frame)) => effects.extend(self.coordinator.on_audio_frame(now, &frame)),
            Ok(None) => {}
            Err(error) => {
                tracing::error!(%error, "Audio source failed; ending conversation");
                effects.extend(self.coordinator.force_end());
                return effects;
            }
        }

        if self.end_when_exhausted
            && self.coordinator.phase() == TurnPhase::Listening
            && self.source.is_exhausted()
        {
            tracing::info!("Audio input exhausted; ending conversation");
            effects.extend(self.coordinator.force_end());
        } else if !self.commands_open
            && self.coordinator.phase() == TurnPhase::Listening
            && self.coordinator.microphone_mode() == MicrophoneMode::Released
        {
            tracing::info!("Microphone released with no handle left to re-arm it; ending conversation");
            effects.extend(self.coordinator.force_end());
        }
        effects
    }

    fn on_command(&mut self, command: DriverCommand) -> Vec<Effect> {
        tracing::debug!(command = ?command, "Driver command");
        let result = match command {
            DriverCommand::SendMessage(text) => self.coordinator.send_message(now(), &text),
            DriverCommand::ResumeListening => self.coordinator.resume_listening(),
            DriverCommand::SetConversationMode(enabled) => {
                Ok(self.coordinator.set_conversation_mode(enabled))
            }
            DriverCommand::ForceEnd => Ok(self.coordinator.force_end()),
        };
        result.unwrap_or_else(|error| {
            tracing::warn!(%error, "Command rejected");
            Vec::new()
        })
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Microphone(mode) => {
                    if let Err(error) = self.source.set_mode(mode) {
                        tracing::warn!(%error, mode = ?mode, "Audio source rejected mode change");
                    }
                }
                Effect::Recognize { request, clip } => {
                    let recognizer = Arc::clone(&self.ports.recognizer);
                    let inbox = self.coordinator.inbox();
                    tokio::spawn(async move {
                        let result = recognizer.recognize(&clip).await;
                        inbox.send(Completion::Recognition {
                            request: Some(request),
                            received_at: now(),
                            result,
                        });
                    });
                }
                Effect::Submit {
                    request,
                    session_id,
                    text,
                } => {
                    let gateway = Arc::clone(&self.ports.gateway);
                    let inbox = self.coordinator.inbox();
                    tokio::spawn(async move {
                        let result = gateway.send_message(&session_id, &text).await;
                        inbox.send(Completion::Reply { request, result });
                    });
                }
                Effect::Speak {
                    utterance,
                    text,
                    voice,
                } => {
                    self.cancel_playback();
                    let synthesizer = Arc::clone(&self.ports.synthesizer);
                    let sink = Arc::clone(&self.sink);
                    let inbox = self.coordinator.inbox();
                    self.playback = Some(tokio::spawn(async move {
                        let played = match synthesizer.synthesize(&text, voice).await {
                            Ok(audio) => sink.play(audio),
                            Err(error) => Err(error),
                        };
                        if let Err(error) = played {
                            inbox.send(Completion::SynthesisFailed { utterance, error });
                        }
                    }));
                }
                Effect::CancelSpeech => {
                    self.cancel_playback();
                    if let Err(error) = self.sink.stop() {
                        tracing::warn!(%error, "Failed to stop playback");
                    }
                }
            }
        }
    }

    fn cancel_playback(&mut self) {
        if let Some(task) = self.playback.take() {
            task.abort();
        }
    }
}

/// Current instant on tokio's clock, so paused test time applies.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
