//! Turn coordinator: the conversation state machine.
//!
//! ```text
//!   Idle → Listening → Recording → AwaitingRecognition → AwaitingReply → Speaking → Listening
//!                                                             └────────→ Ending → Idle
//! ```
//!
//! The coordinator is synchronous and owns every piece of turn state. It
//! never performs I/O and never reads a clock: each entry point receives the
//! current `Instant`, and each side effect is returned as an [`Effect`] for
//! the driver to execute. Results of boundary calls come back through the
//! [`InboxSender`] and are applied on the next [`tick`](TurnCoordinator::tick),
//! in arrival order.
//!
//! Guarantees:
//! - at most one recording clip is open, and only while the microphone is
//!   leased for recording;
//! - at most one dialogue request is in flight;
//! - listening is paused for the estimated length of every spoken reply and
//!   resumed once afterwards, unless the conversation ended first;
//! - a forced end cancels every pending deadline and never leaves listening
//!   paused.

use std::fmt;
use std::time::{Duration, Instant};

use parley_core::{
    ChatReply, ConversationLog, DialogueTurn, RecognitionOutcome, Role, SealedClip, SessionStart,
    TurnError, TurnPhase, VoiceName,
};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::archive::{ArchivedClip, ClipArchive};
use crate::config::TurnConfig;
use crate::estimate;
use crate::inbox::{self, Completion, Inbox, InboxSender};
use crate::metrics::TurnCoordinatorMetrics;
use crate::microphone::{MicrophoneLease, MicrophoneMode};
use crate::pause::ListeningPauseController;
use crate::recording::{CaptureStatus, RecordingSession};
use crate::timer::Timer;
use crate::vad::{VadDecision, VoiceActivityDetector};

// ── Request ids ────────────────────────────────────────────────────

/// Identifies one boundary call within one conversation.
///
/// Completions carrying an id from an earlier conversation are stale and
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId {
    conversation: u64,
    seq: u64,
}

impl RequestId {
    pub const fn new(conversation: u64, seq: u64) -> Self {
        Self { conversation, seq }
    }

    pub const fn conversation(self) -> u64 {
        self.conversation
    }

    pub const fn seq(self) -> u64 {
        self.seq
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.conversation, self.seq)
    }
}

// ── Events emitted to the interface layer ──────────────────────────

/// Events emitted by the coordinator to the UI / application layer.
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    /// Phase changed.
    PhaseChanged { old: TurnPhase, new: TurnPhase },

    /// A turn was appended to the conversation log.
    TurnAppended(DialogueTurn),

    /// Human-readable status line.
    Status(String),

    /// Listening paused for synthesis. `None` means until the conversation ends.
    ListeningPaused { resume_in: Option<Duration> },

    /// Listening resumed after synthesis.
    ListeningResumed,

    /// Conversation ended with a summary from the remote service.
    SummaryReady(String),

    /// A recoverable failure occurred.
    Failure(TurnError),

    /// Microphone level (0.0-1.0), for meters.
    AudioLevel(f32),
}

// ── Effects for the driver ─────────────────────────────────────────

/// Side effects requested by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the microphone to a new holder.
    Microphone(MicrophoneMode),

    /// Run recognition on a sealed clip.
    Recognize { request: RequestId, clip: SealedClip },

    /// Send a user message to the dialogue gateway.
    Submit {
        request: RequestId,
        session_id: String,
        text: String,
    },

    /// Synthesize and play `text`.
    Speak {
        utterance: RequestId,
        text: String,
        voice: VoiceName,
    },

    /// Stop any synthesis or playback in progress.
    CancelSpeech,
}

// ── Turn state ─────────────────────────────────────────────────────

/// The single authoritative state of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    pub phase: TurnPhase,
    /// Text submitted and still awaiting a reply.
    pub pending_recognized_text: Option<String>,
    /// Text of the last submission that got a reply.
    pub last_submitted_text: String,
    /// When that text was recognized.
    pub last_submitted_at: Option<Instant>,
    pub is_interview_active: bool,
    pub is_ending: bool,
    pub session_id: Option<String>,
}

/// Recognized text waiting to be judged for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub text: String,
    pub received_at: Instant,
}

#[derive(Debug)]
struct InFlightReply {
    request: RequestId,
    text: String,
    received_at: Instant,
}

// ── Coordinator ────────────────────────────────────────────────────

/// The voice turn-taking state machine.
pub struct TurnCoordinator {
    config: TurnConfig,
    state: TurnState,
    metrics: TurnCoordinatorMetrics,
    log: ConversationLog,
    archive: ClipArchive,

    vad: VoiceActivityDetector,
    recording: RecordingSession,
    microphone: MicrophoneLease,
    pause: ListeningPauseController,
    ending: Timer,

    inbox: Inbox,
    inbox_tx: InboxSender,
    event_tx: mpsc::UnboundedSender<CoordinatorEvent>,

    /// Bumped at every conversation start; stamps request ids.
    conversation: u64,
    next_seq: u64,
    awaiting_recognition: Option<RequestId>,
    in_flight: Option<InFlightReply>,
    summary: Option<String>,
    /// Whether the microphone is re-armed after each turn.
    conversation_mode: bool,
}

impl TurnCoordinator {
    /// Create an idle coordinator.
    ///
    /// Returns the coordinator and a receiver for [`CoordinatorEvent`]s.
    pub fn new(config: TurnConfig) -> (Self, mpsc::UnboundedReceiver<CoordinatorEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (inbox_tx, inbox) = inbox::channel();

        let coordinator = Self {
            state: TurnState::default(),
            metrics: TurnCoordinatorMetrics::default(),
            log: ConversationLog::new(config.max_conversation_lines),
            archive: ClipArchive::new(config.max_archived_clips),
            vad: VoiceActivityDetector::new(config.vad),
            recording: RecordingSession::new(config.sample_rate, config.max_recording),
            microphone: MicrophoneLease::new(),
            pause: ListeningPauseController::new(),
            ending: Timer::new(),
            inbox,
            inbox_tx,
            event_tx,
            conversation: 0,
            next_seq: 0,
            awaiting_recognition: None,
            in_flight: None,
            summary: None,
            conversation_mode: config.continuous_listening,
            config,
        };

        (coordinator, event_rx)
    }

    /// Producer handle for boundary completions.
    pub fn inbox(&self) -> InboxSender {
        self.inbox_tx.clone()
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Start a conversation on a freshly opened remote session.
    ///
    /// Resets counters, clears the conversation log and opens a fresh
    /// [`TurnState`]. The welcome message is logged and, with auto-speak on,
    /// spoken before listening starts.
    pub fn begin(&mut self, now: Instant, session: SessionStart) -> Result<Vec<Effect>, TurnError> {
        if self.state.phase.is_active() {
            return Err(TurnError::AlreadyActive);
        }

        let stale = self.inbox.drain().len();
        if stale > 0 {
            tracing::debug!(stale, "Discarded completions from a previous conversation");
        }

        self.conversation += 1;
        self.next_seq = 0;
        self.metrics = TurnCoordinatorMetrics::default();
        self.log.clear();
        self.archive.clear();
        self.summary = None;
        self.awaiting_recognition = None;
        self.in_flight = None;
        self.ending.cancel();
        self.pause.release();
        self.recording.discard();
        self.conversation_mode = self.config.continuous_listening;
        self.state = TurnState {
            is_interview_active: true,
            session_id: Some(session.session_id.clone()),
            ..TurnState::default()
        };

        tracing::info!(
            session_id = %session.session_id,
            conversation = self.conversation,
            "Conversation started"
        );

        let mut effects = Vec::new();
        self.set_phase(TurnPhase::Listening);

        let welcome = session.welcome_message.trim();
        if welcome.is_empty() {
            self.enter_listening(&mut effects);
        } else {
            self.append(Role::Agent, welcome);
            if self.config.auto_speak {
                self.speak(now, welcome.to_string(), &mut effects);
            } else {
                self.enter_listening(&mut effects);
            }
        }

        Ok(effects)
    }

    /// Report that opening the remote session failed. Stays `Idle`.
    pub fn reject_start(&self, error: TurnError) {
        tracing::warn!(%error, "Could not start conversation");
        self.status(format!("Failed to start session: {error}"));
        self.emit(CoordinatorEvent::Failure(error));
    }

    /// Submit typed text as if it had been recognized.
    ///
    /// Only accepted while `Listening` with listening not paused. Typed text
    /// skips the duplicate check.
    pub fn send_message(&mut self, now: Instant, text: &str) -> Result<Vec<Effect>, TurnError> {
        if !self.state.is_interview_active {
            return Err(TurnError::NotActive);
        }
        let phase = self.state.phase;
        if phase != TurnPhase::Listening || self.pause.is_paused() {
            return Err(TurnError::Busy { phase });
        }

        let mut effects = Vec::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(effects);
        }
        self.submit(
            RecognitionEvent {
                text: text.to_string(),
                received_at: now,
            },
            &mut effects,
        );
        Ok(effects)
    }

    /// Clear a listening pause and arm the microphone now.
    ///
    /// Works from `Speaking` (cutting the estimated wait short) and from
    /// `Listening` (after a resume that left listening paused because
    /// conversation mode was off).
    pub fn resume_listening(&mut self) -> Result<Vec<Effect>, TurnError> {
        if !self.state.is_interview_active {
            return Err(TurnError::NotActive);
        }
        let phase = self.state.phase;
        if !matches!(phase, TurnPhase::Listening | TurnPhase::Speaking) {
            return Err(TurnError::Busy { phase });
        }

        let mut effects = Vec::new();
        if self.pause.resume() {
            self.emit(CoordinatorEvent::ListeningResumed);
        }
        self.set_phase(TurnPhase::Listening);
        self.vad.arm();
        self.set_microphone(MicrophoneMode::Monitoring, &mut effects);
        self.status("Listening...");
        Ok(effects)
    }

    /// Turn conversation mode (re-arming the microphone after each turn) on
    /// or off. Turning it off while recording drops the open clip.
    pub fn set_conversation_mode(&mut self, enabled: bool) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.conversation_mode == enabled {
            return effects;
        }
        self.conversation_mode = enabled;
        tracing::info!(enabled, "Conversation mode changed");

        if !self.state.is_interview_active {
            return effects;
        }

        match (enabled, self.state.phase) {
            (true, TurnPhase::Listening) if !self.pause.is_paused() => {
                self.vad.arm();
                self.set_microphone(MicrophoneMode::Monitoring, &mut effects);
            }
            (false, TurnPhase::Listening) => {
                self.vad.disarm();
                self.set_microphone(MicrophoneMode::Released, &mut effects);
            }
            (false, TurnPhase::Recording) => {
                self.recording.discard();
                self.vad.disarm();
                self.set_phase(TurnPhase::Listening);
                self.set_microphone(MicrophoneMode::Released, &mut effects);
            }
            _ => {}
        }
        effects
    }

    /// End the conversation now, from any phase.
    ///
    /// Cancels every pending deadline, drops any open clip, releases the
    /// listening pause and the microphone. Completions still in flight are
    /// ignored when they arrive.
    pub fn force_end(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let phase = self.state.phase;
        if !phase.is_active() {
            return effects;
        }

        tracing::info!(phase = ?phase, "Conversation force-ended");
        if matches!(phase, TurnPhase::Speaking | TurnPhase::Ending) {
            effects.push(Effect::CancelSpeech);
        }
        let summary = self.summary.take();
        self.teardown(&mut effects);
        if let Some(summary) = summary {
            self.emit(CoordinatorEvent::SummaryReady(summary));
        }
        effects
    }

    // ── Inputs ─────────────────────────────────────────────────────

    /// Feed one captured frame (mono, at the configured sample rate).
    ///
    /// Frames are ignored while the microphone is released.
    pub fn on_audio_frame(&mut self, now: Instant, frame: &[f32]) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.microphone.is_capturing() {
            return effects;
        }

        if self.state.phase == TurnPhase::Recording
            && self.recording.append(frame) == CaptureStatus::Full
        {
            tracing::info!("Recording reached its maximum length");
            self.seal_and_dispatch(now, &mut effects);
            return effects;
        }

        let decision = self.vad.process_frame(frame, self.config.sample_rate);
        if !self.event_tx.is_closed() {
            self.emit(CoordinatorEvent::AudioLevel(self.vad.level()));
        }

        match (decision, self.state.phase) {
            (Some(VadDecision::SpeechStart), TurnPhase::Listening) => {
                self.start_recording(now, &mut effects);
            }
            (Some(VadDecision::SpeechEnd), TurnPhase::Recording) => {
                self.seal_and_dispatch(now, &mut effects);
            }
            (Some(decision), phase) => {
                tracing::debug!(decision = ?decision, phase = ?phase, "VAD decision ignored");
            }
            (None, _) => {}
        }
        effects
    }

    /// Apply queued completions and evaluate every deadline.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        for completion in self.inbox.drain() {
            self.apply(now, completion, &mut effects);
        }

        if self.pause.poll(now).is_some() {
            self.resume_after_speech(&mut effects);
        }

        if self.ending.poll(now).is_some() {
            self.finish_ending(&mut effects);
        }

        if self.state.phase == TurnPhase::Recording && self.recording.max_duration_reached(now) {
            tracing::info!(
                max_secs = self.recording.max_duration().as_secs(),
                "Recording timed out"
            );
            self.seal_and_dispatch(now, &mut effects);
        }

        effects
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    pub const fn state(&self) -> &TurnState {
        &self.state
    }

    pub const fn metrics(&self) -> &TurnCoordinatorMetrics {
        &self.metrics
    }

    pub const fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub const fn archive(&self) -> &ClipArchive {
        &self.archive
    }

    /// Summary stored by a terminal reply, until the conversation ends.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub const fn microphone_mode(&self) -> MicrophoneMode {
        self.microphone.mode()
    }

    pub const fn is_recording(&self) -> bool {
        self.recording.is_open()
    }

    pub const fn is_listening_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub const fn is_reply_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub const fn conversation_mode(&self) -> bool {
        self.conversation_mode
    }

    pub const fn config(&self) -> &TurnConfig {
        &self.config
    }

    // ── Completion handling ────────────────────────────────────────

    fn apply(&mut self, now: Instant, completion: Completion, effects: &mut Vec<Effect>) {
        match completion {
            Completion::Recognition {
                request,
                received_at,
                result,
            } => self.on_recognition(request, received_at, result, effects),
            Completion::Reply { request, result } => self.on_reply(now, request, result, effects),
            Completion::SynthesisFailed { utterance, error } => {
                self.on_synthesis_failed(utterance, error, effects);
            }
        }
    }

    fn is_stale(&self, id: RequestId) -> bool {
        id.conversation != self.conversation || !self.state.is_interview_active
    }

    fn on_recognition(
        &mut self,
        request: Option<RequestId>,
        received_at: Instant,
        result: Result<RecognitionOutcome, TurnError>,
        effects: &mut Vec<Effect>,
    ) {
        if !self.state.is_interview_active || request.is_some_and(|id| self.is_stale(id)) {
            tracing::debug!(request = ?request, "Dropping stale recognition");
            return;
        }

        if let Some(id) = request {
            if self.awaiting_recognition != Some(id) {
                // The clip was superseded, e.g. by text submitted while it was
                // being recognized. Keep its transcript, never submit it.
                if let Ok(Some(text)) = result.as_ref().map(RecognitionOutcome::text) {
                    self.archive.annotate(id, text);
                }
                self.metrics.ignored_events += 1;
                tracing::debug!(request = %id, "Dropping recognition for a superseded clip");
                return;
            }
        }

        let resolves = request.is_some();
        if resolves {
            self.awaiting_recognition = None;
        }

        match result {
            Err(error) => {
                self.metrics.transport_failures += 1;
                tracing::warn!(%error, "Recognition request failed");
                self.status(format!("Recognition failed: {error}"));
                self.emit(CoordinatorEvent::Failure(error));
            }
            Ok(outcome) => {
                let text = outcome.text().map(str::to_string);
                if let Some(text) = text {
                    if let Some(id) = request {
                        self.archive.annotate(id, &text);
                    }
                    let event = RecognitionEvent { text, received_at };
                    if self.accept_utterance(event, effects) {
                        return;
                    }
                } else {
                    self.metrics.recognition_failures += 1;
                    let error = match outcome {
                        RecognitionOutcome::Canceled { reason, details } => {
                            tracing::warn!(%reason, details = ?details, "Recognition canceled");
                            TurnError::RecognitionCanceled { reason }
                        }
                        RecognitionOutcome::Recognized(_) | RecognitionOutcome::NoMatch => {
                            tracing::info!("No speech could be recognized");
                            TurnError::RecognitionNoMatch
                        }
                    };
                    self.status(error.to_string());
                    self.emit(CoordinatorEvent::Failure(error));
                }
            }
        }

        if resolves && self.state.phase == TurnPhase::AwaitingRecognition {
            self.enter_listening(effects);
        }
    }

    /// Decide whether recognized text is submitted. Returns `true` if it was.
    fn accept_utterance(&mut self, event: RecognitionEvent, effects: &mut Vec<Effect>) -> bool {
        self.metrics.recognition_events += 1;
        let phase = self.state.phase;

        if !phase.accepts_utterance() || self.pause.is_paused() || self.in_flight.is_some() {
            self.metrics.ignored_events += 1;
            tracing::debug!(
                phase = ?phase,
                paused = self.pause.is_paused(),
                "Recognized text ignored"
            );
            return false;
        }

        if self.is_duplicate(&event) {
            self.metrics.duplicates_dropped += 1;
            tracing::debug!(text = %event.text, "Duplicate recognition dropped");
            return false;
        }

        self.submit(event, effects);
        true
    }

    /// Same text as the last answered submission, recognized within the
    /// duplicate window of it.
    fn is_duplicate(&self, event: &RecognitionEvent) -> bool {
        event.text == self.state.last_submitted_text
            && self.state.last_submitted_at.is_some_and(|at| {
                event.received_at.saturating_duration_since(at) < self.config.duplicate_window
            })
    }

    fn submit(&mut self, event: RecognitionEvent, effects: &mut Vec<Effect>) {
        let Some(session_id) = self.state.session_id.clone() else {
            tracing::warn!("Active conversation without a session id");
            return;
        };

        if self.recording.discard() {
            tracing::debug!("Open recording dropped in favor of submitted text");
        }
        self.vad.disarm();
        self.awaiting_recognition = None;

        let request = self.next_request();
        tracing::info!(request = %request, chars = event.text.len(), "Submitting user message");

        self.append(Role::User, &event.text);
        self.state.pending_recognized_text = Some(event.text.clone());
        self.in_flight = Some(InFlightReply {
            request,
            text: event.text.clone(),
            received_at: event.received_at,
        });
        self.metrics.requests_sent += 1;

        self.set_microphone(MicrophoneMode::Released, effects);
        self.set_phase(TurnPhase::AwaitingReply);
        self.status("Waiting for the interviewer...");
        effects.push(Effect::Submit {
            request,
            session_id,
            text: event.text,
        });
    }

    fn on_reply(
        &mut self,
        now: Instant,
        request: RequestId,
        result: Result<ChatReply, TurnError>,
        effects: &mut Vec<Effect>,
    ) {
        if self.is_stale(request) {
            tracing::debug!(request = %request, "Dropping stale reply");
            return;
        }
        if self.in_flight.as_ref().map(|f| f.request) != Some(request) {
            tracing::debug!(request = %request, "Dropping reply for an unknown request");
            return;
        }
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        self.state.pending_recognized_text = None;

        let reply = match result {
            Ok(reply) => reply,
            Err(error) => {
                self.metrics.transport_failures += 1;
                tracing::warn!(request = %request, %error, "Dialogue request failed");
                self.append(Role::System, &format!("API Error: {error}"));
                self.status(format!("Request failed: {error}"));
                self.emit(CoordinatorEvent::Failure(error));
                self.enter_listening(effects);
                return;
            }
        };

        self.metrics.responses_received += 1;
        self.metrics.messages_submitted += 1;
        self.state.last_submitted_text = in_flight.text;
        self.state.last_submitted_at = Some(in_flight.received_at);

        let response = reply.response.trim().to_string();
        tracing::info!(
            request = %request,
            chars = response.len(),
            session_ended = reply.session_ended,
            "Reply received"
        );
        if !response.is_empty() {
            self.append(Role::Agent, &response);
        }

        if reply.session_ended {
            let summary = reply.summary().map(str::to_string);
            self.begin_ending(now, response, summary, effects);
        } else if self.config.auto_speak && !response.is_empty() {
            self.speak(now, response, effects);
        } else {
            self.enter_listening(effects);
        }
    }

    fn on_synthesis_failed(
        &mut self,
        utterance: RequestId,
        error: TurnError,
        effects: &mut Vec<Effect>,
    ) {
        if self.is_stale(utterance) {
            return;
        }
        tracing::warn!(utterance = %utterance, %error, "Speech synthesis failed");
        self.status(format!("Speech failed: {error}"));
        self.emit(CoordinatorEvent::Failure(error));

        if utterance.seq != self.pause.utterance() {
            return;
        }
        match self.state.phase {
            TurnPhase::Speaking => self.resume_after_speech(effects),
            TurnPhase::Ending => {
                self.ending.cancel();
                self.finish_ending(effects);
            }
            _ => {}
        }
    }

    // ── Transitions ────────────────────────────────────────────────

    fn start_recording(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if let Err(error) = self.recording.open(now) {
            tracing::warn!(%error, "Could not open recording");
            self.emit(CoordinatorEvent::Failure(error));
            return;
        }
        self.set_microphone(MicrophoneMode::Recording, effects);
        self.set_phase(TurnPhase::Recording);
        self.status("Recording...");
    }

    fn seal_and_dispatch(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.vad.disarm();
        let clip = match self.recording.seal() {
            Ok(clip) => clip,
            Err(error) => {
                self.metrics.empty_captures += 1;
                tracing::info!(%error, "Nothing captured; back to listening");
                self.emit(CoordinatorEvent::Failure(error));
                self.enter_listening(effects);
                return;
            }
        };
        self.metrics.clips_recorded += 1;
        tracing::debug!(
            samples = clip.len(),
            secs = clip.duration().as_secs_f32(),
            "Recording sealed"
        );

        if !self.config.auto_send {
            self.archive.push(ArchivedClip {
                clip,
                sealed_at: now,
                request: None,
                transcript: None,
            });
            self.status("Recording saved (auto-send is off)");
            self.enter_listening(effects);
            return;
        }

        let request = self.next_request();
        self.archive.push(ArchivedClip {
            clip: clip.clone(),
            sealed_at: now,
            request: Some(request),
            transcript: None,
        });
        self.awaiting_recognition = Some(request);
        self.set_microphone(MicrophoneMode::Released, effects);
        self.set_phase(TurnPhase::AwaitingRecognition);
        self.status("Recognizing speech...");
        effects.push(Effect::Recognize { request, clip });
    }

    /// Back to `Listening`. The microphone is armed only in conversation
    /// mode and when listening is not paused.
    fn enter_listening(&mut self, effects: &mut Vec<Effect>) {
        self.set_phase(TurnPhase::Listening);
        if self.conversation_mode && !self.pause.is_paused() {
            self.vad.arm();
            self.set_microphone(MicrophoneMode::Monitoring, effects);
            self.status("Listening...");
        } else {
            self.vad.disarm();
            self.set_microphone(MicrophoneMode::Released, effects);
            self.status("Listening paused");
        }
    }

    fn speak(&mut self, now: Instant, text: String, effects: &mut Vec<Effect>) {
        let pause = estimate::reply_pause(&text, self.config.tts_pause_buffer);
        self.vad.disarm();
        self.set_microphone(MicrophoneMode::Released, effects);
        let seq = self.pause.speak(now, pause);
        self.set_phase(TurnPhase::Speaking);
        self.emit(CoordinatorEvent::ListeningPaused {
            resume_in: Some(pause),
        });
        effects.push(Effect::Speak {
            utterance: RequestId::new(self.conversation, seq),
            text,
            voice: self.config.voice,
        });
    }

    /// The estimated speech has finished (or synthesis failed).
    ///
    /// The pause is cleared whenever the conversation is still active.
    /// Conversation mode only decides whether the microphone is re-armed;
    /// with it off, the microphone stays released until `resume_listening`.
    fn resume_after_speech(&mut self, effects: &mut Vec<Effect>) {
        if !self.state.is_interview_active || self.state.is_ending {
            return;
        }
        if self.pause.resume() {
            self.emit(CoordinatorEvent::ListeningResumed);
        }
        if !self.conversation_mode {
            tracing::info!("Conversation mode is off; microphone stays released");
        }
        self.enter_listening(effects);
    }

    fn begin_ending(
        &mut self,
        now: Instant,
        response: String,
        summary: Option<String>,
        effects: &mut Vec<Effect>,
    ) {
        self.state.is_ending = true;
        self.summary = summary;
        self.vad.disarm();
        self.set_microphone(MicrophoneMode::Released, effects);
        self.set_phase(TurnPhase::Ending);

        let seq = self.pause.hold();
        self.emit(CoordinatorEvent::ListeningPaused { resume_in: None });

        let wait = if self.config.auto_speak && !response.is_empty() {
            let wait = estimate::final_pause(&response);
            effects.push(Effect::Speak {
                utterance: RequestId::new(self.conversation, seq),
                text: response,
                voice: self.config.voice,
            });
            wait
        } else {
            estimate::SILENT_ENDING
        };

        tracing::info!(wait_ms = wait.as_millis(), "Conversation ending");
        self.status("Interview complete");
        self.ending.schedule(now, wait);
    }

    fn finish_ending(&mut self, effects: &mut Vec<Effect>) {
        tracing::info!(conversation = self.conversation, "Conversation ended");
        let summary = self.summary.take();
        self.teardown(effects);
        if let Some(summary) = summary {
            self.emit(CoordinatorEvent::SummaryReady(summary));
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.append(Role::System, "Interview session ended");
        self.ending.cancel();
        self.pause.release();
        self.recording.discard();
        self.vad.disarm();
        self.awaiting_recognition = None;
        self.in_flight = None;
        self.set_microphone(MicrophoneMode::Released, effects);
        self.set_phase(TurnPhase::Idle);
        self.state = TurnState::default();
        self.status("Interview ended");
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn next_request(&mut self) -> RequestId {
        self.next_seq += 1;
        RequestId::new(self.conversation, self.next_seq)
    }

    fn set_microphone(&mut self, mode: MicrophoneMode, effects: &mut Vec<Effect>) {
        if let Some(mode) = self.microphone.acquire(mode) {
            effects.push(Effect::Microphone(mode));
        }
    }

    fn set_phase(&mut self, new: TurnPhase) {
        let old = self.state.phase;
        if old != new {
            tracing::debug!(old = ?old, new = ?new, "Turn phase transition");
            self.state.phase = new;
            self.emit(CoordinatorEvent::PhaseChanged { old, new });
        }
    }

    fn append(&mut self, role: Role, text: &str) {
        let turn = DialogueTurn::now(role, text);
        self.log.push(turn.clone());
        self.emit(CoordinatorEvent::TurnAppended(turn));
    }

    fn status(&self, message: impl Into<String>) {
        self.emit(CoordinatorEvent::Status(message.into()));
    }

    /// Emit an event (best-effort; if the receiver is dropped, we log and move on).
    fn emit(&self, event: CoordinatorEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Coordinator event receiver dropped");
        }
    }
}

impl fmt::Debug for TurnCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnCoordinator")
            .field("phase", &self.state.phase)
            .field("conversation", &self.conversation)
            .field("microphone", &self.microphone.mode())
            .field("paused", &self.pause.is_paused())
            .finish_non_exhaustive()
    }
}
