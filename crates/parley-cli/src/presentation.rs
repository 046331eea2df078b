//! Terminal formatting for conversation output.

use parley_core::{SessionFeedback, SessionInfo, Settings};
use parley_voice::{CoordinatorEvent, TurnCoordinatorMetrics};

/// One printable line for a coordinator event, or `None` for events that
/// are not worth showing (audio levels).
pub fn format_event(event: &CoordinatorEvent, show_timestamps: bool) -> Option<String> {
    match event {
        CoordinatorEvent::TurnAppended(turn) => Some(turn.render(show_timestamps)),
        CoordinatorEvent::Status(status) => Some(format!("  ... {status}")),
        CoordinatorEvent::PhaseChanged { new, .. } => Some(format!("  [{}]", new.label())),
        CoordinatorEvent::ListeningPaused {
            resume_in: Some(resume_in),
        } => Some(format!(
            "  [listening paused for {:.1}s]",
            resume_in.as_secs_f32()
        )),
        CoordinatorEvent::ListeningPaused { resume_in: None } => {
            Some("  [listening paused]".to_string())
        }
        CoordinatorEvent::ListeningResumed => Some("  [listening resumed]".to_string()),
        CoordinatorEvent::SummaryReady(summary) => Some(format!("\nInterview summary:\n{summary}")),
        CoordinatorEvent::Failure(error) => Some(format!("  ✗ {error}")),
        CoordinatorEvent::AudioLevel(_) => None,
    }
}

/// Counter table printed when a conversation ends.
pub fn format_metrics(metrics: &TurnCoordinatorMetrics) -> String {
    let rows = [
        ("messages submitted", metrics.messages_submitted()),
        ("requests sent", metrics.requests_sent()),
        ("responses received", metrics.responses_received()),
        ("recognition events", metrics.recognition_events()),
        ("duplicates dropped", metrics.duplicates_dropped()),
        ("ignored events", metrics.ignored_events()),
        ("recognition failures", metrics.recognition_failures()),
        ("transport failures", metrics.transport_failures()),
        ("clips recorded", metrics.clips_recorded()),
        ("empty captures", metrics.empty_captures()),
    ];
    rows.iter()
        .map(|(label, value)| format!("  {label:<22}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_session_info(info: &SessionInfo) -> String {
    let mut lines = vec![
        format!("Session:   {}", info.session_id),
        format!("Candidate: {}", info.candidate_name),
        format!("Position:  {}", info.position),
        format!("Status:    {}", info.status),
        format!("Messages:  {}", info.message_count),
    ];
    if let Some(start) = &info.start_time {
        lines.push(format!("Started:   {start}"));
    }
    if let Some(end) = &info.end_time {
        lines.push(format!("Ended:     {end}"));
    }
    lines.join("\n")
}

pub fn format_feedback(feedback: &SessionFeedback) -> String {
    [
        ("Overall score", &feedback.overall_score),
        ("Strengths", &feedback.strengths),
        ("Improvements", &feedback.improvements),
        ("Details", &feedback.detailed_feedback),
    ]
    .iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("{label}:\n  {}", value.trim()))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Effective values, whether they came from the file or the defaults.
pub fn format_settings(settings: &Settings) -> String {
    let rows: [(&str, String); 14] = [
        ("voice_threshold", settings.effective_voice_threshold().to_string()),
        (
            "silence_duration_secs",
            settings.effective_silence_duration().as_secs_f32().to_string(),
        ),
        (
            "voice_start_delay_secs",
            settings.effective_voice_start_delay().as_secs_f32().to_string(),
        ),
        ("sample_rate", settings.effective_sample_rate().to_string()),
        (
            "max_recording_secs",
            settings.effective_max_recording().as_secs().to_string(),
        ),
        (
            "tts_pause_buffer_secs",
            settings.effective_tts_pause_buffer().as_secs_f32().to_string(),
        ),
        ("auto_send", settings.effective_auto_send().to_string()),
        (
            "continuous_listening",
            settings.effective_continuous_listening().to_string(),
        ),
        (
            "auto_speak_responses",
            settings.effective_auto_speak_responses().to_string(),
        ),
        (
            "max_conversation_lines",
            settings.effective_max_conversation_lines().to_string(),
        ),
        (
            "max_archived_clips",
            settings.effective_max_archived_clips().to_string(),
        ),
        ("show_timestamps", settings.effective_show_timestamps().to_string()),
        (
            "request_timeout_secs",
            settings.effective_request_timeout().as_secs().to_string(),
        ),
        ("voice", settings.effective_voice().to_string()),
    ];
    rows.iter()
        .map(|(name, value)| format!("  {name:<24}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{DialogueTurn, Role, TurnError, TurnPhase};

    #[test]
    fn test_turns_render_with_labels() {
        let event = CoordinatorEvent::TurnAppended(DialogueTurn::now(Role::Agent, "Welcome!"));
        assert_eq!(
            format_event(&event, false).as_deref(),
            Some("AI Interviewer: Welcome!")
        );
    }

    #[test]
    fn test_audio_levels_are_hidden() {
        assert_eq!(format_event(&CoordinatorEvent::AudioLevel(0.3), true), None);
    }

    #[test]
    fn test_phase_and_failure_lines() {
        let phase = CoordinatorEvent::PhaseChanged {
            old: TurnPhase::Listening,
            new: TurnPhase::Recording,
        };
        assert_eq!(format_event(&phase, true).as_deref(), Some("  [recording]"));

        let failure = CoordinatorEvent::Failure(TurnError::RecognitionNoMatch);
        assert!(format_event(&failure, true).unwrap().starts_with("  ✗ "));
    }

    #[test]
    fn test_feedback_skips_blank_sections() {
        let feedback = SessionFeedback {
            overall_score: "7/10".to_string(),
            strengths: "Clear answers".to_string(),
            ..SessionFeedback::default()
        };
        assert_eq!(
            format_feedback(&feedback),
            "Overall score:\n  7/10\nStrengths:\n  Clear answers"
        );
    }

    #[test]
    fn test_default_settings_table() {
        let table = format_settings(&Settings::default());
        assert!(table.contains("sample_rate             16000"));
        assert!(table.contains("voice                   en-IN-AaravNeural"));
        assert_eq!(table.lines().count(), 14);
    }

    #[test]
    fn test_metrics_table_has_every_counter() {
        let table = format_metrics(&TurnCoordinatorMetrics::default());
        assert_eq!(table.lines().count(), 10);
        assert!(table.contains("clips recorded        0"));
    }
}
