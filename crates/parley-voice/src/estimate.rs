//! Spoken-length estimate for synthesized replies.
//!
//! The synthesizer does not report when playback finishes, so the listening
//! pause is sized from the text: `max(words / 150 wpm, minimum) + buffer`.
//! Speaking rate varies by voice and language, so this can under- or
//! over-shoot the real playback length.

use std::time::Duration;

/// Assumed speaking rate.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Floor for a normal reply.
pub const REPLY_MIN: Duration = Duration::from_secs(2);

/// Floor for the final utterance of a conversation.
pub const FINAL_MIN: Duration = Duration::from_secs(3);

/// Extra wait after the final utterance, on top of its estimate.
pub const FINAL_EXTRA: Duration = Duration::from_secs(2);

/// Wait before tearing down when the final reply is not spoken.
pub const SILENT_ENDING: Duration = Duration::from_secs(1);

/// Whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `max(words / 150 wpm, minimum) + buffer`.
#[allow(clippy::cast_precision_loss)]
pub fn speech_duration(text: &str, minimum: Duration, buffer: Duration) -> Duration {
    let spoken = Duration::from_secs_f64(word_count(text) as f64 * 60.0 / WORDS_PER_MINUTE);
    spoken.max(minimum) + buffer
}

/// Pause for a normal reply.
pub fn reply_pause(text: &str, buffer: Duration) -> Duration {
    speech_duration(text, REPLY_MIN, buffer)
}

/// Wait for the final utterance before the conversation ends.
pub fn final_pause(text: &str) -> Duration {
    speech_duration(text, FINAL_MIN, FINAL_EXTRA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_replies_use_the_minimum() {
        assert_eq!(
            reply_pause("Thanks", Duration::from_secs(1)),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn long_replies_scale_with_words() {
        let text = vec!["word"; 15].join(" ");
        assert_eq!(
            reply_pause(&text, Duration::from_secs(1)),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn final_pause_has_larger_floor_and_buffer() {
        assert_eq!(final_pause("Thanks, goodbye"), Duration::from_secs(5));
    }

    #[test]
    fn extra_whitespace_does_not_count_as_words() {
        assert_eq!(word_count("  Hello   there \n friend "), 3);
        assert_eq!(word_count(""), 0);
    }
}
