//! Completion inbox: the only way boundary results reach the coordinator.
//!
//! Recognition, dialogue and synthesis calls finish on whatever task ran
//! them. They never touch coordinator state; they push a [`Completion`]
//! into this channel, and the coordinator drains it on its next tick in
//! arrival order.

use std::time::Instant;

use parley_core::{ChatReply, RecognitionOutcome, TurnError};
use tokio::sync::mpsc;

use crate::coordinator::RequestId;

/// Result of a boundary call, delivered to the tick loop.
#[derive(Debug, Clone)]
pub enum Completion {
    /// A recognition finished.
    Recognition {
        /// Request the clip was dispatched under; `None` for recognizers
        /// that push text on their own.
        request: Option<RequestId>,
        /// When the result arrived.
        received_at: Instant,
        result: Result<RecognitionOutcome, TurnError>,
    },

    /// The dialogue gateway answered (or failed).
    Reply {
        request: RequestId,
        result: Result<ChatReply, TurnError>,
    },

    /// Synthesis for an utterance failed; nothing is playing.
    SynthesisFailed {
        utterance: RequestId,
        error: TurnError,
    },
}

/// Cloneable producer side of the inbox.
#[derive(Debug, Clone)]
pub struct InboxSender {
    tx: mpsc::UnboundedSender<Completion>,
}

impl InboxSender {
    /// Enqueue a completion. Returns `false` if the coordinator is gone.
    pub fn send(&self, completion: Completion) -> bool {
        if self.tx.send(completion).is_err() {
            tracing::warn!("Completion dropped: coordinator inbox closed");
            return false;
        }
        true
    }

    /// Enqueue text from a recognizer that is not driven by sealed clips.
    pub fn recognized(&self, text: impl Into<String>, received_at: Instant) -> bool {
        self.send(Completion::Recognition {
            request: None,
            received_at,
            result: Ok(RecognitionOutcome::Recognized(text.into())),
        })
    }
}

/// Consumer side, owned by the coordinator.
#[derive(Debug)]
pub(crate) struct Inbox {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Inbox {
    /// Everything queued so far, oldest first.
    pub(crate) fn drain(&mut self) -> Vec<Completion> {
        let mut drained = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            drained.push(completion);
        }
        drained
    }
}

pub(crate) fn channel() -> (InboxSender, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (InboxSender { tx }, Inbox { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let (tx, mut inbox) = channel();
        let t0 = Instant::now();
        tx.recognized("first", t0);
        tx.recognized("second", t0);

        let texts: Vec<_> = inbox
            .drain()
            .into_iter()
            .filter_map(|c| match c {
                Completion::Recognition {
                    result: Ok(RecognitionOutcome::Recognized(text)),
                    ..
                } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn producers_can_live_on_other_threads() {
        let (tx, mut inbox) = channel();
        let handle = std::thread::spawn(move || tx.recognized("from a thread", Instant::now()));
        assert!(handle.join().unwrap());
        assert_eq!(inbox.drain().len(), 1);
    }

    #[test]
    fn send_after_close_reports_failure() {
        let (tx, inbox) = channel();
        drop(inbox);
        assert!(!tx.recognized("late", Instant::now()));
    }
}
