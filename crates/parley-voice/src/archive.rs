//! Bounded history of sealed recording clips.

use std::collections::VecDeque;
use std::time::Instant;

use parley_core::SealedClip;

use crate::coordinator::RequestId;

/// One archived clip and what the recognizer made of it.
#[derive(Debug, Clone)]
pub struct ArchivedClip {
    pub clip: SealedClip,
    pub sealed_at: Instant,
    /// Recognition request the clip was sent under; `None` when auto-send is off.
    pub request: Option<RequestId>,
    pub transcript: Option<String>,
}

/// Keeps the most recent sealed clips, evicting the oldest.
#[derive(Debug)]
pub struct ClipArchive {
    clips: VecDeque<ArchivedClip>,
    capacity: usize,
}

impl ClipArchive {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            clips: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, clip: ArchivedClip) {
        if self.clips.len() == self.capacity {
            self.clips.pop_front();
        }
        self.clips.push_back(clip);
    }

    /// Attach a transcript to the clip sent under `request`.
    pub fn annotate(&mut self, request: RequestId, transcript: &str) -> bool {
        match self
            .clips
            .iter_mut()
            .rev()
            .find(|entry| entry.request == Some(request))
        {
            Some(entry) => {
                entry.transcript = Some(transcript.to_string());
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchivedClip> {
        self.clips.iter()
    }
}
