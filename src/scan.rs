//! Generation tokens guarding asynchronous recognition results.
//!
//! The recognition engine is an external collaborator: the interaction
//! layer sends it an image and, some time later, receives recognized text.
//! If the user cancels the capture dialog or starts a newer scan in the
//! meantime, the late result must not be applied. A [`ScanGate`] tags each
//! request with a [`ScanToken`] and only accepts the result whose token is
//! still current.

use crate::parse::{ItemDraft, ReceiptParser};
use crate::Error;

/// Identifies one in-flight recognition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanToken {
    generation: u64,
}

/// Tracks the active recognition request, if any.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanGate {
    generation: u64,
    active: bool,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new recognition request, invalidating any outstanding
    /// token.
    pub fn begin(&mut self) -> ScanToken {
        self.generation += 1;
        self.active = true;
        ScanToken {
            generation: self.generation,
        }
    }

    /// Abandons the active request; its result will be discarded when it
    /// arrives.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Whether `token` belongs to the active request.
    pub fn is_current(&self, token: ScanToken) -> bool {
        self.active && token.generation == self.generation
    }

    /// Applies a recognition result: parses `text` into item drafts if
    /// `token` is still current, retiring the token so a duplicate late
    /// delivery is also dropped. Stale results return `None` and leave no
    /// trace.
    pub fn accept(&mut self, token: ScanToken, text: &str) -> Option<(Vec<ItemDraft>, Vec<Error>)> {
        if !self.is_current(token) {
            return None;
        }
        self.active = false;
        let label = format!("scan-{}", token.generation);
        Some(ReceiptParser::parse(text, &label))
    }
}
