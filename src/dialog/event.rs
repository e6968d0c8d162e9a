//! Classified inbound input

use super::intent::{IntentClassifier, IntentFlags};
use super::normalize::normalize;

/// One inbound message, ready for the transition function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text {
        /// Trimmed message as typed, used for slot values
        raw: String,
        normalized: String,
        intents: IntentFlags,
    },
    /// Image, audio, sticker or any other non-text message
    Unsupported { kind: String },
}

impl Input {
    pub fn text(raw: &str, classifier: &dyn IntentClassifier) -> Self {
        let normalized = normalize(raw);
        let intents = classifier.classify(&normalized);
        Input::Text {
            raw: raw.trim().to_string(),
            normalized,
            intents,
        }
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Input::Unsupported { kind: kind.into() }
    }

    #[allow(dead_code)] // Used in tests
    pub fn intents(&self) -> IntentFlags {
        match self {
            Input::Text { intents, .. } => *intents,
            Input::Unsupported { .. } => IntentFlags::default(),
        }
    }
}
