//! Boundary to the external completion service
//!
//! The service is an opaque prompt-in, text-out call. Anything that comes
//! back is decoded into a typed record and validated before use; a failed
//! call or a malformed answer degrades to a fixed fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest question we are willing to show in the check-in card
pub const MAX_QUESTION_CHARS: usize = 280;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("completion service failed: {0}")]
    Service(String),
    #[error("response is not the expected JSON shape: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response failed validation: {0}")]
    Invalid(&'static str),
}

/// One prompt, one response, no retries
pub trait CompletionService {
    fn complete(&self, prompt: &str) -> Result<String, AssistError>;
}

/// Reflection question shown in the daily check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyQuestion {
    pub question: String,
}

impl DailyQuestion {
    pub const PROMPT: &'static str = "Generate a single short, open-ended question for a \
        mental wellness daily check-in. It should encourage self-reflection about mindfulness, \
        gratitude, personal growth or emotional awareness, and must not be a generic \
        \"how are you?\". Reply with JSON: {\"question\": \"...\"}";

    pub const FALLBACK: &'static str =
        "What is one small thing that brought you a moment of peace today?";

    pub fn fallback() -> Self {
        Self {
            question: Self::FALLBACK.to_string(),
        }
    }

    /// Decode and validate a raw service response
    pub fn parse(raw: &str) -> Result<Self, AssistError> {
        let mut parsed: DailyQuestion = serde_json::from_str(raw.trim())?;
        parsed.question = parsed.question.trim().to_string();
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), AssistError> {
        if self.question.is_empty() {
            return Err(AssistError::Invalid("question is empty"));
        }
        if self.question.chars().count() > MAX_QUESTION_CHARS {
            return Err(AssistError::Invalid("question is too long"));
        }
        if self.question.contains('\n') {
            return Err(AssistError::Invalid("question spans multiple lines"));
        }
        Ok(())
    }

    /// Ask the service, falling back to the fixed question on any failure
    pub fn fetch(service: &dyn CompletionService) -> Self {
        match service.complete(Self::PROMPT).and_then(|raw| Self::parse(&raw)) {
            Ok(q) => q,
            Err(e) => {
                log::warn!("Daily question unavailable, using fallback: {e}");
                Self::fallback()
            }
        }
    }
}
