//! The request/response core of the vision chat.
//!
//! Two responsibilities, both stateless:
//!
//! - **Input normalization**: [`CallShape::from_parts`] decides which of the
//!   three call shapes a submission takes (text, image, or both) and rejects
//!   empty submissions before anything leaves the process.
//! - **Dispatch**: [`dispatch`] builds the matching `generateContent` request,
//!   invokes the model once, and normalizes the reply into one displayable
//!   string.

pub mod request;
pub mod response;

pub use request::build_request;
pub use response::{extract_text, normalize};

use crate::error::{AppError, Result};
use crate::gemini::GeminiClient;
use crate::vision::PngImage;
use std::time::Instant;
use tracing::{debug, info};

/// Which combination of text/image is sent to the model for a request.
#[derive(Debug, Clone)]
pub enum CallShape {
    Text { prompt: String },
    Image { image: PngImage },
    Multimodal { prompt: String, image: PngImage },
}

impl CallShape {
    /// Classify a submission. Whitespace-only prompts count as absent;
    /// a submission with neither input is a validation error and never
    /// reaches the remote call.
    pub fn from_parts(prompt: Option<String>, image: Option<PngImage>) -> Result<Self> {
        let prompt = prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        match (prompt, image) {
            (Some(prompt), Some(image)) => Ok(CallShape::Multimodal { prompt, image }),
            (Some(prompt), None) => Ok(CallShape::Text { prompt }),
            (None, Some(image)) => Ok(CallShape::Image { image }),
            (None, None) => Err(AppError::NoInput),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CallShape::Text { .. } => "text",
            CallShape::Image { .. } => "image",
            CallShape::Multimodal { .. } => "multimodal",
        }
    }
}

/// A normalized model reply.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// The displayable output text.
    pub text: String,
    /// Which model produced it.
    pub model: String,
    /// Wall-clock duration of the remote call.
    pub elapsed_ms: u128,
}

/// Send one submission to the model and normalize the result.
///
/// One remote call per user action. Faults propagate as [`AppError`] for the
/// caller to render; there is no retry and no partial result on this path.
pub async fn dispatch(client: &GeminiClient, shape: CallShape) -> Result<ChatReply> {
    let request = build_request(&shape);
    let model = client.model().to_string();

    info!("Dispatching {} request to {}", shape.kind(), model);

    let start = Instant::now();
    let response = client.generate_content(request).await?;
    let elapsed_ms = start.elapsed().as_millis();

    if let Some(usage) = &response.usage_metadata {
        debug!(
            "Token usage: prompt={:?} candidates={:?} total={:?}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    let text = normalize(response);

    info!("Reply ready ({} chars, {}ms)", text.len(), elapsed_ms);

    Ok(ChatReply {
        text,
        model,
        elapsed_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_submission_is_rejected() {
        assert!(matches!(
            CallShape::from_parts(None, None),
            Err(AppError::NoInput)
        ));
    }

    #[test]
    fn test_whitespace_prompt_counts_as_absent() {
        assert!(matches!(
            CallShape::from_parts(Some("   \n\t ".to_string()), None),
            Err(AppError::NoInput)
        ));
    }

    #[test]
    fn test_prompt_is_trimmed() {
        let shape = CallShape::from_parts(Some("  hello  ".to_string()), None).unwrap();
        match shape {
            CallShape::Text { prompt } => assert_eq!(prompt, "hello"),
            other => panic!("expected text shape, got {:?}", other.kind()),
        }
    }
}
