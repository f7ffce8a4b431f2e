// Request construction: one user turn per call shape.

use super::CallShape;
use crate::models::{Content, GenerateContentRequest, Part};

/// Build the `generateContent` request body for a call shape.
///
/// Every submission is a single user turn. For multimodal submissions the
/// text part comes first, then the image.
pub fn build_request(shape: &CallShape) -> GenerateContentRequest {
    let parts = match shape {
        CallShape::Text { prompt } => vec![Part::Text {
            text: prompt.clone(),
        }],
        CallShape::Image { image } => vec![Part::InlineData {
            inline_data: image.to_inline_data(),
        }],
        CallShape::Multimodal { prompt, image } => vec![
            Part::Text {
                text: prompt.clone(),
            },
            Part::InlineData {
                inline_data: image.to_inline_data(),
            },
        ],
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: None,
    }
}
