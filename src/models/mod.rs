//! Data models for the upstream Google Gemini API.

pub mod gemini;

pub use gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
    UsageMetadata,
};
