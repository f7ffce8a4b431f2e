//! Cross-cutting helpers: logging setup, key redaction, probe retry logic.

pub mod logging;
pub mod retry;
