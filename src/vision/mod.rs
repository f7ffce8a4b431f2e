//! Image upload handling for the vision chat.
//!
//! Uploads are validated against the common raster formats, then losslessly
//! re-encoded to PNG so the downstream Gemini call always receives a single
//! supported binary format.
//!
//! # Submodules
//!
//! - `models`: Upload format sniffing, size limits, and the canonical
//!   [`PngImage`] wire form.
//! - `encode`: The normalization pipeline (validate, decode, re-encode).

pub mod encode;
pub mod models;

pub use encode::encode_png;
pub use models::{PngImage, UploadFormat, MAX_IMAGE_SIZE_BYTES};
