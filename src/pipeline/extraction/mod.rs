pub mod lines;
pub mod ocr;
pub mod sanitize;

pub use lines::*;
pub use ocr::*;
pub use sanitize::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Failed to start OCR engine {0}: {1}")]
    Spawn(String, String),

    #[error("OCR processing failed: {0}")]
    Failed(String),

    #[error("OCR produced no text")]
    NoText,

    #[error("OCR timed out after {0}s")]
    Timeout(u64),
}
