//! OCR domain - extraction jobs and the engine seam

pub mod engine;
pub mod job;

pub use engine::OcrEngine;
pub use job::{BlockType, JobId, JobResultPage, JobStatus, RecognitionBlock};

#[cfg(test)]
pub use engine::mock::ScriptedOcrEngine;
