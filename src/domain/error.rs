use std::time::Duration;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("OCR error: {engine} - {message}")]
    Ocr { engine: String, message: String },

    #[error("OCR job {job_id} still running after {polls} polls ({waited:?})")]
    PollLimitExceeded {
        job_id: String,
        polls: u32,
        waited: Duration,
    },

    #[error("Index error: {message}")]
    Index { message: String },

    #[error("Search error: {message}")]
    Search { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn ocr(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Ocr {
            engine: engine.into(),
            message: message.into(),
        }
    }

    pub fn poll_limit(job_id: impl Into<String>, polls: u32, waited: Duration) -> Self {
        Self::PollLimitExceeded {
            job_id: job_id.into(),
            polls,
            waited,
        }
    }

    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Missing query parameter q");
        assert_eq!(
            error.to_string(),
            "Validation error: Missing query parameter q"
        );
    }

    #[test]
    fn test_ocr_error() {
        let error = DomainError::ocr("textract", "AccessDenied");
        assert_eq!(error.to_string(), "OCR error: textract - AccessDenied");
    }

    #[test]
    fn test_poll_limit_error() {
        let error = DomainError::poll_limit("job-1", 3, Duration::from_secs(15));
        assert_eq!(
            error.to_string(),
            "OCR job job-1 still running after 3 polls (15s)"
        );
    }
}
