//! AWS Textract OCR engine

use async_trait::async_trait;
use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::types::{
    Block, BlockType as TextractBlockType, DocumentLocation as TextractLocation,
    JobStatus as TextractJobStatus, S3Object,
};
use aws_sdk_textract::Client as TextractClient;
use tracing::debug;

use crate::domain::ingestion::DocumentLocation;
use crate::domain::ocr::{BlockType, JobId, JobResultPage, JobStatus, OcrEngine, RecognitionBlock};
use crate::domain::DomainError;

const ENGINE: &str = "textract";

/// Asynchronous Textract text detection over S3 objects
#[derive(Debug, Clone)]
pub struct TextractEngine {
    client: TextractClient,
}

impl TextractEngine {
    pub fn new(client: TextractClient) -> Self {
        Self { client }
    }

    /// Create with an existing AWS SDK config
    pub fn with_config(aws_config: &aws_config::SdkConfig) -> Self {
        Self::new(TextractClient::new(aws_config))
    }
}

#[async_trait]
impl OcrEngine for TextractEngine {
    async fn start(&self, location: &DocumentLocation) -> Result<JobId, DomainError> {
        let document = TextractLocation::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&location.bucket)
                    .name(&location.key)
                    .build(),
            )
            .build();

        let response = self
            .client
            .start_document_text_detection()
            .document_location(document)
            .send()
            .await
            .map_err(|e| {
                DomainError::ocr(
                    ENGINE,
                    format!("Failed to start job for {}: {}", location, DisplayErrorContext(&e)),
                )
            })?;

        let job_id = response
            .job_id()
            .map(JobId::new)
            .ok_or_else(|| DomainError::ocr(ENGINE, "Start response carried no JobId"))?;

        debug!(job_id = %job_id, location = %location, "Started Textract job");
        Ok(job_id)
    }

    async fn poll(
        &self,
        job_id: &JobId,
        next_token: Option<&str>,
    ) -> Result<JobResultPage, DomainError> {
        let response = self
            .client
            .get_document_text_detection()
            .job_id(job_id.as_str())
            .set_next_token(next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                DomainError::ocr(
                    ENGINE,
                    format!("Failed to get results for job {}: {}", job_id, DisplayErrorContext(&e)),
                )
            })?;

        let status = response
            .job_status()
            .ok_or_else(|| DomainError::ocr(ENGINE, format!("Job {} has no status", job_id)))
            .and_then(convert_status)?;

        Ok(JobResultPage {
            status,
            blocks: response.blocks().iter().map(convert_block).collect(),
            next_token: response.next_token().map(str::to_string),
        })
    }

    fn engine_name(&self) -> &'static str {
        ENGINE
    }
}

fn convert_status(status: &TextractJobStatus) -> Result<JobStatus, DomainError> {
    match status {
        TextractJobStatus::InProgress => Ok(JobStatus::Running),
        TextractJobStatus::Succeeded => Ok(JobStatus::Succeeded),
        TextractJobStatus::Failed => Ok(JobStatus::Failed),
        TextractJobStatus::PartialSuccess => Ok(JobStatus::PartialSuccess),
        other => Err(DomainError::ocr(
            ENGINE,
            format!("Unrecognized job status: {}", other.as_str()),
        )),
    }
}

fn convert_block(block: &Block) -> RecognitionBlock {
    let block_type = match block.block_type() {
        Some(TextractBlockType::Line) => BlockType::Line,
        Some(TextractBlockType::Word) => BlockType::Word,
        Some(TextractBlockType::Page) => BlockType::Page,
        Some(other) => BlockType::Other(other.as_str().to_string()),
        None => BlockType::Other("UNKNOWN".to_string()),
    };

    RecognitionBlock {
        block_type,
        page: block.page().and_then(|p| u32::try_from(p).ok()),
        text: block.text().map(str::to_string),
    }
}
