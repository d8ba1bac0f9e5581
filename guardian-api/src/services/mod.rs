//! Service layer: recognition client and upload pipeline

pub mod pipeline;
pub mod recognizer;

pub use pipeline::{PipelineError, UploadPipeline};
pub use recognizer::{AnalysisResponse, Detection, Recognition, RecognizerClient, RecognizerError};
