//! Structured extraction: turns raw resume / JD text into typed records.
//!
//! The `Extractor` contract is infallible: any model, network or parse failure
//! collapses to the record's `Default`, so one bad document never aborts a batch.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, ChatModel};
use crate::screening::models::{CandidateInfo, JobRequirements};
use crate::screening::prompts::{CANDIDATE_PROMPT_TEMPLATE, JOB_PROMPT_TEMPLATE};
use crate::screening::{fill_template, truncate_chars};

/// Pluggable extraction strategy. Swap implementations without touching the pipeline.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract_candidate(&self, resume_text: &str) -> CandidateInfo;
    async fn extract_job(&self, jd_text: &str) -> JobRequirements;
}

/// Extraction through a hosted chat model.
pub struct LlmExtractor<'a> {
    model: &'a dyn ChatModel,
    max_chars: usize,
}

impl<'a> LlmExtractor<'a> {
    pub fn new(model: &'a dyn ChatModel, max_chars: usize) -> Self {
        Self { model, max_chars }
    }

    async fn extract_or_default<T>(
        &self,
        template: &str,
        placeholder: &str,
        text: &str,
        kind: &str,
    ) -> T
    where
        T: DeserializeOwned + Default,
    {
        let excerpt = truncate_chars(text, self.max_chars);
        let prompt = fill_template(template, &[(placeholder, excerpt)]);
        match complete_json::<T>(self.model, &prompt, JSON_ONLY_SYSTEM).await {
            Ok(record) => record,
            Err(e) => {
                warn!("{kind} extraction failed, using defaults: {e}");
                T::default()
            }
        }
    }
}

#[async_trait]
impl<'a> Extractor for LlmExtractor<'a> {
    async fn extract_candidate(&self, resume_text: &str) -> CandidateInfo {
        self.extract_or_default(CANDIDATE_PROMPT_TEMPLATE, "{resume}", resume_text, "Candidate")
            .await
    }

    async fn extract_job(&self, jd_text: &str) -> JobRequirements {
        self.extract_or_default(JOB_PROMPT_TEMPLATE, "{jd}", jd_text, "Job requirements")
            .await
    }
}
