//! Hiring recommendation: a short free-text verdict per candidate, shown verbatim.

use tracing::warn;

use crate::llm_client::prompts::RECRUITER_SYSTEM;
use crate::llm_client::ChatModel;
use crate::screening::prompts::RECOMMENDATION_PROMPT_TEMPLATE;
use crate::screening::{fill_template, truncate_chars};

/// Returned in place of the analysis whenever the model call fails.
pub const ANALYSIS_FAILED: &str = "Analysis generation failed.";

pub async fn generate_recommendation(
    model: &dyn ChatModel,
    resume_text: &str,
    jd_text: &str,
    match_score: f64,
    max_chars: usize,
) -> String {
    let prompt = build_prompt(resume_text, jd_text, match_score, max_chars);
    match model.complete(&prompt, RECRUITER_SYSTEM).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Recommendation came back empty");
            ANALYSIS_FAILED.to_string()
        }
        Err(e) => {
            warn!("Recommendation generation failed: {e}");
            ANALYSIS_FAILED.to_string()
        }
    }
}

fn build_prompt(resume_text: &str, jd_text: &str, match_score: f64, max_chars: usize) -> String {
    let score = format!("{match_score:.1}");
    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("{resume}", truncate_chars(resume_text, max_chars)),
            ("{jd}", truncate_chars(jd_text, max_chars)),
            ("{match_score}", score.as_str()),
        ],
    )
}
