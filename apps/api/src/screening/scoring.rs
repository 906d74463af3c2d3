//! Match scoring: blends semantic similarity with skill-keyword overlap.
//!
//! final = w_e × embedding + w_r × required + w_p × preferred, clamped to [0, 100]
//!
//! - embedding: cosine(resume, jd) × 100, or 0 when embeddings are unavailable
//! - required:  |C ∩ R| / |R| × 100, or 0 when R is empty
//! - preferred: |C ∩ P| / |P| × preferred_scale, or 0 when P is empty
//!
//! Skill comparison is case-insensitive set intersection.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError};
use crate::screening::models::{CandidateInfo, JobRequirements};
use crate::screening::truncate_chars;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub embedding: f64,
    pub required: f64,
    pub preferred: f64,
    /// Ceiling of the preferred-skills term before weighting.
    pub preferred_scale: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            embedding: 0.4,
            required: 0.5,
            preferred: 0.1,
            preferred_scale: 50.0,
        }
    }
}

/// Per-term breakdown of a match score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchBreakdown {
    pub embedding_score: f64,
    pub required_term: f64,
    pub preferred_term: f64,
    /// |C ∩ R|
    pub skills_match: usize,
    pub final_score: f64,
}

/// Lower-cased, trimmed skill set. Blank entries are dropped.
pub fn skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// |C ∩ S| / |S| × scale, or 0 when S is empty.
pub fn overlap_ratio(candidate: &HashSet<String>, target: &HashSet<String>, scale: f64) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let matched = candidate.intersection(target).count();
    matched as f64 / target.len() as f64 * scale
}

/// Weighted sum of the three terms, clamped to [0, 100].
pub fn combine_score(
    embedding_score: f64,
    required_term: f64,
    preferred_term: f64,
    weights: &ScoringWeights,
) -> f64 {
    (weights.embedding * embedding_score
        + weights.required * required_term
        + weights.preferred * preferred_term)
        .clamp(0.0, 100.0)
}

/// Scores one candidate from skills alone, given a precomputed embedding score.
pub fn score_candidate(
    embedding_score: f64,
    candidate: &CandidateInfo,
    job: &JobRequirements,
    weights: &ScoringWeights,
) -> MatchBreakdown {
    let candidate_skills = skill_set(&candidate.key_skills);
    let required = skill_set(&job.required_skills);
    let preferred = skill_set(&job.preferred_skills);

    let required_term = overlap_ratio(&candidate_skills, &required, 100.0);
    let preferred_term = overlap_ratio(&candidate_skills, &preferred, weights.preferred_scale);
    let skills_match = candidate_skills.intersection(&required).count();

    MatchBreakdown {
        embedding_score,
        required_term,
        preferred_term,
        skills_match,
        final_score: combine_score(embedding_score, required_term, preferred_term, weights),
    }
}

/// Computes full match scores, embedding the texts through an optional backend.
pub struct MatchScorer<'a> {
    embedder: Option<&'a dyn Embedder>,
    weights: &'a ScoringWeights,
    embed_max_chars: usize,
}

impl<'a> MatchScorer<'a> {
    pub fn new(
        embedder: Option<&'a dyn Embedder>,
        weights: &'a ScoringWeights,
        embed_max_chars: usize,
    ) -> Self {
        Self {
            embedder,
            weights,
            embed_max_chars,
        }
    }

    pub async fn score(
        &self,
        resume_text: &str,
        job_text: &str,
        candidate: &CandidateInfo,
        job: &JobRequirements,
    ) -> MatchBreakdown {
        let embedding_score = self.embedding_score(resume_text, job_text).await;
        let breakdown = score_candidate(embedding_score, candidate, job, self.weights);
        debug!(
            embedding = breakdown.embedding_score,
            required = breakdown.required_term,
            preferred = breakdown.preferred_term,
            score = breakdown.final_score,
            "Match scored"
        );
        breakdown
    }

    /// cosine × 100. Any embedding failure degrades the term to 0.
    pub async fn embedding_score(&self, resume_text: &str, job_text: &str) -> f64 {
        let Some(embedder) = self.embedder else {
            debug!("No embedder configured; embedding term is 0");
            return 0.0;
        };

        let texts = [
            truncate_chars(resume_text, self.embed_max_chars),
            truncate_chars(job_text, self.embed_max_chars),
        ];

        let similarity = embedder
            .embed_batch(&texts)
            .await
            .and_then(|vectors| match vectors.as_slice() {
                [resume, job] => cosine_similarity(resume, job),
                other => Err(EmbeddingError::CountMismatch {
                    expected: 2,
                    actual: other.len(),
                }),
            });

        match similarity {
            Ok(sim) => sim * 100.0,
            Err(e) => {
                warn!("Embedding similarity unavailable, scoring without it: {e}");
                0.0
            }
        }
    }
}

/// Rounds to two decimals for display and ranking.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
