//! Screening pipeline: job extraction once, then a sequential per-resume chain:
//! read text → extract candidate → score → recommend.
//!
//! Individual resume failures degrade (skip or defaults); the batch always completes.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::{self, UploadedDocument};
use crate::embedding::Embedder;
use crate::llm_client::ChatModel;
use crate::screening::extractor::Extractor;
use crate::screening::models::{JobRequirements, RankedResult, ScreeningReport, ScreeningResult};
use crate::screening::recommendation::generate_recommendation;
use crate::screening::scoring::{round_score, MatchScorer};
use crate::screening::ScreeningSettings;

/// Collaborators for one screening run.
pub struct Screener<'a> {
    pub extractor: &'a dyn Extractor,
    pub chat: &'a dyn ChatModel,
    pub embedder: Option<&'a dyn Embedder>,
    pub settings: &'a ScreeningSettings,
}

impl<'a> Screener<'a> {
    pub async fn run(&self, job_text: &str, resumes: &[UploadedDocument]) -> ScreeningReport {
        info!(resumes = resumes.len(), "Screening started");

        let job = self.extractor.extract_job(job_text).await;
        info!(
            position = %job.position,
            required = job.required_skills.len(),
            preferred = job.preferred_skills.len(),
            "Job requirements extracted"
        );

        let scorer = MatchScorer::new(
            self.embedder,
            &self.settings.weights,
            self.settings.embed_max_chars,
        );

        let mut results = Vec::with_capacity(resumes.len());
        let mut skipped = Vec::new();

        for (idx, resume) in resumes.iter().enumerate() {
            let resume_text = documents::read_text(resume).await;
            if resume_text.trim().is_empty() {
                warn!(filename = %resume.filename, "No text extracted; skipping resume");
                skipped.push(resume.filename.clone());
            } else {
                let result = self
                    .screen_resume(&resume.filename, &resume_text, job_text, &job, &scorer)
                    .await;
                results.push(result);
            }
            info!(filename = %resume.filename, "Processed {}/{}", idx + 1, resumes.len());
        }

        let results = rank_results(results);
        info!(
            ranked = results.len(),
            skipped = skipped.len(),
            "Screening complete"
        );

        ScreeningReport {
            screening_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            job,
            submitted: resumes.len(),
            skipped,
            results,
        }
    }

    async fn screen_resume(
        &self,
        filename: &str,
        resume_text: &str,
        job_text: &str,
        job: &JobRequirements,
        scorer: &MatchScorer<'_>,
    ) -> ScreeningResult {
        let candidate = self.extractor.extract_candidate(resume_text).await;
        let breakdown = scorer.score(resume_text, job_text, &candidate, job).await;
        let analysis = generate_recommendation(
            self.chat,
            resume_text,
            job_text,
            breakdown.final_score,
            self.settings.analysis_max_chars,
        )
        .await;

        ScreeningResult {
            filename: filename.to_string(),
            candidate_name: candidate.name,
            email: candidate.email,
            experience: candidate.experience_years,
            match_score: round_score(breakdown.final_score),
            skills_match: breakdown.skills_match,
            analysis,
        }
    }
}

/// Sorts by score descending (ties keep submission order) and assigns ranks 1..=N.
pub fn rank_results(mut results: Vec<ScreeningResult>) -> Vec<RankedResult> {
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    results
        .into_iter()
        .enumerate()
        .map(|(idx, result)| RankedResult {
            rank: idx + 1,
            result,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::screening::extractor::tests::ScriptedModel;
    use crate::screening::models::CandidateInfo;
    use crate::screening::recommendation::ANALYSIS_FAILED;

    /// Extracts candidates by looking for known names in the resume text.
    struct KeywordExtractor;

    #[async_trait]
    impl Extractor for KeywordExtractor {
        async fn extract_candidate(&self, resume_text: &str) -> CandidateInfo {
            let (name, skills): (&str, &[&str]) = if resume_text.contains("Ada") {
                ("Ada", &["Python", "SQL", "AWS"][..])
            } else if resume_text.contains("Grace") {
                ("Grace", &["python"][..])
            } else {
                return CandidateInfo::default();
            };
            CandidateInfo {
                name: name.to_string(),
                key_skills: skills.iter().map(|s| s.to_string()).collect(),
                ..CandidateInfo::default()
            }
        }

        async fn extract_job(&self, _jd_text: &str) -> JobRequirements {
            JobRequirements {
                position: "Data Engineer".to_string(),
                required_skills: vec!["python".to_string(), "sql".to_string()],
                preferred_skills: vec!["docker".to_string()],
                ..JobRequirements::default()
            }
        }
    }

    fn result(filename: &str, score: f64) -> ScreeningResult {
        ScreeningResult {
            filename: filename.to_string(),
            candidate_name: "Unknown".to_string(),
            email: "N/A".to_string(),
            experience: "N/A".to_string(),
            match_score: score,
            skills_match: 0,
            analysis: String::new(),
        }
    }

    #[test]
    fn test_rank_results_sorts_descending() {
        let ranked = rank_results(vec![result("a", 10.0), result("b", 90.0), result("c", 50.0)]);
        let order: Vec<_> = ranked.iter().map(|r| r.result.filename.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_results_ties_keep_submission_order() {
        let ranked = rank_results(vec![result("first", 40.0), result("second", 40.0)]);
        assert_eq!(ranked[0].result.filename, "first");
        assert_eq!(ranked[1].result.filename, "second");
    }

    #[tokio::test]
    async fn test_unreadable_resume_skipped_without_rank_gap() {
        let chat = ScriptedModel::new(vec![Ok("Proceed"), Ok("Review")]);
        let settings = ScreeningSettings::default();
        let screener = Screener {
            extractor: &KeywordExtractor,
            chat: &chat,
            embedder: None,
            settings: &settings,
        };

        let resumes = vec![
            UploadedDocument::from_text("grace.txt", "Grace Hopper, python developer"),
            UploadedDocument {
                filename: "broken.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                bytes: Bytes::from_static(b"%PDF-1.4 not really a pdf"),
            },
            UploadedDocument::from_text("ada.txt", "Ada Lovelace, Python SQL AWS"),
        ];

        let report = screener.run("Data Engineer JD", &resumes).await;

        assert_eq!(report.submitted, 3);
        assert_eq!(report.skipped, vec!["broken.pdf"]);
        assert_eq!(report.results.len(), 2);
        assert_eq!(
            report.results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2]
        );

        // No embedder: Ada = 0.5 × 100, Grace = 0.5 × 50
        let top = &report.results[0].result;
        assert_eq!(top.candidate_name, "Ada");
        assert_eq!(top.match_score, 50.0);
        assert_eq!(top.skills_match, 2);
        assert_eq!(top.analysis, "Review");

        let second = &report.results[1].result;
        assert_eq!(second.candidate_name, "Grace");
        assert_eq!(second.match_score, 25.0);
        assert_eq!(second.analysis, "Proceed");
    }

    #[tokio::test]
    async fn test_blank_resume_skipped_and_failures_degrade() {
        let chat = ScriptedModel::new(vec![Err(())]);
        let settings = ScreeningSettings::default();
        let screener = Screener {
            extractor: &KeywordExtractor,
            chat: &chat,
            embedder: None,
            settings: &settings,
        };

        let resumes = vec![
            UploadedDocument::from_text("blank.txt", "   \n "),
            UploadedDocument::from_text("mystery.txt", "No recognisable candidate"),
        ];
        let report = screener.run("JD", &resumes).await;

        assert_eq!(report.skipped, vec!["blank.txt"]);
        assert_eq!(report.results.len(), 1);
        let only = &report.results[0].result;
        assert_eq!(only.candidate_name, "Unknown");
        assert_eq!(only.match_score, 0.0);
        assert_eq!(only.analysis, ANALYSIS_FAILED);
        assert_eq!(report.job.position, "Data Engineer");
    }
}
