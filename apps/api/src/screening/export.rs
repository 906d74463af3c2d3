//! Report exports: a ranked CSV table and a detailed JSON dump.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::screening::models::RankedResult;

pub const CSV_FILENAME: &str = "resume_screening_results.csv";
pub const DETAILED_JSON_FILENAME: &str = "resume_screening_detailed.json";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Candidate")]
    candidate: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Experience")]
    experience: &'a str,
    #[serde(rename = "Match Score")]
    match_score: String,
    #[serde(rename = "Skills Match")]
    skills_match: usize,
}

/// Renders the ranked table: Rank, Candidate, Email, Experience, Match Score, Skills Match.
pub fn to_csv(results: &[RankedResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if results.is_empty() {
        writer.write_record([
            "Rank",
            "Candidate",
            "Email",
            "Experience",
            "Match Score",
            "Skills Match",
        ])?;
    }

    for ranked in results {
        let r = &ranked.result;
        writer.serialize(CsvRow {
            rank: ranked.rank,
            candidate: &r.candidate_name,
            email: &r.email,
            experience: &r.experience,
            match_score: format_percent(r.match_score),
            skills_match: r.skills_match,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Full per-candidate records, including the recommendation text.
pub fn to_detailed_json(results: &[RankedResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize detailed results")
}

/// `82.0%` for whole numbers, otherwise the shortest decimal form (`81.23%`).
pub fn format_percent(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}%")
    } else {
        format!("{score}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::ScreeningResult;

    fn ranked(rank: usize, name: &str, score: f64) -> RankedResult {
        RankedResult {
            rank,
            result: ScreeningResult {
                filename: format!("{}.pdf", name.to_lowercase()),
                candidate_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                experience: "5 years".to_string(),
                match_score: score,
                skills_match: 2,
                analysis: "- Strong SQL\nProceed".to_string(),
            },
        }
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(82.0), "82.0%");
        assert_eq!(format_percent(81.23), "81.23%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let csv = to_csv(&[ranked(1, "Ada", 82.0), ranked(2, "Grace, Jr.", 61.5)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Rank,Candidate,Email,Experience,Match Score,Skills Match"
        );
        assert_eq!(lines[1], "1,Ada,ada@example.com,5 years,82.0%,2");
        assert_eq!(
            lines[2],
            "2,\"Grace, Jr.\",\"grace, jr.@example.com\",5 years,61.5%,2"
        );
    }

    #[test]
    fn test_csv_empty_results_still_has_header() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "Rank,Candidate,Email,Experience,Match Score,Skills Match"
        );
    }

    #[test]
    fn test_detailed_json_includes_analysis_and_rank() {
        let json = to_detailed_json(&[ranked(1, "Ada", 82.0)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["rank"], 1);
        assert_eq!(value[0]["filename"], "ada.pdf");
        assert_eq!(value[0]["analysis"], "- Strong SQL\nProceed");
        assert_eq!(value[0]["skills_match"], 2);
    }
}
