//! Records produced during a screening run. None of them outlive the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";

/// Candidate fields extracted from one resume.
///
/// Deserialization is lenient: absent or null fields take their defaults,
/// numbers are accepted where text is expected, and a comma-separated string
/// is accepted for `key_skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCandidateInfo")]
pub struct CandidateInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience_years: String,
    pub key_skills: Vec<String>,
    pub education: String,
}

impl Default for CandidateInfo {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            email: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
            experience_years: NOT_AVAILABLE.to_string(),
            key_skills: Vec::new(),
            education: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Requirements extracted once per screening from the job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawJobRequirements")]
pub struct JobRequirements {
    pub position: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_required: String,
    pub education_required: String,
}

impl Default for JobRequirements {
    fn default() -> Self {
        Self {
            position: UNKNOWN.to_string(),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            experience_required: NOT_AVAILABLE.to_string(),
            education_required: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCandidateInfo {
    name: Option<Value>,
    email: Option<Value>,
    phone: Option<Value>,
    experience_years: Option<Value>,
    key_skills: Option<Value>,
    education: Option<Value>,
}

impl From<RawCandidateInfo> for CandidateInfo {
    fn from(raw: RawCandidateInfo) -> Self {
        Self {
            name: text_or(raw.name, UNKNOWN),
            email: text_or(raw.email, NOT_AVAILABLE),
            phone: text_or(raw.phone, NOT_AVAILABLE),
            experience_years: text_or(raw.experience_years, NOT_AVAILABLE),
            key_skills: list_or_empty(raw.key_skills),
            education: text_or(raw.education, NOT_AVAILABLE),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawJobRequirements {
    position: Option<Value>,
    required_skills: Option<Value>,
    preferred_skills: Option<Value>,
    experience_required: Option<Value>,
    education_required: Option<Value>,
}

impl From<RawJobRequirements> for JobRequirements {
    fn from(raw: RawJobRequirements) -> Self {
        Self {
            position: text_or(raw.position, UNKNOWN),
            required_skills: list_or_empty(raw.required_skills),
            preferred_skills: list_or_empty(raw.preferred_skills),
            experience_required: text_or(raw.experience_required, NOT_AVAILABLE),
            education_required: text_or(raw.education_required, NOT_AVAILABLE),
        }
    }
}

fn text_or(value: Option<Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

fn list_or_empty(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Outcome for one resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningResult {
    pub filename: String,
    pub candidate_name: String,
    pub email: String,
    pub experience: String,
    /// 0 – 100, rounded to two decimals.
    pub match_score: f64,
    /// Number of required skills the candidate lists.
    pub skills_match: usize,
    pub analysis: String,
}

/// A result with its 1-based position in the score ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub result: ScreeningResult,
}

/// Everything a caller gets back from one screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub screening_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub job: JobRequirements,
    /// Resumes received, including skipped ones.
    pub submitted: usize,
    /// Filenames whose text came back blank.
    pub skipped: Vec<String>,
    pub results: Vec<RankedResult>,
}
