// All LLM prompt templates for the screening module.

/// Resume extraction prompt template. Replace `{resume}` before sending.
pub const CANDIDATE_PROMPT_TEMPLATE: &str = r#"Extract the following information from the resume in JSON format:
{
    "name": "candidate name",
    "email": "email if present",
    "phone": "phone if present",
    "experience_years": "total years of experience",
    "key_skills": ["skill1", "skill2", ...],
    "education": "degree and institution"
}

Resume:
{resume}

Return only valid JSON."#;

/// Job-description extraction prompt template. Replace `{jd}` before sending.
pub const JOB_PROMPT_TEMPLATE: &str = r#"Extract job requirements from this job description in JSON format:
{
    "position": "job title",
    "required_skills": ["skill1", "skill2", ...],
    "preferred_skills": ["skill1", "skill2", ...],
    "experience_required": "years of experience",
    "education_required": "education level"
}

Job Description:
{jd}

Return only valid JSON."#;

/// Hiring recommendation prompt template.
/// Replace: {resume}, {jd}, {match_score}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Based on the resume and job description provided, generate a brief hiring recommendation:

Resume Summary:
{resume}

Job Description:
{jd}

Match Score: {match_score}%

Provide:
1. Top matching qualifications (2-3 bullet points)
2. Missing qualifications (2-3 bullet points)
3. One-line recommendation (Proceed/Review/Reject)

Keep response concise and actionable."#;
