// Resume screening: structured extraction, match scoring, recommendations and reports.
// All LLM calls go through llm_client: no direct Anthropic API calls here.

pub mod export;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod recommendation;
pub mod scoring;

use crate::screening::scoring::ScoringWeights;

/// Tunable knobs for a screening run. Defaults mirror the weights and
/// truncation budgets recruiters have been calibrated against.
#[derive(Debug, Clone)]
pub struct ScreeningSettings {
    pub weights: ScoringWeights,
    /// Characters of document text sent to structured extraction.
    pub extract_max_chars: usize,
    /// Characters of resume / JD text sent to the embedding backend.
    pub embed_max_chars: usize,
    /// Characters of resume / JD text quoted in the recommendation prompt.
    pub analysis_max_chars: usize,
}

impl Default for ScreeningSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            extract_max_chars: 2000,
            embed_max_chars: 1000,
            analysis_max_chars: 1500,
        }
    }
}

/// Returns at most `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Substitutes each `{placeholder}` in one left-to-right pass.
/// Inserted values are never rescanned, so text containing a placeholder stays literal.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_shorter_text_unchanged() {
        assert_eq!(truncate_chars("rust", 10), "rust");
    }

    #[test]
    fn test_truncate_chars_cuts_at_limit() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
    }

    #[test]
    fn test_truncate_chars_zero() {
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_fill_template_replaces_every_placeholder() {
        let filled = fill_template("{a} and {b}, again {a}", &[("{a}", "x"), ("{b}", "y")]);
        assert_eq!(filled, "x and y, again x");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{\n  \"name\": {resume}\n}", &[("{resume}", "Ada")]);
        assert_eq!(filled, "{\n  \"name\": Ada\n}");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "R: {resume} J: {jd}",
            &[("{resume}", "body"), ("{jd}", "mentions {resume}")],
        );
        assert_eq!(filled, "R: body J: mentions {resume}");
    }
}
