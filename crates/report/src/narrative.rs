//! Segmentation of the AI-generated summary into display sections.
//!
//! The summary is free text from a language model. Bulleted lines become
//! insights or recommendations; longer prose lines become summary points.
//! When the text has no bullets at all, its sentences are split evenly
//! between insights and recommendations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shown when no insight could be extracted.
pub const FALLBACK_INSIGHT: &str = "Analysis completed successfully";

/// Shown when no recommendation could be extracted.
pub const FALLBACK_RECOMMENDATION: &str = "Consider the overall scores for decision making";

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-*]\s").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());
static TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]").unwrap());

/// A segmented AI summary. Every list is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSummary {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// The original text, untouched
    pub summary: String,
    pub summary_points: Vec<String>,
}

/// Split an AI summary into insights, recommendations and summary points.
///
/// # Example
/// ```
/// use h2site_report::segment_summary;
///
/// let s = segment_summary("- Strong port access\n- We recommend phased build-out");
/// assert_eq!(s.insights, vec!["Strong port access"]);
/// assert_eq!(s.recommendations, vec!["We recommend phased build-out"]);
/// ```
pub fn segment_summary(text: &str) -> NarrativeSummary {
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();
    let mut summary_points = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if BULLET.is_match(line) || NUMBERED.is_match(line) {
            // Both markers are stripped in turn, so "- 1. x" yields "x".
            let content = BULLET.replace(line, "");
            let content = NUMBERED.replace(&content, "").into_owned();
            let lower = content.to_lowercase();
            if lower.contains("recommend") || lower.contains("suggest") {
                recommendations.push(content);
            } else {
                insights.push(content);
            }
        } else {
            let lower = line.to_lowercase();
            if utf16_len(line) > 20 && !lower.contains("based on") && !lower.contains("summary")
            {
                summary_points.push(line.to_string());
            }
        }
    }

    if insights.is_empty() && recommendations.is_empty() {
        let sentences = sentences(text);
        let mid = sentences.len().div_ceil(2);
        tracing::debug!(sentences = sentences.len(), "No bullets in summary, splitting sentences");
        let mut sentences = sentences.into_iter();
        insights.extend(sentences.by_ref().take(mid));
        recommendations.extend(sentences);
    }

    if insights.is_empty() {
        insights.push(FALLBACK_INSIGHT.to_string());
    }
    if recommendations.is_empty() {
        recommendations.push(FALLBACK_RECOMMENDATION.to_string());
    }
    if summary_points.is_empty() {
        summary_points.push(text.to_string());
    }

    NarrativeSummary {
        insights,
        recommendations,
        summary: text.to_string(),
        summary_points,
    }
}

/// Length in UTF-16 code units, as the web view measures it.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn sentence_fits(sentence: &str) -> bool {
    let len = utf16_len(sentence.trim());
    len > 15 && len < 200
}

/// Terminated sentences of a useful length; failing that, fragments between
/// terminators. Fragments keep their surrounding whitespace.
fn sentences(text: &str) -> Vec<String> {
    let terminated: Vec<String> = SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| sentence_fits(s))
        .map(String::from)
        .collect();

    if !terminated.is_empty() {
        return terminated;
    }

    TERMINATOR
        .split(text)
        .filter(|s| sentence_fits(s))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_split_by_keyword() {
        let text = "Overview of the site:\n\
                    • Excellent access to the port of Kandla\n\
                    - Water availability is limited in summer\n\
                    * We suggest securing desalination capacity\n\
                    1. Recommend a phased 50 MW build-out\n";
        let s = segment_summary(text);

        assert_eq!(
            s.insights,
            vec![
                "Excellent access to the port of Kandla",
                "Water availability is limited in summer"
            ]
        );
        assert_eq!(
            s.recommendations,
            vec![
                "We suggest securing desalination capacity",
                "Recommend a phased 50 MW build-out"
            ]
        );
        assert_eq!(s.summary, text);
        assert_eq!(s.summary_points, vec!["Overview of the site:"]);
    }

    #[test]
    fn test_summary_points_exclusions() {
        let text = "- Good grid connection\n\
                    Based on the scores the site looks promising overall\n\
                    Executive summary for the selected location here\n\
                    Short line\n\
                    Land prices in the corridor are moderate for now";
        let s = segment_summary(text);
        assert_eq!(s.summary_points, vec!["Land prices in the corridor are moderate for now"]);
    }

    #[test]
    fn test_dash_then_number_strips_both() {
        let s = segment_summary("- 2. Solar resource is strong");
        assert_eq!(s.insights, vec!["Solar resource is strong"]);
        assert_eq!(s.recommendations, vec![FALLBACK_RECOMMENDATION]);
    }

    #[test]
    fn test_marker_requires_whitespace() {
        let s = segment_summary("-not a bullet line but long enough to count");
        assert_eq!(s.summary_points, vec!["-not a bullet line but long enough to count"]);
        assert_eq!(s.insights, vec!["-not a bullet line but long enough to count"]);
    }

    #[test]
    fn test_sentence_fallback_splits_evenly() {
        let text = "The infrastructure score is high. Environmental factors are moderate! \
                    Economic incentives are available nearby? Consider a pilot plant first.";
        let s = segment_summary(text);

        assert_eq!(
            s.insights,
            vec![
                "The infrastructure score is high.",
                "Environmental factors are moderate!"
            ]
        );
        assert_eq!(
            s.recommendations,
            vec![
                "Economic incentives are available nearby?",
                "Consider a pilot plant first."
            ]
        );
    }

    #[test]
    fn test_odd_sentence_count_favours_insights() {
        let text = "First sentence is long enough. Second sentence is long enough. \
                    Third sentence is long enough.";
        let s = segment_summary(text);
        assert_eq!(s.insights.len(), 2);
        assert_eq!(s.recommendations.len(), 1);
    }

    #[test]
    fn test_unterminated_text_uses_fragments() {
        let text = "A single long statement without any terminator";
        let s = segment_summary(text);
        assert_eq!(s.insights, vec![text]);
        assert_eq!(s.recommendations, vec![FALLBACK_RECOMMENDATION]);
    }

    #[test]
    fn test_fragments_keep_whitespace() {
        let s = segment_summary("Short. Water rights along the canal are secured");
        assert_eq!(s.insights, vec![" Water rights along the canal are secured"]);
        assert_eq!(s.recommendations, vec![FALLBACK_RECOMMENDATION]);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Each emoji is two UTF-16 units: 8 chars but 16 units.
        assert!(sentence_fits("🌞🌞🌞🌞🌞🌞🌞🌞"));
        assert!(!sentence_fits("abcdefgh"));
        assert_eq!(utf16_len("H₂ 🌊"), 5);
    }

    #[test]
    fn test_empty_text_uses_fallbacks() {
        let s = segment_summary("");
        assert_eq!(s.insights, vec![FALLBACK_INSIGHT]);
        assert_eq!(s.recommendations, vec![FALLBACK_RECOMMENDATION]);
        assert_eq!(s.summary_points, vec![""]);
    }

    #[test]
    fn test_short_sentences_filtered() {
        let s = segment_summary("Too short. Also short.");
        assert_eq!(s.insights, vec![FALLBACK_INSIGHT]);
        assert_eq!(s.summary_points, vec!["Too short. Also short."]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sections_never_empty(text in "\\PC{0,300}") {
                let s = segment_summary(&text);
                prop_assert!(!s.insights.is_empty());
                prop_assert!(!s.recommendations.is_empty());
                prop_assert!(!s.summary_points.is_empty());
                prop_assert_eq!(s.summary, text);
            }
        }
    }
}
