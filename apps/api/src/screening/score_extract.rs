//! Score Extraction: recovers a 0–100 match score and a recommendation from
//! free-text LLM output.
//!
//! Resolution order:
//! 1. the `MATCH_SCORE: N` line the prompts ask for
//! 2. generic score phrasings (`score: N`, `N%`, `N/100`, `rating: N`, `**N**`...)
//! 3. a marker-counting heuristic adjusted by recommendation keywords
//!
//! Every numeric pattern only considers its first match and accepts it when in 0..=100.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::candidate::Recommendation;

static MATCH_SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"match_score[\s:*]*(\d+)").expect("valid match_score regex"));

static GENERIC_SCORE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:final\s*)?(?:match\s*)?score[\s:]+(\d+)",
        r"(\d+)\s*(?:%|/100|out of 100)",
        r"rating[\s:]+(\d+)",
        r"overall[\s:]+(\d+)",
        r"\*\*(\d+)\*\*\s*(?:%|/100)?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid score regex"))
    .collect()
});

static POSITIVE_MARKERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"meets|has|matches|qualified|proficient").expect("valid positive marker regex")
});

static NEGATIVE_MARKERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"missing|lacks|no experience|not found|does not have|gap")
        .expect("valid negative marker regex")
});

static RECOMMENDATION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"recommendation\s*:[\s*]*(strong no hire|strong hire|no hire|hire|maybe|review)")
        .expect("valid recommendation regex")
});

/// First match of `re` in `text`, if it parses and lies in 0..=100.
fn bounded_capture(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|score| *score <= 100)
}

pub fn extract_score(text: &str) -> u32 {
    let lower = text.to_lowercase();

    if let Some(score) = bounded_capture(&MATCH_SCORE_RE, &lower) {
        return score;
    }
    if let Some(score) = GENERIC_SCORE_RES
        .iter()
        .find_map(|re| bounded_capture(re, &lower))
    {
        return score;
    }

    heuristic_score(&lower)
}

/// Fallback when no number can be trusted. `lower` must be lowercase.
fn heuristic_score(lower: &str) -> u32 {
    let positives = POSITIVE_MARKERS_RE.find_iter(lower).count();
    let negatives = NEGATIVE_MARKERS_RE.find_iter(lower).count();

    let base: u32 = if negatives > positives {
        45
    } else if positives > negatives * 2 {
        70
    } else {
        55
    };

    if lower.contains("strong hire") {
        (base + 20).min(90)
    } else if lower.contains("no hire") || lower.contains("reject") {
        base.saturating_sub(20).max(25)
    } else if lower.contains("hire") {
        (base + 10).min(80)
    } else {
        base
    }
}

pub fn extract_recommendation(text: &str) -> Recommendation {
    let lower = text.to_lowercase();

    if let Some(label) = RECOMMENDATION_LINE_RE
        .captures(&lower)
        .and_then(|c| c.get(1))
    {
        return match label.as_str() {
            "strong hire" => Recommendation::StrongHire,
            "strong no hire" => Recommendation::StrongNoHire,
            "no hire" => Recommendation::NoHire,
            "hire" => Recommendation::Hire,
            _ => Recommendation::Review,
        };
    }

    if lower.contains("strong hire") {
        Recommendation::StrongHire
    } else if lower.contains("strong no hire") {
        Recommendation::StrongNoHire
    } else if lower.contains("no hire") {
        Recommendation::NoHire
    } else if lower.contains("hire") {
        Recommendation::Hire
    } else {
        Recommendation::Review
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_score_line_wins() {
        let text = "Overall: 20\nMATCH_SCORE: 78\nRECOMMENDATION: Hire";
        assert_eq!(extract_score(text), 78);
    }

    #[test]
    fn test_match_score_with_markdown_bold() {
        assert_eq!(extract_score("**MATCH_SCORE:** 64"), 64);
    }

    #[test]
    fn test_out_of_range_match_score_falls_through() {
        // 150 is rejected; the percentage pattern supplies the score.
        assert_eq!(extract_score("MATCH_SCORE: 150. Coverage 72%"), 72);
    }

    #[test]
    fn test_generic_patterns() {
        assert_eq!(extract_score("Final score: 81"), 81);
        assert_eq!(extract_score("The candidate rates 67/100"), 67);
        assert_eq!(extract_score("about 55 out of 100"), 55);
        assert_eq!(extract_score("Rating: 4"), 4);
        assert_eq!(extract_score("I'd say **73**"), 73);
    }

    #[test]
    fn test_heuristic_mostly_negative() {
        let text = "Candidate lacks Kubernetes, missing Go, no experience with AWS.";
        assert_eq!(extract_score(text), 45);
    }

    #[test]
    fn test_heuristic_positive_with_strong_hire() {
        let text = "Meets every requirement, proficient in Rust, matches the stack. Strong hire.";
        assert_eq!(extract_score(text), 90);
    }

    #[test]
    fn test_heuristic_no_hire_floor() {
        let text = "Lacks the core skills and is missing experience. No hire.";
        assert_eq!(extract_score(text), 25);
    }

    #[test]
    fn test_heuristic_plain_hire_cap() {
        let text = "Meets the bar, proficient, matches. Hire.";
        assert_eq!(extract_score(text), 80);
    }

    #[test]
    fn test_heuristic_neutral() {
        assert_eq!(extract_score("Interesting background."), 55);
    }

    #[test]
    fn test_recommendation_explicit_line_first() {
        let text = "Not a strong hire overall.\nRECOMMENDATION: No Hire";
        assert_eq!(extract_recommendation(text), Recommendation::NoHire);
    }

    #[test]
    fn test_recommendation_maybe_maps_to_review() {
        assert_eq!(
            extract_recommendation("RECOMMENDATION: Maybe"),
            Recommendation::Review
        );
    }

    #[test]
    fn test_recommendation_keyword_order() {
        assert_eq!(
            extract_recommendation("This is a strong hire"),
            Recommendation::StrongHire
        );
        assert_eq!(
            extract_recommendation("verdict: strong no hire"),
            Recommendation::StrongNoHire
        );
        assert_eq!(extract_recommendation("no hire"), Recommendation::NoHire);
        assert_eq!(extract_recommendation("would hire"), Recommendation::Hire);
        assert_eq!(extract_recommendation("unclear"), Recommendation::Review);
    }
}
