use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    #[serde(rename = "90-100")]
    pub excellent: usize,
    #[serde(rename = "80-89")]
    pub strong: usize,
    #[serde(rename = "70-79")]
    pub good: usize,
    #[serde(rename = "60-69")]
    pub fair: usize,
    pub below_60: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub screened_count: usize,
    /// Rounded to one decimal; 0.0 when nothing has been screened.
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
    pub qualified_count: usize,
}

/// Aggregates screened scores for the results endpoint.
/// `qualified_count` counts scores at or above the shortlist threshold.
pub fn summarize_scores(scores: &[f64], threshold: u32) -> ScoreSummary {
    let mut distribution = ScoreDistribution::default();
    for &score in scores {
        match score {
            s if s >= 90.0 => distribution.excellent += 1,
            s if s >= 80.0 => distribution.strong += 1,
            s if s >= 70.0 => distribution.good += 1,
            s if s >= 60.0 => distribution.fair += 1,
            _ => distribution.below_60 += 1,
        }
    }

    let average_score = if scores.is_empty() {
        0.0
    } else {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    ScoreSummary {
        screened_count: scores.len(),
        average_score,
        score_distribution: distribution,
        qualified_count: scores.iter().filter(|&&s| s >= f64::from(threshold)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores() {
        let summary = summarize_scores(&[], 60);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.qualified_count, 0);
        assert_eq!(summary.score_distribution, ScoreDistribution::default());
    }

    #[test]
    fn test_buckets_and_average() {
        let summary = summarize_scores(&[95.0, 90.0, 85.0, 72.0, 60.0, 59.9, 0.0], 60);
        assert_eq!(summary.screened_count, 7);
        assert_eq!(summary.score_distribution.excellent, 2);
        assert_eq!(summary.score_distribution.strong, 1);
        assert_eq!(summary.score_distribution.good, 1);
        assert_eq!(summary.score_distribution.fair, 1);
        assert_eq!(summary.score_distribution.below_60, 2);
        assert_eq!(summary.qualified_count, 5);
        // 461.9 / 7 = 65.985...
        assert_eq!(summary.average_score, 66.0);
    }

    #[test]
    fn test_distribution_keys() {
        let value = serde_json::to_value(summarize_scores(&[91.0], 60)).unwrap();
        assert_eq!(value["score_distribution"]["90-100"], 1);
        assert_eq!(value["score_distribution"]["below_60"], 0);
    }
}
