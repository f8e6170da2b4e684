//! Experience fit: stated years against the job's minimum and seniority band.

use serde::Serialize;

use crate::models::job::ExperienceLevel;

/// Score used when the resume states no years but the job sets a minimum.
const UNKNOWN_YEARS_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFit {
    Aligned,
    Overqualified,
    Underqualified,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceReport {
    pub years: Option<f64>,
    pub min_years: f64,
    pub level: ExperienceLevel,
    pub meets_minimum: bool,
    /// Years short of the minimum; zero when met.
    pub gap: f64,
    pub level_fit: LevelFit,
    pub score: f64,
}

pub fn evaluate_experience(
    years: Option<f64>,
    min_years: f64,
    level: ExperienceLevel,
) -> ExperienceReport {
    let min_years = min_years.max(0.0);

    let (meets_minimum, gap) = match years {
        Some(y) => (y >= min_years, (min_years - y).max(0.0)),
        None => (min_years <= 0.0, min_years),
    };

    let level_fit = match years {
        None => LevelFit::Unknown,
        Some(y) => {
            let (low, high) = level.expected_years();
            if level == ExperienceLevel::Executive || (low..=high).contains(&y) {
                LevelFit::Aligned
            } else if y > high {
                LevelFit::Overqualified
            } else {
                LevelFit::Underqualified
            }
        }
    };

    let score = if min_years <= 0.0 {
        100.0
    } else {
        match years {
            Some(y) => (y / min_years).min(1.0) * 100.0,
            None => UNKNOWN_YEARS_SCORE,
        }
    };

    ExperienceReport {
        years,
        min_years,
        level,
        meets_minimum,
        gap,
        level_fit,
        score,
    }
}

impl ExperienceReport {
    pub fn render(&self) -> String {
        let mut out = vec!["EXPERIENCE ANALYSIS".to_string()];
        match self.years {
            Some(y) => out.push(format!("Total Experience: ~{y} years")),
            None => out.push("Total Experience: not stated".to_string()),
        }
        out.push(format!(
            "Required: {}+ years ({} level)",
            self.min_years,
            self.level.as_str()
        ));
        if self.meets_minimum {
            out.push("  + Meets minimum experience requirement".to_string());
        } else {
            out.push(format!(
                "  - Below minimum experience requirement (gap: {} years)",
                self.gap
            ));
        }
        let level = self.level.as_str();
        out.push(match self.level_fit {
            LevelFit::Aligned => format!("  + Experience aligns with {level} level"),
            LevelFit::Overqualified => format!("  ! May be overqualified for {level} level"),
            LevelFit::Underqualified => format!("  ! May be underqualified for {level} level"),
            LevelFit::Unknown => format!("  ? Cannot judge fit for {level} level"),
        });
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_minimum_scores_full() {
        let r = evaluate_experience(Some(1.0), 0.0, ExperienceLevel::Entry);
        assert_eq!(r.score, 100.0);
        assert!(r.meets_minimum);
        assert_eq!(r.level_fit, LevelFit::Aligned);
    }

    #[test]
    fn test_partial_years_scale_linearly() {
        let r = evaluate_experience(Some(3.0), 6.0, ExperienceLevel::Senior);
        assert_eq!(r.score, 50.0);
        assert!(!r.meets_minimum);
        assert_eq!(r.gap, 3.0);
        assert_eq!(r.level_fit, LevelFit::Underqualified);
    }

    #[test]
    fn test_score_caps_at_100() {
        let r = evaluate_experience(Some(20.0), 5.0, ExperienceLevel::Senior);
        assert_eq!(r.score, 100.0);
        assert_eq!(r.gap, 0.0);
        assert_eq!(r.level_fit, LevelFit::Overqualified);
    }

    #[test]
    fn test_unknown_years_with_minimum() {
        let r = evaluate_experience(None, 3.0, ExperienceLevel::Mid);
        assert_eq!(r.score, 50.0);
        assert!(!r.meets_minimum);
        assert_eq!(r.level_fit, LevelFit::Unknown);
    }

    #[test]
    fn test_executive_is_unbounded() {
        let r = evaluate_experience(Some(40.0), 10.0, ExperienceLevel::Executive);
        assert_eq!(r.level_fit, LevelFit::Aligned);
    }

    #[test]
    fn test_render_reports_gap() {
        let rendered = evaluate_experience(Some(2.0), 5.0, ExperienceLevel::Mid).render();
        assert!(rendered.contains("gap: 3 years"));
        assert!(rendered.contains("aligns with mid level"));
    }
}
