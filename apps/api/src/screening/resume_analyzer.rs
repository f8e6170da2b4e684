//! Resume Analyzer: regex and vocabulary heuristics over raw resume text.
//!
//! Produces contact details, detected skills, stated years of experience and
//! education signals. The rendered summary is what the LLM screener reads.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::screening::vocabulary::{find_terms, title_case, RESUME_SKILLS, SOFT_SKILLS};

const EXCERPT_CHARS: usize = 2000;
const MIN_PHONE_DIGITS: usize = 9;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+]?[(]?[0-9]{1,3}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,4}[-\s.]?[0-9]{1,9}")
        .expect("valid phone regex")
});

static LINKEDIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/in/[\w-]+").expect("valid linkedin regex"));

static GITHUB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/[\w-]+").expect("valid github regex"));

static EXPERIENCE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\+?\s*years?\s*(?:of\s*)?experience",
        r"experience\s*:?\s*(\d+)\+?\s*years?",
        r"(\d+)\+?\s*years?\s*(?:in|of|working)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid experience regex"))
    .collect()
});

/// Degree-with-field patterns, paired with the degree level they imply.
static DEGREE_RES: LazyLock<Vec<(Regex, DegreeLevel)>> = LazyLock::new(|| {
    [
        (
            r"\b(b\.?s\.?|bachelor'?s?)\s+(?:in\s+)?(computer science|data science|engineering|information technology)",
            DegreeLevel::Bachelor,
        ),
        (
            r"\b(m\.?s\.?|master'?s?)\s+(?:in\s+)?(computer science|data science|engineering|information technology|business)",
            DegreeLevel::Master,
        ),
        (
            r"\b(ph\.?d\.?|doctorate)\s+(?:in\s+)?(computer science|data science|engineering)",
            DegreeLevel::Doctorate,
        ),
        (r"\b(mba|m\.b\.a\.?)", DegreeLevel::Master),
    ]
    .into_iter()
    .map(|(p, level)| (Regex::new(p).expect("valid degree regex"), level))
    .collect()
});

static DEGREE_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(bachelor|b\.sc|master|m\.sc|mba|ph\.?d|doctorate)(?:'?s)?\b")
        .expect("valid degree mention regex")
});

static UNIVERSITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w ]+university|[\w ]+institute of technology|[\w ]+college)")
        .expect("valid university regex")
});

/// Academic degree level, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeLevel {
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Highest degree level mentioned anywhere in `text`.
    pub fn detect(text: &str) -> Option<DegreeLevel> {
        let lower = text.to_lowercase();
        DEGREE_MENTION_RE
            .captures_iter(&lower)
            .filter_map(|c| c.get(1))
            .map(|m| match m.as_str() {
                "bachelor" | "b.sc" => DegreeLevel::Bachelor,
                "master" | "m.sc" | "mba" => DegreeLevel::Master,
                _ => DegreeLevel::Doctorate,
            })
            .max()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience_years: Option<u32>,
    pub education: Vec<String>,
    pub universities: Vec<String>,
    pub highest_degree: Option<DegreeLevel>,
    pub excerpt: String,
}

/// Runs every heuristic over the resume text.
pub fn analyze_resume(text: &str) -> ResumeAnalysis {
    let lower = text.to_lowercase();

    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
        .map(String::from);
    let linkedin = LINKEDIN_RE.find(&lower).map(|m| m.as_str().to_string());
    let github = GITHUB_RE.find(&lower).map(|m| m.as_str().to_string());

    let skills = find_terms(&lower, RESUME_SKILLS)
        .into_iter()
        .map(String::from)
        .collect();
    let soft_skills = find_terms(&lower, SOFT_SKILLS)
        .into_iter()
        .map(String::from)
        .collect();

    let experience_years = EXPERIENCE_RES
        .iter()
        .find_map(|re| re.captures(&lower))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    let mut education: Vec<String> = Vec::new();
    let mut highest_degree = DegreeLevel::detect(&lower);
    for (re, level) in DEGREE_RES.iter() {
        for caps in re.captures_iter(&lower) {
            let parts: Vec<&str> = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .collect();
            let label = if parts.len() == 1 {
                parts[0].to_uppercase()
            } else {
                title_case(parts.join(" ").trim())
            };
            if label.len() > 2 && !education.contains(&label) {
                education.push(label);
            }
            highest_degree = highest_degree.max(Some(*level));
        }
    }
    education.truncate(3);

    let universities = UNIVERSITY_RE
        .find_iter(&lower)
        .map(|m| m.as_str().trim())
        .filter(|u| u.len() > 5)
        .map(title_case)
        .take(2)
        .collect();

    ResumeAnalysis {
        email,
        phone,
        linkedin,
        github,
        skills,
        soft_skills,
        experience_years,
        education,
        universities,
        highest_degree,
        excerpt: text.chars().take(EXCERPT_CHARS).collect(),
    }
}

impl ResumeAnalysis {
    /// Labelled plain-text summary, one signal per line.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(email) = &self.email {
            lines.push(format!("EMAIL: {email}"));
        }
        if let Some(phone) = &self.phone {
            lines.push(format!("PHONE: {phone}"));
        }
        if let Some(linkedin) = &self.linkedin {
            lines.push(format!("LINKEDIN: {linkedin}"));
        }
        if let Some(github) = &self.github {
            lines.push(format!("GITHUB: {github}"));
        }
        if !self.skills.is_empty() {
            lines.push(format!("DETECTED SKILLS: {}", self.skills.join(", ")));
        }
        if let Some(years) = self.experience_years {
            lines.push(format!("EXPERIENCE: {years}+ years"));
        }
        if !self.education.is_empty() {
            lines.push(format!("EDUCATION: {}", self.education.join(", ")));
        }
        if !self.universities.is_empty() {
            lines.push(format!("UNIVERSITIES: {}", self.universities.join(", ")));
        }
        lines.push(format!("\nFULL TEXT:\n{}...", self.excerpt));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\n\
        jane.doe@example.com | +1-555-123-4567\n\
        linkedin.com/in/JaneDoe | github.com/janedoe\n\
        Senior engineer with 7+ years of experience building Python and Kubernetes platforms.\n\
        Strong communication and mentoring.\n\
        Work: 2016-2019 Acme Corp\n\
        Education: B.S. in Computer Science, Stanford University\n";

    #[test]
    fn test_extracts_contact_details() {
        let a = analyze_resume(RESUME);
        assert_eq!(a.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(a.phone.as_deref(), Some("+1-555-123-4567"));
        assert_eq!(a.linkedin.as_deref(), Some("linkedin.com/in/janedoe"));
        assert_eq!(a.github.as_deref(), Some("github.com/janedoe"));
    }

    #[test]
    fn test_detects_skills_and_soft_skills() {
        let a = analyze_resume(RESUME);
        assert!(a.skills.contains(&"python".to_string()));
        assert!(a.skills.contains(&"kubernetes".to_string()));
        assert!(!a.skills.contains(&"go".to_string()));
        assert_eq!(a.soft_skills, vec!["communication", "mentoring"]);
    }

    #[test]
    fn test_experience_years() {
        assert_eq!(analyze_resume(RESUME).experience_years, Some(7));
        assert_eq!(
            analyze_resume("Experience: 3 years in retail").experience_years,
            Some(3)
        );
        assert_eq!(analyze_resume("No numbers here").experience_years, None);
    }

    #[test]
    fn test_education_and_university() {
        let a = analyze_resume(RESUME);
        assert_eq!(a.education, vec!["B.s. Computer Science"]);
        assert_eq!(a.highest_degree, Some(DegreeLevel::Bachelor));
        assert_eq!(a.universities, vec!["Stanford University"]);
    }

    #[test]
    fn test_bs_inside_word_is_not_a_degree() {
        let a = analyze_resume("Managed jobs engineering backlog");
        assert!(a.education.is_empty());
    }

    #[test]
    fn test_verbs_are_not_degrees() {
        let a = analyze_resume("Self-taught developer. Mastered Rust and Python, mastering Go.");
        assert_eq!(a.highest_degree, None);
        assert_eq!(DegreeLevel::detect("Bachelorette party planner"), None);
        assert_eq!(
            DegreeLevel::detect("Master's in Data Science"),
            Some(DegreeLevel::Master)
        );
        assert_eq!(DegreeLevel::detect("Masters degree"), Some(DegreeLevel::Master));
    }

    #[test]
    fn test_mba_is_uppercased() {
        let a = analyze_resume("Holds an MBA from Wharton");
        assert_eq!(a.education, vec!["MBA"]);
        assert_eq!(a.highest_degree, Some(DegreeLevel::Master));
    }

    #[test]
    fn test_degree_level_detect_takes_highest() {
        assert_eq!(
            DegreeLevel::detect("Bachelor's required, PhD preferred"),
            Some(DegreeLevel::Doctorate)
        );
        assert_eq!(DegreeLevel::detect("no formal requirement"), None);
    }

    #[test]
    fn test_year_range_is_not_a_phone() {
        let a = analyze_resume("Acme 2016-2019");
        assert!(a.phone.is_none());
    }

    #[test]
    fn test_render_contains_labels() {
        let rendered = analyze_resume(RESUME).render();
        assert!(rendered.contains("DETECTED SKILLS: python"));
        assert!(rendered.contains("EXPERIENCE: 7+ years"));
        assert!(rendered.contains("FULL TEXT:"));
    }
}
