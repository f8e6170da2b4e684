//! Interview question sets and scorecards.
//!
//! `generate_interview_package` asks the LLM for tailored questions; the
//! template kit built here is what recruiters get when that call fails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::{FAIRNESS_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::job::Requirement;
use crate::screening::prompts::INTERVIEW_PACKAGE_PROMPT;

const QUESTIONS_PER_SKILL: usize = 2;
const MIN_TECHNICAL_QUESTIONS: usize = 3;
const BEHAVIORAL_QUESTIONS: usize = 4;
const MAX_GAP_SKILLS: usize = 3;
const SCORECARD_SKILLS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    #[default]
    Mixed,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Mixed => "mixed",
        }
    }

    fn includes_technical(&self) -> bool {
        matches!(self, InterviewType::Technical | InterviewType::Mixed)
    }

    fn includes_behavioral(&self) -> bool {
        matches!(self, InterviewType::Behavioral | InterviewType::Mixed)
    }
}

impl FromStr for InterviewType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" => Ok(InterviewType::Behavioral),
            "mixed" => Ok(InterviewType::Mixed),
            other => Err(AppError::Validation(format!(
                "Unknown interview type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Question templates
// ────────────────────────────────────────────────────────────────────────────

fn skill_questions(skill: &str) -> &'static [&'static str] {
    match skill {
        "python" => &[
            "Explain the difference between lists and tuples in Python.",
            "How do you handle exceptions in Python?",
            "What are Python decorators and when would you use them?",
        ],
        "javascript" => &[
            "Explain closures in JavaScript and provide an example.",
            "What is the difference between let, const, and var?",
            "How does the event loop work in JavaScript?",
        ],
        "react" => &[
            "What are React hooks and how do they work?",
            "How do you optimize performance in a React application?",
            "How do you decide where a piece of state should live?",
        ],
        "sql" => &[
            "Explain the difference between INNER JOIN and LEFT JOIN.",
            "How would you optimize a slow database query?",
            "What is database normalization and when would you break it?",
        ],
        "aws" => &[
            "When would you choose Lambda over EC2?",
            "How would you design a highly available architecture on AWS?",
            "How do you choose between S3 storage classes?",
        ],
        "docker" => &[
            "What is the difference between a Docker image and a container?",
            "How do you keep Docker images small for production?",
            "How do containers on the same host communicate?",
        ],
        _ => &[],
    }
}

const DEFAULT_TECHNICAL: &[&str] = &[
    "Describe a challenging technical problem you solved recently.",
    "How do you approach debugging complex issues?",
    "Walk me through your development workflow.",
];

const BEHAVIORAL: &[&str] = &[
    "Tell me about a time you had to meet a tight deadline. How did you handle it?",
    "Describe a disagreement with a team member and how you resolved it.",
    "Give an example of when you had to learn a new technology quickly.",
    "Tell me about a project you're most proud of and why.",
    "Describe a time you received critical feedback. How did you respond?",
    "How do you prioritize when you have several deadlines at once?",
];

const CLOSING: &[&str] = &[
    "What questions do you have about the role or team?",
    "What are you looking for in your next position?",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestions {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub behavioral: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub closing: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
}

impl InterviewQuestions {
    fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.behavioral.is_empty() && self.skill_gaps.is_empty()
    }
}

/// Required skills the candidate does not list, in requirement order.
fn missing_required(requirements: &[Requirement], candidate_skills: &[String]) -> Vec<String> {
    let have: Vec<String> = candidate_skills.iter().map(|s| s.trim().to_lowercase()).collect();
    requirements
        .iter()
        .filter(|r| r.required)
        .map(|r| r.skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty() && !have.contains(skill))
        .collect()
}

pub fn build_interview_kit(
    requirements: &[Requirement],
    candidate_skills: &[String],
    interview_type: InterviewType,
) -> InterviewQuestions {
    let mut kit = InterviewQuestions::default();

    if interview_type.includes_technical() {
        for req in requirements {
            let skill = req.skill.trim().to_lowercase();
            for q in skill_questions(&skill).iter().take(QUESTIONS_PER_SKILL) {
                if !kit.technical.iter().any(|t| t == q) {
                    kit.technical.push(q.to_string());
                }
            }
        }
        if kit.technical.len() < MIN_TECHNICAL_QUESTIONS {
            kit.technical
                .extend(DEFAULT_TECHNICAL.iter().map(|q| q.to_string()));
        }
    }

    if interview_type.includes_behavioral() {
        kit.behavioral = BEHAVIORAL
            .iter()
            .take(BEHAVIORAL_QUESTIONS)
            .map(|q| q.to_string())
            .collect();
    }

    for skill in missing_required(requirements, candidate_skills)
        .iter()
        .take(MAX_GAP_SKILLS)
    {
        kit.skill_gaps
            .push(format!("How would you approach learning {skill}? What's your plan?"));
        kit.skill_gaps.push(format!(
            "Do you have any related experience that could help you pick up {skill}?"
        ));
    }

    kit.closing = CLOSING.iter().map(|q| q.to_string()).collect();
    kit
}

// ────────────────────────────────────────────────────────────────────────────
// Scorecard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingLevel {
    pub score: u8,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub rating_scale: Vec<RatingLevel>,
    pub technical_skills: Vec<String>,
    pub competencies: Vec<&'static str>,
    pub cultural_fit: Vec<&'static str>,
    pub recommendation_options: Vec<&'static str>,
}

pub fn build_scorecard(requirements: &[Requirement]) -> Scorecard {
    let rating_scale = [
        (1, "Does not meet requirements"),
        (2, "Partially meets requirements"),
        (3, "Meets requirements"),
        (4, "Exceeds requirements"),
        (5, "Exceptional"),
    ]
    .into_iter()
    .map(|(score, label)| RatingLevel { score, label })
    .collect();

    Scorecard {
        rating_scale,
        technical_skills: requirements
            .iter()
            .take(SCORECARD_SKILLS)
            .map(|r| r.skill.clone())
            .collect(),
        competencies: vec![
            "Problem Solving",
            "Communication",
            "Technical Knowledge",
            "Learning Ability",
            "Team Collaboration",
        ],
        cultural_fit: vec![
            "Alignment with company values",
            "Enthusiasm for the role",
            "Career goals alignment",
        ],
        recommendation_options: vec!["Strong Hire", "Hire", "No Hire", "Strong No Hire"],
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Package
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageSource {
    Llm,
    Template,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewPackage {
    pub source: PackageSource,
    pub interview_type: InterviewType,
    pub questions: InterviewQuestions,
    pub scorecard: Scorecard,
}

fn build_prompt(
    job_description: &str,
    requirements: &[Requirement],
    candidate_skills: &[String],
    interview_type: InterviewType,
) -> String {
    let requirements_json = serde_json::to_string(requirements).unwrap_or_else(|_| "[]".to_string());
    let skills_json = serde_json::to_string(candidate_skills).unwrap_or_else(|_| "[]".to_string());
    INTERVIEW_PACKAGE_PROMPT
        .replace("{fairness}", FAIRNESS_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{requirements_json}", &requirements_json)
        .replace("{skills_json}", &skills_json)
        .replace("{interview_type}", interview_type.as_str())
}

/// Never fails: an unusable LLM answer yields the template kit.
pub async fn generate_interview_package(
    llm: &LlmClient,
    job_description: &str,
    requirements: &[Requirement],
    candidate_skills: &[String],
    interview_type: InterviewType,
) -> InterviewPackage {
    let prompt = build_prompt(job_description, requirements, candidate_skills, interview_type);

    let (source, questions) = match llm
        .call_json::<InterviewQuestions>(&prompt, JSON_ONLY_SYSTEM)
        .await
    {
        Ok(questions) if !questions.is_empty() => (PackageSource::Llm, questions),
        Ok(_) => {
            warn!("LLM returned an empty interview package; using template kit");
            (
                PackageSource::Template,
                build_interview_kit(requirements, candidate_skills, interview_type),
            )
        }
        Err(e) => {
            warn!("Interview package generation failed, using template kit: {e}");
            (
                PackageSource::Template,
                build_interview_kit(requirements, candidate_skills, interview_type),
            )
        }
    };

    InterviewPackage {
        source,
        interview_type,
        questions,
        scorecard: build_scorecard(requirements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reqs(skills: &[(&str, bool)]) -> Vec<Requirement> {
        skills
            .iter()
            .map(|(s, required)| Requirement {
                required: *required,
                ..Requirement::required(*s)
            })
            .collect()
    }

    #[test]
    fn test_two_questions_per_known_skill() {
        let kit = build_interview_kit(
            &reqs(&[("Python", true), ("Docker", true)]),
            &["python".to_string(), "docker".to_string()],
            InterviewType::Technical,
        );
        assert_eq!(kit.technical.len(), 4);
        assert!(kit.technical[0].contains("lists and tuples"));
        assert!(kit.behavioral.is_empty());
        assert!(kit.skill_gaps.is_empty());
        assert_eq!(kit.closing.len(), 2);
    }

    #[test]
    fn test_defaults_fill_short_technical_list() {
        let kit = build_interview_kit(&reqs(&[("Cobol", true)]), &[], InterviewType::Mixed);
        assert_eq!(kit.technical, DEFAULT_TECHNICAL);
        assert_eq!(kit.behavioral.len(), 4);
    }

    #[test]
    fn test_gap_questions_cover_at_most_three_required_skills() {
        let requirements = reqs(&[
            ("Go", true),
            ("Rust", true),
            ("Kafka", true),
            ("Terraform", true),
            ("Elixir", true),
            ("GraphQL", false),
        ]);
        let kit = build_interview_kit(&requirements, &["RUST".to_string()], InterviewType::Behavioral);
        assert!(kit.technical.is_empty());
        assert_eq!(kit.skill_gaps.len(), 6);
        assert!(kit.skill_gaps[0].contains("learning go"));
        assert!(kit.skill_gaps.iter().any(|q| q.contains("terraform")));
        assert!(kit.skill_gaps.iter().all(|q| !q.contains("rust")));
        assert!(kit.skill_gaps.iter().all(|q| !q.contains("elixir")));
        assert!(kit.skill_gaps.iter().all(|q| !q.contains("graphql")));
    }

    #[test]
    fn test_scorecard_caps_skills() {
        let requirements = reqs(&[
            ("A", true),
            ("B", true),
            ("C", true),
            ("D", true),
            ("E", true),
            ("F", true),
        ]);
        let card = build_scorecard(&requirements);
        assert_eq!(card.technical_skills, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(card.rating_scale.len(), 5);
        assert_eq!(card.rating_scale[4].label, "Exceptional");
        assert_eq!(card.recommendation_options.len(), 4);
    }

    #[test]
    fn test_prompt_embeds_json_lists() {
        let prompt = build_prompt(
            "Ship things",
            &reqs(&[("Rust", true)]),
            &["rust".to_string()],
            InterviewType::Mixed,
        );
        assert!(prompt.contains(r#""skill":"Rust""#));
        assert!(prompt.contains(r#"["rust"]"#));
        assert!(prompt.contains("Interview Type: mixed"));
    }

    #[test]
    fn test_llm_answer_parses_with_missing_sections() {
        let parsed: InterviewQuestions =
            serde_json::from_str(r#"{"technical": ["Explain ownership."]}"#).unwrap();
        assert_eq!(parsed.technical.len(), 1);
        assert!(parsed.red_flags.is_empty());
        assert!(!parsed.is_empty());
    }

    #[test]
    fn test_interview_type_parse() {
        assert_eq!(
            "Behavioral".parse::<InterviewType>().unwrap(),
            InterviewType::Behavioral
        );
        assert!("panel".parse::<InterviewType>().is_err());
    }
}
