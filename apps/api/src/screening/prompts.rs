// LLM prompt constants for candidate screening, JD work and interview kits.
// Cross-cutting fragments live in llm_client::prompts.

/// System prompt for both screening modes.
pub const SCREENING_SYSTEM: &str = "You are a senior technical recruiter assessing candidates \
    against a specific job. You are strict, objective and evidence-driven. \
    You always start your answer with the MATCH_SCORE and RECOMMENDATION lines you are asked for.";

/// Full screening prompt.
/// Replace: {fairness}, {job_title}, {job_description}, {min_years}, {level},
///          {resume_analysis}, {skill_report}, {experience_report}, {score_format}
pub const FULL_SCREENING_PROMPT: &str = r#"{fairness}

Provide a comprehensive assessment of this candidate for the position "{job_title}".

JOB DESCRIPTION:
{job_description}

Minimum Experience Required: {min_years} years
Experience Level: {level}

RESUME ANALYSIS:
{resume_analysis}

{skill_report}

{experience_report}

SCORING CRITERIA (be strict and objective):
- 90-100: Perfect match. Meets ALL requirements and has relevant experience.
- 75-89: Strong match. Meets most requirements (80%+) with good experience.
- 60-74: Moderate match. Meets some requirements (50-79%) with some gaps.
- 40-59: Weak match. Meets few requirements (<50%) with significant gaps.
- 0-39: Poor match. Does not meet key requirements.

Be realistic and critical. Most candidates should score between 40 and 75.
Only exceptional candidates who match MOST requirements should score above 80.
Missing required skills should significantly lower the score.

{score_format}"#;

/// Quick screening prompt. Replace: {fairness}, {resume_text}, {requirements}, {min_years}, {score_format}
pub const QUICK_SCREENING_PROMPT: &str = r#"{fairness}

You are screening a candidate. Analyze their resume against the job requirements.

RESUME TEXT:
{resume_text}

JOB REQUIREMENTS:
{requirements}

MINIMUM EXPERIENCE: {min_years} years

For each requirement, check if the candidate has it:
- Count MATCHES (clear skill match)
- Count MISSING (skill not found in resume)

SCORING RULES:
- Score = (matches / total_requirements) * 80 + 20
- Deduct points for missing REQUIRED skills
- Most candidates should score 40-70

{score_format}
Then list each requirement as MATCH or MISSING with a brief explanation."#;

pub const JD_OPTIMIZE_SYSTEM: &str = "You are a professional job description writer. \
    You output only the improved job description text, with no analysis, \
    suggestions or commentary before or after it.";

/// JD rewrite prompt. Replace: {job_description}, {suggestions}
pub const JD_OPTIMIZE_PROMPT: &str = r#"Take the following job description and create an improved, optimized version.

Improvements to make:
1. Improve clarity and readability
2. Use inclusive, non-biased language
3. Structure it with clear sections
4. Make requirements clear (required vs nice-to-have)
5. Add a compelling company/role value proposition if missing
6. Optimize for searchability with relevant keywords

Automated review findings to address:
{suggestions}

Original Job Description:
---
{job_description}
---

OUTPUT ONLY THE IMPROVED JOB DESCRIPTION TEXT."#;

/// Requirement extraction prompt. Replace: {job_description}
pub const EXTRACT_REQUIREMENTS_PROMPT: &str = r#"Extract every skill requirement from this job description.

Return a JSON array with this EXACT schema:
[
  {"skill": "Python", "level": "advanced", "required": true},
  {"skill": "GraphQL", "level": "intermediate", "required": false}
]

Rules:
- "level" is one of: "entry", "intermediate", "advanced", "expert"
- "required" is false only for nice-to-have items ("preferred", "bonus", "plus")
- Use short canonical skill names ("Kubernetes", not "experience running Kubernetes clusters")

JOB DESCRIPTION:
{job_description}"#;

/// Interview package prompt.
/// Replace: {fairness}, {job_description}, {requirements_json}, {skills_json}, {interview_type}
pub const INTERVIEW_PACKAGE_PROMPT: &str = r#"{fairness}

Generate tailored interview questions for this candidate.

JOB DESCRIPTION:
{job_description}

Job Requirements: {requirements_json}
Candidate Skills: {skills_json}
Interview Type: {interview_type}

Create questions that:
1. Assess technical competency in required skills
2. Identify skill gaps and ability to learn
3. Evaluate problem-solving approach
4. Understand past experiences and achievements
5. Assess soft skills and ways of working

Return a JSON object with this EXACT schema:
{
  "technical": ["..."],
  "behavioral": ["..."],
  "skill_gaps": ["..."],
  "closing": ["..."],
  "red_flags": ["..."]
}"#;
