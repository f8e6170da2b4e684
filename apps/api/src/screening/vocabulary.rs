//! Fixed term lists used by the text heuristics, plus boundary-aware term search.

/// Technical skills recognised in resumes.
pub const RESUME_SKILLS: &[&str] = &[
    // Languages
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "golang", "rust", "ruby",
    "scala", "kotlin", "swift", "php",
    // Web
    "react", "angular", "vue", "next.js", "node.js", "express", "django", "flask", "fastapi",
    "spring", "html", "css", "tailwind",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible", "jenkins", "ci/cd",
    "github actions", "linux", "git",
    // Data stores
    "sql", "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb", "cassandra",
    // ML / AI
    "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn", "keras",
    "xgboost", "hugging face", "transformers", "nlp", "computer vision", "opencv",
    "reinforcement learning", "neural network", "llm", "rag", "langchain", "llamaindex",
    "prompt engineering", "fine-tuning", "vector database", "embedding",
    // Data engineering
    "spark", "hadoop", "airflow", "kafka", "etl", "data pipeline", "databricks", "snowflake",
    "pandas", "numpy",
    // MLOps
    "mlflow", "kubeflow", "sagemaker", "mlops",
    // Practices & APIs
    "agile", "scrum", "jira", "rest api", "graphql", "grpc", "microservices", "api design",
    "distributed systems",
];

/// Terms scanned in a job description when the recruiter listed no requirements.
pub const FALLBACK_JOB_SKILLS: &[&str] = &[
    "python", "javascript", "java", "c++", "go", "rust", "typescript",
    "react", "angular", "vue", "node", "django", "flask", "fastapi",
    "aws", "gcp", "azure", "docker", "kubernetes", "terraform",
    "sql", "postgresql", "mongodb", "redis", "elasticsearch",
    "machine learning", "deep learning", "nlp", "computer vision",
    "pytorch", "tensorflow", "scikit-learn", "pandas", "numpy",
    "api", "rest", "graphql", "microservices", "distributed systems",
    "ci/cd", "git", "agile", "scrum", "leadership", "communication",
];

/// Technical skills reported by the job-description analyzer.
pub const JOB_TECH_SKILLS: &[&str] = &[
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust", "ruby", "php",
    "react", "angular", "vue", "svelte", "next.js", "node.js", "express", "django", "flask",
    "fastapi", "spring", "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "ansible",
    "sql", "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb",
    "git", "ci/cd", "jenkins", "github actions", "gitlab",
    "machine learning", "deep learning", "tensorflow", "pytorch", "nlp", "computer vision",
    "html", "css", "sass", "tailwind", "bootstrap",
    "rest api", "graphql", "grpc", "microservices", "kafka", "rabbitmq",
];

pub const SOFT_SKILLS: &[&str] = &[
    "communication", "teamwork", "leadership", "problem-solving", "analytical", "creative",
    "adaptable", "organized", "detail-oriented", "self-motivated", "collaboration",
    "mentoring", "presentation",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "degree", "bs", "ms", "mba", "computer science", "engineering",
];

pub const EXCLUSIVE_TERMS: &[&str] = &["rockstar", "ninja", "guru", "wizard", "young", "energetic"];

pub const BENEFIT_KEYWORDS: &[&str] = &[
    "benefits", "vacation", "pto", "401k", "health", "insurance", "equity", "bonus",
];

pub const CULTURE_KEYWORDS: &[&str] = &["culture", "values", "mission", "team", "environment"];

pub const GROWTH_KEYWORDS: &[&str] = &[
    "growth", "career", "learning", "development", "training", "mentor",
];

/// Returns every vocabulary term present in `text`, in vocabulary order.
pub fn find_terms<'a>(text: &str, vocabulary: &[&'a str]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .copied()
        .filter(|term| contains_term(&lower, term))
        .collect()
}

/// Word-boundary search: `go` matches "Go, Rust" but not "good".
/// `haystack` must already be lowercase.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term.as_str()).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// "machine learning" → "Machine Learning".
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("go, rust and python", "go"));
        assert!(!contains_term("a good engineer", "go"));
        assert!(!contains_term("django developer", "go"));
    }

    #[test]
    fn test_contains_term_handles_symbols() {
        assert!(contains_term("expert in c++ and c#.", "c++"));
        assert!(contains_term("built ci/cd pipelines", "ci/cd"));
        assert!(contains_term("next.js apps", "next.js"));
    }

    #[test]
    fn test_contains_term_finds_later_occurrence() {
        // First "java" is inside "javascript"; the second stands alone.
        assert!(contains_term("javascript and java", "java"));
    }

    #[test]
    fn test_find_terms_keeps_vocabulary_order() {
        let found = find_terms("Worked with Docker, AWS and Python daily", RESUME_SKILLS);
        assert_eq!(found, vec!["python", "aws", "docker"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("ci/cd"), "Ci/cd");
    }
}
