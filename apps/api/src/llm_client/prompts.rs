// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that evaluates a person.
pub const FAIRNESS_INSTRUCTION: &str = "\
    Judge only job-relevant evidence found in the provided text. \
    Ignore name, gender, age, nationality, photos and any other protected attribute. \
    Do NOT invent skills or experience the text does not show.";

/// Output contract that the score extractor parses first.
pub const SCORE_FORMAT_INSTRUCTION: &str = "\
    Your output MUST begin with these two lines, exactly in this format:\n\
    MATCH_SCORE: [number between 0-100]\n\
    RECOMMENDATION: [Strong Hire / Hire / Maybe / No Hire]\n\
    Then provide your detailed analysis.";
