//! Candidate screening: resume heuristics, scoring backends, the persistence
//! pipeline and its background queue.

pub mod experience;
pub mod extract;
pub mod handlers;
pub mod interview_kit;
pub mod job_analyzer;
pub mod pipeline;
pub mod prompts;
pub mod queue;
pub mod resume_analyzer;
pub mod score_extract;
pub mod screener;
pub mod skill_match;
pub mod stats;
pub mod vocabulary;
