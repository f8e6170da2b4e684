pub mod candidate;
pub mod interview;
pub mod job;
