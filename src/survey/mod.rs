//! Survey simulation: prompts, transcripts, and turn-taking loops
//!
//! The three conversation roles are a surveyor (question generator), a
//! respondent (human or simulated), and an evaluator/analyst reviewing
//! what was collected.

pub mod brief;
pub mod prompts;
pub mod runner;
pub mod transcript;

pub use brief::{SurveyBrief, SETUP_QUESTIONS};
pub use runner::{RunnerOptions, SeedQueue, SurveyRunner};
pub use transcript::{ResponseLog, Speaker, Transcript, Turn};
