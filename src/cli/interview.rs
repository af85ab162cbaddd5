use anyhow::{anyhow, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::llm::Message;
use crate::survey::transcript::is_end_sentinel;
use crate::survey::{prompts, SeedQueue, SurveyBrief, SETUP_QUESTIONS};
use crate::utils::console;

/// Conduct a guided survey: five setup questions, then you answer
#[derive(Args)]
pub struct InterviewCommand {}

impl InterviewCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        println!("Welcome to the Survey Simulation!");

        let mut answers = Vec::with_capacity(SETUP_QUESTIONS.len());
        for (idx, question) in SETUP_QUESTIONS.iter().enumerate() {
            println!("Bot 1: {}", question);
            let answer =
                console::prompt_line(&format!("Your response to Question {}: ", idx + 1))?;
            answers.push(answer);
        }
        let answers: [String; 5] = answers
            .try_into()
            .map_err(|_| anyhow!("Expected five setup answers"))?;

        let brief = SurveyBrief::from_answers(answers);
        info!(
            "Starting guided interview on topic: {} ({} seed question(s))",
            brief.topic,
            brief.seed_questions.len()
        );

        let mut seeds = SeedQueue::new(brief.seed_questions.clone());
        let surveyor_prompt = prompts::build_guided_surveyor_prompt(&brief);
        let runner = super::runner_from_config(config, None)?;

        // Human respondent: the loop runs until the generator ends the survey
        let mut history: Vec<Message> = Vec::new();
        loop {
            let question = match seeds.next_due(history.len()) {
                Some(seed) => {
                    history.push(Message::new_assistant(seed.clone()));
                    seed
                }
                None => runner.next_question(&surveyor_prompt, &mut history).await?,
            };

            if is_end_sentinel(&question) {
                println!("\nBot 1 (Survey Generator): End of survey reached.");
                break;
            }

            println!("\nBot 1 (Survey Generator): {}", question);
            let response = console::prompt_line("Your response: ")?;
            history.push(Message::new_user(response));
        }

        Ok(())
    }
}
