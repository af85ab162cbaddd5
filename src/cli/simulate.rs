use anyhow::{anyhow, Result};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::survey::prompts;
use crate::utils::console;

/// Run simulated generator-vs-respondent conversations and evaluate the batch
#[derive(Args)]
pub struct SimulateCommand {
    /// Survey topic and objective. Prompts interactively if omitted
    #[arg(short = 't', long = "topic")]
    pub topic: Option<String>,

    /// Number of conversations to run. Prompts interactively if omitted
    #[arg(short = 'n', long = "count")]
    pub count: Option<usize>,

    /// Maximum generated questions per conversation
    #[arg(long = "max-questions", default_value_t = 10)]
    pub max_questions: usize,

    /// Also evaluate each conversation on its own
    #[arg(long = "eval-each")]
    pub eval_each: bool,
}

impl SimulateCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        println!("Welcome to the Survey Simulation!");

        let topic = match &self.topic {
            Some(topic) => topic.clone(),
            None => {
                println!("Bot 1: Welcome! Before we begin, could you specify the topic and objective of this survey?");
                console::prompt_line("\nYour response (2-3 sentences about the topic and objective): ")?
            }
        };
        if topic.trim().is_empty() {
            return Err(anyhow!("No topic provided."));
        }

        let count = match self.count {
            Some(count) if count > 0 => count,
            Some(_) => return Err(anyhow!("--count must be a positive integer")),
            None => {
                console::prompt_positive_int("\nHow many conversations would you like to generate? ")?
            }
        };

        info!("Running {} conversation(s) on topic: {}", count, topic);

        let runner = super::runner_from_config(config, Some(self.max_questions))?;
        let surveyor_prompt = prompts::build_surveyor_prompt(&topic);

        let mut transcripts = Vec::with_capacity(count);
        for i in 0..count {
            println!("\n--- Running Conversation {} ---", i + 1);
            let transcript = runner.run_simulated_conversation(&surveyor_prompt).await?;

            if self.eval_each && !transcript.is_empty() {
                let evaluation = runner.evaluate_transcript(&transcript).await?;
                println!("\n--- Evaluation of Conversation {} ---", i + 1);
                println!("{}", evaluation);
            }

            transcripts.push(transcript);
        }

        let evaluation = runner.evaluate_batch(&transcripts).await?;
        println!("\n--- Consolidated Evaluation ---");
        println!("{}", evaluation);

        let usage = runner.usage();
        info!(
            "Total token usage: {} input, {} output",
            usage.input_tokens, usage.output_tokens
        );

        Ok(())
    }
}
