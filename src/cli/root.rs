use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::Config;

use super::chat::ChatCommand;
use super::interview::InterviewCommand;
use super::simulate::SimulateCommand;

/// surveysim - terminal surveys driven by an LLM chat API
#[derive(Parser)]
#[command(
    name = "surveysim",
    version,
    about = "Simulate, conduct, and evaluate LLM-driven surveys from the terminal",
    long_about = r#"surveysim drives a chat-completion API through survey conversations:
a generator asks questions, a respondent (simulated or human) answers, and
an evaluator reviews what was collected.

Examples:
  surveysim simulate                      # interactive topic + batch size
  surveysim simulate -t "coffee" -n 3     # three simulated conversations
  surveysim interview                     # guided setup, you answer
  surveysim chat                          # switch between respondent and analyst"#
)]
pub struct Cli {
    /// Override the configured model
    #[arg(short = 'm', long = "model", global = true)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run simulated conversations and evaluate the batch
    Simulate(SimulateCommand),
    /// Conduct a guided survey with you as the respondent
    Interview(InterviewCommand),
    /// Role-switching surveyed-user / analyst session
    Chat(ChatCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let mut config = Config::init().await?;
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        debug!("Configuration initialized");

        // Missing credentials are a startup error, before any prompt is shown
        config.validate()?;

        match self.command {
            Commands::Simulate(cmd) => cmd.execute(&config).await,
            Commands::Interview(cmd) => cmd.execute(&config).await,
            Commands::Chat(cmd) => cmd.execute(&config).await,
        }
    }
}
