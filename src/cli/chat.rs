use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::llm::Message;
use crate::survey::ResponseLog;
use crate::utils::console;
use crate::version;

/// Interactive session alternating between the surveyed-user and analyst roles
#[derive(Args)]
pub struct ChatCommand {}

/// Active terminal role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    SurveyedUser,
    Analyst,
}

impl Role {
    fn label(&self) -> &'static str {
        match self {
            Role::SurveyedUser => "Surveyed User",
            Role::Analyst => "Analyst",
        }
    }

    fn toggle(&self) -> Self {
        match self {
            Role::SurveyedUser => Role::Analyst,
            Role::Analyst => Role::SurveyedUser,
        }
    }

    fn input_prompt(&self) -> &'static str {
        match self {
            Role::SurveyedUser => "\nSurveyed User Response (or type 'switch' to change role): ",
            Role::Analyst => {
                "\nAnalyst Request (e.g., 'summarize insights so far') (or type 'switch' to change role): "
            }
        }
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        let runner = super::runner_from_config(config, None)?;

        println!("{}", version::full_version());
        println!("Starting the interactive survey terminal. Type 'switch' to change roles or 'exit' to quit.");

        let mut history: Vec<Message> = Vec::new();
        let mut responses = ResponseLog::new();
        let mut role = Role::SurveyedUser;

        loop {
            let line = console::prompt_line(role.input_prompt())?;

            match line.to_lowercase().as_str() {
                "exit" => {
                    println!("Exiting the chat. Goodbye!");
                    break;
                }
                "switch" => {
                    role = role.toggle();
                    println!("\nRole switched to {}.", role.label());
                    continue;
                }
                "" => continue,
                _ => {}
            }

            // API errors are printed and the session continues
            match role {
                Role::SurveyedUser => {
                    history.push(Message::new_user(line.clone()));
                    responses.push(line);

                    match runner.survey_reply(&history).await {
                        Ok(reply) => {
                            println!("\nSurveyor: {}", reply);
                            history.push(Message::new_assistant(reply));
                        }
                        Err(e) => println!("An error occurred with the API: {}", e),
                    }
                }
                Role::Analyst => {
                    if responses.is_empty() {
                        println!("\nNo survey responses collected yet. Switch roles to answer first.");
                        continue;
                    }
                    match runner.analyze(&line, &responses).await {
                        Ok(analysis) => println!("\nAnalysis: {}", analysis),
                        Err(e) => println!("An error occurred with the API: {}", e),
                    }
                }
            }
        }

        Ok(())
    }
}
