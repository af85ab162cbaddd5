mod chat;
mod interview;
mod root;
mod simulate;

pub use root::Cli;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{ProviderClientOptions, ProviderConfig, ProviderFactory};
use crate::survey::{RunnerOptions, SurveyRunner};

/// Builds the provider and runner shared by the subcommands.
pub(crate) fn runner_from_config(config: &Config, max_questions: Option<usize>) -> Result<SurveyRunner> {
    let provider_config = ProviderConfig {
        provider_type: config.provider.clone(),
        api_key: config.api_key.clone(),
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
    };

    let client_options = ProviderClientOptions {
        rate_limit_delay: Duration::from_secs(config.rate_limit_delay_secs),
        ..ProviderClientOptions::default()
    };

    let provider = ProviderFactory::create_provider(provider_config, client_options)?;
    provider.validate_config()?;

    let options = RunnerOptions {
        max_questions: max_questions.unwrap_or_else(|| RunnerOptions::default().max_questions),
        pacing: Duration::from_millis(config.pacing_delay_ms),
    };

    Ok(SurveyRunner::new(Arc::from(provider), options))
}
