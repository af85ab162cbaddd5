//! Turn-taking loops between the survey roles
//!
//! The runner drives a provider through the generator/respondent exchange,
//! applies the question cap and end sentinel, and issues the evaluation and
//! analysis calls. All conversation state lives in memory for one run.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::llm::{ChatRequest, CompletionResponse, LlmProvider, Message, TokenUsage};

use super::prompts;
use super::transcript::{is_end_sentinel, render_batch, ResponseLog, Transcript};

/// Knobs for the turn-taking loops
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Maximum generated questions per simulated conversation
    pub max_questions: usize,
    /// Delay after each successful call to reduce call frequency
    pub pacing: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            max_questions: 10,
            pacing: Duration::from_secs(1),
        }
    }
}

/// Drives survey conversations over an LLM provider
pub struct SurveyRunner {
    provider: Arc<dyn LlmProvider>,
    options: RunnerOptions,
    usage: Mutex<TokenUsage>,
}

impl SurveyRunner {
    pub fn new(provider: Arc<dyn LlmProvider>, options: RunnerOptions) -> Self {
        Self {
            provider,
            options,
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    /// Token usage accumulated across all calls made by this runner.
    pub fn usage(&self) -> TokenUsage {
        self.usage
            .lock()
            .map(|usage| usage.clone())
            .unwrap_or_default()
    }

    async fn complete(&self, request: ChatRequest) -> Result<CompletionResponse> {
        let response = self.provider.chat_completion(request).await?;
        debug!("completion: {} tokens", response.usage.total_tokens);
        if let Ok(mut usage) = self.usage.lock() {
            usage.add(&response.usage);
        }
        Ok(response)
    }

    /// Generates the next survey question from the accumulated history.
    ///
    /// The reply is appended to `history` as an assistant turn.
    pub async fn next_question(
        &self,
        surveyor_prompt: &str,
        history: &mut Vec<Message>,
    ) -> Result<String> {
        let request = ChatRequest::with_system(surveyor_prompt, history.clone());
        let response = self.complete(request).await?;

        history.push(Message::new_assistant(response.content.clone()));
        self.pace().await;
        Ok(response.content)
    }

    /// Answers a single question as the simulated respondent.
    ///
    /// Each answer is independent; the respondent sees only the current
    /// question.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let request = ChatRequest::with_system(
            prompts::RESPONDENT_SYSTEM_PROMPT,
            vec![Message::new_assistant(question.to_string())],
        );
        let response = self.complete(request).await?;
        self.pace().await;
        Ok(response.content)
    }

    /// Runs one generator-vs-respondent conversation, printing turns as they
    /// happen.
    ///
    /// Stops when `max_questions` questions have been asked or the generator
    /// replies with the end sentinel, whichever comes first. A sentinel reply
    /// is not recorded as a turn.
    pub async fn run_simulated_conversation(&self, surveyor_prompt: &str) -> Result<Transcript> {
        let mut history = Vec::new();
        let mut transcript = Transcript::new();

        while transcript.question_count() < self.options.max_questions {
            let question = self.next_question(surveyor_prompt, &mut history).await?;
            if is_end_sentinel(&question) {
                println!("\nBot 1 (Survey Generator): End of survey reached.");
                break;
            }

            println!("\nBot 1 (Survey Generator): {}", question);
            let answer = self.answer(&question).await?;
            println!("Bot 2 (Respondent): {}", answer);

            history.push(Message::new_user(answer.clone()));
            transcript.push_question(question);
            transcript.push_answer(answer);
        }

        Ok(transcript)
    }

    /// Evaluates a single conversation transcript.
    pub async fn evaluate_transcript(&self, transcript: &Transcript) -> Result<String> {
        let request = ChatRequest::with_system(
            prompts::EVALUATOR_SYSTEM_PROMPT,
            vec![Message::new_user(transcript.render())],
        );
        let response = self.complete(request).await?;
        Ok(response.content)
    }

    /// Produces one consolidated evaluation over a batch of conversations.
    pub async fn evaluate_batch(&self, transcripts: &[Transcript]) -> Result<String> {
        let rendered = render_batch(transcripts);
        let request = ChatRequest::with_system(
            prompts::EVALUATOR_SYSTEM_PROMPT,
            vec![Message::new_user(prompts::build_batch_evaluation_request(
                &rendered,
            ))],
        );
        let response = self.complete(request).await?;
        Ok(response.content)
    }

    /// Replies to the surveyed user with the full running history.
    pub async fn survey_reply(&self, history: &[Message]) -> Result<String> {
        let request =
            ChatRequest::with_system(prompts::SURVEYED_CHAT_SYSTEM_PROMPT, history.to_vec());
        let response = self.complete(request).await?;
        Ok(response.content)
    }

    /// Analyzes the collected responses for the analyst role.
    pub async fn analyze(&self, request_text: &str, log: &ResponseLog) -> Result<String> {
        let prompt = prompts::build_analysis_request(request_text, &log.render_numbered());
        let request = ChatRequest::with_system(
            prompts::ANALYST_SYSTEM_PROMPT,
            vec![Message::new_user(prompt)],
        );
        let response = self.complete(request).await?;
        Ok(response.content)
    }

    async fn pace(&self) {
        if !self.options.pacing.is_zero() {
            tokio::time::sleep(self.options.pacing).await;
        }
    }
}

/// User-supplied questions interleaved into the generated sequence
#[derive(Debug, Clone, Default)]
pub struct SeedQueue {
    questions: VecDeque<String>,
}

impl SeedQueue {
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions: questions.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Pops the next seed question when one is due.
    ///
    /// A seed is due on every third history entry, counting the empty
    /// history as due.
    pub fn next_due(&mut self, history_len: usize) -> Option<String> {
        if self.questions.is_empty() || history_len % 3 != 0 {
            return None;
        }
        self.questions.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, LlmResult, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider returning canned replies in order, then the sentinel.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat_completion(&self, request: ChatRequest) -> LlmResult<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "END SURVEY".to_string());
            Ok(CompletionResponse {
                content,
                usage: TokenUsage {
                    input_tokens: 3,
                    output_tokens: 2,
                    total_tokens: 5,
                },
                finish_reason: None,
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        fn validate_config(&self) -> LlmResult<()> {
            Ok(())
        }
    }

    fn runner_with(provider: Arc<ScriptedProvider>, max_questions: usize) -> SurveyRunner {
        SurveyRunner::new(
            provider,
            RunnerOptions {
                max_questions,
                pacing: Duration::ZERO,
            },
        )
    }

    #[tokio::test]
    async fn test_conversation_stops_on_sentinel() {
        let provider = Arc::new(ScriptedProvider::new(&["Q1?", "A1", "Thanks! END SURVEY"]));
        let runner = runner_with(provider, 10);
        let transcript = runner.run_simulated_conversation("prompt").await.unwrap();
        assert_eq!(transcript.question_count(), 1);
        assert_eq!(transcript.turns().len(), 2);
    }

    #[tokio::test]
    async fn test_conversation_stops_at_question_cap() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Q1?", "A1", "Q2?", "A2", "Q3?", "A3",
        ]));
        let runner = runner_with(provider, 2);
        let transcript = runner.run_simulated_conversation("prompt").await.unwrap();
        assert_eq!(transcript.question_count(), 2);
        assert_eq!(transcript.turns().len(), 4);
    }

    #[tokio::test]
    async fn test_usage_accumulates_across_calls() {
        let provider = Arc::new(ScriptedProvider::new(&["Q1?", "A1", "END SURVEY"]));
        let runner = runner_with(provider, 10);
        runner.run_simulated_conversation("prompt").await.unwrap();

        // three provider calls at 5 tokens each
        let usage = runner.usage();
        assert_eq!(usage.total_tokens, 15);
        assert_eq!(usage.input_tokens, 9);
    }

    #[tokio::test]
    async fn test_next_question_appends_assistant_turn() {
        let provider = Arc::new(ScriptedProvider::new(&["What do you drink?"]));
        let runner = runner_with(provider, 10);
        let mut history = Vec::new();
        let question = runner.next_question("prompt", &mut history).await.unwrap();
        assert_eq!(question, "What do you drink?");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "What do you drink?");
    }

    #[tokio::test]
    async fn test_answers_feed_back_into_surveyor_history() {
        let provider = Arc::new(ScriptedProvider::new(&["Q1?", "A1", "Q2?", "A2"]));
        let runner = runner_with(provider.clone(), 2);
        runner.run_simulated_conversation("prompt").await.unwrap();

        // the second surveyor request carries the first answer as a user turn
        let requests = provider.requests.lock().unwrap();
        let second_surveyor = &requests[2];
        assert!(second_surveyor
            .messages
            .iter()
            .any(|m| m.content == "A1"));
    }

    #[tokio::test]
    async fn test_respondent_is_stateless() {
        let provider = Arc::new(ScriptedProvider::new(&["A1"]));
        let runner = runner_with(provider.clone(), 10);
        runner.answer("Q1?").await.unwrap();

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].content, "Q1?");
    }

    #[test]
    fn test_seed_queue_mod3() {
        let mut queue = SeedQueue::new(vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(queue.next_due(0).as_deref(), Some("s1"));
        assert_eq!(queue.next_due(1), None);
        assert_eq!(queue.next_due(2), None);
        assert_eq!(queue.next_due(3).as_deref(), Some("s2"));
        // exhausted
        assert_eq!(queue.next_due(6), None);
        assert!(queue.is_empty());
    }
}
