//! Chat-completions client for the external suggestion service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AnalyzerConfig;
use crate::testcases::SuggestionService;

const SYSTEM_PROMPT: &str =
    "You are a testing expert. Reply only with a bracketed list of Python argument tuples.";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("request failed: {msg}")]
    Transport { msg: String },
    #[error("suggestion service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed suggestion reply: {msg}")]
    MalformedReply { msg: String },
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// OpenAI-style client over a blocking agent with a request timeout.
pub struct OpenAiSuggester {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiSuggester {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

impl SuggestionService for OpenAiSuggester {
    fn complete(&self, prompt: &str) -> Result<String, SuggestError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                RequestMessage { role: "system", content: SYSTEM_PROMPT },
                RequestMessage { role: "user", content: prompt },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| SuggestError::Transport { msg: format!("failed to encode request: {e}") })?;

        let url = format!("{}/chat/completions", self.endpoint);
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| match e {
                ureq::Error::Status(status, response) => SuggestError::Status {
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                other => SuggestError::Transport { msg: other.to_string() },
            })?;

        let text = response.into_string().map_err(|e| SuggestError::Transport {
            msg: format!("failed to read response: {e}"),
        })?;
        parse_reply(&text)
    }
}

fn parse_reply(text: &str) -> Result<String, SuggestError> {
    let reply: ChatReply = serde_json::from_str(text)
        .map_err(|e| SuggestError::MalformedReply { msg: e.to_string() })?;
    reply
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| SuggestError::MalformedReply { msg: "reply carries no choices".into() })
}
