use std::process::Command;

use funcov::suggest::SuggestError;
use funcov::testcases::SuggestionService;

pub fn funcov() -> Command {
    Command::new(env!("CARGO_BIN_EXE_funcov"))
}

/// Suggestion stub that always replies with the same text.
pub struct Canned(pub &'static str);

impl SuggestionService for Canned {
    fn complete(&self, _prompt: &str) -> Result<String, SuggestError> {
        Ok(self.0.to_string())
    }
}

/// Suggestion stub that fails like an unreachable endpoint.
pub struct Offline;

impl SuggestionService for Offline {
    fn complete(&self, _prompt: &str) -> Result<String, SuggestError> {
        Err(SuggestError::Transport { msg: "connection refused".into() })
    }
}
