use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Config error: {msg}")]
    Config { msg: String },

    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Suggestion error: {msg}")]
    Suggest { msg: String },

    #[error("Probe error: {msg}")]
    Probe { msg: String },

    #[error("Module load error: {msg}")]
    ModuleLoad { msg: String },

    #[error("IO error: {msg}")]
    Io { msg: String, path: PathBuf },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config { msg: msg.into() }
    }

    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn suggest(msg: impl Into<String>) -> Self {
        Self::Suggest { msg: msg.into() }
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe { msg: msg.into() }
    }

    pub fn module_load(msg: impl Into<String>) -> Self {
        Self::ModuleLoad { msg: msg.into() }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    /// The bare failure text, without the variant prefix.
    ///
    /// Used when a per-call failure is reported inside a result row rather
    /// than on stderr.
    pub fn plain_message(&self) -> String {
        match self {
            Self::Config { msg }
            | Self::Syntax { msg, .. }
            | Self::Suggest { msg }
            | Self::Probe { msg }
            | Self::ModuleLoad { msg }
            | Self::Io { msg, .. } => msg.clone(),
            Self::Json(err) => err.to_string(),
        }
    }
}

/// Render an AnalyzeError with ariadne for nice terminal output.
pub fn render_error(source: &str, err: &AnalyzeError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        AnalyzeError::Syntax { msg, span } => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message("syntax error")
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .eprint(Source::from(source))
                .ok();
        }
        AnalyzeError::Io { msg, path } => {
            eprintln!("error: {msg}");
            eprintln!("  --> {}", path.display());
        }
        other => {
            eprintln!("error: {other}");
        }
    }
}
