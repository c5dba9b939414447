pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod branches;
pub mod deadcode;
pub mod literal;
pub mod testcases;
pub mod suggest;
pub mod interp;
pub mod sandbox;
pub mod coverage;
pub mod report;
pub mod config;
pub mod analyzer;

use std::path::Path;

use analyzer::Analyzer;
use config::AnalyzerConfig;
use diagnostics::AnalyzeError;
use report::AnalysisResult;
use testcases::SuggestionService;

/// Analyze a function's source with a caller-supplied suggestion service
/// (parse → branch inventory → dead code → candidate synthesis → probe runs → report).
/// Performs no environment or network access of its own. Useful for tests
/// that stub the suggestion backend.
pub fn analyze_with(source: &str, service: Box<dyn SuggestionService>) -> AnalysisResult {
    Analyzer::with_service(service).analyze(source)
}

/// Analyze a Python file end to end, reading the API key and optional
/// overrides from the environment and `funcov.toml`.
pub fn analyze_file(path: &Path) -> Result<AnalysisResult, AnalyzeError> {
    let config = AnalyzerConfig::from_env()?;
    let analyzer = Analyzer::new(config)?;
    analyzer.analyze_file(path)
}
