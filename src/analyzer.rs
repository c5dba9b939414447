//! Analysis orchestration.
//!
//! Fixed stage order: branch inventory, dead code, candidate synthesis,
//! probe execution, report assembly.

use std::fs;
use std::path::Path;

use crate::branches::extract_branches;
use crate::config::AnalyzerConfig;
use crate::coverage;
use crate::deadcode;
use crate::diagnostics::AnalyzeError;
use crate::report::{AnalysisResult, BranchRecord, DeadCodeResults};
use crate::source::SourceUnit;
use crate::suggest::OpenAiSuggester;
use crate::testcases::{self, SuggestionService};

pub struct Analyzer {
    service: Box<dyn SuggestionService>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}

impl Analyzer {
    /// Rejects an empty credential up front rather than failing on the
    /// first request.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzeError> {
        if config.api_key.trim().is_empty() {
            return Err(AnalyzeError::config("api_key must not be empty"));
        }
        Ok(Self { service: Box::new(OpenAiSuggester::new(&config)) })
    }

    /// Seam for tests and alternate suggestion backends.
    pub fn with_service(service: Box<dyn SuggestionService>) -> Self {
        Self { service }
    }

    /// Run the full pipeline over one function's source. Never fails:
    /// degraded stages report through the result instead.
    pub fn analyze(&self, code: &str) -> AnalysisResult {
        let unit = SourceUnit::from_source(code);
        let branches = extract_branches(&unit);
        let dead = deadcode::detect(&unit);
        let cases = testcases::synthesize(&unit, &branches, self.service.as_ref());
        let (coverage, test_cases) = coverage::run(&unit, &cases);
        AnalysisResult {
            function_name: unit.name.clone(),
            test_cases,
            coverage,
            dead_code: DeadCodeResults::from_instances(&dead),
            branches_found: branches.iter().map(BranchRecord::from).collect(),
        }
    }

    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, AnalyzeError> {
        let code = fs::read_to_string(path).map_err(|e| {
            AnalyzeError::io(
                format!("could not read {}: {e}", path.display()),
                path.to_path_buf(),
            )
        })?;
        Ok(self.analyze(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::SuggestError;

    struct Canned(&'static str);

    impl SuggestionService for Canned {
        fn complete(&self, _prompt: &str) -> Result<String, SuggestError> {
            Ok(self.0.to_string())
        }
    }

    const CLAMP: &str = "def clamp(n):\n    if n > 10:\n        return 10\n    if n < 0:\n        return 0\n    return n\n";

    #[test]
    fn empty_api_key_is_rejected() {
        let err = Analyzer::new(AnalyzerConfig::new("  ")).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn construction_does_not_touch_the_network() {
        // Bad endpoint on purpose; only complete() would notice.
        let mut config = AnalyzerConfig::new("sk-test");
        config.endpoint = "http://localhost:1".into();
        assert!(Analyzer::new(config).is_ok());
    }

    #[test]
    fn full_pipeline_with_canned_suggestions() {
        let analyzer = Analyzer::with_service(Box::new(Canned("[(99,), (-5,), (5,)]")));
        let result = analyzer.analyze(CLAMP);

        assert_eq!(result.function_name, "clamp");
        assert_eq!(result.test_cases.total, 3);
        assert_eq!(result.test_cases.passed, 3);
        assert_eq!(result.coverage.percentage, 100);
        assert!(!result.dead_code.found);
        // Two ifs, each reported as a true and a negated false record.
        assert_eq!(result.branches_found.len(), 4);
        assert_eq!(result.branches_found[0].branch_type, "if");
        assert_eq!(result.branches_found[1].branch_type, "else");
    }

    #[test]
    fn dead_code_flows_into_the_report() {
        let src = "def f(n):\n    return n\n    n += 1\n";
        let analyzer = Analyzer::with_service(Box::new(Canned("[(1,)]")));
        let result = analyzer.analyze(src);
        assert!(result.dead_code.found);
        assert_eq!(result.dead_code.instances[0].line, 3);
        assert_eq!(
            result.dead_code.instances[0].reason,
            "Unreachable code after return statement"
        );
    }

    #[test]
    fn unparseable_source_still_produces_a_report() {
        let src = "def weird(n):\n    if n > 0:\n        return [x for x in range(n)]\n    return []\n";
        let analyzer = Analyzer::with_service(Box::new(Canned("[(1,)]")));
        let result = analyzer.analyze(src);

        assert_eq!(result.function_name, "weird");
        // The comprehension keeps the tree tier out; the text scan still
        // finds the branch pair.
        assert_eq!(result.branches_found.len(), 2);
        assert_eq!(result.coverage.percentage, 0);
        assert_eq!(result.test_cases.passed, 0);
    }

    #[test]
    fn analyze_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.py");
        std::fs::write(&path, CLAMP).unwrap();
        let analyzer = Analyzer::with_service(Box::new(Canned("[(1,)]")));
        let result = analyzer.analyze_file(&path).unwrap();
        assert_eq!(result.function_name, "clamp");
    }

    #[test]
    fn analyze_file_missing_path_is_an_io_error() {
        let analyzer = Analyzer::with_service(Box::new(Canned("[]")));
        let err = analyzer.analyze_file(Path::new("/nonexistent/probe.py")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }
}
