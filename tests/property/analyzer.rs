// Pipeline properties with the suggestion service stubbed offline:
// 1. Analysis never panics on arbitrary text
// 2. Analysis of the same text yields the same report

use proptest::prelude::*;

use funcov::suggest::SuggestError;
use funcov::testcases::SuggestionService;

struct Offline;

impl SuggestionService for Offline {
    fn complete(&self, _prompt: &str) -> Result<String, SuggestError> {
        Err(SuggestError::Transport { msg: "stubbed offline".into() })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn analysis_does_not_panic(source in "\\PC*") {
        let _ = funcov::analyze_with(&source, Box::new(Offline));
    }

    #[test]
    fn analysis_is_deterministic(source in "\\PC*") {
        let first = funcov::analyze_with(&source, Box::new(Offline));
        let second = funcov::analyze_with(&source, Box::new(Offline));
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }
}
