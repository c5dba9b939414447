// Property tests for candidate synthesis: the deterministic fallback
// table and the reply-parsing front line.

use proptest::prelude::*;

use funcov::literal::{parse_literal, parse_tuple_list};
use funcov::testcases::{extract_cases, fallback_cases};

fn arb_param_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn fallback_is_deterministic(params in arb_param_names()) {
        prop_assert_eq!(fallback_cases(&params), fallback_cases(&params));
    }

    #[test]
    fn fallback_is_never_empty(params in arb_param_names()) {
        prop_assert!(!fallback_cases(&params).is_empty());
    }

    #[test]
    fn fallback_arity_tracks_parameter_count(params in arb_param_names()) {
        // Zero-parameter functions still get single-value probes.
        let expected = params.len().max(1);
        for case in fallback_cases(&params) {
            prop_assert_eq!(case.args.len(), expected);
        }
    }

    #[test]
    fn fallback_tuples_render_as_parseable_literals(params in arb_param_names()) {
        for case in fallback_cases(&params) {
            let rendered = case.to_string();
            prop_assert!(parse_literal(&rendered).is_some(), "unparseable: {}", rendered);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn literal_parser_does_not_panic(input in "\\PC*") {
        let _ = parse_literal(&input);
        let _ = parse_tuple_list(&input);
    }

    #[test]
    fn reply_extraction_does_not_panic(reply in "\\PC*") {
        let _ = extract_cases(&reply);
    }
}
