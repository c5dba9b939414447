// Property tests for the Python-subset front end:
// 1. Parse determinism over generated definitions
// 2. Generated definitions always parse
// 3. No panics on arbitrary text

use proptest::prelude::*;

use funcov::parser;

// Strategy: single-branch definitions with varying names and thresholds
fn arb_branchy_def() -> impl Strategy<Value = String> {
    (1..100u32, -50..50i64).prop_map(|(n, v)| {
        format!("def probe{n}(x):\n    if x > {v}:\n        return {v}\n    return x\n")
    })
}

// Strategy: countdown loops with varying step values
fn arb_loopy_def() -> impl Strategy<Value = String> {
    (1..20i64).prop_map(|step| {
        format!(
            "def walk(n):\n    acc = 0\n    while n > 0:\n        acc = acc + {step}\n        n = n - 1\n    return acc\n"
        )
    })
}

fn arb_def() -> impl Strategy<Value = String> {
    prop_oneof![arb_branchy_def(), arb_loopy_def()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn parse_is_deterministic(source in arb_def()) {
        let first = parser::parse(&source);
        let second = parser::parse(&source);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a.body.len(), b.body.len());
        }
    }

    #[test]
    fn generated_defs_parse(source in arb_def()) {
        prop_assert!(parser::parse(&source).is_ok());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn parser_does_not_panic(source in "\\PC*") {
        let _ = parser::parse(&source);
    }
}
