//! Analysis pipeline benchmarks.
//!
//! Measures the stages in isolation plus one full in-process run with a
//! stubbed suggestion service. Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use funcov::branches;
use funcov::deadcode;
use funcov::literal::Literal;
use funcov::parser;
use funcov::sandbox::{ProbeSandbox, ScratchSandbox};
use funcov::source::SourceUnit;
use funcov::suggest::SuggestError;
use funcov::testcases::{self, SuggestionService};

const CLASSIFY: &str = "def classify(n):\n    if n > 100:\n        return \"large\"\n    elif n > 10:\n        return \"medium\"\n    elif n > 0:\n        return \"small\"\n    try:\n        return 10 // n\n    except ZeroDivisionError:\n        return 0\n";

const FIB: &str = "def fib(n):\n    a = 0\n    b = 1\n    for i in range(n):\n        t = a + b\n        a = b\n        b = t\n    return a\n";

struct Canned(&'static str);

impl SuggestionService for Canned {
    fn complete(&self, _prompt: &str) -> Result<String, SuggestError> {
        Ok(self.0.to_string())
    }
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_classify", |b| {
        b.iter(|| parser::parse(black_box(CLASSIFY)))
    });
}

fn bench_branch_inventory(c: &mut Criterion) {
    let unit = SourceUnit::from_source(CLASSIFY);
    c.bench_function("branch_inventory", |b| {
        b.iter(|| branches::extract_branches(black_box(&unit)))
    });
}

fn bench_dead_code(c: &mut Criterion) {
    let unit = SourceUnit::from_source(CLASSIFY);
    c.bench_function("dead_code_detect", |b| {
        b.iter(|| deadcode::detect(black_box(&unit)))
    });
}

fn bench_fallback_synthesis(c: &mut Criterion) {
    let params: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();
    c.bench_function("fallback_synthesis", |b| {
        b.iter(|| testcases::fallback_cases(black_box(&params)))
    });
}

fn bench_probe_call(c: &mut Criterion) {
    let unit = SourceUnit::from_source(FIB);
    let mut sandbox = ScratchSandbox::create(&unit).unwrap();
    let args = [Literal::Int(15)];
    c.bench_function("probe_call_fib_15", |b| {
        b.iter(|| sandbox.call(black_box(&args)))
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    c.bench_function("full_analysis_classify", |b| {
        b.iter(|| {
            funcov::analyze_with(
                black_box(CLASSIFY),
                Box::new(Canned("[(101,), (50,), (5,), (0,)]")),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_branch_inventory,
    bench_dead_code,
    bench_fallback_synthesis,
    bench_probe_call,
    bench_full_analysis
);
criterion_main!(benches);
