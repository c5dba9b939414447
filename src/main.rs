use clap::Parser;
use std::path::PathBuf;

use funcov::analyzer::Analyzer;
use funcov::config::AnalyzerConfig;

#[derive(Parser)]
#[command(name = "funcov", version, about = "Test-coverage analyzer for a single Python function")]
struct Cli {
    /// Path to a Python file whose first top-level function is analyzed
    file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let config = match AnalyzerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let analyzer = match Analyzer::new(config) {
        Ok(analyzer) => analyzer,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let result = match analyzer.analyze_file(&cli.file) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error [{}]: {err}", cli.file.display());
            std::process::exit(1);
        }
    };

    println!("[{}]", result.test_cases.tuples.join(", "));

    match result.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
