//! Disposable execution sandbox for probe calls.
//!
//! The function source is staged into a scratch directory, read back and
//! parsed, and calls run against that module. The directory is removed
//! when the sandbox is dropped, on success and failure alike.

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;
use uuid::Uuid;

use crate::diagnostics::AnalyzeError;
use crate::interp::{Interp, Value};
use crate::literal::Literal;
use crate::parser;
use crate::parser::ast::{Module, Stmt};
use crate::source::SourceUnit;
use crate::span::{LineIndex, Spanned};

/// Outcome of one probe call. Hits are kept even when the call fails, so
/// partial traces still count toward coverage.
#[derive(Debug)]
pub struct CallOutcome {
    pub result: Result<String, String>,
    pub hits: BTreeSet<u32>,
}

/// The execution capability handed to the coverage runner. Swappable:
/// anything that can report executable lines and run one call fits.
pub trait ProbeSandbox {
    fn executable_lines(&self) -> &BTreeSet<u32>;
    fn call(&mut self, args: &[Literal]) -> CallOutcome;
}

#[derive(Debug)]
pub struct ScratchSandbox {
    module: Module,
    index: LineIndex,
    name: String,
    executable: BTreeSet<u32>,
    _dir: TempDir,
}

impl ScratchSandbox {
    /// Stage `unit` into a fresh `funcov-{uuid}` scratch directory and
    /// prepare its probe module. Any failure is a module-load error; the
    /// directory is cleaned up regardless.
    pub fn create(unit: &SourceUnit) -> Result<Self, AnalyzeError> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("funcov-{}", Uuid::new_v4()))
            .tempdir()
            .map_err(|e| {
                AnalyzeError::module_load(format!("failed to create scratch directory: {e}"))
            })?;
        let probe_path = dir.path().join("probe.py");
        fs::write(&probe_path, &unit.code)
            .map_err(|e| AnalyzeError::module_load(format!("failed to write probe file: {e}")))?;
        let source = fs::read_to_string(&probe_path).map_err(|e| {
            AnalyzeError::module_load(format!("failed to read probe file back: {e}"))
        })?;

        let module = parser::parse(&source).map_err(|e| {
            AnalyzeError::module_load(format!("probe module does not parse: {}", e.plain_message()))
        })?;
        let index = LineIndex::new(&source);

        let executable = {
            let body = locate_body(&module, &unit.name).ok_or_else(|| {
                AnalyzeError::module_load(format!(
                    "function '{}' not found in probe module",
                    unit.name
                ))
            })?;
            let mut lines = BTreeSet::new();
            collect_lines(body, &index, &mut lines);
            lines
        };

        Ok(Self {
            module,
            index,
            name: unit.name.clone(),
            executable,
            _dir: dir,
        })
    }
}

impl ProbeSandbox for ScratchSandbox {
    fn executable_lines(&self) -> &BTreeSet<u32> {
        &self.executable
    }

    fn call(&mut self, args: &[Literal]) -> CallOutcome {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match Value::from_literal(arg) {
                Ok(value) => values.push(value),
                Err(msg) => {
                    return CallOutcome { result: Err(msg), hits: BTreeSet::new() };
                }
            }
        }
        let mut interp = Interp::new(&self.module, &self.index);
        let (result, hits) = interp.call(&self.name, values);
        CallOutcome { result: result.map(|value| value.render()), hits }
    }
}

fn locate_body<'a>(module: &'a Module, name: &str) -> Option<&'a [Spanned<Stmt>]> {
    module.body.iter().find_map(|stmt| match &stmt.node {
        Stmt::FuncDef { name: def_name, body, .. } if def_name.node == name => {
            Some(body.as_slice())
        }
        _ => None,
    })
}

/// First line of every statement in the suite, nested suites included.
fn collect_lines(stmts: &[Spanned<Stmt>], index: &LineIndex, out: &mut BTreeSet<u32>) {
    for stmt in stmts {
        out.insert(index.line_of(stmt.span.start));
        match &stmt.node {
            Stmt::FuncDef { body, .. } => collect_lines(body, index, out),
            Stmt::If { then_body, else_body, .. } => {
                collect_lines(then_body, index, out);
                collect_lines(else_body, index, out);
            }
            Stmt::While { body, .. } | Stmt::For { body, .. } => {
                collect_lines(body, index, out);
            }
            Stmt::Try { body, handlers, final_body } => {
                collect_lines(body, index, out);
                for handler in handlers {
                    collect_lines(&handler.node.body, index, out);
                }
                collect_lines(final_body, index, out);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAMP: &str = "def clamp(n):\n    if n > 10:\n        return 10\n    if n < 0:\n        return 0\n    return n\n";

    fn sandbox(source: &str) -> ScratchSandbox {
        ScratchSandbox::create(&SourceUnit::from_source(source)).unwrap()
    }

    // ===== setup =====

    #[test]
    fn executable_lines_skip_the_def_header() {
        let sb = sandbox(CLAMP);
        let lines: Vec<u32> = sb.executable_lines().iter().copied().collect();
        assert_eq!(lines, [2, 3, 4, 5, 6]);
    }

    #[test]
    fn executable_lines_include_nested_suites() {
        let src = "def f(n):\n    try:\n        while n > 0:\n            n -= 1\n    except ValueError:\n        return -1\n    finally:\n        pass\n    return n\n";
        let sb = sandbox(src);
        let lines: Vec<u32> = sb.executable_lines().iter().copied().collect();
        assert_eq!(lines, [2, 3, 4, 6, 8, 9]);
    }

    #[test]
    fn unparseable_source_is_a_module_load_error() {
        let unit = SourceUnit::from_source("def broken(:\n    return 1\n");
        let err = ScratchSandbox::create(&unit).unwrap_err();
        assert!(err.to_string().contains("Module load error"));
    }

    #[test]
    fn missing_def_is_a_module_load_error() {
        let unit = SourceUnit::from_source("x = 1\n");
        let err = ScratchSandbox::create(&unit).unwrap_err();
        assert!(err.to_string().contains("not found in probe module"));
    }

    #[test]
    fn scratch_directory_is_removed_on_drop() {
        let sb = sandbox(CLAMP);
        let path = sb._dir.path().to_path_buf();
        assert!(path.exists());
        assert!(path.join("probe.py").exists());
        drop(sb);
        assert!(!path.exists());
    }

    // ===== calls =====

    #[test]
    fn call_renders_the_return_value() {
        let mut sb = sandbox(CLAMP);
        let outcome = sb.call(&[Literal::Int(99)]);
        assert_eq!(outcome.result, Ok("10".to_string()));
        assert!(outcome.hits.contains(&2));
        assert!(outcome.hits.contains(&3));
        assert!(!outcome.hits.contains(&6));
    }

    #[test]
    fn failing_call_keeps_partial_hits() {
        let src = "def f(n):\n    x = n * 2\n    return x / 0\n";
        let mut sb = sandbox(src);
        let outcome = sb.call(&[Literal::Int(1)]);
        assert_eq!(outcome.result, Err("division by zero".to_string()));
        assert_eq!(outcome.hits.iter().copied().collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn raw_argument_fails_only_that_call() {
        let mut sb = sandbox(CLAMP);
        let outcome = sb.call(&[Literal::Raw("n + 1".into())]);
        assert!(outcome.result.is_err());
        assert!(outcome.hits.is_empty());

        let next = sb.call(&[Literal::Int(5)]);
        assert_eq!(next.result, Ok("5".to_string()));
    }

    #[test]
    fn arity_mismatch_is_a_tolerated_failure() {
        let mut sb = sandbox(CLAMP);
        let outcome = sb.call(&[Literal::Int(1), Literal::Int(2)]);
        assert_eq!(
            outcome.result,
            Err("clamp() takes 1 positional arguments but 2 were given".to_string())
        );
    }
}
