//! Dead-code detection: a reachability walk over the parsed tree plus a
//! marker-comment scan over the raw lines. The two scans run
//! independently and their findings are concatenated, so a line can
//! legitimately be reported by both.

use crate::parser::ast::Stmt;
use crate::source::SourceUnit;
use crate::span::Spanned;

/// Comment substrings that flag a line as intentionally dead.
pub const MARKERS: [&str; 2] = ["# dead code", "# This will be detected as dead code"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadCodeReason {
    UnreachableAfterReturn,
    MarkedByComment,
}

impl DeadCodeReason {
    pub fn message(&self) -> &'static str {
        match self {
            DeadCodeReason::UnreachableAfterReturn => "Unreachable code after return statement",
            DeadCodeReason::MarkedByComment => "Code marked as dead code",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadCodeInstance {
    pub line: u32,
    pub code: String,
    pub reason: DeadCodeReason,
}

pub fn detect(unit: &SourceUnit) -> Vec<DeadCodeInstance> {
    let mut out = Vec::new();
    if let Some(tree) = &unit.tree {
        walk_block(unit, &tree.body, false, &mut out);
    }
    scan_markers(unit, &mut out);
    out
}

/// Walk one block with a local after-return flag: one instance per
/// statement seen while the flag is set. Only an unconditional `return`
/// at this block's level arms the flag. Nested blocks inherit the flag's
/// value at their point of entry (a `return` inside never leaks out);
/// `except` bodies always start fresh.
fn walk_block(
    unit: &SourceUnit,
    stmts: &[Spanned<Stmt>],
    flag_at_entry: bool,
    out: &mut Vec<DeadCodeInstance>,
) {
    let mut after_return = flag_at_entry;
    for stmt in stmts {
        if after_return {
            let line = unit.line_of(stmt.span.start);
            out.push(DeadCodeInstance {
                line,
                code: unit.line_text(line).to_string(),
                reason: DeadCodeReason::UnreachableAfterReturn,
            });
        }
        match &stmt.node {
            Stmt::FuncDef { body, .. } => walk_block(unit, body, after_return, out),
            Stmt::If { then_body, else_body, .. } => {
                walk_block(unit, then_body, after_return, out);
                walk_block(unit, else_body, after_return, out);
            }
            Stmt::While { body, .. } | Stmt::For { body, .. } => {
                walk_block(unit, body, after_return, out)
            }
            Stmt::Try { body, handlers, final_body } => {
                walk_block(unit, body, after_return, out);
                for handler in handlers {
                    walk_block(unit, &handler.node.body, false, out);
                }
                walk_block(unit, final_body, after_return, out);
            }
            Stmt::Return(_) => after_return = true,
            _ => {}
        }
    }
}

fn scan_markers(unit: &SourceUnit, out: &mut Vec<DeadCodeInstance>) {
    for (i, raw) in unit.lines.iter().enumerate() {
        if MARKERS.iter().any(|m| raw.contains(m)) {
            out.push(DeadCodeInstance {
                line: (i + 1) as u32,
                code: raw.trim().to_string(),
                reason: DeadCodeReason::MarkedByComment,
            });
        }
    }
}
