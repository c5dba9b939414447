//! Branch inventory extraction.
//!
//! Two strategies behind one interface: a syntax-tree walk when parsing
//! succeeded, and a keyword line scan when it did not. The two tiers are
//! intentionally not symmetric: the line scan emits a single record for
//! `elif` where the tree walk emits a true/false pair.

use crate::parser::ast::Stmt;
use crate::source::SourceUnit;
use crate::span::Spanned;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Conditional,
    Loop,
    ExceptionTry,
    ExceptionHandler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Truthy,
    Falsy,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub kind: BranchKind,
    pub condition: String,
    pub line: u32,
    pub polarity: Polarity,
    pub description: String,
}

impl Branch {
    /// Short tag used in the serialized report.
    pub fn type_str(&self) -> &'static str {
        match self.kind {
            BranchKind::Conditional => match self.polarity {
                Polarity::Falsy => "else",
                _ => "if",
            },
            BranchKind::Loop => "loop",
            BranchKind::ExceptionTry => "try",
            BranchKind::ExceptionHandler => "except",
        }
    }
}

pub trait BranchExtractor {
    fn extract(&self, unit: &SourceUnit) -> Vec<Branch>;
}

/// Tree walk when a parse is available, line scan otherwise.
pub fn extract_branches(unit: &SourceUnit) -> Vec<Branch> {
    if unit.tree.is_some() {
        TreeBranchExtractor.extract(unit)
    } else {
        TextBranchExtractor.extract(unit)
    }
}

fn conditional_pair(condition: &str, line: u32) -> [Branch; 2] {
    [
        Branch {
            kind: BranchKind::Conditional,
            condition: condition.to_string(),
            line,
            polarity: Polarity::Truthy,
            description: format!("Branch when {condition} is true"),
        },
        Branch {
            kind: BranchKind::Conditional,
            condition: format!("not ({condition})"),
            line,
            polarity: Polarity::Falsy,
            description: format!("Branch when {condition} is false"),
        },
    ]
}

/// Recursive statement walk over the parsed tree, document order.
pub struct TreeBranchExtractor;

impl BranchExtractor for TreeBranchExtractor {
    fn extract(&self, unit: &SourceUnit) -> Vec<Branch> {
        let mut out = Vec::new();
        if let Some(tree) = &unit.tree {
            walk_stmts(unit, &tree.body, &mut out);
        }
        out
    }
}

fn walk_stmts(unit: &SourceUnit, stmts: &[Spanned<Stmt>], out: &mut Vec<Branch>) {
    for stmt in stmts {
        let line = unit.line_of(stmt.span.start);
        match &stmt.node {
            Stmt::FuncDef { body, .. } => walk_stmts(unit, body, out),
            Stmt::If { cond, then_body, else_body } => {
                out.extend(conditional_pair(unit.slice(cond.span), line));
                walk_stmts(unit, then_body, out);
                walk_stmts(unit, else_body, out);
            }
            Stmt::While { cond, body } => {
                let text = unit.slice(cond.span);
                out.push(Branch {
                    kind: BranchKind::Loop,
                    condition: text.to_string(),
                    line,
                    polarity: Polarity::NotApplicable,
                    description: format!("Loop while {text}"),
                });
                walk_stmts(unit, body, out);
            }
            Stmt::For { iter, body, .. } => {
                let text = unit.slice(iter.span);
                out.push(Branch {
                    kind: BranchKind::Loop,
                    condition: text.to_string(),
                    line,
                    polarity: Polarity::NotApplicable,
                    description: format!("Loop over {text}"),
                });
                walk_stmts(unit, body, out);
            }
            Stmt::Try { body, handlers, final_body } => {
                out.push(Branch {
                    kind: BranchKind::ExceptionTry,
                    condition: "try block".to_string(),
                    line,
                    polarity: Polarity::NotApplicable,
                    description: "Guarded block that may raise".to_string(),
                });
                walk_stmts(unit, body, out);
                for handler in handlers {
                    let kind_name = handler
                        .node
                        .kind
                        .as_ref()
                        .map(|k| k.node.clone())
                        .unwrap_or_else(|| "Exception".to_string());
                    out.push(Branch {
                        kind: BranchKind::ExceptionHandler,
                        condition: kind_name.clone(),
                        line: unit.line_of(handler.span.start),
                        polarity: Polarity::NotApplicable,
                        description: format!("Handler for {kind_name}"),
                    });
                    walk_stmts(unit, &handler.node.body, out);
                }
                walk_stmts(unit, final_body, out);
            }
            _ => {}
        }
    }
}

/// Keyword line scan for when the source would not parse. A line counts
/// when it starts (after indentation) with a branching keyword and still
/// carries the `:` suite delimiter; the condition is the text between the
/// two. No exception records in this tier.
pub struct TextBranchExtractor;

impl BranchExtractor for TextBranchExtractor {
    fn extract(&self, unit: &SourceUnit) -> Vec<Branch> {
        let mut out = Vec::new();
        for (i, raw) in unit.lines.iter().enumerate() {
            let line = (i + 1) as u32;
            let Some((keyword, rest)) = split_keyword(raw.trim_start()) else {
                continue;
            };
            let Some(colon) = rest.rfind(':') else {
                continue;
            };
            let condition = rest[..colon].trim();
            if condition.is_empty() {
                continue;
            }
            match keyword {
                "if" => out.extend(conditional_pair(condition, line)),
                "elif" => out.push(Branch {
                    kind: BranchKind::Conditional,
                    condition: condition.to_string(),
                    line,
                    polarity: Polarity::Truthy,
                    description: format!("Branch when {condition} is true"),
                }),
                "while" => out.push(Branch {
                    kind: BranchKind::Loop,
                    condition: condition.to_string(),
                    line,
                    polarity: Polarity::NotApplicable,
                    description: format!("Loop while {condition}"),
                }),
                "for" => out.push(Branch {
                    kind: BranchKind::Loop,
                    condition: condition.to_string(),
                    line,
                    polarity: Polarity::NotApplicable,
                    description: format!("Loop over {condition}"),
                }),
                _ => {}
            }
        }
        out
    }
}

fn split_keyword(s: &str) -> Option<(&'static str, &str)> {
    for kw in ["elif", "if", "while", "for"] {
        if let Some(rest) = s.strip_prefix(kw) {
            if rest.starts_with([' ', '\t', '(']) {
                return Some((kw, rest));
            }
        }
    }
    None
}
