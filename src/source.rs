//! Source intake: the parse attempt plus the textual identity fallback.

use crate::diagnostics;
use crate::parser::{
    self,
    ast::{Module, Stmt},
};
use crate::span::{LineIndex, Span, Spanned};

pub const UNKNOWN_FUNCTION: &str = "unknown_function";

/// The analyzed function's text plus its derived identity.
///
/// Construction is total: unparseable input still yields a usable unit,
/// with `tree` absent and name/parameters recovered by text scanning.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub code: String,
    pub lines: Vec<String>,
    pub tree: Option<Module>,
    pub name: String,
    pub params: Vec<String>,
    pub index: LineIndex,
}

impl SourceUnit {
    pub fn from_source(code: &str) -> SourceUnit {
        let lines = code.split('\n').map(str::to_string).collect();
        let index = LineIndex::new(code);
        let tree = match parser::parse(code) {
            Ok(module) => Some(module),
            Err(err) => {
                diagnostics::render_error(code, &err);
                eprintln!("warning: falling back to line-based extraction");
                None
            }
        };

        let (name, params) = match tree.as_ref().and_then(|t| first_def(&t.body)) {
            Some((name, params)) => (name, params),
            None => match scan_def(code) {
                Some(header) => (header.name, header.params),
                None => (UNKNOWN_FUNCTION.to_string(), Vec::new()),
            },
        };

        SourceUnit { code: code.to_string(), lines, tree, name, params, index }
    }

    /// 1-based line containing a byte offset.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.index.line_of(offset)
    }

    /// Source text covered by a span.
    pub fn slice(&self, span: Span) -> &str {
        &self.code[span.start..span.end]
    }

    /// Trimmed text of a 1-based source line; empty when out of range.
    pub fn line_text(&self, line: u32) -> &str {
        self.lines
            .get(line.saturating_sub(1) as usize)
            .map(|l| l.trim())
            .unwrap_or("")
    }
}

/// First function definition in document order, nested blocks included.
fn first_def(stmts: &[Spanned<Stmt>]) -> Option<(String, Vec<String>)> {
    for stmt in stmts {
        match &stmt.node {
            Stmt::FuncDef { name, params, .. } => {
                let names = params.iter().map(|p| p.name.node.clone()).collect();
                return Some((name.node.clone(), names));
            }
            Stmt::If { then_body, else_body, .. } => {
                if let Some(found) = first_def(then_body).or_else(|| first_def(else_body)) {
                    return Some(found);
                }
            }
            Stmt::While { body, .. } | Stmt::For { body, .. } => {
                if let Some(found) = first_def(body) {
                    return Some(found);
                }
            }
            Stmt::Try { body, handlers, final_body } => {
                let found = first_def(body)
                    .or_else(|| handlers.iter().find_map(|h| first_def(&h.node.body)))
                    .or_else(|| first_def(final_body));
                if let Some(found) = found {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

struct TextDef {
    name: String,
    params: Vec<String>,
}

/// Line-scan tier: `def` followed by an identifier names the function;
/// the parenthesized list up to the matching close paren, split on
/// top-level commas with default-value and annotation suffixes cut and
/// empty tokens discarded, names the parameters.
fn scan_def(code: &str) -> Option<TextDef> {
    for (at, _) in code.match_indices("def") {
        if at > 0 {
            let prev = code.as_bytes()[at - 1];
            if prev.is_ascii_alphanumeric() || prev == b'_' {
                continue;
            }
        }
        let rest = &code[at + 3..];
        let after_ws = rest.trim_start_matches([' ', '\t']);
        if after_ws.len() == rest.len() {
            continue;
        }
        let name_len = ident_len(after_ws);
        if name_len == 0 {
            continue;
        }
        let name = after_ws[..name_len].to_string();
        let after_name = after_ws[name_len..].trim_start_matches([' ', '\t']);
        let params = after_name
            .strip_prefix('(')
            .map(scan_params)
            .unwrap_or_default();
        return Some(TextDef { name, params });
    }
    None
}

fn ident_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
        return 0;
    }
    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

/// `inner` starts just past the opening paren.
fn scan_params(inner: &str) -> Vec<String> {
    let mut depth = 0usize;
    let mut end = None;
    for (i, c) in inner.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' if depth == 0 => {
                end = Some(i);
                break;
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    let Some(end) = end else {
        return Vec::new();
    };

    let mut params = Vec::new();
    for token in split_top_commas(&inner[..end]) {
        let token = token.split('=').next().unwrap_or("");
        let token = token.split(':').next().unwrap_or("");
        let token = token.trim().trim_start_matches('*');
        if !token.is_empty() {
            params.push(token.to_string());
        }
    }
    params
}

fn split_top_commas(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
