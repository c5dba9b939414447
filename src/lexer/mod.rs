pub mod token;

use crate::diagnostics::AnalyzeError;
use crate::span::{Span, Spanned};
use logos::Logos;
use token::Token;

/// Tokenize Python source.
///
/// Produces the logos token stream with synthetic Indent/Dedent tokens
/// spliced in at block boundaries, newlines suppressed inside open
/// brackets, and blank or comment-only lines dropped.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, AnalyzeError> {
    let raw = lex_raw(source)?;
    layout(source, raw)
}

fn lex_raw(source: &str) -> Result<Vec<Spanned<Token>>, AnalyzeError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => {
                if matches!(tok, Token::Comment) {
                    continue;
                }
                tokens.push(Spanned::new(tok, Span::new(span.start, span.end)));
            }
            Err(()) => {
                return Err(AnalyzeError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Indentation pass: compare each logical line's leading column against a
/// stack of open block columns and emit Indent/Dedent tokens.
///
/// The first logical line sets the baseline column, so a uniformly
/// indented snippet still parses. A dedent that lands between two open
/// columns is an error.
fn layout(source: &str, raw: Vec<Spanned<Token>>) -> Result<Vec<Spanned<Token>>, AnalyzeError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut stack: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut at_line_start = true;

    for tok in raw {
        if matches!(tok.node, Token::Newline) {
            if depth > 0 || at_line_start {
                continue;
            }
            out.push(tok);
            at_line_start = true;
            continue;
        }

        if at_line_start {
            let col = indent_width(source, tok.span.start);
            let marker = Span::new(tok.span.start, tok.span.start);
            match stack.last().copied() {
                None => stack.push(col),
                Some(current) if col > current => {
                    stack.push(col);
                    out.push(Spanned::new(Token::Indent, marker));
                }
                Some(current) if col < current => {
                    while stack.last().is_some_and(|&c| c > col) {
                        stack.pop();
                        out.push(Spanned::new(Token::Dedent, marker));
                    }
                    if stack.last().copied() != Some(col) {
                        return Err(AnalyzeError::syntax(
                            "unindent does not match any outer indentation level",
                            tok.span,
                        ));
                    }
                }
                Some(_) => {}
            }
            at_line_start = false;
        }

        match tok.node {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(tok);
    }

    let eof = Span::new(source.len(), source.len());
    if !at_line_start && !out.is_empty() {
        out.push(Spanned::new(Token::Newline, eof));
    }
    while stack.len() > 1 {
        stack.pop();
        out.push(Spanned::new(Token::Dedent, eof));
    }

    Ok(out)
}

/// Column of the first token on its line, tabs expanded to multiples of 8.
fn indent_width(source: &str, tok_start: usize) -> usize {
    let line_start = source[..tok_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut col = 0;
    for c in source[line_start..tok_start].chars() {
        if c == '\t' {
            col = col / 8 * 8 + 8;
        } else {
            col += 1;
        }
    }
    col
}
