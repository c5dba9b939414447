//! The narrow value vocabulary for candidate arguments.
//!
//! Suggested values are parsed structurally into this vocabulary, never
//! evaluated. Anything that does not parse is carried verbatim as
//! [`Literal::Raw`] so a probe call can still be attempted with it.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Seq(Vec<Literal>),
    Tuple(Vec<Literal>),
    None,
    Raw(String),
}

impl fmt::Display for Literal {
    /// Python notation, matching how the values would be typed in a call.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Str(s) => {
                write!(f, "'")?;
                for c in s.chars() {
                    match c {
                        '\\' => write!(f, "\\\\")?,
                        '\'' => write!(f, "\\'")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "'")
            }
            Literal::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Literal::None => write!(f, "None"),
            Literal::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// Parse one complete literal from the whole string (surrounding
/// whitespace tolerated). Trailing text fails the parse.
pub fn parse_literal(input: &str) -> Option<Literal> {
    let mut cur = Cursor::new(input);
    let value = cur.value()?;
    cur.skip_ws();
    if cur.at_end() { Some(value) } else { None }
}

/// Parse a bracketed list of parenthesized tuples at the start of
/// `input`: `[(0,), (1, 2)]`. Text after the closing bracket is ignored,
/// so a reply can carry prose around the list. Every element must be a
/// tuple of well-formed literals.
pub fn parse_tuple_list(input: &str) -> Option<Vec<Vec<Literal>>> {
    let mut cur = Cursor::new(input);
    cur.skip_ws();
    if !cur.eat('[') {
        return None;
    }
    let mut tuples = Vec::new();
    loop {
        cur.skip_ws();
        if cur.eat(']') {
            return Some(tuples);
        }
        match cur.value()? {
            Literal::Tuple(items) => tuples.push(items),
            _ => return None,
        }
        cur.skip_ws();
        if !cur.eat(',') {
            cur.skip_ws();
            if cur.eat(']') {
                return Some(tuples);
            }
            return None;
        }
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Literal> {
        self.skip_ws();
        match self.peek()? {
            '[' => self.sequence(']').map(Literal::Seq),
            '(' => self.sequence(')').map(Literal::Tuple),
            '\'' | '"' => self.string(),
            '-' | '+' | '.' | '0'..='9' => self.number(),
            _ => self.keyword(),
        }
    }

    fn sequence(&mut self, close: char) -> Option<Vec<Literal>> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                if self.eat(close) {
                    return Some(items);
                }
                return None;
            }
        }
    }

    fn string(&mut self) -> Option<Literal> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '\\' => out.push('\\'),
                    '\'' => out.push('\''),
                    '"' => out.push('"'),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                c if c == quote => return Some(Literal::Str(out)),
                '\n' => return None,
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Literal> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let ok = match c {
                '0'..='9' | '_' | '.' => true,
                'e' | 'E' => true,
                '-' | '+' => matches!(prev, 'e' | 'E'),
                _ => false,
            };
            if !ok {
                break;
            }
            prev = c;
            self.bump();
        }
        let text = self.input[start..self.pos].replace('_', "");
        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().map(Literal::Float)
        } else {
            text.parse::<i64>().ok().map(Literal::Int)
        }
    }

    fn keyword(&mut self) -> Option<Literal> {
        let rest = &self.input[self.pos..];
        for (word, value) in [
            ("True", Literal::Bool(true)),
            ("False", Literal::Bool(false)),
            ("None", Literal::None),
        ] {
            if rest.starts_with(word) {
                let boundary = rest[word.len()..]
                    .chars()
                    .next()
                    .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_');
                if boundary {
                    self.pos += word.len();
                    return Some(value);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== parse_literal =====

    #[test]
    fn parse_scalars() {
        assert_eq!(parse_literal("42"), Some(Literal::Int(42)));
        assert_eq!(parse_literal("-10"), Some(Literal::Int(-10)));
        assert_eq!(parse_literal("1_000"), Some(Literal::Int(1000)));
        assert_eq!(parse_literal("3.5"), Some(Literal::Float(3.5)));
        assert_eq!(parse_literal("-2e2"), Some(Literal::Float(-200.0)));
        assert_eq!(parse_literal("True"), Some(Literal::Bool(true)));
        assert_eq!(parse_literal("False"), Some(Literal::Bool(false)));
        assert_eq!(parse_literal("None"), Some(Literal::None));
    }

    #[test]
    fn parse_strings() {
        assert_eq!(parse_literal("'abc'"), Some(Literal::Str("abc".into())));
        assert_eq!(parse_literal("\"x y\""), Some(Literal::Str("x y".into())));
        assert_eq!(parse_literal(r"'a\'b\n'"), Some(Literal::Str("a'b\n".into())));
    }

    #[test]
    fn parse_collections() {
        assert_eq!(
            parse_literal("[1, 2, 3]"),
            Some(Literal::Seq(vec![Literal::Int(1), Literal::Int(2), Literal::Int(3)]))
        );
        assert_eq!(
            parse_literal("( 1 , 'a' )"),
            Some(Literal::Tuple(vec![Literal::Int(1), Literal::Str("a".into())]))
        );
        assert_eq!(
            parse_literal("[[1], []]"),
            Some(Literal::Seq(vec![
                Literal::Seq(vec![Literal::Int(1)]),
                Literal::Seq(vec![]),
            ]))
        );
        assert_eq!(
            parse_literal("(1,)"),
            Some(Literal::Tuple(vec![Literal::Int(1)]))
        );
        assert_eq!(parse_literal("()"), Some(Literal::Tuple(vec![])));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_literal("foo"), None);
        assert_eq!(parse_literal("1 + 2"), None);
        assert_eq!(parse_literal("--5"), None);
        assert_eq!(parse_literal("[1, bar]"), None);
        assert_eq!(parse_literal("Nonempty"), None);
        assert_eq!(parse_literal("'unterminated"), None);
    }

    // ===== parse_tuple_list =====

    #[test]
    fn tuple_list_basic() {
        let parsed = parse_tuple_list("[(0,), (10,), (-10,)]").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], vec![Literal::Int(0)]);
        assert_eq!(parsed[2], vec![Literal::Int(-10)]);
    }

    #[test]
    fn tuple_list_ignores_trailing_prose() {
        let parsed = parse_tuple_list("[(1, 2), (3, 4)] would be my picks").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], vec![Literal::Int(3), Literal::Int(4)]);
    }

    #[test]
    fn tuple_list_with_sequences() {
        let parsed = parse_tuple_list("[([1, 2],), ([],)]").unwrap();
        assert_eq!(parsed[0], vec![Literal::Seq(vec![Literal::Int(1), Literal::Int(2)])]);
        assert_eq!(parsed[1], vec![Literal::Seq(vec![])]);
    }

    #[test]
    fn tuple_list_rejects_non_tuple_elements() {
        assert!(parse_tuple_list("[1, 2, 3]").is_none());
        assert!(parse_tuple_list("[(1,), nope]").is_none());
        assert!(parse_tuple_list("(1, 2)").is_none());
    }

    #[test]
    fn tuple_list_empty_is_empty() {
        assert_eq!(parse_tuple_list("[]"), Some(vec![]));
    }

    // ===== rendering =====

    #[test]
    fn display_python_notation() {
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Float(2.5).to_string(), "2.5");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Bool(true).to_string(), "True");
        assert_eq!(Literal::None.to_string(), "None");
        assert_eq!(Literal::Str("a'b".into()).to_string(), r"'a\'b'");
        assert_eq!(
            Literal::Seq(vec![Literal::Int(1), Literal::Int(2)]).to_string(),
            "[1, 2]"
        );
        assert_eq!(Literal::Tuple(vec![Literal::Int(0)]).to_string(), "(0,)");
        assert_eq!(
            Literal::Tuple(vec![Literal::Int(1), Literal::Int(2)]).to_string(),
            "(1, 2)"
        );
        assert_eq!(Literal::Raw("whatever".into()).to_string(), "whatever");
    }
}
