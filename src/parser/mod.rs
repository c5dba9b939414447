pub mod ast;

use crate::diagnostics::AnalyzeError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

/// Lex and parse Python source into a [`Module`].
pub fn parse(source: &str) -> Result<Module, AnalyzeError> {
    let tokens = crate::lexer::lex(source)?;
    Parser::new(&tokens, source).parse_module()
}

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Spanned<Token>> {
        if self.pos < self.tokens.len() {
            let tok = &self.tokens[self.pos];
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    fn at(&self, expected: &Token) -> bool {
        self.tokens
            .get(self.pos)
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(expected))
    }

    fn at_offset(&self, offset: usize, expected: &Token) -> bool {
        self.tokens
            .get(self.pos + offset)
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(expected))
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.at(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<&Spanned<Token>, AnalyzeError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(&self.tokens[self.pos - 1])
            }
            Some(tok) => Err(AnalyzeError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(AnalyzeError::syntax(
                format!("expected {expected}, found end of input"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, AnalyzeError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(name, tok.span))
            }
            Some(tok) => Err(AnalyzeError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(AnalyzeError::syntax(
                "expected identifier, found end of input",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn at_line_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(tok) => matches!(tok.node, Token::Newline | Token::Semicolon),
        }
    }

    // ===== statements =====

    pub fn parse_module(&mut self) -> Result<Module, AnalyzeError> {
        let mut body = Vec::new();
        while self.pos < self.tokens.len() {
            if self.eat(&Token::Newline) {
                continue;
            }
            self.parse_statement_into(&mut body)?;
        }
        Ok(Module { body })
    }

    /// One statement line: a compound statement, or one physical line of
    /// `;`-separated simple statements (hence the output vector).
    fn parse_statement_into(&mut self, body: &mut Vec<Spanned<Stmt>>) -> Result<(), AnalyzeError> {
        let Some(tok) = self.peek() else {
            return Err(AnalyzeError::syntax("expected a statement", self.eof_span()));
        };
        match tok.node {
            Token::Def => body.push(self.parse_funcdef()?),
            Token::If => body.push(self.parse_if()?),
            Token::While => body.push(self.parse_while()?),
            Token::For => body.push(self.parse_for()?),
            Token::Try => body.push(self.parse_try()?),
            _ => self.parse_simple_line(body)?,
        }
        Ok(())
    }

    /// Suite after a compound-statement header: either an indented block
    /// or simple statements on the header line.
    fn parse_block(&mut self) -> Result<Vec<Spanned<Stmt>>, AnalyzeError> {
        let colon_span = self.expect(&Token::Colon)?.span;
        let mut body = Vec::new();
        if self.eat(&Token::Newline) {
            self.expect(&Token::Indent)?;
            loop {
                if self.eat(&Token::Dedent) {
                    break;
                }
                if self.eat(&Token::Newline) {
                    continue;
                }
                if self.pos >= self.tokens.len() {
                    return Err(AnalyzeError::syntax(
                        "unexpected end of input in indented block",
                        self.eof_span(),
                    ));
                }
                self.parse_statement_into(&mut body)?;
            }
        } else {
            self.parse_simple_line(&mut body)?;
        }
        if body.is_empty() {
            return Err(AnalyzeError::syntax("expected an indented block", colon_span));
        }
        Ok(body)
    }

    fn parse_simple_line(&mut self, body: &mut Vec<Spanned<Stmt>>) -> Result<(), AnalyzeError> {
        loop {
            body.push(self.parse_simple_stmt()?);
            if self.eat(&Token::Semicolon) {
                if self.eat(&Token::Newline) || self.pos >= self.tokens.len() {
                    return Ok(());
                }
                continue;
            }
            if self.eat(&Token::Newline) || self.pos >= self.tokens.len() {
                return Ok(());
            }
            let tok = &self.tokens[self.pos];
            return Err(AnalyzeError::syntax(
                format!("expected newline, found {}", tok.node),
                tok.span,
            ));
        }
    }

    fn parse_funcdef(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let start = self.expect(&Token::Def)?.span;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        loop {
            if self.at(&Token::RParen) {
                break;
            }
            let pname = self.expect_ident()?;
            // annotation and default value are parsed and dropped
            if self.eat(&Token::Colon) {
                self.parse_expr()?;
            }
            if self.eat(&Token::Eq) {
                self.parse_expr()?;
            }
            params.push(Param { name: pname });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        if self.eat(&Token::Arrow) {
            self.parse_expr()?;
        }
        let body = self.parse_block()?;
        let end = body.last().map(|s| s.span).unwrap_or(start);
        Ok(Spanned::new(Stmt::FuncDef { name, params, body }, start.merge(end)))
    }

    /// Parses both `if` and `elif` headers; an `elif` arm becomes a nested
    /// `If` as the sole statement of the outer `else_body`.
    fn parse_if(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let start = match self.advance() {
            Some(tok) if matches!(tok.node, Token::If | Token::Elif) => tok.span,
            Some(tok) => {
                return Err(AnalyzeError::syntax(
                    format!("expected if, found {}", tok.node),
                    tok.span,
                ));
            }
            None => return Err(AnalyzeError::syntax("expected if, found end of input", self.eof_span())),
        };
        let cond = self.parse_expr()?;
        let then_body = self.parse_block()?;
        let mut else_body = Vec::new();
        if self.at(&Token::Elif) {
            else_body.push(self.parse_if()?);
        } else if self.eat(&Token::Else) {
            else_body = self.parse_block()?;
        }
        let end = else_body
            .last()
            .map(|s| s.span)
            .or_else(|| then_body.last().map(|s| s.span))
            .unwrap_or(start);
        Ok(Spanned::new(Stmt::If { cond, then_body, else_body }, start.merge(end)))
    }

    fn parse_while(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let start = self.expect(&Token::While)?.span;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let end = body.last().map(|s| s.span).unwrap_or(start);
        Ok(Spanned::new(Stmt::While { cond, body }, start.merge(end)))
    }

    fn parse_for(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let start = self.expect(&Token::For)?.span;
        let target = self.expect_ident()?;
        self.expect(&Token::In)?;
        let iter = self.parse_expr()?;
        let body = self.parse_block()?;
        let end = body.last().map(|s| s.span).unwrap_or(start);
        Ok(Spanned::new(Stmt::For { target, iter, body }, start.merge(end)))
    }

    fn parse_try(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let start = self.expect(&Token::Try)?.span;
        let body = self.parse_block()?;
        let mut handlers = Vec::new();
        while self.at(&Token::Except) {
            let hstart = self.expect(&Token::Except)?.span;
            let kind = if self.at(&Token::Ident) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            let bind = if self.eat(&Token::As) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            let hbody = self.parse_block()?;
            let hend = hbody.last().map(|s| s.span).unwrap_or(hstart);
            handlers.push(Spanned::new(Handler { kind, bind, body: hbody }, hstart.merge(hend)));
        }
        let final_body = if self.eat(&Token::Finally) {
            self.parse_block()?
        } else {
            Vec::new()
        };
        if handlers.is_empty() && final_body.is_empty() {
            return Err(AnalyzeError::syntax(
                "expected except or finally after try block",
                start,
            ));
        }
        let end = final_body
            .last()
            .map(|s| s.span)
            .or_else(|| handlers.last().map(|h| h.span))
            .or_else(|| body.last().map(|s| s.span))
            .unwrap_or(start);
        Ok(Spanned::new(Stmt::Try { body, handlers, final_body }, start.merge(end)))
    }

    fn parse_simple_stmt(&mut self) -> Result<Spanned<Stmt>, AnalyzeError> {
        let Some(tok) = self.peek() else {
            return Err(AnalyzeError::syntax("expected a statement", self.eof_span()));
        };
        let start = tok.span;
        match tok.node {
            Token::Return => {
                self.pos += 1;
                if self.at_line_end() {
                    Ok(Spanned::new(Stmt::Return(None), start))
                } else {
                    let value = self.parse_expr_list()?;
                    let span = start.merge(value.span);
                    Ok(Spanned::new(Stmt::Return(Some(value)), span))
                }
            }
            Token::Raise => {
                self.pos += 1;
                if self.at_line_end() {
                    Ok(Spanned::new(Stmt::Raise(None), start))
                } else {
                    let value = self.parse_expr()?;
                    let span = start.merge(value.span);
                    Ok(Spanned::new(Stmt::Raise(Some(value)), span))
                }
            }
            Token::Pass => {
                self.pos += 1;
                Ok(Spanned::new(Stmt::Pass, start))
            }
            Token::Break => {
                self.pos += 1;
                Ok(Spanned::new(Stmt::Break, start))
            }
            Token::Continue => {
                self.pos += 1;
                Ok(Spanned::new(Stmt::Continue, start))
            }
            Token::Class
            | Token::With
            | Token::Import
            | Token::From
            | Token::Global
            | Token::Nonlocal
            | Token::Del
            | Token::Yield
            | Token::Assert => Err(AnalyzeError::syntax(
                format!("unsupported statement '{}'", tok.node),
                start,
            )),
            _ => {
                let first = self.parse_expr_list()?;
                if self.eat(&Token::Eq) {
                    self.check_assign_target(&first)?;
                    let value = self.parse_expr_list()?;
                    let span = first.span.merge(value.span);
                    Ok(Spanned::new(Stmt::Assign { target: first, value }, span))
                } else if let Some(op) = self.peek_aug_op() {
                    self.pos += 1;
                    if matches!(first.node, Expr::Tuple(_)) {
                        return Err(AnalyzeError::syntax(
                            "augmented assignment target cannot be a tuple",
                            first.span,
                        ));
                    }
                    self.check_assign_target(&first)?;
                    let value = self.parse_expr_list()?;
                    let span = first.span.merge(value.span);
                    Ok(Spanned::new(Stmt::AugAssign { target: first, op, value }, span))
                } else {
                    let span = first.span;
                    Ok(Spanned::new(Stmt::ExprStmt(first), span))
                }
            }
        }
    }

    fn peek_aug_op(&self) -> Option<BinOp> {
        match self.peek().map(|t| &t.node) {
            Some(Token::PlusEq) => Some(BinOp::Add),
            Some(Token::MinusEq) => Some(BinOp::Sub),
            Some(Token::StarEq) => Some(BinOp::Mul),
            Some(Token::SlashEq) => Some(BinOp::Div),
            Some(Token::SlashSlashEq) => Some(BinOp::FloorDiv),
            Some(Token::PercentEq) => Some(BinOp::Mod),
            Some(Token::StarStarEq) => Some(BinOp::Pow),
            _ => None,
        }
    }

    fn check_assign_target(&self, target: &Spanned<Expr>) -> Result<(), AnalyzeError> {
        match &target.node {
            Expr::Name(_) | Expr::Index { .. } | Expr::Attribute { .. } => Ok(()),
            Expr::Tuple(elts) if !elts.is_empty() => {
                for elt in elts {
                    self.check_assign_target(elt)?;
                }
                Ok(())
            }
            _ => Err(AnalyzeError::syntax("cannot assign to this expression", target.span)),
        }
    }

    // ===== expressions =====

    /// Expression list with top-level commas: `a, b` parses as a tuple.
    /// Used where Python allows expression lists (assignments, return).
    fn parse_expr_list(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let first = self.parse_expr()?;
        if !self.at(&Token::Comma) {
            return Ok(first);
        }
        let start = first.span;
        let mut elts = vec![first];
        while self.eat(&Token::Comma) {
            if !self.at_expr_start() {
                break;
            }
            elts.push(self.parse_expr()?);
        }
        let end = elts.last().map(|e| e.span).unwrap_or(start);
        Ok(Spanned::new(Expr::Tuple(elts), start.merge(end)))
    }

    fn at_expr_start(&self) -> bool {
        matches!(
            self.peek().map(|t| &t.node),
            Some(
                Token::IntLit(_)
                    | Token::FloatLit(_)
                    | Token::StringLit(_)
                    | Token::True
                    | Token::False
                    | Token::NoneKw
                    | Token::Ident
                    | Token::LParen
                    | Token::LBracket
                    | Token::LBrace
                    | Token::Minus
                    | Token::Plus
                    | Token::Not
            )
        )
    }

    fn parse_expr(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary { op: BinOp::Or, left: Box::new(left), right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let mut left = self.parse_not()?;
        while self.eat(&Token::And) {
            let right = self.parse_not()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary { op: BinOp::And, left: Box::new(left), right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        if self.at(&Token::Not) && !self.at_offset(1, &Token::In) {
            let start = self.tokens[self.pos].span;
            self.pos += 1;
            let operand = self.parse_not()?;
            let span = start.merge(operand.span);
            return Ok(Spanned::new(
                Expr::Unary { op: UnaryOp::Not, operand: Box::new(operand) },
                span,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let left = self.parse_arith()?;
        let mut rest = Vec::new();
        loop {
            let op = if self.eat(&Token::EqEq) {
                CmpOp::Eq
            } else if self.eat(&Token::BangEq) {
                CmpOp::Ne
            } else if self.eat(&Token::LtEq) {
                CmpOp::Le
            } else if self.eat(&Token::Lt) {
                CmpOp::Lt
            } else if self.eat(&Token::GtEq) {
                CmpOp::Ge
            } else if self.eat(&Token::Gt) {
                CmpOp::Gt
            } else if self.eat(&Token::In) {
                CmpOp::In
            } else if self.at(&Token::Not) && self.at_offset(1, &Token::In) {
                self.pos += 2;
                CmpOp::NotIn
            } else if self.eat(&Token::Is) {
                if self.eat(&Token::Not) {
                    CmpOp::IsNot
                } else {
                    CmpOp::Is
                }
            } else {
                break;
            };
            rest.push((op, self.parse_arith()?));
        }
        if rest.is_empty() {
            return Ok(left);
        }
        let end = rest.last().map(|(_, e)| e.span).unwrap_or(left.span);
        let span = left.span.merge(end);
        Ok(Spanned::new(Expr::Compare { left: Box::new(left), rest }, span))
    }

    fn parse_arith(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let mut left = self.parse_term()?;
        loop {
            let op = if self.eat(&Token::Plus) {
                BinOp::Add
            } else if self.eat(&Token::Minus) {
                BinOp::Sub
            } else {
                break;
            };
            let right = self.parse_term()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = if self.eat(&Token::Star) {
                BinOp::Mul
            } else if self.eat(&Token::SlashSlash) {
                BinOp::FloorDiv
            } else if self.eat(&Token::Slash) {
                BinOp::Div
            } else if self.eat(&Token::Percent) {
                BinOp::Mod
            } else {
                break;
            };
            let right = self.parse_factor()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            );
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let op = if self.at(&Token::Minus) {
            Some(UnaryOp::Neg)
        } else if self.at(&Token::Plus) {
            Some(UnaryOp::Pos)
        } else {
            None
        };
        if let Some(op) = op {
            let start = self.tokens[self.pos].span;
            self.pos += 1;
            let operand = self.parse_factor()?;
            let span = start.merge(operand.span);
            return Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, span));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let base = self.parse_postfix()?;
        if self.eat(&Token::StarStar) {
            // right-associative, unary sign allowed in the exponent
            let exp = self.parse_factor()?;
            let span = base.span.merge(exp.span);
            return Ok(Spanned::new(
                Expr::Binary { op: BinOp::Pow, left: Box::new(base), right: Box::new(exp) },
                span,
            ));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.eat(&Token::LParen) {
                let mut args = Vec::new();
                loop {
                    if self.at(&Token::RParen) {
                        break;
                    }
                    let arg = self.parse_expr()?;
                    if self.at(&Token::Eq) {
                        return Err(AnalyzeError::syntax(
                            "keyword arguments are not supported",
                            arg.span,
                        ));
                    }
                    args.push(arg);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                let end = self.expect(&Token::RParen)?.span;
                let span = expr.span.merge(end);
                expr = Spanned::new(Expr::Call { callee: Box::new(expr), args }, span);
            } else if self.eat(&Token::Dot) {
                let attr = self.expect_ident()?;
                let span = expr.span.merge(attr.span);
                expr = Spanned::new(Expr::Attribute { value: Box::new(expr), attr }, span);
            } else if self.eat(&Token::LBracket) {
                expr = self.parse_subscript(expr)?;
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Subscript tail, after the `[`: plain index or `lower:upper:step`
    /// slice with every part optional.
    fn parse_subscript(&mut self, value: Spanned<Expr>) -> Result<Spanned<Expr>, AnalyzeError> {
        let lower = if self.at(&Token::Colon) || self.at(&Token::RBracket) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        if self.eat(&Token::Colon) {
            let upper = if self.at(&Token::Colon) || self.at(&Token::RBracket) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            let step = if self.eat(&Token::Colon) {
                if self.at(&Token::RBracket) {
                    None
                } else {
                    Some(self.parse_expr()?)
                }
            } else {
                None
            };
            let end = self.expect(&Token::RBracket)?.span;
            let span = value.span.merge(end);
            return Ok(Spanned::new(
                Expr::Slice {
                    value: Box::new(value),
                    lower: lower.map(Box::new),
                    upper: upper.map(Box::new),
                    step: step.map(Box::new),
                },
                span,
            ));
        }
        let end = self.expect(&Token::RBracket)?.span;
        match lower {
            Some(index) => {
                let span = value.span.merge(end);
                Ok(Spanned::new(
                    Expr::Index { value: Box::new(value), index: Box::new(index) },
                    span,
                ))
            }
            None => Err(AnalyzeError::syntax("expected a subscript expression", end)),
        }
    }

    fn parse_atom(&mut self) -> Result<Spanned<Expr>, AnalyzeError> {
        let (node, span) = match self.peek() {
            Some(tok) => (tok.node.clone(), tok.span),
            None => {
                return Err(AnalyzeError::syntax(
                    "expected an expression, found end of input",
                    self.eof_span(),
                ));
            }
        };
        match node {
            Token::IntLit(n) => {
                self.pos += 1;
                Ok(Spanned::new(Expr::Int(n), span))
            }
            Token::FloatLit(n) => {
                self.pos += 1;
                Ok(Spanned::new(Expr::Float(n), span))
            }
            Token::StringLit(s) => {
                self.pos += 1;
                Ok(Spanned::new(Expr::Str(s), span))
            }
            Token::True => {
                self.pos += 1;
                Ok(Spanned::new(Expr::Bool(true), span))
            }
            Token::False => {
                self.pos += 1;
                Ok(Spanned::new(Expr::Bool(false), span))
            }
            Token::NoneKw => {
                self.pos += 1;
                Ok(Spanned::new(Expr::NoneLit, span))
            }
            Token::Ident => {
                let name = self.source[span.start..span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(Expr::Name(name), span))
            }
            Token::LParen => {
                self.pos += 1;
                if self.at(&Token::RParen) {
                    let end = self.expect(&Token::RParen)?.span;
                    return Ok(Spanned::new(Expr::Tuple(Vec::new()), span.merge(end)));
                }
                let first = self.parse_expr()?;
                if self.at(&Token::Comma) {
                    let mut elts = vec![first];
                    while self.eat(&Token::Comma) {
                        if self.at(&Token::RParen) {
                            break;
                        }
                        elts.push(self.parse_expr()?);
                    }
                    let end = self.expect(&Token::RParen)?.span;
                    Ok(Spanned::new(Expr::Tuple(elts), span.merge(end)))
                } else {
                    // plain grouping: keep the inner node and span so that
                    // condition text slices stay tight
                    self.expect(&Token::RParen)?;
                    Ok(first)
                }
            }
            Token::LBracket => {
                self.pos += 1;
                let mut elts = Vec::new();
                loop {
                    if self.at(&Token::RBracket) {
                        break;
                    }
                    elts.push(self.parse_expr()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                let end = self.expect(&Token::RBracket)?.span;
                Ok(Spanned::new(Expr::List(elts), span.merge(end)))
            }
            Token::LBrace => {
                self.pos += 1;
                let mut entries = Vec::new();
                loop {
                    if self.at(&Token::RBrace) {
                        break;
                    }
                    let key = self.parse_expr()?;
                    self.expect(&Token::Colon)?;
                    let val = self.parse_expr()?;
                    entries.push((key, val));
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                let end = self.expect(&Token::RBrace)?.span;
                Ok(Spanned::new(Expr::Dict(entries), span.merge(end)))
            }
            Token::Lambda => Err(AnalyzeError::syntax("unsupported expression 'lambda'", span)),
            other => Err(AnalyzeError::syntax(
                format!("expected an expression, found {other}"),
                span,
            )),
        }
    }
}
