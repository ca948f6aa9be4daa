use super::ast::*;
use super::token::*;
use super::{Error, Position, Range};
use crate::error;

type Result<T> = std::result::Result<T, Error>;

pub fn parse(tokens: &[Token]) -> Result<Vec<Statement>> {
    Parse { tokens, pos: 0 }.program()
}

struct Parse<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parse<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, token: &Token) -> Error {
        error!(UnexpectedToken).in_range(&token.range)
    }

    fn end_of_input(&self) -> Error {
        let range = match self.tokens.last() {
            Some(token) => token.range,
            None => Range::new(Position::new(1, 1), Position::new(1, 1)),
        };
        error!(UnexpectedEnd).in_range(&range)
    }

    fn expect_word(&mut self, word: Word) -> Result<Range> {
        match self.next() {
            Some(token) if token.kind == TokenKind::Word(word) => Ok(token.range),
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }

    fn expect_operator(&mut self, op: Operator) -> Result<Range> {
        match self.next() {
            Some(token) if token.kind == TokenKind::Operator(op) => Ok(token.range),
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }

    fn expect_ident(&mut self) -> Result<(Range, Ident)> {
        match self.next() {
            Some(token) => match &token.kind {
                TokenKind::Ident(ident) => Ok((token.range, ident.clone())),
                _ => Err(self.unexpected(token)),
            },
            None => Err(self.end_of_input()),
        }
    }

    fn eat_operator(&mut self, ops: &[Operator]) -> Option<(Range, Operator)> {
        if let Some(token) = self.peek() {
            if let TokenKind::Operator(op) = token.kind {
                if ops.contains(&op) {
                    self.pos += 1;
                    return Some((token.range, op));
                }
            }
        }
        None
    }

    fn at_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => matches!(token.kind, TokenKind::LineFeed | TokenKind::Colon),
        }
    }

    fn program(&mut self) -> Result<Vec<Statement>> {
        let mut statements = vec![];
        loop {
            while let Some(token) = self.peek() {
                if matches!(token.kind, TokenKind::LineFeed | TokenKind::Colon) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            let token = match self.peek() {
                Some(token) => token,
                None => return Ok(statements),
            };
            // A jump label is its own statement and needs no terminator;
            // its colon is part of the token.
            if let TokenKind::JumpLabel(s) = &token.kind {
                statements.push(Statement::JumpLabel(token.range, s.clone()));
                self.pos += 1;
                continue;
            }
            let statement = self.statement()?;
            // A remark trailing a statement is deferred and emitted as its
            // own statement, after the statement it annotated.
            let mut deferred = None;
            if let Some(token) = self.peek() {
                if let TokenKind::Remark(s) = &token.kind {
                    deferred = Some(Statement::Remark(token.range, s.clone()));
                    self.pos += 1;
                }
            }
            match self.peek() {
                None => {}
                Some(token) if matches!(token.kind, TokenKind::LineFeed | TokenKind::Colon) => {
                    self.pos += 1;
                }
                Some(token) => {
                    return Err(error!(ExpectedTerminator).in_range(&token.range));
                }
            }
            statements.push(statement);
            if let Some(remark) = deferred {
                statements.push(remark);
            }
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Err(self.end_of_input()),
        };
        match &token.kind {
            TokenKind::Remark(s) => {
                self.pos += 1;
                Ok(Statement::Remark(token.range, s.clone()))
            }
            TokenKind::Ident(_) => {
                let (ident_range, ident) = self.expect_ident()?;
                if self.eat_operator(&[Operator::Equal]).is_some() {
                    let expr = self.expression()?;
                    let range = ident_range.merge(&expr.range());
                    Ok(Statement::Let(range, false, (ident_range, ident), expr))
                } else {
                    self.call(ident_range, ident)
                }
            }
            TokenKind::Word(word) => {
                let word = *word;
                let range = token.range;
                self.pos += 1;
                match word {
                    Word::Let => self.r#let(range),
                    Word::If => self.r#if(range),
                    Word::End => {
                        if let Some(token) = self.peek() {
                            if token.kind == TokenKind::Word(Word::If) {
                                let end = token.range;
                                self.pos += 1;
                                return Ok(Statement::EndIf(range.merge(&end)));
                            }
                        }
                        Ok(Statement::End(range))
                    }
                    Word::EndIf => Ok(Statement::EndIf(range)),
                    Word::Else => Ok(Statement::Else(range)),
                    Word::ElseIf => {
                        let cond = self.expression()?;
                        let full = range.merge(&cond.range());
                        Ok(Statement::ElseIf(full, cond))
                    }
                    Word::For => self.r#for(range),
                    Word::Next => {
                        if let Some(token) = self.peek() {
                            if let TokenKind::Ident(_) = token.kind {
                                let (ident_range, ident) = self.expect_ident()?;
                                let full = range.merge(&ident_range);
                                return Ok(Statement::Next(full, Some((ident_range, ident))));
                            }
                        }
                        Ok(Statement::Next(range, None))
                    }
                    Word::Goto => {
                        let (full, target) = self.jump_target(range)?;
                        Ok(Statement::Goto(full, target))
                    }
                    Word::Gosub => {
                        let (full, target) = self.jump_target(range)?;
                        Ok(Statement::Gosub(full, target))
                    }
                    Word::Return => Ok(Statement::Return(range)),
                    Word::Stop => Ok(Statement::Stop(range)),
                    Word::While => {
                        let cond = self.expression()?;
                        let full = range.merge(&cond.range());
                        Ok(Statement::While(full, cond))
                    }
                    Word::Wend => Ok(Statement::Wend(range)),
                    Word::Do => Ok(Statement::Do(range)),
                    Word::Loop => self.r#loop(range),
                    Word::Pragma => self.pragma(range),
                    Word::Then | Word::To | Word::Step | Word::Dim | Word::As | Word::Until => {
                        Err(error!(UnexpectedToken).in_range(&range))
                    }
                }
            }
            _ => Err(self.unexpected(token)),
        }
    }

    /// Generic builtin call: `name (expr (','|';') ...)?`. A comma becomes
    /// a `Char(',')` pseudo-argument, a semicolon nothing; a final
    /// `Char('\n')` is appended unless the list ended in a separator.
    fn call(&mut self, name_range: Range, name: Ident) -> Result<Statement> {
        let mut args: Vec<Expression> = vec![];
        let mut range = name_range;
        let mut separated = true;
        let mut trailing_sep = false;
        loop {
            let token = match self.peek() {
                Some(token) => token,
                None => break,
            };
            match &token.kind {
                TokenKind::LineFeed
                | TokenKind::Colon
                | TokenKind::Remark(_)
                | TokenKind::Word(Word::Else) => break,
                TokenKind::Comma => {
                    args.push(Expression::Char(token.range, ','));
                    range = range.merge(&token.range);
                    self.pos += 1;
                    separated = true;
                    trailing_sep = true;
                }
                TokenKind::Semicolon => {
                    range = range.merge(&token.range);
                    self.pos += 1;
                    separated = true;
                    trailing_sep = true;
                }
                _ => {
                    if !separated {
                        return Err(self.unexpected(token));
                    }
                    let expr = self.expression()?;
                    range = range.merge(&expr.range());
                    args.push(expr);
                    separated = false;
                    trailing_sep = false;
                }
            }
        }
        if !trailing_sep {
            let end = Range::new(range.end, range.end);
            args.push(Expression::Char(end, '\n'));
        }
        Ok(Statement::Call(range, (name_range, name), args))
    }

    fn r#let(&mut self, range: Range) -> Result<Statement> {
        let (ident_range, ident) = self.expect_ident()?;
        self.expect_operator(Operator::Equal)?;
        let expr = self.expression()?;
        let full = range.merge(&expr.range());
        Ok(Statement::Let(full, true, (ident_range, ident), expr))
    }

    fn r#if(&mut self, range: Range) -> Result<Statement> {
        let cond = self.expression()?;
        let then = self.expect_word(Word::Then)?;
        if self.at_terminator() {
            return Ok(Statement::If(range.merge(&then), cond));
        }
        if let Some(token) = self.peek() {
            if let TokenKind::Remark(_) = token.kind {
                return Ok(Statement::If(range.merge(&then), cond));
            }
        }
        let stmt_then = self.statement()?;
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Word(Word::Else) {
                self.pos += 1;
                let stmt_else = self.statement()?;
                let full = range.merge(&stmt_else.range());
                return Ok(Statement::If2(full, cond, Box::new(stmt_then), Box::new(stmt_else)));
            }
        }
        let full = range.merge(&stmt_then.range());
        Ok(Statement::If1(full, cond, Box::new(stmt_then)))
    }

    fn r#for(&mut self, range: Range) -> Result<Statement> {
        let (ident_range, ident) = self.expect_ident()?;
        self.expect_operator(Operator::Equal)?;
        let from = self.expression()?;
        self.expect_word(Word::To)?;
        let to = self.expression()?;
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Word(Word::Step) {
                self.pos += 1;
                let step = self.expression()?;
                let full = range.merge(&step.range());
                return Ok(Statement::ForStep(full, (ident_range, ident), from, to, step));
            }
        }
        let full = range.merge(&to.range());
        Ok(Statement::For(full, (ident_range, ident), from, to))
    }

    fn r#loop(&mut self, range: Range) -> Result<Statement> {
        if let Some(token) = self.peek() {
            let cond_kind = match token.kind {
                TokenKind::Word(Word::While) => Some(LoopCond::While),
                TokenKind::Word(Word::Until) => Some(LoopCond::Until),
                _ => None,
            };
            if let Some(kind) = cond_kind {
                self.pos += 1;
                let cond = self.expression()?;
                let full = range.merge(&cond.range());
                return Ok(Statement::Loop(full, Some((kind, cond))));
            }
        }
        Ok(Statement::Loop(range, None))
    }

    fn pragma(&mut self, range: Range) -> Result<Statement> {
        let (name_range, name) = self.expect_ident()?;
        match self.next() {
            Some(token) if token.kind == TokenKind::LParen => {}
            Some(token) => return Err(self.unexpected(token)),
            None => return Err(self.end_of_input()),
        }
        let mut args = vec![];
        if let Some(token) = self.peek() {
            if token.kind != TokenKind::RParen {
                loop {
                    args.push(self.expression()?);
                    match self.peek() {
                        Some(token) if token.kind == TokenKind::Comma => {
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
            }
        }
        let close = match self.next() {
            Some(token) if token.kind == TokenKind::RParen => token.range,
            Some(token) => return Err(self.unexpected(token)),
            None => return Err(self.end_of_input()),
        };
        Ok(Statement::Pragma(range.merge(&close), (name_range, name), args))
    }

    fn jump_target(&mut self, range: Range) -> Result<(Range, String)> {
        match self.next() {
            Some(token) => match &token.kind {
                TokenKind::Ident(Ident::Plain(s)) => {
                    Ok((range.merge(&token.range), s.clone()))
                }
                TokenKind::Literal(Literal::Integer(n)) => {
                    Ok((range.merge(&token.range), n.to_string()))
                }
                TokenKind::Literal(Literal::Long(n)) => {
                    Ok((range.merge(&token.range), n.to_string()))
                }
                _ => Err(self.unexpected(token)),
            },
            None => Err(self.end_of_input()),
        }
    }

    // Precedence, tightest first: unary sign; * / \ MOD; + -;
    // relational; AND; OR and XOR. All binary operators left-associative.

    fn expression(&mut self) -> Result<Expression> {
        let mut lhs = self.and_expression()?;
        while let Some((_, op)) = self.eat_operator(&[Operator::Or, Operator::Xor]) {
            let rhs = self.and_expression()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expression(&mut self) -> Result<Expression> {
        let mut lhs = self.relational_expression()?;
        while let Some((_, op)) = self.eat_operator(&[Operator::And]) {
            let rhs = self.relational_expression()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn relational_expression(&mut self) -> Result<Expression> {
        let mut lhs = self.additive_expression()?;
        while let Some((_, op)) = self.eat_operator(&[
            Operator::Equal,
            Operator::NotEqual,
            Operator::Less,
            Operator::LessEqual,
            Operator::Greater,
            Operator::GreaterEqual,
        ]) {
            let rhs = self.additive_expression()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn additive_expression(&mut self) -> Result<Expression> {
        let mut lhs = self.multiplicative_expression()?;
        while let Some((_, op)) = self.eat_operator(&[Operator::Plus, Operator::Minus]) {
            let rhs = self.multiplicative_expression()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn multiplicative_expression(&mut self) -> Result<Expression> {
        let mut lhs = self.unary_expression()?;
        while let Some((_, op)) = self.eat_operator(&[
            Operator::Multiply,
            Operator::Divide,
            Operator::DivideInt,
            Operator::Modulus,
        ]) {
            let rhs = self.unary_expression()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary_expression(&mut self) -> Result<Expression> {
        if let Some((range, op)) = self.eat_operator(&[Operator::Minus, Operator::Plus]) {
            let operand = self.unary_expression()?;
            let full = range.merge(&operand.range());
            return Ok(match op {
                Operator::Minus => Expression::Negation(full, Box::new(operand)),
                _ => operand,
            });
        }
        self.primary_expression()
    }

    fn primary_expression(&mut self) -> Result<Expression> {
        let token = match self.next() {
            Some(token) => token,
            None => return Err(self.end_of_input()),
        };
        let range = token.range;
        match &token.kind {
            TokenKind::Literal(Literal::Integer(n)) => Ok(Expression::Integer(range, *n)),
            TokenKind::Literal(Literal::Long(n)) => Ok(Expression::Long(range, *n)),
            TokenKind::Literal(Literal::Single(n)) => Ok(Expression::Single(range, *n)),
            TokenKind::Literal(Literal::Double(n)) => Ok(Expression::Double(range, *n)),
            TokenKind::Literal(Literal::String(s)) => Ok(Expression::String(range, s.clone())),
            TokenKind::Ident(ident) => Ok(Expression::Ident(range, ident.clone())),
            TokenKind::LParen => {
                let expr = self.expression()?;
                match self.next() {
                    Some(token) if token.kind == TokenKind::RParen => Ok(expr),
                    Some(token) => Err(self.unexpected(token)),
                    None => Err(self.end_of_input()),
                }
            }
            _ => Err(self.unexpected(token)),
        }
    }
}

fn binary(op: Operator, lhs: Expression, rhs: Expression) -> Expression {
    let range = lhs.range().merge(&rhs.range());
    let lhs = Box::new(lhs);
    let rhs = Box::new(rhs);
    match op {
        Operator::Multiply => Expression::Multiply(range, lhs, rhs),
        Operator::Divide => Expression::Divide(range, lhs, rhs),
        Operator::DivideInt => Expression::DivideInt(range, lhs, rhs),
        Operator::Modulus => Expression::Modulo(range, lhs, rhs),
        Operator::Plus => Expression::Add(range, lhs, rhs),
        Operator::Minus => Expression::Subtract(range, lhs, rhs),
        Operator::Equal => Expression::Equal(range, lhs, rhs),
        Operator::NotEqual => Expression::NotEqual(range, lhs, rhs),
        Operator::Less => Expression::Less(range, lhs, rhs),
        Operator::LessEqual => Expression::LessEqual(range, lhs, rhs),
        Operator::Greater => Expression::Greater(range, lhs, rhs),
        Operator::GreaterEqual => Expression::GreaterEqual(range, lhs, rhs),
        Operator::And => Expression::And(range, lhs, rhs),
        Operator::Or => Expression::Or(range, lhs, rhs),
        Operator::Xor => Expression::Xor(range, lhs, rhs),
    }
}
