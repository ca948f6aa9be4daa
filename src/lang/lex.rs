use super::token::*;
use super::{Error, Position, Range};
use crate::error;
use std::iter::Peekable;
use std::str::Chars;

type Result<T> = std::result::Result<T, Error>;

pub fn lex(source: &str) -> Result<Vec<Token>> {
    BasicLexer::lex(source)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_basic_sigil(c: char) -> bool {
    matches!(c, '%' | '&' | '!' | '#' | '$')
}

struct BasicLexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
    last: Position,
    statement_start: bool,
}

impl<'a> BasicLexer<'a> {
    fn lex(source: &str) -> Result<Vec<Token>> {
        let mut lexer = BasicLexer {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            last: Position::new(1, 1),
            statement_start: true,
        };
        let mut tokens: Vec<Token> = vec![];
        while let Some(token) = lexer.next_token()? {
            lexer.statement_start =
                matches!(token.kind, TokenKind::LineFeed | TokenKind::Colon);
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Position of the next unconsumed character.
    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> char {
        let ch = self.chars.next().unwrap();
        self.last = Position::new(self.line, self.column);
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        while let Some(pk) = self.peek() {
            if is_basic_whitespace(pk) {
                self.bump();
            } else {
                break;
            }
        }
        let pk = match self.peek() {
            Some(pk) => pk,
            None => return Ok(None),
        };
        let start = self.here();
        let kind = if pk == '\r' {
            self.bump();
            if self.peek() != Some('\n') {
                return Err(error!(Tokenize; "UNKNOWN CHARACTER")
                    .in_range(&Range::new(start, self.last)));
            }
            self.bump();
            TokenKind::LineFeed
        } else if pk == '\n' {
            self.bump();
            TokenKind::LineFeed
        } else if pk == '\'' {
            self.bump();
            let mut s = String::from("'");
            self.take_rest_of_line(&mut s);
            TokenKind::Remark(s)
        } else if is_basic_digit(pk) || pk == '.' {
            self.number(start)?
        } else if pk == '"' {
            self.string(start)?
        } else if is_basic_alphabetic(pk) {
            self.alphabetic()?
        } else {
            self.minutia(start)?
        };
        Ok(Some(Token::new(kind, Range::new(start, self.last))))
    }

    fn take_rest_of_line(&mut self, s: &mut String) {
        while let Some(pk) = self.peek() {
            if pk == '\n' || pk == '\r' {
                break;
            }
            s.push(self.bump());
        }
    }

    fn number(&mut self, start: Position) -> Result<TokenKind> {
        let mut s = String::new();
        let mut decimal = false;
        let mut exponent = false;
        while let Some(pk) = self.peek() {
            if is_basic_digit(pk) {
                s.push(self.bump());
            } else if pk == '.' && !decimal && !exponent {
                decimal = true;
                s.push(self.bump());
            } else if (pk == 'e' || pk == 'E') && !exponent {
                exponent = true;
                s.push(self.bump());
                if let Some('+') | Some('-') = self.peek() {
                    s.push(self.bump());
                }
                match self.peek() {
                    Some(pk) if is_basic_digit(pk) => {}
                    _ => return Err(self.invalid_number(start)),
                }
            } else {
                break;
            }
        }
        let sigil = match self.peek() {
            Some(pk) if pk == '%' || pk == '&' || pk == '!' || pk == '#' => Some(self.bump()),
            _ => None,
        };
        let literal = match sigil {
            Some('%') => match s.parse::<i16>() {
                Ok(n) => Literal::Integer(n),
                Err(_) => return Err(self.invalid_number(start)),
            },
            Some('&') => match s.parse::<i32>() {
                Ok(n) => Literal::Long(n),
                Err(_) => return Err(self.invalid_number(start)),
            },
            Some('!') => match s.parse::<f32>() {
                Ok(n) if n.is_finite() => Literal::Single(n),
                _ => return Err(self.invalid_number(start)),
            },
            Some('#') => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Literal::Double(n),
                _ => return Err(self.invalid_number(start)),
            },
            _ => {
                if !decimal && !exponent {
                    if let Ok(n) = s.parse::<i16>() {
                        Literal::Integer(n)
                    } else if let Ok(n) = s.parse::<i32>() {
                        Literal::Long(n)
                    } else {
                        self.float_literal(&s, start)?
                    }
                } else {
                    self.float_literal(&s, start)?
                }
            }
        };
        Ok(TokenKind::Literal(literal))
    }

    /// An unsigiled literal with a decimal point or exponent is a single
    /// unless its magnitude needs binary64.
    fn float_literal(&mut self, s: &str, start: Position) -> Result<Literal> {
        let d = match s.parse::<f64>() {
            Ok(d) if d.is_finite() => d,
            _ => return Err(self.invalid_number(start)),
        };
        if (d as f32).is_finite() {
            Ok(Literal::Single(d as f32))
        } else {
            Ok(Literal::Double(d))
        }
    }

    fn invalid_number(&self, start: Position) -> Error {
        error!(Tokenize; "INVALID NUMBER").in_range(&Range::new(start, self.last))
    }

    fn string(&mut self, start: Position) -> Result<TokenKind> {
        self.bump();
        let mut s = String::new();
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(error!(Tokenize; "UNTERMINATED STRING")
                        .in_range(&Range::new(start, self.last)));
                }
                Some('"') => {
                    self.bump();
                    return Ok(TokenKind::Literal(Literal::String(s)));
                }
                Some(_) => s.push(self.bump()),
            }
        }
    }

    fn alphabetic(&mut self) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(pk) = self.peek() {
            if is_basic_alphabetic(pk) || is_basic_digit(pk) {
                s.push(self.bump());
            } else {
                break;
            }
        }
        if let Some(pk) = self.peek() {
            if is_basic_sigil(pk) {
                let sigil = self.bump();
                s.push(sigil);
                return Ok(TokenKind::Ident(match sigil {
                    '$' => Ident::String(s),
                    '%' => Ident::Integer(s),
                    '&' => Ident::Long(s),
                    '!' => Ident::Single(s),
                    _ => Ident::Double(s),
                }));
            }
        }
        let upper = s.to_ascii_uppercase();
        if upper == "REM" {
            self.take_rest_of_line(&mut s);
            return Ok(TokenKind::Remark(s));
        }
        if let Some(word) = Word::from_str(&upper) {
            return Ok(TokenKind::Word(word));
        }
        if let Some(op) = Operator::from_str(&upper) {
            return Ok(TokenKind::Operator(op));
        }
        if self.statement_start && self.peek() == Some(':') {
            self.bump();
            return Ok(TokenKind::JumpLabel(s));
        }
        Ok(TokenKind::Ident(Ident::Plain(s)))
    }

    fn minutia(&mut self, start: Position) -> Result<TokenKind> {
        use Operator::*;
        let op = |op| TokenKind::Operator(op);
        Ok(match self.bump() {
            '<' => match self.peek() {
                Some('=') => {
                    self.bump();
                    op(LessEqual)
                }
                Some('>') => {
                    self.bump();
                    op(NotEqual)
                }
                _ => op(Less),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.bump();
                    op(GreaterEqual)
                }
                _ => op(Greater),
            },
            '=' => op(Equal),
            '+' => op(Plus),
            '-' => op(Minus),
            '*' => op(Multiply),
            '/' => op(Divide),
            '\\' => op(DivideInt),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            _ => {
                return Err(error!(Tokenize; "UNKNOWN CHARACTER")
                    .in_range(&Range::new(start, self.last)));
            }
        })
    }
}
