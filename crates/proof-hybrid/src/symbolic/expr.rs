//! Arithmetic expression parsing and evaluation.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{E, PI};

use proof_core::{ErrorInfo, ProofError};

/// Deepest expression tree the parser builds. Bracket nesting, unary signs,
/// exponent towers and operator chains all count toward it.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

fn parse_error(message: impl Into<String>, source: &str) -> ProofError {
    ProofError::Symbolic(ErrorInfo::new("parse-expression", message).with_context("expression", source))
}

/// Built-in unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Square root.
    Sqrt,
    /// Natural logarithm, also spelled `ln`.
    Log,
    /// Exponential.
    Exp,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Absolute value.
    Abs,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Function::Sqrt,
            "log" | "ln" => Function::Log,
            "exp" => Function::Exp,
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "abs" => Function::Abs,
            _ => return None,
        })
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            Function::Sqrt => value.sqrt(),
            Function::Log => value.ln(),
            Function::Exp => value.exp(),
            Function::Sin => value.sin(),
            Function::Cos => value.cos(),
            Function::Tan => value.tan(),
            Function::Abs => value.abs(),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`, or juxtaposition such as `2x`.
    Mul,
    /// `/`
    Div,
    /// `^` or `**`.
    Pow,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal or named constant.
    Number(f64),
    /// Free variable.
    Variable(String),
    /// Negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Function application.
    Call(Function, Box<Expr>),
}

impl Expr {
    /// Parses `source` into an expression tree.
    pub fn parse(source: &str) -> Result<Self, ProofError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ProofError::Symbolic(
                ErrorInfo::new("empty-expression", "expression is empty")
                    .with_hint("both sides of an equation need content"),
            ));
        }
        let mut parser = Parser {
            tokens,
            position: 0,
            depth: 0,
            source,
        };
        let expr = parser.expression()?;
        if let Some(token) = parser.peek() {
            return Err(parse_error(format!("unexpected token {token:?}"), source));
        }
        Ok(expr)
    }

    /// Collects the names of free variables.
    pub fn variables(&self, into: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                into.insert(name.clone());
            }
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.variables(into),
            Expr::Binary(_, lhs, rhs) => {
                lhs.variables(into);
                rhs.variables(into);
            }
        }
    }

    /// Evaluates the expression. Unbound variables evaluate to NaN.
    pub fn eval(&self, bindings: &BTreeMap<String, f64>) -> f64 {
        match self {
            Expr::Number(value) => *value,
            Expr::Variable(name) => bindings.get(name).copied().unwrap_or(f64::NAN),
            Expr::Neg(inner) => -inner.eval(bindings),
            Expr::Call(function, inner) => function.apply(inner.eval(bindings)),
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(bindings), rhs.eval(bindings));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Result<Vec<Token>, ProofError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        match ch {
            c if c.is_whitespace() => idx += 1,
            c if c.is_ascii_digit() || c == '.' => {
                let start = idx;
                while idx < chars.len() && (chars[idx].is_ascii_digit() || chars[idx] == '.') {
                    idx += 1;
                }
                let literal: String = chars[start..idx].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| parse_error(format!("invalid number '{literal}'"), source))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = idx;
                while idx < chars.len() && (chars[idx].is_alphanumeric() || chars[idx] == '_') {
                    idx += 1;
                }
                tokens.push(Token::Ident(chars[start..idx].iter().collect()));
            }
            '*' if chars.get(idx + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                idx += 2;
            }
            _ => {
                tokens.push(match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' | '×' | '·' => Token::Star,
                    '/' | '÷' => Token::Slash,
                    '^' => Token::Caret,
                    '(' | '[' => Token::LParen,
                    ')' | ']' => Token::RParen,
                    other => return Err(parse_error(format!("unexpected character '{other}'"), source)),
                });
                idx += 1;
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Enters one more tree level, failing past [`MAX_EXPRESSION_DEPTH`].
    fn descend(&mut self) -> Result<(), ProofError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(ProofError::Symbolic(
                ErrorInfo::new(
                    "expression-too-deep",
                    format!("expression nests deeper than {MAX_EXPRESSION_DEPTH} levels"),
                )
                .with_context("length", self.source.len().to_string()),
            ));
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<Expr, ProofError> {
        let entry = self.depth;
        let mut expr = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.position += 1;
            self.descend()?;
            let rhs = self.term()?;
            expr = Expr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        self.depth = entry;
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ProofError> {
        let entry = self.depth;
        let mut expr = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => {
                    self.position += 1;
                    BinaryOp::Mul
                }
                Some(Token::Slash) => {
                    self.position += 1;
                    BinaryOp::Div
                }
                // Juxtaposition: `2x`, `2(x + 1)`, `(a)(b)`.
                Some(Token::Number(_)) | Some(Token::Ident(_)) | Some(Token::LParen) => BinaryOp::Mul,
                _ => break,
            };
            self.descend()?;
            let rhs = self.unary()?;
            expr = Expr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        self.depth = entry;
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ProofError> {
        self.descend()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.position += 1;
                Expr::Neg(Box::new(self.unary()?))
            }
            Some(Token::Plus) => {
                self.position += 1;
                self.unary()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn power(&mut self) -> Result<Expr, ProofError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.position += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ProofError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Ident(name)) => self.identifier(name),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect_close()?;
                Ok(inner)
            }
            Some(token) => Err(parse_error(format!("unexpected token {token:?}"), self.source)),
            None => Err(parse_error("unexpected end of expression", self.source)),
        }
    }

    fn identifier(&mut self, name: String) -> Result<Expr, ProofError> {
        if let Some(function) = Function::from_name(&name) {
            if self.advance() != Some(Token::LParen) {
                return Err(parse_error(
                    format!("function '{name}' needs a parenthesised argument"),
                    self.source,
                ));
            }
            let argument = self.expression()?;
            self.expect_close()?;
            return Ok(Expr::Call(function, Box::new(argument)));
        }
        Ok(match name.as_str() {
            "pi" | "π" => Expr::Number(PI),
            "e" => Expr::Number(E),
            _ => Expr::Variable(name),
        })
    }

    fn expect_close(&mut self) -> Result<(), ProofError> {
        match self.advance() {
            Some(Token::RParen) => Ok(()),
            _ => Err(parse_error("missing closing parenthesis", self.source)),
        }
    }
}
