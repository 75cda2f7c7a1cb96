//! Literal reader for command-line operands.
//!
//! ```text
//! item  := number | #true | #false | true | false | list | var
//! list  := '[' (item (',' item)*)? ']'
//! var   := ident ':' type          (generated-code operands only)
//! ```
//!
//! Spans are reported relative to a caller-supplied base offset, so errors
//! can be rendered against the full command line.

use crate::error::ParseError;
use crate::sc::types::ScType;
use crate::syntax::{Operation, Span};
use crate::value::Value;

pub struct Reader<'src> {
    src: &'src str,
    pos: usize,
    base: u32,
}

impl<'src> Reader<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::with_offset(src, 0)
    }

    /// A reader whose spans start at `base` instead of 0.
    pub fn with_offset(src: &'src str, base: u32) -> Self {
        Self { src, pos: 0, base }
    }

    /// Reads one operand as a generation-time operation. Lists stay literal.
    pub fn read_operation(&mut self) -> Result<Operation, ParseError> {
        let op = self.item(true)?;
        self.expect_end()?;
        Ok(op)
    }

    /// Reads one operand as a runtime value.
    pub fn read_value(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let op = self.item(false)?;
        self.expect_end()?;
        into_value(op).ok_or_else(|| self.invalid(start))
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Ok(()),
            Some(ch) => Err(self.unexpected(ch)),
        }
    }

    fn item(&mut self, allow_vars: bool) -> Result<Operation, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let ch = self.peek_char().ok_or_else(|| ParseError::UnexpectedEof {
            context: "an operand".to_owned(),
        })?;
        match ch {
            '[' => self.list(allow_vars),
            '#' => {
                self.pos += 1;
                let word = self.word();
                match word {
                    "true" => Ok(Operation::constant(true)),
                    "false" => Ok(Operation::constant(false)),
                    _ => Err(self.invalid(start)),
                }
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(start),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = self.word();
                match word {
                    "true" => Ok(Operation::constant(true)),
                    "false" => Ok(Operation::constant(false)),
                    name if allow_vars && self.peek_char() == Some(':') => {
                        let name = name.to_owned();
                        self.pos += 1;
                        let ty_name = self.word();
                        let ty = ScType::from_glsl_name(ty_name).ok_or_else(|| {
                            ParseError::UnknownType {
                                name: ty_name.to_owned(),
                            }
                        })?;
                        Ok(Operation::variable(name, ty))
                    }
                    _ => Err(self.invalid(start)),
                }
            }
            other => Err(self.unexpected(other)),
        }
    }

    fn list(&mut self, allow_vars: bool) -> Result<Operation, ParseError> {
        self.pos += 1; // consume '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.pos += 1;
            return Ok(Operation::List(items));
        }
        loop {
            items.push(self.item(allow_vars)?);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Operation::List(items));
                }
                Some(ch) => return Err(self.unexpected(ch)),
                None => {
                    return Err(ParseError::UnexpectedEof {
                        context: "a list".to_owned(),
                    })
                }
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<Operation, ParseError> {
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        let n: f64 = text.parse().map_err(|_| self.invalid(start))?;
        Ok(Operation::constant(n))
    }

    fn word(&mut self) -> &'src str {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn unexpected(&self, ch: char) -> ParseError {
        ParseError::UnexpectedChar {
            ch,
            pos: self.base + self.pos as u32,
        }
    }

    fn invalid(&self, start: usize) -> ParseError {
        ParseError::InvalidLiteral {
            text: self.src[start..self.pos].to_owned(),
            span: Span::new(self.base + start as u32, self.base + self.pos as u32),
        }
    }
}

/// The value a variable-free operation denotes.
fn into_value(op: Operation) -> Option<Value> {
    match op {
        Operation::Constant(v) => Some(v),
        Operation::List(items) => items
            .into_iter()
            .map(into_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::from),
        Operation::Variable { .. } => None,
    }
}

/// Reads a runtime value from `src`.
pub fn parse_value(src: &str) -> Result<Value, ParseError> {
    Reader::new(src).read_value()
}

/// Reads a generation-time operand from `src`.
pub fn parse_operation(src: &str) -> Result<Operation, ParseError> {
    Reader::new(src).read_operation()
}
