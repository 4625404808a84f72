use std::fmt;
use std::ops::Range;

use winnow::{
    ascii::{digit1, multispace0},
    combinator::{delimited, opt},
    error::{ContextError, ParseError, StrContext, StrContextValue},
    prelude::*,
    token::one_of,
};

/// Why a token failed to lex, with the failing byte range inside the token
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Error {
    messages: Vec<String>,
    span: Range<usize>,
}

impl Error {
    fn from_parse(error: ParseError<&str, ContextError>) -> Error {
        let span = error.char_span();
        let messages = error.inner().context().map(|e| e.to_string()).collect();

        Self { messages, span }
    }
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.messages.last() {
            Some(msg) => write!(f, "{msg} at {:?}", self.span()),
            None => write!(f, "unexpected input at {:?}", self.span()),
        }
    }
}

fn ctx_label(name: &'static str) -> StrContext {
    StrContext::Label(name)
}

fn ctx_desc(desc: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(desc))
}

/// An optionally signed base-10 integer
fn integer(input: &mut &str) -> ModalResult<i64> {
    (opt(one_of(['+', '-'])), digit1)
        .take()
        .try_map(|n: &str| n.parse::<i64>())
        .context(ctx_label("integer"))
        .context(ctx_desc("decimal digits"))
        .parse_next(input)
}

/// Lexes a whole token as a decimal number.
///
/// Surrounding whitespace is allowed, anything else left over is an error,
/// so `0x5` and `5x` are rejected instead of being read as `0` and `5`.
pub fn number(token: &str) -> Result<i64, Error> {
    delimited(multispace0, integer, multispace0)
        .parse(token)
        .map_err(Error::from_parse)
}
