//! Call-site context threaded through every array operation.

use crate::error::Error;
use crate::syntax::Phrase;

/// Default bound on list nesting, matching the interpreter's call-depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Resource limits for runtime evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum list nesting depth an operation recurses through.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Where an operation was invoked from.
#[derive(Debug, Clone, Copy)]
pub enum Site<'a> {
    /// Nothing is known about the call site.
    Bare,
    /// An operator or expression phrase, e.g. `x + y`.
    Phrase(&'a Phrase),
    /// The argument of a named function call, e.g. `max[x, y]`. Errors about
    /// one operand can name its position within the argument.
    Arg {
        function: &'a str,
        phrase: Option<&'a Phrase>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub site: Site<'a>,
    pub limits: Limits,
}

impl<'a> Context<'a> {
    pub fn bare() -> Self {
        Self {
            site: Site::Bare,
            limits: Limits::default(),
        }
    }

    pub fn at_phrase(phrase: &'a Phrase) -> Self {
        Self {
            site: Site::Phrase(phrase),
            limits: Limits::default(),
        }
    }

    pub fn at_arg(function: &'a str, phrase: Option<&'a Phrase>) -> Self {
        Self {
            site: Site::Arg { function, phrase },
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The source phrase of the call site, if known.
    pub fn phrase(&self) -> Option<&'a Phrase> {
        match self.site {
            Site::Bare => None,
            Site::Phrase(p) => Some(p),
            Site::Arg { phrase, .. } => phrase,
        }
    }

    pub fn is_arg(&self) -> bool {
        matches!(self.site, Site::Arg { .. })
    }

    /// Converts `err` into an `Error` located at this call site.
    pub fn locate(&self, err: impl Into<Error>) -> Error {
        let err = err.into();
        match self.phrase() {
            Some(p) => err.at(p.span()),
            None => err,
        }
    }
}
