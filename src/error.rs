//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across all of its
//! modules. An error's identity is its [ErrorKind], which carries the structured
//! context of the failure (the type and field that miss a value, the variable
//! token that couldn't be found, and so on). Rendering a kind into a message is
//! a presentation concern and lives in the [`fmt::Display`] implementations.

use logos::Span;
use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a kind and an optional context string. For schema
/// parsing the context string is populated with a snippet of the source text,
/// while errors raised during resolution or substitution carry all of their
/// context on the kind itself.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
}

/// The closed set of failures this crate produces.
///
/// Each variant carries the structured fields a caller needs to surface an
/// actionable message without additional lookups.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The schema source text is not valid SDL.
    Syntax(String),
    /// The schema parsed but references undefined or mismatched types.
    Validation(String),
    /// A non-null field of a type has no value in a checked payload object.
    MissingField {
        type_name: String,
        field_name: String,
    },
    /// A variable token has no entry in the supplied variable map. The token
    /// includes the leading marker character.
    MissingVariable { token: String },
    /// The rewritten body template is not valid JSON. Carries the rewritten
    /// text so the caller can see what was attempted.
    Unmarshal { body: String },
    /// Curly braces in a body template don't balance.
    UnmatchedBraces,
    /// A body template contains a character outside the template language.
    InvalidCharacter(char),
    /// A URL template couldn't be parsed as a URL.
    InvalidUrl(String),
}

impl Error {
    /// Create a new Error from an error kind alone.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
            context: None,
        }
    }

    /// Create a new Error from an error kind with a source location and a
    /// context snippet of the source text.
    pub fn new_with_context(kind: ErrorKind, location: Option<Location>, context: String) -> Self {
        Self {
            kind,
            location,
            context: Some(context),
        }
    }

    /// Returns the kind of the current error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the rendered message of the current error. The context is
    /// discarded.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Formats this error, with the option to include the context information
    /// as well, which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = self.kind.to_string();
        match self.context {
            Some(ref context) if include_ctx => format!("{}\n{}", formatted, context),
            _ => formatted,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax(message) => write!(f, "Syntax Error: {}", message),
            ErrorKind::Validation(message) => write!(f, "Validation Error: {}", message),
            ErrorKind::MissingField {
                type_name,
                field_name,
            } => write!(
                f,
                "type {} requires a value for field {}, but no value present",
                type_name, field_name
            ),
            ErrorKind::MissingVariable { token } => {
                write!(f, "couldn't find variable: {} in variables map", token)
            }
            ErrorKind::Unmarshal { body } => {
                write!(f, "couldn't unmarshal HTTP body: {} as JSON", body)
            }
            ErrorKind::UnmatchedBraces => {
                write!(f, "found unmatched curly braces while parsing body template")
            }
            ErrorKind::InvalidCharacter(character) => write!(
                f,
                "invalid character: {} while parsing body template",
                character
            ),
            ErrorKind::InvalidUrl(url) => write!(f, "couldn't parse URL: {}", url),
        }
    }
}

pub(crate) fn print_span(source: &str, span: Span) -> String {
    let mut out = String::new();
    let start_line = source[..span.start].lines().count();

    let start = source[..span.start]
        .rfind('\n')
        .and_then(|start| source[..start].rfind('\n'))
        .map_or(0, |idx| idx + 1);

    let end = source[span.end..]
        .find('\n')
        .map_or(source.len(), |idx| idx + span.end);

    let snippet = &source[start..end];
    let line_num_pad = (start_line + snippet.lines().count() - 1).to_string().len();
    for (index, line) in snippet.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let line_num = (start_line + index).to_string();
        out.push_str(&" ".repeat(line_num_pad - line_num.len() + 1));
        out.push_str(&line_num);
        out.push_str(" | ");
        out.push_str(line);
    }
    if source[span.start..span.end].find('\n').is_none() {
        let start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
        out.push('\n');
        out.push_str(&" ".repeat(line_num_pad + 1));
        out.push_str(" | ");
        out.push_str(&" ".repeat(span.start - start));
        out.push_str(&"^".repeat(span.end - span.start));
    };

    out
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub(crate) fn get_location(source: &str, span: Span) -> Location {
    let line = source[..span.start].lines().count();
    let col = source[..span.start]
        .lines()
        .last()
        .map_or(span.start, |x| x.len());

    Location { line, column: col }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}
