//! The error taxonomy from spec.md §7, as `thiserror`-derived enums.
//!
//! `YangError` covers lex, parse, structural and resource/IO failures that
//! can fail a load outright (or be recovered locally by
//! [`crate::statement_parser::skip_statement`]). `Warning` covers the
//! semantic warnings that never fail a load.

use std::path::PathBuf;
use thiserror::Error;

use crate::token::TokenKind;

#[derive(Debug, Clone, Error)]
pub enum YangError {
    // Lex errors.
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid hexadecimal number")]
    InvalidHexNumber,
    #[error("invalid real number")]
    InvalidRealNumber,
    #[error("invalid decimal number")]
    InvalidDecimalNumber,
    #[error("token length exceeds the maximum of {limit} bytes")]
    LengthExceeded { limit: usize },

    // Parse errors.
    #[error("expected a string, found {found}")]
    ExpectedString { found: TokenKind },
    #[error("expected a keyword, found {found}")]
    ExpectedKeyword { found: TokenKind },
    #[error("unexpected token kind {found}, expected {expected}")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },
    #[error("unexpected value '{found}', expected one of {expected}")]
    WrongTokenValue { expected: String, found: String },
    #[error("'{0}' is not a valid YANG identifier")]
    InvalidName(String),
    #[error("'{0}' is not a valid value here")]
    InvalidValue(String),
    #[error("'+' must be followed by a quoted string")]
    BadConcat,

    // Structural errors.
    #[error("'{0}' is already defined for this statement")]
    DuplicateEntry(String),
    #[error("'{0}' already exists")]
    EntryExists(String),
    #[error("definition '{0}' not found")]
    DefNotFound(String),
    #[error("prefix '{0}' not found")]
    PrefixNotFound(String),
    #[error("import loop detected at module '{0}'")]
    ImportLoop(String),
    #[error("include loop detected at submodule '{0}'")]
    IncludeLoop(String),
    #[error("module '{0}' not found in the search path")]
    ModuleNotFound(String),

    // Resource / IO.
    #[error("out of memory")]
    OutOfMemory,
    #[error("failed to read '{path}': {message}")]
    ReadFailed { path: PathBuf, message: String },
    #[error("unexpected end of input")]
    Eof,
}

#[derive(Debug, Clone, Error)]
pub enum Warning {
    #[error("typedef '{0}' is defined but never used")]
    TypedefNotUsed(String),
    #[error("grouping '{0}' is defined but never used")]
    GroupingNotUsed(String),
    #[error("import of '{0}' is never used")]
    ImportNotUsed(String),
    #[error("revision date '{0}' is before 1970-01-01")]
    DatePast(String),
    #[error("revision date '{0}' is later than today")]
    DateFuture(String),
}

/// The outcome of a single `load_module` invocation: either a usable handle
/// with zero or more warnings, or no handle and at least one error
/// diagnostic (spec.md §7, "user-visible failure behaviour").
pub type YangResult<T> = Result<T, YangError>;
