//! Token kinds and the `Token` value produced by the lexer.
//!
//! The kind enumeration is closed: every sublanguage (YANG module syntax, the
//! configuration-file syntax, XPath, and the string re-tokenise pass) shares
//! it, and each variant is tagged with the sublanguages it is legal in via
//! [`TokenKind::is_valid_in`].

use smol_str::SmolStr;
use std::fmt;

/// The sublanguage a [`crate::lexer::TokenChain`] is lexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// Plain YANG module/submodule syntax.
    Module,
    /// The `.conf`-style configuration file syntax (newline-significant).
    Config,
    /// An embedded XPath expression (`must`, `when`, `path`).
    XPath,
    /// Re-tokenising the content of a previously lexed string token.
    Retokenise,
}

/// The closed set of token kinds recognised across all sublanguages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural one-char tokens.
    LBrace,
    RBrace,
    Semi,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Equals,
    Pipe,
    Star,
    At,
    Plus,
    Colon,
    Dot,
    Slash,
    Minus,
    LAngle,
    RAngle,

    // Two-char tokens.
    DotDot,
    ColonColon,
    SlashSlash,
    NotEquals,
    LessEquals,
    GreaterEquals,

    // String variants.
    UnquotedString,
    ScopedIdentifier,
    TokenString,
    PrefixedIdentifier,
    PrefixedScopedIdentifier,
    DoubleQuoted,
    SingleQuoted,

    // XPath-specific.
    VariableBinding,
    PrefixedVariableBinding,
    PrefixedNameTestStar,

    // Numbers.
    Decimal,
    Hexadecimal,
    Real,

    // Control.
    Newline,
    None,
}

impl TokenKind {
    /// Whether this kind can be produced while lexing `lang`.
    pub fn is_valid_in(self, lang: SourceLanguage) -> bool {
        use SourceLanguage::*;
        use TokenKind::*;
        match self {
            Newline => matches!(lang, Config),
            VariableBinding | PrefixedVariableBinding | PrefixedNameTestStar => {
                matches!(lang, XPath)
            }
            ScopedIdentifier => matches!(lang, Module),
            DotDot | SlashSlash => matches!(lang, XPath),
            _ => true,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            LBrace => "{",
            RBrace => "}",
            Semi => ";",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Equals => "=",
            Pipe => "|",
            Star => "*",
            At => "@",
            Plus => "+",
            Colon => ":",
            Dot => ".",
            Slash => "/",
            Minus => "-",
            LAngle => "<",
            RAngle => ">",
            DotDot => "..",
            ColonColon => "::",
            SlashSlash => "//",
            NotEquals => "!=",
            LessEquals => "<=",
            GreaterEquals => ">=",
            UnquotedString => "unquoted string",
            ScopedIdentifier => "scoped identifier",
            TokenString => "identifier",
            PrefixedIdentifier => "prefixed identifier",
            PrefixedScopedIdentifier => "prefixed scoped identifier",
            DoubleQuoted => "double-quoted string",
            SingleQuoted => "single-quoted string",
            VariableBinding => "variable binding",
            PrefixedVariableBinding => "prefixed variable binding",
            PrefixedNameTestStar => "prefixed name test",
            Decimal => "number",
            Hexadecimal => "hex number",
            Real => "real number",
            Newline => "newline",
            None => "<end>",
        };
        f.write_str(s)
    }
}

/// A classified lexical token.
///
/// Invariant: `kind` alone determines whether `value`/`prefix` carry
/// meaning. Every token owns its bytes outright (no borrowed/adopted split,
/// see `DESIGN.md`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<SmolStr>,
    pub prefix: Option<SmolStr>,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, column: u32) -> Self {
        Token { kind, value: None, prefix: None, line, column }
    }

    pub fn with_value(kind: TokenKind, value: impl Into<SmolStr>, line: u32, column: u32) -> Self {
        Token { kind, value: Some(value.into()), prefix: None, line, column }
    }

    pub fn with_prefix_value(
        kind: TokenKind,
        prefix: impl Into<SmolStr>,
        value: impl Into<SmolStr>,
        line: u32,
        column: u32,
    ) -> Self {
        Token { kind, value: Some(value.into()), prefix: Some(prefix.into()), line, column }
    }

    /// The sentinel "before first token" / end-of-chain marker.
    pub fn sentinel() -> Self {
        Token { kind: TokenKind::None, value: None, prefix: None, line: 0, column: 0 }
    }

    /// The `prefix:name` text form, or just the value if there is no prefix.
    pub fn composed_value(&self) -> SmolStr {
        match (&self.prefix, &self.value) {
            (Some(p), Some(v)) => SmolStr::new(format!("{p}:{v}")),
            (None, Some(v)) => v.clone(),
            _ => SmolStr::default(),
        }
    }

    pub fn is_string_like(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::UnquotedString
                | TokenKind::ScopedIdentifier
                | TokenKind::TokenString
                | TokenKind::PrefixedIdentifier
                | TokenKind::PrefixedScopedIdentifier
                | TokenKind::DoubleQuoted
                | TokenKind::SingleQuoted
        )
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self.kind, TokenKind::DoubleQuoted | TokenKind::SingleQuoted)
    }
}
