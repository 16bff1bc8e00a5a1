//! `TokenChain`: the lexer (spec.md §4.2).
//!
//! Grounded on the teacher's `lexer.rs`/`parser.rs` split (a table of small
//! `LexingRule`s run in order, `lexer::lex` turning a whole buffer into a
//! flat `Vec<Token>`), but adapted so the chain is a replayable, backable-up
//! cursor over owned tokens rather than a rowan green-tree builder — that is
//! what spec.md's `current/advance/backup/reset` contract needs.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::char_source::CharSource;
use crate::diagnostics::{BuildDiagnostics, SourceLocation};
use crate::error::YangError;
use crate::token::{SourceLanguage, Token, TokenKind};

/// Per-token byte cap (spec.md §7 length-exceeded).
pub const MAX_TOKEN_LEN: usize = 8192;
/// Cap on a single quoted string literal before concatenation.
pub const MAX_QUOTED_STRING_LEN: usize = 65536;
/// Cap on the byte length of a `+`-concatenated string chain.
pub const MAX_CONCAT_LEN: usize = 65536;

/// A fatal lex error: the current load must abort (spec.md §7).
#[derive(Debug, Clone)]
pub struct LexFailure {
    pub error: YangError,
    pub line: u32,
    pub column: u32,
}

impl LexFailure {
    pub fn location(&self, file: Option<PathBuf>) -> SourceLocation {
        SourceLocation::new(file, self.line, self.column)
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

const TAB_WIDTH: u32 = 8;

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0, line: 1, column: 1 }
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Consume one byte, updating line/column bookkeeping.
    fn bump(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b == b'\t' {
            self.column = ((self.column - 1) / TAB_WIDTH + 1) * TAB_WIDTH + 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8, lang: SourceLanguage) -> bool {
    b.is_ascii_alphanumeric()
        || b == b'_'
        || (!matches!(lang, SourceLanguage::Retokenise) && (b == b'-' || b == b'.'))
}

const TWO_CHAR_TOKENS: &[(&[u8], TokenKind)] = &[
    (b"..", TokenKind::DotDot),
    (b"::", TokenKind::ColonColon),
    (b"//", TokenKind::SlashSlash),
    (b"!=", TokenKind::NotEquals),
    (b"<=", TokenKind::LessEquals),
    (b">=", TokenKind::GreaterEquals),
];

const ONE_CHAR_TOKENS: &[(u8, TokenKind)] = &[
    (b'{', TokenKind::LBrace),
    (b'}', TokenKind::RBrace),
    (b';', TokenKind::Semi),
    (b'(', TokenKind::LParen),
    (b')', TokenKind::RParen),
    (b'[', TokenKind::LBracket),
    (b']', TokenKind::RBracket),
    (b',', TokenKind::Comma),
    (b'=', TokenKind::Equals),
    (b'|', TokenKind::Pipe),
    (b'*', TokenKind::Star),
    (b'@', TokenKind::At),
    (b'+', TokenKind::Plus),
    (b':', TokenKind::Colon),
    (b'.', TokenKind::Dot),
    (b'/', TokenKind::Slash),
    (b'-', TokenKind::Minus),
    (b'<', TokenKind::LAngle),
    (b'>', TokenKind::RAngle),
];

/// The lexer proper. Populated by [`TokenChain::tokenise`], then consumed by
/// the parser via `current/advance/backup/reset`.
pub struct TokenChain {
    tokens: Vec<Token>,
    /// 0 means "before the first token" (the sentinel); `i` (i >= 1) means
    /// `tokens[i - 1]` is current.
    cursor: usize,
    lang: SourceLanguage,
    file_name: Option<PathBuf>,
    pending: Option<PendingSource>,
    diagnostics: BuildDiagnostics,
}

enum PendingSource {
    File(CharSource),
    Buffer(Vec<u8>),
}

impl TokenChain {
    pub fn new(lang: SourceLanguage) -> Self {
        TokenChain {
            tokens: Vec::new(),
            cursor: 0,
            lang,
            file_name: None,
            pending: None,
            diagnostics: BuildDiagnostics::default(),
        }
    }

    pub fn attach_file(&mut self, path: impl AsRef<Path>, file: File) {
        let path = path.as_ref().to_path_buf();
        self.file_name = Some(path.clone());
        self.pending = Some(PendingSource::File(CharSource::from_file(path, file)));
    }

    pub fn attach_buffer(&mut self, bytes: impl Into<Vec<u8>>) {
        self.pending = Some(PendingSource::Buffer(bytes.into()));
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn diagnostics(&self) -> &BuildDiagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> BuildDiagnostics {
        self.diagnostics
    }

    /// Run the lexer to completion, producing every token. Returns the fatal
    /// error (if any); non-fatal lex errors are recorded as diagnostics and
    /// lexing continues (spec.md §7).
    pub fn tokenise(&mut self) -> Result<(), LexFailure> {
        let bytes = match self.pending.take() {
            Some(PendingSource::Buffer(b)) => b,
            Some(PendingSource::File(mut src)) => {
                src.read_to_end().map_err(|e| LexFailure {
                    error: YangError::ReadFailed {
                        path: self.file_name.clone().unwrap_or_default(),
                        message: e.to_string(),
                    },
                    line: 1,
                    column: 1,
                })?
            }
            None => Vec::new(),
        };
        self.lex_all(&bytes)?;
        if !matches!(self.lang, SourceLanguage::XPath) {
            self.concatenate_strings()?;
        }
        Ok(())
    }

    fn push_token(&mut self, token: Token) {
        let cap = if token.is_quoted() { MAX_QUOTED_STRING_LEN } else { MAX_TOKEN_LEN };
        if let Some(v) = &token.value {
            if v.len() > cap {
                self.diagnostics.push_error(
                    YangError::LengthExceeded { limit: cap }.to_string(),
                    SourceLocation::new(self.file_name.clone(), token.line, token.column),
                );
            }
        }
        self.tokens.push(token);
    }

    fn lex_all(&mut self, bytes: &[u8]) -> Result<(), LexFailure> {
        let mut cur = Cursor::new(bytes);
        loop {
            self.skip_spaces_and_tabs(&mut cur);
            if cur.eof() {
                break;
            }
            let line = cur.line;
            let column = cur.column;
            let b = cur.peek().unwrap();

            // Newline handling.
            if b == b'\n' {
                cur.bump();
                if matches!(self.lang, SourceLanguage::Config) {
                    self.push_token(Token::new(TokenKind::Newline, line, column));
                }
                continue;
            }
            if b == b'\r' {
                cur.bump();
                continue;
            }

            // Comments.
            if matches!(self.lang, SourceLanguage::Config) && b == b'#' {
                while !cur.eof() && cur.peek() != Some(b'\n') {
                    cur.bump();
                }
                continue;
            }
            if matches!(self.lang, SourceLanguage::Module) && b == b'/' && cur.peek_at(1) == Some(b'/') {
                cur.bump_n(2);
                while !cur.eof() && cur.peek() != Some(b'\n') {
                    cur.bump();
                }
                continue;
            }
            if matches!(self.lang, SourceLanguage::Module) && b == b'/' && cur.peek_at(1) == Some(b'*') {
                cur.bump_n(2);
                loop {
                    if cur.eof() {
                        return Err(LexFailure { error: YangError::UnterminatedComment, line, column });
                    }
                    if cur.peek() == Some(b'*') && cur.peek_at(1) == Some(b'/') {
                        cur.bump_n(2);
                        break;
                    }
                    cur.bump();
                }
                continue;
            }

            // Quoted strings.
            if b == b'"' {
                let tok = self.lex_double_quoted(&mut cur, line, column)?;
                self.push_token(tok);
                continue;
            }
            if b == b'\'' {
                let tok = self.lex_single_quoted(&mut cur, line, column)?;
                self.push_token(tok);
                continue;
            }

            // XPath variable binding.
            if matches!(self.lang, SourceLanguage::XPath) && b == b'$' {
                cur.bump();
                let start = cur.pos;
                while !cur.eof() && (is_ident_start(cur.peek().unwrap()) || cur.pos > start && cur.peek().unwrap().is_ascii_alphanumeric()) {
                    cur.bump();
                }
                let text = String::from_utf8_lossy(&bytes[start..cur.pos]).into_owned();
                if let Some((prefix, name)) = text.split_once(':') {
                    self.push_token(Token::with_prefix_value(
                        TokenKind::PrefixedVariableBinding,
                        prefix,
                        name,
                        line,
                        column,
                    ));
                } else {
                    self.push_token(Token::with_value(TokenKind::VariableBinding, text, line, column));
                }
                continue;
            }

            // Identifiers (with optional prefix / scoped form).
            if is_ident_start(b) {
                let tok = self.lex_identifier(&mut cur, line, column);
                self.push_token(tok);
                continue;
            }

            // Numbers.
            let numeric_start = b.is_ascii_digit()
                || ((b == b'+' || b == b'-')
                    && cur.peek_at(1).is_some_and(|n| n.is_ascii_digit())
                    && matches!(self.lang, SourceLanguage::Config));
            if numeric_start {
                let tok = self.lex_number(&mut cur, line, column)?;
                self.push_token(tok);
                continue;
            }

            // Two-char, then one-char tables. ".." and "//" only apply in
            // XPath; in module syntax they are filtered out of this match by
            // `is_valid_in`-style legality, so they fall through to a pair of
            // one-char tokens instead.
            if let Some((_, kind)) = TWO_CHAR_TOKENS
                .iter()
                .find(|(text, kind)| cur.rest().starts_with(text) && kind.is_valid_in(self.lang))
            {
                let kind = *kind;
                cur.bump_n(2);
                self.push_token(Token::new(kind, line, column));
                continue;
            }
            if let Some((_, kind)) = ONE_CHAR_TOKENS.iter().find(|(c, _)| *c == b) {
                cur.bump();
                self.push_token(Token::new(*kind, line, column));
                continue;
            }

            // Fallback: unquoted string, consumed to the next delimiter.
            let tok = self.lex_unquoted(&mut cur, line, column);
            log::debug!("lexer: falling back to unquoted string at {line}.{column}");
            self.push_token(tok);
        }
        Ok(())
    }

    fn skip_spaces_and_tabs(&self, cur: &mut Cursor<'_>) {
        while matches!(cur.peek(), Some(b' ') | Some(b'\t')) {
            cur.bump();
        }
    }

    fn lex_identifier(&mut self, cur: &mut Cursor<'_>, line: u32, column: u32) -> Token {
        let bytes = cur.bytes;
        let start = cur.pos;
        cur.bump();
        while !cur.eof() && is_ident_continue(cur.peek().unwrap(), self.lang) {
            cur.bump();
        }
        let name_end = cur.pos;

        // `prefix:name` (but not a bare `::`, which is a standalone token).
        if cur.peek() == Some(b':') && cur.peek_at(1) != Some(b':') {
            let prefix = String::from_utf8_lossy(&bytes[start..name_end]).into_owned();
            cur.bump();
            let comp_start = cur.pos;
            if matches!(self.lang, SourceLanguage::XPath) && cur.peek() == Some(b'*') {
                cur.bump();
                return Token::with_prefix_value(TokenKind::PrefixedNameTestStar, prefix, "*", line, column);
            }
            while !cur.eof() && is_ident_continue(cur.peek().unwrap(), self.lang) {
                cur.bump();
            }
            let name = String::from_utf8_lossy(&bytes[comp_start..cur.pos]).into_owned();
            return Token::with_prefix_value(TokenKind::PrefixedIdentifier, prefix, name, line, column);
        }

        // `a::b::c` scoped identifier — module syntax only, and immediately
        // demoted to a plain unquoted string (spec.md §4.2 step 7).
        if matches!(self.lang, SourceLanguage::Module) && cur.peek() == Some(b':') && cur.peek_at(1) == Some(b':') {
            while cur.peek() == Some(b':') && cur.peek_at(1) == Some(b':') {
                cur.bump_n(2);
                while !cur.eof() && is_ident_continue(cur.peek().unwrap(), self.lang) {
                    cur.bump();
                }
            }
            let text = String::from_utf8_lossy(&bytes[start..cur.pos]).into_owned();
            return Token::with_value(TokenKind::UnquotedString, text, line, column);
        }

        let text = String::from_utf8_lossy(&bytes[start..name_end]).into_owned();
        Token::with_value(TokenKind::TokenString, text, line, column)
    }

    fn lex_number(&mut self, cur: &mut Cursor<'_>, line: u32, column: u32) -> Result<Token, LexFailure> {
        let bytes = cur.bytes;
        let start = cur.pos;
        if cur.peek() == Some(b'+') || cur.peek() == Some(b'-') {
            cur.bump();
        }
        if cur.peek() == Some(b'0') && matches!(cur.peek_at(1), Some(b'x') | Some(b'X')) {
            cur.bump_n(2);
            let digits_start = cur.pos;
            while cur.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                cur.bump();
            }
            if cur.pos == digits_start {
                return Err(LexFailure { error: YangError::InvalidHexNumber, line, column });
            }
            let text = String::from_utf8_lossy(&bytes[start..cur.pos]).into_owned();
            return Ok(Token::with_value(TokenKind::Hexadecimal, text, line, column));
        }

        while cur.peek().is_some_and(|b| b.is_ascii_digit()) {
            cur.bump();
        }
        // A real number has a single '.' followed by at least one digit, and
        // is not the start of a ".." range token.
        if cur.peek() == Some(b'.') && cur.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            cur.bump();
            while cur.peek().is_some_and(|b| b.is_ascii_digit()) {
                cur.bump();
            }
            let text = String::from_utf8_lossy(&bytes[start..cur.pos]).into_owned();
            return Ok(Token::with_value(TokenKind::Real, text, line, column));
        }
        if cur.pos == start || (cur.pos == start + 1 && matches!(bytes[start], b'+' | b'-')) {
            return Err(LexFailure { error: YangError::InvalidDecimalNumber, line, column });
        }
        let text = String::from_utf8_lossy(&bytes[start..cur.pos]).into_owned();
        Ok(Token::with_value(TokenKind::Decimal, text, line, column))
    }

    fn lex_double_quoted(&mut self, cur: &mut Cursor<'_>, line: u32, column: u32) -> Result<Token, LexFailure> {
        cur.bump(); // opening quote
        let mut out = String::new();
        let mut raw_lines: Vec<String> = vec![String::new()];
        loop {
            match cur.peek() {
                None => return Err(LexFailure { error: YangError::UnterminatedString, line, column }),
                Some(b'"') => {
                    cur.bump();
                    break;
                }
                Some(b'\\') => {
                    cur.bump();
                    match cur.peek() {
                        None => return Err(LexFailure { error: YangError::UnterminatedString, line, column }),
                        Some(b'n') => {
                            cur.bump();
                            raw_lines.last_mut().unwrap().push('\n');
                        }
                        Some(b't') => {
                            cur.bump();
                            raw_lines.last_mut().unwrap().push('\t');
                        }
                        Some(b'"') => {
                            cur.bump();
                            raw_lines.last_mut().unwrap().push('"');
                        }
                        Some(b'\\') => {
                            cur.bump();
                            raw_lines.last_mut().unwrap().push('\\');
                        }
                        Some(other) => {
                            // Pass other `\x` through unchanged.
                            raw_lines.last_mut().unwrap().push('\\');
                            raw_lines.last_mut().unwrap().push(other as char);
                            cur.bump();
                        }
                    }
                }
                Some(b'\n') => {
                    cur.bump();
                    raw_lines.push(String::new());
                }
                Some(_) => {
                    let ch_start = cur.pos;
                    cur.bump();
                    // extend over multi-byte utf8 continuation bytes
                    while cur.peek().is_some_and(|b| (b & 0xC0) == 0x80) {
                        cur.bump();
                    }
                    raw_lines
                        .last_mut()
                        .unwrap()
                        .push_str(&String::from_utf8_lossy(&cur.bytes[ch_start..cur.pos]));
                }
            }
        }

        // Indent-relative dedent (skipped when lexing XPath): trim trailing
        // whitespace on each non-final line before the embedded newline,
        // then strip up to `column` leading columns of whitespace from every
        // continuation line.
        if raw_lines.len() > 1 && !matches!(self.lang, SourceLanguage::XPath) {
            let dedent = (column as usize).saturating_sub(1);
            for l in raw_lines.iter_mut().take(raw_lines.len() - 1) {
                let trimmed_end = l.trim_end_matches([' ', '\t']).len();
                l.truncate(trimmed_end);
            }
            for l in raw_lines.iter_mut().skip(1) {
                let strip = l.chars().take(dedent).take_while(|c| *c == ' ' || *c == '\t').count();
                *l = l.chars().skip(strip).collect();
            }
        }
        out.push_str(&raw_lines.join("\n"));
        if out.len() > MAX_QUOTED_STRING_LEN {
            return Err(LexFailure { error: YangError::LengthExceeded { limit: MAX_QUOTED_STRING_LEN }, line, column });
        }
        Ok(Token::with_value(TokenKind::DoubleQuoted, out, line, column))
    }

    fn lex_single_quoted(&mut self, cur: &mut Cursor<'_>, line: u32, column: u32) -> Result<Token, LexFailure> {
        cur.bump(); // opening quote
        let start = cur.pos;
        loop {
            match cur.peek() {
                None => return Err(LexFailure { error: YangError::UnterminatedString, line, column }),
                Some(b'\'') => break,
                Some(_) => {
                    cur.bump();
                }
            }
        }
        let text = String::from_utf8_lossy(&cur.bytes[start..cur.pos]).into_owned();
        cur.bump(); // closing quote
        if text.len() > MAX_QUOTED_STRING_LEN {
            return Err(LexFailure { error: YangError::LengthExceeded { limit: MAX_QUOTED_STRING_LEN }, line, column });
        }
        Ok(Token::with_value(TokenKind::SingleQuoted, text, line, column))
    }

    fn lex_unquoted(&mut self, cur: &mut Cursor<'_>, line: u32, column: u32) -> Token {
        let start = cur.pos;
        while let Some(b) = cur.peek() {
            if b.is_ascii_whitespace() {
                break;
            }
            if matches!(self.lang, SourceLanguage::Module)
                && (b == b'|' || b == b'+')
                && cur.pos > start
                && cur.bytes.get(cur.pos.wrapping_sub(1)).is_some_and(|p| p.is_ascii_whitespace())
            {
                break;
            }
            if ONE_CHAR_TOKENS.iter().any(|(c, _)| *c == b) && cur.pos > start {
                break;
            }
            cur.bump();
        }
        if cur.pos == start {
            // never stall the lexer: consume at least one byte.
            cur.bump();
        }
        let text = String::from_utf8_lossy(&cur.bytes[start..cur.pos]).into_owned();
        Token::with_value(TokenKind::UnquotedString, text, line, column)
    }

    /// Coalesce runs of `Q1 + Q2 + ... + Qn` (quoted strings joined by `+`)
    /// into a single token, deleting the consumed tokens.
    fn concatenate_strings(&mut self) -> Result<(), LexFailure> {
        let mut result: Vec<Token> = Vec::with_capacity(self.tokens.len());
        let mut i = 0;
        while i < self.tokens.len() {
            if !self.tokens[i].is_quoted() {
                result.push(self.tokens[i].clone());
                i += 1;
                continue;
            }
            let first = self.tokens[i].clone();
            let mut combined = String::new();
            combined.push_str(first.value.as_deref().unwrap_or_default());
            let mut j = i + 1;
            loop {
                if j >= self.tokens.len() || self.tokens[j].kind != TokenKind::Plus {
                    break;
                }
                let plus_line = self.tokens[j].line;
                let plus_col = self.tokens[j].column;
                let Some(next) = self.tokens.get(j + 1) else {
                    return Err(LexFailure { error: YangError::BadConcat, line: plus_line, column: plus_col });
                };
                if !next.is_quoted() {
                    return Err(LexFailure { error: YangError::BadConcat, line: plus_line, column: plus_col });
                }
                let addition = next.value.as_deref().unwrap_or_default();
                if combined.len() + addition.len() > MAX_CONCAT_LEN {
                    return Err(LexFailure {
                        error: YangError::LengthExceeded { limit: MAX_CONCAT_LEN },
                        line: next.line,
                        column: next.column,
                    });
                }
                combined.push_str(addition);
                j += 2;
            }
            result.push(Token::with_value(first.kind, combined, first.line, first.column));
            i = j;
        }
        self.tokens = result;
        Ok(())
    }

    // -- Cursor navigation (spec.md §4.2) --------------------------------

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn current(&self) -> Token {
        if self.cursor == 0 {
            Token::sentinel()
        } else {
            self.tokens[self.cursor - 1].clone()
        }
    }

    pub fn next(&self) -> Token {
        self.tokens.get(self.cursor).cloned().unwrap_or_else(Token::sentinel)
    }

    pub fn next_next(&self) -> Token {
        self.tokens.get(self.cursor + 1).cloned().unwrap_or_else(Token::sentinel)
    }

    pub fn advance(&mut self) -> TokenKind {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        self.current().kind
    }

    pub fn backup(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn location(&self, token: &Token) -> SourceLocation {
        SourceLocation::new(self.file_name.clone(), token.line, token.column)
    }

    /// Replace the current string token with however many tokens its
    /// content would produce under the re-tokenise sublanguage.
    pub fn retokenise_current(&mut self) -> Result<(), LexFailure> {
        let idx = self.cursor.checked_sub(1).expect("retokenise_current called at the sentinel");
        let current = self.tokens[idx].clone();
        let text = current.value.clone().unwrap_or_default();
        let mut sub = TokenChain::new(SourceLanguage::Retokenise);
        sub.attach_buffer(text.as_bytes().to_vec());
        sub.tokenise()?;
        for t in sub.tokens.iter_mut() {
            t.line = current.line;
            t.column = current.column;
        }
        self.tokens.splice(idx..idx + 1, sub.tokens);
        Ok(())
    }

    /// Produce an independent, already-populated chain for an embedded XPath
    /// expression found at `(line, col)` in the enclosing source.
    pub fn tokenise_xpath(bytes: &[u8], line: u32, col: u32) -> (TokenChain, Result<(), LexFailure>) {
        let mut chain = TokenChain::new(SourceLanguage::XPath);
        chain.attach_buffer(bytes.to_vec());
        let result = chain.tokenise();
        for t in chain.tokens.iter_mut() {
            t.line += line - 1;
            if t.line == line {
                t.column += col - 1;
            }
        }
        (chain, result)
    }

    /// Produce an independent, already-populated chain for attribute text
    /// found in NETCONF XML (e.g. `operation="merge"`).
    pub fn tokenise_metadata(bytes: &[u8]) -> (TokenChain, Result<(), LexFailure>) {
        let mut chain = TokenChain::new(SourceLanguage::Config);
        chain.attach_buffer(bytes.to_vec());
        let result = chain.tokenise();
        (chain, result)
    }
}

/// Convenience: lex module-syntax source text in one call.
pub fn lex_module_buffer(bytes: impl Into<Vec<u8>>) -> (TokenChain, Result<(), LexFailure>) {
    let mut chain = TokenChain::new(SourceLanguage::Module);
    chain.attach_buffer(bytes);
    let result = chain.tokenise();
    (chain, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(src: &str) -> Vec<Token> {
        let (chain, result) = lex_module_buffer(src.as_bytes().to_vec());
        result.expect("lex should succeed");
        chain.tokens().to_vec()
    }

    #[test]
    fn minimal_module_tokens() {
        let toks = tokens_of(r#"module m { namespace "u:m"; }"#);
        assert_eq!(toks[0].kind, TokenKind::TokenString);
        assert_eq!(toks[0].value.as_deref(), Some("module"));
        assert_eq!(toks[1].value.as_deref(), Some("m"));
        assert_eq!(toks[2].kind, TokenKind::LBrace);
    }

    #[test]
    fn string_concatenation_collapses_to_one_token() {
        let toks = tokens_of(r#""foo" + 'bar' + "baz""#);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value.as_deref(), Some("foobarbaz"));
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        let (_, result) = lex_module_buffer(b"module m { /* oops".to_vec());
        let err = result.unwrap_err();
        assert!(matches!(err.error, YangError::UnterminatedComment));
    }

    #[test]
    fn comment_closing_as_last_two_bytes_is_accepted() {
        let (_, result) = lex_module_buffer(b"/* hi */".to_vec());
        result.unwrap();
    }

    #[test]
    fn indent_preserving_description() {
        // Opening quote sits at column 3; continuation lines keep one space
        // of relative indentation after the 2-column margin is stripped.
        let src = "description\n  \"line one\n   line two\n   line three\";";
        let toks = tokens_of(src);
        let value = toks.iter().find(|t| t.kind == TokenKind::DoubleQuoted).unwrap();
        assert!(value.value.as_deref().unwrap().starts_with("line one\n"));
    }

    #[test]
    fn replay_from_reset_matches_original_sequence() {
        let (mut chain, result) = lex_module_buffer(b"a b c".to_vec());
        result.unwrap();
        let expected: Vec<_> = chain.tokens().to_vec();
        chain.reset();
        let mut replayed = Vec::new();
        while !chain.is_at_end() {
            chain.advance();
            replayed.push(chain.current());
        }
        assert_eq!(replayed, expected);
    }

    #[test]
    fn prefixed_identifier_splits_prefix_and_name() {
        let toks = tokens_of("t:foo");
        assert_eq!(toks[0].kind, TokenKind::PrefixedIdentifier);
        assert_eq!(toks[0].prefix.as_deref(), Some("t"));
        assert_eq!(toks[0].value.as_deref(), Some("foo"));
    }

    #[test]
    fn concat_associativity() {
        let a = tokens_of(r#""a" + "b" + "c""#);
        let b = tokens_of(r#""a" + "b""#);
        assert_eq!(a[0].value.as_deref(), Some("abc"));
        assert_eq!(b[0].value.as_deref(), Some("ab"));
    }
}
