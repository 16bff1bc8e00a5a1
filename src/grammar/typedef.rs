//! Grammar for `type`, `typedef`, `bit`, and `enum` statements.

use smol_str::SmolStr;

use crate::error::YangError;
use crate::schema::{BitOrEnum, ErrorInfo, Status, Typedef, TypeSpec};
use crate::statement_parser::{skip_statement, ConsumeResult, StatementParser};
use crate::token::TokenKind;

/// `type <name> [{ ... }]`. Assumes the `type` keyword itself was already
/// consumed by the caller.
pub fn parse_type(sp: &mut StatementParser<'_>) -> ConsumeResult<TypeSpec> {
    let (prefix, name) = sp.consume_pid_string()?;
    let mut spec = TypeSpec::named(name);
    spec.prefix = prefix;

    match sp.chain.next().kind {
        TokenKind::Semi => {
            sp.chain.advance();
        }
        TokenKind::LBrace => {
            sp.chain.advance();
            loop {
                let tok = sp.chain.next();
                if tok.kind == TokenKind::RBrace {
                    sp.chain.advance();
                    break;
                }
                if tok.kind == TokenKind::None {
                    let loc = sp.chain.location(&tok);
                    sp.diagnostics.push_error(YangError::Eof.to_string(), loc);
                    return Err(());
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "range") => spec.range = Some(parse_restriction(sp)?),
                    (None, "length") => spec.length = Some(parse_restriction(sp)?),
                    (None, "pattern") => spec.patterns.push(parse_restriction(sp)?),
                    (None, "bit") => spec.bits.push(parse_bit_or_enum(sp)?),
                    (None, "enum") => spec.enums.push(parse_bit_or_enum(sp)?),
                    (None, "base") => {
                        let base = sp.consume_string()?;
                        sp.consume_terminator()?;
                        spec.base_identities.push(SmolStr::new(base));
                    }
                    (None, "path") => {
                        let p = sp.consume_string()?;
                        sp.consume_terminator()?;
                        spec.path = Some(p);
                    }
                    (None, "type") => {
                        spec.union_members.push(parse_type(sp)?);
                    }
                    (Some(_), _) => {
                        skip_statement(sp.chain);
                    }
                    (None, other) => {
                        let loc = sp.chain.location(&tok);
                        sp.diagnostics.push_error(YangError::InvalidValue(other.to_string()).to_string(), loc);
                        skip_statement(sp.chain);
                    }
                }
            }
        }
        other => {
            let loc = sp.chain.location(&tok_at(sp));
            sp.diagnostics
                .push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    Ok(spec)
}

fn tok_at(sp: &StatementParser<'_>) -> crate::token::Token {
    sp.chain.next()
}

/// `range`/`length`/`pattern` share the same `"<expr>" [{ error-stmts }]`
/// shape as `must` (spec.md §4.3 consume-must, generalized).
fn parse_restriction(sp: &mut StatementParser<'_>) -> ConsumeResult<ErrorInfo> {
    let expr = sp.consume_string()?;
    let mut info = match sp.chain.next().kind {
        TokenKind::Semi => {
            sp.chain.advance();
            ErrorInfo::default()
        }
        TokenKind::LBrace => sp.consume_error_stmts()?,
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics
                .push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    };
    info.xpath = Some(expr);
    Ok(info)
}

fn parse_bit_or_enum(sp: &mut StatementParser<'_>) -> ConsumeResult<BitOrEnum> {
    let name = sp.consume_string()?;
    let mut entry = BitOrEnum { name: SmolStr::new(name), position_or_value: None, status: Status::Current, description: None };
    match sp.chain.next().kind {
        TokenKind::Semi => {
            sp.chain.advance();
        }
        TokenKind::LBrace => {
            sp.chain.advance();
            loop {
                let tok = sp.chain.next();
                if tok.kind == TokenKind::RBrace {
                    sp.chain.advance();
                    break;
                }
                if tok.kind == TokenKind::None {
                    let loc = sp.chain.location(&tok);
                    sp.diagnostics.push_error(YangError::Eof.to_string(), loc);
                    return Err(());
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "value") | (None, "position") => {
                        let v = sp.consume_int32()?;
                        entry.position_or_value = Some(v as i64);
                    }
                    (None, "status") => entry.status = sp.consume_status()?,
                    (None, "description") => sp.consume_descr(&mut entry.description)?,
                    (Some(_), _) => skip_statement(sp.chain),
                    (None, _) => skip_statement(sp.chain),
                }
            }
        }
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics
                .push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    Ok(entry)
}

/// `typedef <name> { type ...; [units ...;] [default ...;] [status ...;]
/// [description ...;] [reference ...;] }`.
pub fn parse_typedef(sp: &mut StatementParser<'_>, defining_module: &SmolStr) -> ConsumeResult<Typedef> {
    let name = sp.consume_id_string()?;
    let open = sp.chain.next();
    if open.kind != TokenKind::LBrace {
        let loc = sp.chain.location(&open);
        sp.diagnostics
            .push_error(YangError::WrongTokenKind { expected: TokenKind::LBrace, found: open.kind }.to_string(), loc);
        return Err(());
    }
    sp.chain.advance();

    let mut type_spec = None;
    let mut units = None;
    let mut default = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;

    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(YangError::Eof.to_string(), loc);
            return Err(());
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "type") => type_spec = Some(parse_type(sp)?),
            (None, "units") => sp.consume_strclause("units", &mut units)?,
            (None, "default") => sp.consume_strclause("default", &mut default)?,
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }

    let Some(type_spec) = type_spec else {
        let loc = sp.chain.location(&sp.chain.current());
        sp.diagnostics.push_error(YangError::DefNotFound("type".into()).to_string(), loc);
        return Err(());
    };

    Ok(Typedef {
        name,
        defining_module: defining_module.clone(),
        type_spec,
        units,
        default,
        status,
        description,
        reference,
        used: false,
    })
}
