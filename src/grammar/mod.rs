//! Recursive-descent grammar: drives [`crate::lexer::TokenChain`] and
//! [`crate::statement_parser::StatementParser`] to build [`crate::schema`]
//! entities. Grounded on the teacher's `parser.rs` keyword-dispatch loop
//! (`DefaultParser::parse_node`), generalized from slint's component/struct
//! grammar to YANG's module-top-level grammar.

pub mod datadef;
pub mod typedef;

use smol_str::SmolStr;

use crate::diagnostics::BuildDiagnostics;
use crate::error::YangError;
use crate::lexer::TokenChain;
use crate::schema::{Module, Revision, RevisionDate, StatementOrderEntry, YangVersion};
use crate::statement_parser::{skip_statement, ConsumeResult, StatementParser};
use crate::token::TokenKind;

use datadef::{
    dispatch_child, parse_augment, parse_deviation, parse_extension, parse_feature, parse_grouping,
    parse_notification, parse_rpc,
};
use typedef::parse_typedef;

/// Entry point: parses a fully-tokenised chain into a [`Module`]. The chain
/// must already have been `reset()` by the caller (or never advanced).
pub fn parse_module(chain: &mut TokenChain, diagnostics: &mut BuildDiagnostics) -> ConsumeResult<Module> {
    chain.reset();
    let mut sp = StatementParser::new(chain, diagnostics);

    let (_, keyword) = sp.consume_keyword()?;
    let is_submodule = match keyword.as_str() {
        "module" => false,
        "submodule" => true,
        other => {
            let tok = sp.chain.current();
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(YangError::WrongTokenValue { expected: "module|submodule".into(), found: other.to_string() }.to_string(), loc);
            return Err(());
        }
    };

    let name = sp.consume_id_string()?;
    let open = sp.chain.next();
    if open.kind != TokenKind::LBrace {
        let loc = sp.chain.location(&open);
        sp.diagnostics.push_error(YangError::WrongTokenKind { expected: TokenKind::LBrace, found: open.kind }.to_string(), loc);
        return Err(());
    }
    sp.chain.advance();

    let mut module = Module { name: name.clone(), ..Module::default() };

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

        let keyword_result = sp.consume_keyword();
        let (kw_prefix, kw) = match keyword_result {
            Ok(v) => v,
            Err(()) => {
                skip_statement(sp.chain);
                continue;
            }
        };

        let stmt_result: ConsumeResult<()> = (|| {
            match (kw_prefix.clone(), kw.as_str()) {
                (None, "namespace") => {
                    module.namespace = Some(sp.consume_string()?);
                    sp.consume_terminator()?;
                }
                (None, "prefix") => {
                    let p = sp.consume_string()?;
                    sp.consume_terminator()?;
                    module.prefix = Some(SmolStr::new(p));
                }
                (None, "belongs-to") => {
                    let p = sp.consume_string()?;
                    parse_belongs_to(&mut sp, &mut module, p)?;
                }
                (None, "yang-version") => {
                    let v = sp.consume_string()?;
                    sp.consume_terminator()?;
                    module.yang_version = match v.as_str() {
                        "1.1" => YangVersion::V1_1,
                        _ => YangVersion::V1_0,
                    };
                }
                (None, "import") => {
                    let import_name = sp.consume_id_string()?;
                    parse_import(&mut sp, &mut module, import_name)?;
                }
                (None, "include") => {
                    let include_name = sp.consume_id_string()?;
                    parse_include(&mut sp, &mut module, include_name)?;
                }
                (None, "organization") => sp.consume_strclause("organization", &mut module.organization)?,
                (None, "contact") => sp.consume_strclause("contact", &mut module.contact)?,
                (None, "description") => sp.consume_descr(&mut module.description)?,
                (None, "reference") => sp.consume_strclause("reference", &mut module.reference)?,
                (None, "revision") => {
                    let date = sp.consume_nowsp_string()?;
                    parse_revision(&mut sp, &mut module, date)?;
                }
                (None, "typedef") => {
                    let td = parse_typedef(&mut sp, &module.name)?;
                    module.typedefs.push(td);
                }
                (None, "grouping") => {
                    let g = parse_grouping(&mut sp, &module.name)?;
                    module.groupings.push(g);
                }
                (None, "extension") => {
                    let e = parse_extension(&mut sp, &module.name)?;
                    module.extensions.push(e);
                }
                (None, "feature") => {
                    let f = parse_feature(&mut sp)?;
                    module.features.push(f);
                }
                (None, "deviation") => {
                    let d = parse_deviation(&mut sp)?;
                    module.deviations.push(d);
                }
                (None, "rpc") => {
                    let r = parse_rpc(&mut sp)?;
                    module.rpcs.push(r);
                }
                (None, "notification") => {
                    let n = parse_notification(&mut sp)?;
                    module.notifications.push(n);
                }
                (None, "augment") => {
                    let a = parse_augment(&mut sp)?;
                    module.datadefs.push(crate::schema::DataDef::Augment(a));
                }
                (None, k) if matches!(k, "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses") => {
                    module.datadefs.push(dispatch_child(&mut sp, k)?);
                }
                (Some(_), _) => {
                    skip_statement(sp.chain);
                }
                (None, _) => {
                    skip_statement(sp.chain);
                }
            }
            Ok(())
        })();

        if stmt_result.is_err() {
            skip_statement(sp.chain);
        } else {
            module.statement_order.push(StatementOrderEntry { keyword: kw, name: None });
        }
    }

    module.source_file = sp.chain.file_name().map(|p| p.to_path_buf());
    if is_submodule && module.belongs_to.is_none() {
        let loc = sp.chain.location(&sp.chain.current());
        sp.diagnostics.push_error(YangError::DefNotFound("belongs-to".into()).to_string(), loc);
        return Err(());
    }
    Ok(module)
}

fn parse_belongs_to(sp: &mut StatementParser<'_>, module: &mut Module, parent: String) -> ConsumeResult<()> {
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
                    (None, "prefix") => {
                        let p = sp.consume_string()?;
                        sp.consume_terminator()?;
                        module.prefix = Some(SmolStr::new(p));
                    }
                    (Some(_), _) => skip_statement(sp.chain),
                    (None, _) => skip_statement(sp.chain),
                }
            }
        }
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    module.belongs_to = Some(SmolStr::new(parent));
    Ok(())
}

fn parse_import(sp: &mut StatementParser<'_>, module: &mut Module, import_name: SmolStr) -> ConsumeResult<()> {
    let open = sp.chain.next();
    if open.kind != TokenKind::LBrace {
        let loc = sp.chain.location(&open);
        sp.diagnostics.push_error(YangError::WrongTokenKind { expected: TokenKind::LBrace, found: open.kind }.to_string(), loc);
        return Err(());
    }
    sp.chain.advance();
    let mut prefix = None;
    let mut revision = None;
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
            (None, "prefix") => {
                let p = sp.consume_string()?;
                sp.consume_terminator()?;
                prefix = Some(SmolStr::new(p));
            }
            (None, "revision-date") => {
                let d = sp.consume_nowsp_string()?;
                sp.consume_terminator()?;
                revision = parse_revision_date(&d);
            }
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    let Some(prefix) = prefix else {
        let loc = sp.chain.location(&sp.chain.current());
        sp.diagnostics.push_error(YangError::DefNotFound("prefix".into()).to_string(), loc);
        return Err(());
    };
    module.imports.push(crate::schema::Import { module_name: import_name, prefix, revision, used: false });
    Ok(())
}

fn parse_include(sp: &mut StatementParser<'_>, module: &mut Module, include_name: SmolStr) -> ConsumeResult<()> {
    let mut revision = None;
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
                    (None, "revision-date") => {
                        let d = sp.consume_nowsp_string()?;
                        sp.consume_terminator()?;
                        revision = parse_revision_date(&d);
                    }
                    (Some(_), _) => skip_statement(sp.chain),
                    (None, _) => skip_statement(sp.chain),
                }
            }
        }
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    module.includes.push(crate::schema::Include { submodule_name: include_name, revision });
    Ok(())
}

fn parse_revision(sp: &mut StatementParser<'_>, module: &mut Module, date: String) -> ConsumeResult<()> {
    let date_tok = sp.chain.current();
    let Some(parsed) = parse_revision_date(&date) else {
        let loc = sp.chain.location(&date_tok);
        sp.diagnostics.push_error(YangError::InvalidValue(date).to_string(), loc);
        return Err(());
    };
    if parsed.year < 1970 {
        let loc = sp.chain.location(&date_tok);
        sp.diagnostics.push_warning(crate::error::Warning::DatePast(date.clone()).to_string(), loc);
    }
    match sp.chain.next().kind {
        TokenKind::Semi => {
            sp.chain.advance();
            module.revisions.push(Revision { date: parsed, description: None, reference: None });
        }
        TokenKind::LBrace => {
            sp.chain.advance();
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
                    (None, "description") => sp.consume_descr(&mut description)?,
                    (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
                    (Some(_), _) => skip_statement(sp.chain),
                    (None, _) => skip_statement(sp.chain),
                }
            }
            module.revisions.push(Revision { date: parsed, description, reference });
        }
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` string structurally (month 1-12, day 1-31).
/// Returns `None` for malformed numerics or an out-of-range month/day —
/// callers decide whether that is fatal (a `revision` statement) or merely
/// dropped (an import/include `revision-date`, which tolerates garbage by
/// simply not constraining the dependency). A year before 1970 is not
/// rejected here: ground truth (`yang_validate_date_string` in the original)
/// only warns on a past date and still accepts it, so `parse_revision`
/// pushes `Warning::DatePast` itself rather than this function failing.
fn parse_revision_date(text: &str) -> Option<RevisionDate> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let (Ok(year), Ok(month), Ok(day)) = (parts[0].parse::<u32>(), parts[1].parse::<u8>(), parts[2].parse::<u8>())
    else {
        return None;
    };
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(RevisionDate { year, month, day })
}
