//! Grammar for data-definition statements: container, leaf, leaf-list, list,
//! choice, case, anyxml, uses, augment — plus grouping, extension, feature,
//! deviation, rpc and notification, which share the same substatement-loop
//! shape.

use smol_str::SmolStr;

use crate::error::YangError;
use crate::grammar::typedef::parse_type;
use crate::schema::{
    AnyXml, Appinfo, Augment, Case, Choice, Container, DataDef, Deviate, DeviateKind, Deviation, Extension, Feature,
    Grouping, IfFeatureExpr, Leaf, LeafList, List, Notification, OrderedBy, Refinement, Rpc, Status, Uses,
};
use crate::statement_parser::{skip_statement, ConsumeResult, StatementParser};
use crate::token::TokenKind;

fn expect_lbrace(sp: &mut StatementParser<'_>) -> ConsumeResult<()> {
    let open = sp.chain.next();
    if open.kind != TokenKind::LBrace {
        let loc = sp.chain.location(&open);
        sp.diagnostics
            .push_error(YangError::WrongTokenKind { expected: TokenKind::LBrace, found: open.kind }.to_string(), loc);
        return Err(());
    }
    sp.chain.advance();
    Ok(())
}

fn unexpected_eof(sp: &mut StatementParser<'_>, tok: &crate::token::Token) -> ConsumeResult<()> {
    let loc = sp.chain.location(tok);
    sp.diagnostics.push_error(YangError::Eof.to_string(), loc);
    Err(())
}

fn parse_config(sp: &mut StatementParser<'_>) -> ConsumeResult<bool> {
    sp.consume_boolean()
}

fn parse_must_list(sp: &mut StatementParser<'_>, out: &mut Vec<crate::schema::ErrorInfo>) -> ConsumeResult<()> {
    out.push(sp.consume_must()?);
    Ok(())
}

pub fn parse_container(sp: &mut StatementParser<'_>) -> ConsumeResult<Container> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;

    let mut out = Container {
        name,
        presence: None,
        children: Vec::new(),
        must: Vec::new(),
        config: None,
        status: Status::Current,
        description: None,
        reference: None,
        appinfo: Vec::new(),
    };
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "presence") => sp.consume_strclause("presence", &mut out.presence)?,
            (None, "must") => parse_must_list(sp, &mut out.must)?,
            (None, "config") => out.config = Some(parse_config(sp)?),
            (None, "status") => out.status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut out.description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut out.reference)?,
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses"
                ) =>
            {
                out.children.push(dispatch_child(sp, k)?);
            }
            (Some(prefix), name) => {
                out.appinfo.push(parse_appinfo_inline(sp, &prefix, &name)?);
            }
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(out)
}

pub(crate) fn dispatch_child(sp: &mut StatementParser<'_>, keyword: &str) -> ConsumeResult<DataDef> {
    Ok(match keyword {
        "container" => DataDef::Container(parse_container(sp)?),
        "leaf" => DataDef::Leaf(parse_leaf(sp)?),
        "leaf-list" => DataDef::LeafList(parse_leaf_list(sp)?),
        "list" => DataDef::List(parse_list(sp)?),
        "choice" => DataDef::Choice(parse_choice(sp)?),
        "anyxml" => DataDef::AnyXml(parse_anyxml(sp)?),
        "uses" => DataDef::Uses(parse_uses(sp)?),
        _ => unreachable!("dispatch_child called with unrecognised keyword"),
    })
}

fn parse_appinfo_inline(sp: &mut StatementParser<'_>, prefix: &SmolStr, name: &SmolStr) -> ConsumeResult<Appinfo> {
    let argument = match sp.chain.next().kind {
        TokenKind::Semi | TokenKind::LBrace => None,
        _ => Some(sp.consume_string()?),
    };
    let nested = sp.consume_terminator()?;
    Ok(Appinfo { prefix: prefix.clone(), name: name.clone(), argument, nested })
}

pub fn parse_leaf(sp: &mut StatementParser<'_>) -> ConsumeResult<Leaf> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;

    let mut type_spec = None;
    let mut out_units = None;
    let mut must = Vec::new();
    let mut default = None;
    let mut mandatory = false;
    let mut config = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut appinfo = Vec::new();

    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "type") => type_spec = Some(parse_type(sp)?),
            (None, "units") => sp.consume_strclause("units", &mut out_units)?,
            (None, "must") => parse_must_list(sp, &mut must)?,
            (None, "default") => sp.consume_strclause("default", &mut default)?,
            (None, "mandatory") => mandatory = sp.consume_boolean()?,
            (None, "config") => config = Some(parse_config(sp)?),
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (Some(prefix), name) => appinfo.push(parse_appinfo_inline(sp, &prefix, &name)?),
            (None, _) => skip_statement(sp.chain),
        }
    }

    let Some(type_spec) = type_spec else {
        let loc = sp.chain.location(&sp.chain.current());
        sp.diagnostics.push_error(YangError::DefNotFound("type".into()).to_string(), loc);
        return Err(());
    };

    Ok(Leaf { name, type_spec, units: out_units, must, default, mandatory, config, status, description, reference, appinfo })
}

pub fn parse_leaf_list(sp: &mut StatementParser<'_>) -> ConsumeResult<LeafList> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;

    let mut type_spec = None;
    let mut units = None;
    let mut must = Vec::new();
    let mut min_elements = 0u32;
    let mut max_elements = None;
    let mut ordered_by = OrderedBy::System;
    let mut config = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut appinfo = Vec::new();

    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "type") => type_spec = Some(parse_type(sp)?),
            (None, "units") => sp.consume_strclause("units", &mut units)?,
            (None, "must") => parse_must_list(sp, &mut must)?,
            (None, "min-elements") => min_elements = sp.consume_uint32()?,
            (None, "max-elements") => max_elements = Some(parse_max_elements(sp)?),
            (None, "ordered-by") => ordered_by = parse_ordered_by(sp)?,
            (None, "config") => config = Some(parse_config(sp)?),
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (Some(prefix), name) => appinfo.push(parse_appinfo_inline(sp, &prefix, &name)?),
            (None, _) => skip_statement(sp.chain),
        }
    }

    let Some(type_spec) = type_spec else {
        let loc = sp.chain.location(&sp.chain.current());
        sp.diagnostics.push_error(YangError::DefNotFound("type".into()).to_string(), loc);
        return Err(());
    };

    Ok(LeafList {
        name,
        type_spec,
        units,
        must,
        min_elements,
        max_elements,
        ordered_by,
        config,
        status,
        description,
        reference,
        appinfo,
    })
}

fn parse_max_elements(sp: &mut StatementParser<'_>) -> ConsumeResult<u32> {
    // `max-elements` additionally accepts the literal `unbounded`; represent
    // that as `u32::MAX` the way downstream XSD/tree emitters expect.
    let tok = sp.chain.next();
    if tok.is_string_like() && tok.value.as_deref() == Some("unbounded") {
        sp.chain.advance();
        sp.consume_terminator()?;
        return Ok(u32::MAX);
    }
    sp.consume_uint32()
}

fn parse_ordered_by(sp: &mut StatementParser<'_>) -> ConsumeResult<OrderedBy> {
    let tok = sp.chain.next();
    let value = sp.consume_string()?;
    let result = match value.as_str() {
        "system" => OrderedBy::System,
        "user" => OrderedBy::User,
        _ => {
            let loc = sp.chain.location(&tok);
            sp.diagnostics
                .push_error(YangError::WrongTokenValue { expected: "system|user".into(), found: value }.to_string(), loc);
            return Err(());
        }
    };
    sp.consume_terminator()?;
    Ok(result)
}

pub fn parse_list(sp: &mut StatementParser<'_>) -> ConsumeResult<List> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;

    let mut key = Vec::new();
    let mut unique = Vec::new();
    let mut children = Vec::new();
    let mut must = Vec::new();
    let mut min_elements = 0u32;
    let mut max_elements = None;
    let mut ordered_by = OrderedBy::System;
    let mut config = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut appinfo = Vec::new();

    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            // `key` is validated structurally during Resolve-refs (leaves
            // may arrive later via `uses`), not here — spec.md §8 supplement.
            (None, "key") => {
                let raw = sp.consume_string()?;
                sp.consume_terminator()?;
                key = raw.split_whitespace().map(SmolStr::new).collect();
            }
            (None, "unique") => {
                let raw = sp.consume_string()?;
                sp.consume_terminator()?;
                unique.push(raw.split_whitespace().map(SmolStr::new).collect());
            }
            (None, "must") => parse_must_list(sp, &mut must)?,
            (None, "min-elements") => min_elements = sp.consume_uint32()?,
            (None, "max-elements") => max_elements = Some(parse_max_elements(sp)?),
            (None, "ordered-by") => ordered_by = parse_ordered_by(sp)?,
            (None, "config") => config = Some(parse_config(sp)?),
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses"
                ) =>
            {
                children.push(dispatch_child(sp, k)?);
            }
            (Some(prefix), name) => appinfo.push(parse_appinfo_inline(sp, &prefix, &name)?),
            (None, _) => skip_statement(sp.chain),
        }
    }

    Ok(List { name, key, unique, children, must, min_elements, max_elements, ordered_by, config, status, description, reference, appinfo })
}

pub fn parse_choice(sp: &mut StatementParser<'_>) -> ConsumeResult<Choice> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;

    let mut cases = Vec::new();
    let mut default_case = None;
    let mut mandatory = false;
    let mut config = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut appinfo = Vec::new();

    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "case") => cases.push(parse_case(sp)?),
            // A bare container/leaf/... directly under choice is an
            // implicit single-node case.
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "anyxml"
                ) =>
            {
                let child = dispatch_child(sp, k)?;
                let implicit_name = child.name().cloned().unwrap_or_default();
                cases.push(Case {
                    name: implicit_name,
                    children: vec![child],
                    status: Status::Current,
                    description: None,
                    reference: None,
                });
            }
            (None, "default") => {
                let def_tok = sp.chain.next();
                let value = sp.consume_string()?;
                sp.consume_terminator()?;
                if default_case.is_some() {
                    let loc = sp.chain.location(&def_tok);
                    sp.diagnostics.push_error(YangError::DuplicateEntry("default".into()).to_string(), loc);
                    return Err(());
                }
                default_case = Some(SmolStr::new(value));
            }
            (None, "mandatory") => mandatory = sp.consume_boolean()?,
            (None, "config") => config = Some(parse_config(sp)?),
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (Some(prefix), name) => appinfo.push(parse_appinfo_inline(sp, &prefix, &name)?),
            (None, _) => skip_statement(sp.chain),
        }
    }

    Ok(Choice { name, cases, default_case, mandatory, config, status, description, reference, appinfo })
}

pub fn parse_case(sp: &mut StatementParser<'_>) -> ConsumeResult<Case> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut children = Vec::new();
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses"
                ) =>
            {
                children.push(dispatch_child(sp, k)?);
            }
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(Case { name, children, status, description, reference })
}

pub fn parse_anyxml(sp: &mut StatementParser<'_>) -> ConsumeResult<AnyXml> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;
    let mut must = Vec::new();
    let mut mandatory = false;
    let mut config = None;
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
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "must") => parse_must_list(sp, &mut must)?,
            (None, "mandatory") => mandatory = sp.consume_boolean()?,
            (None, "config") => config = Some(parse_config(sp)?),
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(AnyXml { name, must, mandatory, config, status, description, reference })
}

pub fn parse_uses(sp: &mut StatementParser<'_>) -> ConsumeResult<Uses> {
    let (grouping_prefix, grouping_name) = sp.consume_pid_string()?;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut refinements = Vec::new();

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
                    unexpected_eof(sp, &tok)?;
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "status") => status = sp.consume_status()?,
                    (None, "description") => sp.consume_descr(&mut description)?,
                    (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
                    (None, "refine") => refinements.push(parse_refine(sp)?),
                    (None, "augment") => {
                        // `uses`-scoped augment: parsed and discarded — the
                        // grouping's own uses-augment targets apply only
                        // within this instantiation, which datadef
                        // resolution is expected to re-derive structurally,
                        // not textually, during Resolve-refs.
                        skip_statement(sp.chain);
                    }
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

    Ok(Uses { grouping_name, grouping_prefix, refinements, status, description, reference })
}

fn parse_refine(sp: &mut StatementParser<'_>) -> ConsumeResult<Refinement> {
    let target = sp.consume_string()?;
    expect_lbrace(sp)?;
    let mut refinement =
        Refinement { target, description: None, default: None, mandatory: None, must: Vec::new() };
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "description") => sp.consume_descr(&mut refinement.description)?,
            (None, "default") => sp.consume_strclause("default", &mut refinement.default)?,
            (None, "mandatory") => refinement.mandatory = Some(sp.consume_boolean()?),
            (None, "must") => parse_must_list(sp, &mut refinement.must)?,
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(refinement)
}

pub fn parse_augment(sp: &mut StatementParser<'_>) -> ConsumeResult<Augment> {
    let target_path = sp.consume_string()?;
    expect_lbrace(sp)?;
    let mut when = None;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut children = Vec::new();
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "when") => {
                when = Some(sp.consume_string()?);
                sp.consume_terminator()?;
            }
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses" | "case"
                ) =>
            {
                children.push(if k == "case" { DataDef::Case(parse_case(sp)?) } else { dispatch_child(sp, k)? });
            }
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(Augment { target_path, when, children, status, description, reference })
}

pub fn parse_grouping(sp: &mut StatementParser<'_>, defining_module: &SmolStr) -> ConsumeResult<Grouping> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let children = parse_datadef_body_with_trailing(sp, &mut status, &mut description, &mut reference)?;
    Ok(Grouping { name, defining_module: defining_module.clone(), children, status, description, reference, used: false })
}

/// Like [`parse_datadef_body`], but also collects the trailing
/// status/description/reference substatements many container-shaped
/// statements (grouping, input/output, notification) carry.
fn parse_datadef_body_with_trailing(
    sp: &mut StatementParser<'_>,
    status: &mut Status,
    description: &mut Option<String>,
    reference: &mut Option<String>,
) -> ConsumeResult<Vec<DataDef>> {
    let mut children = Vec::new();
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "status") => *status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(description)?,
            (None, "reference") => sp.consume_strclause("reference", reference)?,
            (None, k)
                if matches!(
                    k,
                    "container" | "leaf" | "leaf-list" | "list" | "choice" | "anyxml" | "uses"
                ) =>
            {
                children.push(dispatch_child(sp, k)?);
            }
            (None, "typedef") | (None, "grouping") => skip_statement(sp.chain),
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(children)
}

pub fn parse_extension(sp: &mut StatementParser<'_>, defining_module: &SmolStr) -> ConsumeResult<Extension> {
    let name = sp.consume_id_string()?;
    let mut argument_name = None;
    let mut yin_element = false;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;

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
                    unexpected_eof(sp, &tok)?;
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "argument") => argument_name = Some(parse_argument(sp, &mut yin_element)?),
                    (None, "status") => status = sp.consume_status()?,
                    (None, "description") => sp.consume_descr(&mut description)?,
                    (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
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

    Ok(Extension { name, defining_module: defining_module.clone(), argument_name, yin_element, status, description, reference })
}

fn parse_argument(sp: &mut StatementParser<'_>, yin_element: &mut bool) -> ConsumeResult<SmolStr> {
    let name = sp.consume_id_string()?;
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
                    unexpected_eof(sp, &tok)?;
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "yin-element") => *yin_element = sp.consume_boolean()?,
                    (Some(_), _) => skip_statement(sp.chain),
                    (None, _) => skip_statement(sp.chain),
                }
            }
        }
        _ => {}
    }
    Ok(name)
}

pub fn parse_feature(sp: &mut StatementParser<'_>) -> ConsumeResult<Feature> {
    let name = sp.consume_id_string()?;
    let mut if_features = Vec::new();
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
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
                    unexpected_eof(sp, &tok)?;
                }
                let (kw_prefix, keyword) = sp.consume_keyword()?;
                match (kw_prefix, keyword.as_str()) {
                    (None, "if-feature") => {
                        let expr = sp.consume_string()?;
                        sp.consume_terminator()?;
                        if_features.push(parse_if_feature_expr(&expr));
                    }
                    (None, "status") => status = sp.consume_status()?,
                    (None, "description") => sp.consume_descr(&mut description)?,
                    (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
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
    Ok(Feature { name, if_features, status, description, reference })
}

/// `feature-a and feature-b or not feature-c` — left-associative `and`/`or`,
/// `not` binds tighter, parenthesised sub-expressions supported.
fn parse_if_feature_expr(text: &str) -> IfFeatureExpr {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut pos = 0;
    fn parse_or(tokens: &[&str], pos: &mut usize) -> IfFeatureExpr {
        let mut lhs = parse_and(tokens, pos);
        while *pos < tokens.len() && tokens[*pos] == "or" {
            *pos += 1;
            let rhs = parse_and(tokens, pos);
            lhs = IfFeatureExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        lhs
    }
    fn parse_and(tokens: &[&str], pos: &mut usize) -> IfFeatureExpr {
        let mut lhs = parse_not(tokens, pos);
        while *pos < tokens.len() && tokens[*pos] == "and" {
            *pos += 1;
            let rhs = parse_not(tokens, pos);
            lhs = IfFeatureExpr::And(Box::new(lhs), Box::new(rhs));
        }
        lhs
    }
    fn parse_not(tokens: &[&str], pos: &mut usize) -> IfFeatureExpr {
        if *pos < tokens.len() && tokens[*pos] == "not" {
            *pos += 1;
            return IfFeatureExpr::Not(Box::new(parse_not(tokens, pos)));
        }
        parse_atom(tokens, pos)
    }
    fn parse_atom(tokens: &[&str], pos: &mut usize) -> IfFeatureExpr {
        if *pos < tokens.len() && tokens[*pos] == "(" {
            *pos += 1;
            let inner = parse_or(tokens, pos);
            if *pos < tokens.len() && tokens[*pos] == ")" {
                *pos += 1;
            }
            return inner;
        }
        let name = tokens.get(*pos).copied().unwrap_or_default().trim_matches(['(', ')']).to_string();
        *pos += 1;
        IfFeatureExpr::Feature(name)
    }
    parse_or(&tokens, &mut pos)
}

pub fn parse_deviation(sp: &mut StatementParser<'_>) -> ConsumeResult<Deviation> {
    let target_path = sp.consume_string()?;
    expect_lbrace(sp)?;
    let mut description = None;
    let mut reference = None;
    let mut deviates = Vec::new();
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (None, "deviate") => deviates.push(parse_deviate(sp)?),
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(Deviation { target_path, deviates, description, reference })
}

fn parse_deviate(sp: &mut StatementParser<'_>) -> ConsumeResult<Deviate> {
    let tok = sp.chain.next();
    let kind_text = sp.consume_string()?;
    let kind = match kind_text.as_str() {
        "not-supported" => DeviateKind::NotSupported,
        "add" => DeviateKind::Add,
        "replace" => DeviateKind::Replace,
        "delete" => DeviateKind::Delete,
        _ => {
            let loc = sp.chain.location(&tok);
            sp.diagnostics.push_error(
                YangError::WrongTokenValue { expected: "add|replace|delete|not-supported".into(), found: kind_text }
                    .to_string(),
                loc,
            );
            return Err(());
        }
    };
    let mut deviate = Deviate {
        kind,
        type_spec: None,
        units: None,
        must: Vec::new(),
        unique: Vec::new(),
        default: None,
        config: None,
        mandatory: None,
        min_elements: None,
        max_elements: None,
    };
    match sp.chain.next().kind {
        TokenKind::Semi => {
            sp.chain.advance();
            return Ok(deviate);
        }
        TokenKind::LBrace => {
            sp.chain.advance();
        }
        other => {
            let tok = sp.chain.next();
            let loc = sp.chain.location(&tok);
            sp.diagnostics
                .push_error(YangError::WrongTokenKind { expected: TokenKind::Semi, found: other }.to_string(), loc);
            return Err(());
        }
    }
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "type") => deviate.type_spec = Some(parse_type(sp)?),
            (None, "units") => sp.consume_strclause("units", &mut deviate.units)?,
            (None, "must") => parse_must_list(sp, &mut deviate.must)?,
            (None, "unique") => {
                let raw = sp.consume_string()?;
                sp.consume_terminator()?;
                deviate.unique.push(raw.split_whitespace().map(SmolStr::new).collect());
            }
            (None, "default") => sp.consume_strclause("default", &mut deviate.default)?,
            (None, "config") => deviate.config = Some(parse_config(sp)?),
            (None, "mandatory") => deviate.mandatory = Some(sp.consume_boolean()?),
            (None, "min-elements") => deviate.min_elements = Some(sp.consume_uint32()?),
            (None, "max-elements") => deviate.max_elements = Some(parse_max_elements(sp)?),
            (Some(_), _) => skip_statement(sp.chain),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(deviate)
}

pub fn parse_rpc(sp: &mut StatementParser<'_>) -> ConsumeResult<Rpc> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;
    let mut input = Vec::new();
    let mut output = Vec::new();
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let mut appinfo = Vec::new();
    loop {
        let tok = sp.chain.next();
        if tok.kind == TokenKind::RBrace {
            sp.chain.advance();
            break;
        }
        if tok.kind == TokenKind::None {
            unexpected_eof(sp, &tok)?;
        }
        let (kw_prefix, keyword) = sp.consume_keyword()?;
        match (kw_prefix, keyword.as_str()) {
            (None, "input") => {
                expect_lbrace(sp)?;
                let mut ignored_status = Status::Current;
                let mut ignored_desc = None;
                let mut ignored_ref = None;
                input = parse_datadef_body_with_trailing(sp, &mut ignored_status, &mut ignored_desc, &mut ignored_ref)?;
            }
            (None, "output") => {
                expect_lbrace(sp)?;
                let mut ignored_status = Status::Current;
                let mut ignored_desc = None;
                let mut ignored_ref = None;
                output = parse_datadef_body_with_trailing(sp, &mut ignored_status, &mut ignored_desc, &mut ignored_ref)?;
            }
            (None, "status") => status = sp.consume_status()?,
            (None, "description") => sp.consume_descr(&mut description)?,
            (None, "reference") => sp.consume_strclause("reference", &mut reference)?,
            (None, "typedef") | (None, "grouping") => skip_statement(sp.chain),
            (Some(prefix), ename) => appinfo.push(parse_appinfo_inline(sp, &prefix, &ename)?),
            (None, _) => skip_statement(sp.chain),
        }
    }
    Ok(Rpc { name, input, output, status, description, reference, appinfo })
}

pub fn parse_notification(sp: &mut StatementParser<'_>) -> ConsumeResult<Notification> {
    let name = sp.consume_id_string()?;
    expect_lbrace(sp)?;
    let mut status = Status::Current;
    let mut description = None;
    let mut reference = None;
    let children = parse_datadef_body_with_trailing(sp, &mut status, &mut description, &mut reference)?;
    Ok(Notification { name, children, status, description, reference, appinfo: Vec::new() })
}
