//! `ModuleResolver`: the `load_module` state machine (spec.md §4.4) —
//! Init → Locate → Parse → Resolve-imports → Resolve-includes →
//! Resolve-refs → Post-checks → Registered/Failed.
//!
//! Grounded on the teacher's `TypeLoader::load_dependencies`, which walks
//! a component's `import` statements recursively, tracking an in-flight
//! set to reject cycles and caching already-loaded files by canonical
//! path; generalized here to YANG's two independent dependency kinds
//! (`import` and `include`) and its own revision-qualified cache key.

use std::fs::File;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::config::ResolverConfig;
use crate::diagnostics::{BuildDiagnostics, SourceLocation};
use crate::error::YangError;
use crate::grammar;
use crate::lookup::ExternalLookup;
use crate::pcb::ParseControlBlock;
use crate::registry::{ModuleHandle, ModuleRegistry};
use crate::schema::{Module, RevisionDate};
use crate::token::SourceLanguage;
use crate::lexer::TokenChain;

/// `load_module(name, revision?, deviation_list) -> module_handle | error`
/// (spec.md §6). `deviation_list` names modules whose `deviation`
/// statements apply to `name` once it's loaded. The success path still
/// carries its `BuildDiagnostics` (e.g. `typedef-not-used`) alongside the
/// handle — only the failure path discards the handle.
pub fn load_module(
    registry: &mut ModuleRegistry,
    config: &ResolverConfig,
    name: &str,
    revision: Option<&RevisionDate>,
    deviation_list: &[String],
) -> Result<(ModuleHandle, BuildDiagnostics), BuildDiagnostics> {
    if let Some(existing) = registry.find_module(name, revision) {
        return Ok((existing, BuildDiagnostics::default()));
    }

    let mut pcb = ParseControlBlock::new(name, config);
    let mut diagnostics = BuildDiagnostics::default();

    // The top-level module is on its own import chain from the start, so a
    // transitive import cycling back to it is caught the same way a cycle
    // among its dependencies would be.
    if let Err(err) = pcb.enter_import(name) {
        diagnostics.push_error(err.to_string(), SourceLocation::unknown());
        return Err(diagnostics);
    }

    let mut module = match resolve_module(registry, config, &mut pcb, name, revision, &mut diagnostics) {
        Some(module) => module,
        None => {
            pcb.exit_import();
            return Err(diagnostics);
        }
    };
    pcb.exit_import();

    for deviation_module in deviation_list {
        if let Err(err) = apply_deviations(registry, config, &mut pcb, deviation_module, &mut module, &mut diagnostics) {
            diagnostics.push_error(err.to_string(), SourceLocation::unknown());
        }
    }

    post_checks(&module, &config.today, &mut diagnostics);
    if diagnostics.has_errors() {
        return Err(diagnostics);
    }

    log::info!("resolver: '{name}' registered");
    Ok((registry.register(module), diagnostics))
}

/// Locate → Parse → Resolve-imports → Resolve-includes → Resolve-refs.
/// Returns `None` (with errors already pushed) on any unrecoverable
/// failure; `pcb.failed` is updated so a sibling reference to the same
/// name short-circuits instead of re-attempting the load.
fn resolve_module(
    registry: &mut ModuleRegistry,
    config: &ResolverConfig,
    pcb: &mut ParseControlBlock,
    name: &str,
    revision: Option<&RevisionDate>,
    diagnostics: &mut BuildDiagnostics,
) -> Option<Module> {
    if pcb.has_failed(name) {
        diagnostics.push_error(YangError::ModuleNotFound(name.to_string()).to_string(), SourceLocation::unknown());
        return None;
    }

    log::debug!("resolver: Locate '{name}'");
    let path = match locate(config, name, revision) {
        Ok(path) => path,
        Err(err) => {
            diagnostics.push_error(err.to_string(), SourceLocation::unknown());
            log::warn!("resolver: '{name}' failed at Locate: {err}");
            pcb.mark_failed(name);
            return None;
        }
    };

    log::debug!("resolver: Parse '{name}' from {}", path.display());
    let mut module = match parse_file(&path, diagnostics) {
        Some(module) => module,
        None => {
            log::warn!("resolver: '{name}' failed at Parse");
            pcb.mark_failed(name);
            return None;
        }
    };

    log::debug!("resolver: Resolve-imports '{name}'");
    if let Err(err) = resolve_imports(registry, config, pcb, &mut module, diagnostics) {
        diagnostics.push_error(err.to_string(), SourceLocation::unknown());
        log::warn!("resolver: '{name}' failed at Resolve-imports: {err}");
        pcb.mark_failed(name);
        return None;
    }

    log::debug!("resolver: Resolve-includes '{name}'");
    if let Err(err) = resolve_includes(registry, config, pcb, &mut module, diagnostics) {
        diagnostics.push_error(err.to_string(), SourceLocation::unknown());
        log::warn!("resolver: '{name}' failed at Resolve-includes: {err}");
        pcb.mark_failed(name);
        return None;
    }

    log::debug!("resolver: Resolve-refs '{name}'");
    resolve_refs(registry, &mut module, diagnostics);

    Some(module)
}

/// Searches `config.search_path`, in order, for `<name>.yang` or, when a
/// revision is given, `<name>@<revision>.yang` (spec.md §6). With no
/// revision requested, picks the lexicographically-greatest
/// `<name>@*.yang` in a directory when a bare `<name>.yang` isn't present,
/// since `YYYY-MM-DD` revision strings sort the same lexicographically as
/// chronologically.
fn locate(config: &ResolverConfig, name: &str, revision: Option<&RevisionDate>) -> Result<PathBuf, YangError> {
    for dir in &config.search_path {
        if let Some(rev) = revision {
            let candidate = dir.join(format!("{name}@{rev}.yang"));
            if candidate.is_file() {
                return Ok(candidate);
            }
            continue;
        }

        let candidate = dir.join(format!("{name}.yang"));
        if candidate.is_file() {
            return Ok(candidate);
        }

        if let Some(best) = newest_revisioned_file(dir, name) {
            return Ok(best);
        }
    }
    Err(YangError::ModuleNotFound(name.to_string()))
}

fn newest_revisioned_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let prefix = format!("{name}@");
    let entries = std::fs::read_dir(dir).ok()?;
    let mut best: Option<(String, PathBuf)> = None;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if let Some(rest) = file_name.strip_prefix(&prefix) {
            if let Some(rev) = rest.strip_suffix(".yang") {
                if best.as_ref().map(|(r, _)| rev > r.as_str()).unwrap_or(true) {
                    best = Some((rev.to_string(), entry.path()));
                }
            }
        }
    }
    best.map(|(_, path)| path)
}

fn parse_file(path: &Path, diagnostics: &mut BuildDiagnostics) -> Option<Module> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            diagnostics.push_error(
                YangError::ReadFailed { path: path.to_path_buf(), message: err.to_string() }.to_string(),
                SourceLocation::unknown(),
            );
            return None;
        }
    };

    let mut chain = TokenChain::new(SourceLanguage::Module);
    chain.attach_file(path, file);
    if let Err(failure) = chain.tokenise() {
        diagnostics.push_error(failure.error.to_string(), failure.location(Some(path.to_path_buf())));
        return None;
    }
    diagnostics.extend(chain.diagnostics().clone());

    match grammar::parse_module(&mut chain, diagnostics) {
        Ok(module) => Some(module),
        Err(()) => None,
    }
}

fn resolve_imports(
    registry: &mut ModuleRegistry,
    config: &ResolverConfig,
    pcb: &mut ParseControlBlock,
    module: &mut Module,
    diagnostics: &mut BuildDiagnostics,
) -> Result<(), YangError> {
    let imports = module.imports.clone();
    for import in &imports {
        pcb.enter_import(&import.module_name)?;
        let result = resolve_module(
            registry,
            config,
            pcb,
            &import.module_name,
            import.revision.as_ref(),
            diagnostics,
        );
        pcb.exit_import();
        match result {
            Some(imported) => {
                registry.register(imported);
            }
            None => return Err(YangError::ModuleNotFound(import.module_name.to_string())),
        }
    }
    Ok(())
}

/// Folds each `include`d submodule's entity lists into `module`'s own, the
/// way the original treats submodule content as if it were written inline
/// in the parent (spec.md §4.4). A submodule already folded in earlier in
/// this PCB's lifetime is skipped rather than re-parsed.
fn resolve_includes(
    registry: &mut ModuleRegistry,
    config: &ResolverConfig,
    pcb: &mut ParseControlBlock,
    module: &mut Module,
    diagnostics: &mut BuildDiagnostics,
) -> Result<(), YangError> {
    if !pcb.include_submods {
        return Ok(());
    }
    let includes = module.includes.clone();
    for include in &includes {
        if pcb.already_included(&include.submodule_name) {
            continue;
        }
        pcb.enter_include(&include.submodule_name)?;
        pcb.submodule_mode = true;
        pcb.parent = Some(module.name.clone());
        let result = resolve_module(
            registry,
            config,
            pcb,
            &include.submodule_name,
            include.revision.as_ref(),
            diagnostics,
        );
        pcb.submodule_mode = false;
        pcb.parent = None;
        pcb.exit_include();

        match result {
            Some(sub) => fold_submodule(module, sub, pcb.record_statement_order),
            None => {
                diagnostics.push_error(
                    YangError::ModuleNotFound(include.submodule_name.to_string()).to_string(),
                    SourceLocation::unknown(),
                );
            }
        }
    }
    Ok(())
}

fn fold_submodule(parent: &mut Module, sub: Module, record_statement_order: bool) {
    parent.typedefs.extend(sub.typedefs);
    parent.groupings.extend(sub.groupings);
    parent.extensions.extend(sub.extensions);
    parent.features.extend(sub.features);
    parent.deviations.extend(sub.deviations);
    parent.datadefs.extend(sub.datadefs);
    parent.rpcs.extend(sub.rpcs);
    parent.notifications.extend(sub.notifications);
    parent.imports.extend(sub.imports);
    if record_statement_order {
        parent.statement_order.extend(sub.statement_order);
    }
}

/// The YANG built-in type names (RFC 7950 §4.2.4) — a bare `type` reference
/// to one of these is never a `typedef`/import lookup.
const BUILTIN_TYPES: &[&str] = &[
    "binary",
    "bits",
    "boolean",
    "decimal64",
    "empty",
    "enumeration",
    "identityref",
    "instance-identifier",
    "int8",
    "int16",
    "int32",
    "int64",
    "leafref",
    "string",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "union",
];

fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// Walks every `prefix:name` reference recorded by the grammar layer and
/// binds it against the referenced module via [`ExternalLookup`], so a
/// dangling `uses foo:grouping-name`, `type foo:bar`, or `x:ext "..."` vendor
/// extension use is caught here rather than left for a downstream consumer
/// to trip over.
fn resolve_refs(registry: &ModuleRegistry, module: &mut Module, diagnostics: &mut BuildDiagnostics) {
    let lookup = ExternalLookup::new(registry);
    let own_prefix = module.prefix.clone();

    let mut uses_targets = Vec::new();
    collect_uses_targets(&module.datadefs, &mut uses_targets);
    for grouping in &module.groupings {
        collect_uses_targets(&grouping.children, &mut uses_targets);
    }

    let mut local_names = Vec::new();
    for (prefix, name) in uses_targets {
        match prefix {
            Some(prefix) => {
                let loc = SourceLocation::unknown();
                let _ = lookup.find_imp_grouping(module, &prefix, &name, &loc, diagnostics);
            }
            None => local_names.push(name),
        }
    }

    for name in local_names {
        match module.groupings.iter().position(|g| g.name == name) {
            Some(idx) => module.groupings[idx].used = true,
            None => diagnostics
                .push_error(YangError::DefNotFound(name.to_string()).to_string(), SourceLocation::unknown()),
        }
    }

    let mut type_refs = Vec::new();
    let mut appinfo_refs = Vec::new();
    collect_type_and_appinfo_refs(&module.datadefs, &mut type_refs, &mut appinfo_refs);
    for rpc in &module.rpcs {
        collect_type_and_appinfo_refs(&rpc.input, &mut type_refs, &mut appinfo_refs);
        collect_type_and_appinfo_refs(&rpc.output, &mut type_refs, &mut appinfo_refs);
        collect_appinfo_refs(&rpc.appinfo, &mut appinfo_refs);
    }
    for notification in &module.notifications {
        collect_type_and_appinfo_refs(&notification.children, &mut type_refs, &mut appinfo_refs);
        collect_appinfo_refs(&notification.appinfo, &mut appinfo_refs);
    }
    for typedef in &module.typedefs {
        collect_type_spec_refs(&typedef.type_spec, &mut type_refs);
    }

    let mut local_type_names = Vec::new();
    for (prefix, name) in type_refs {
        match prefix {
            Some(p) if Some(&p) != own_prefix.as_ref() => {
                let loc = SourceLocation::unknown();
                let _ = lookup.find_imp_typedef(module, &p, &name, &loc, diagnostics);
            }
            _ => local_type_names.push(name),
        }
    }
    for name in local_type_names {
        if is_builtin_type(&name) {
            continue;
        }
        match module.typedefs.iter().position(|t| t.name == name) {
            Some(idx) => module.typedefs[idx].used = true,
            None => diagnostics
                .push_error(YangError::DefNotFound(name.to_string()).to_string(), SourceLocation::unknown()),
        }
    }

    for (prefix, name) in appinfo_refs {
        if Some(&prefix) == own_prefix.as_ref() {
            if !module.extensions.iter().any(|e| e.name == name) {
                diagnostics
                    .push_error(YangError::DefNotFound(name.to_string()).to_string(), SourceLocation::unknown());
            }
        } else {
            let loc = SourceLocation::unknown();
            let _ = lookup.find_imp_extension(module, &prefix, &name, &loc, diagnostics);
        }
    }

    validate_list_keys(&module.datadefs, diagnostics);
}

/// Pushes `ts`'s own `(prefix, name)` reference, then recurses into each
/// `union` member's type, since a union member can itself be a typedef
/// reference.
fn collect_type_spec_refs(ts: &crate::schema::TypeSpec, out: &mut Vec<(Option<SmolStr>, SmolStr)>) {
    out.push((ts.prefix.clone(), ts.name.clone()));
    for member in &ts.union_members {
        collect_type_spec_refs(member, out);
    }
}

/// Pushes each `Appinfo`'s own `(prefix, name)` reference, then recurses
/// into its nested vendor-extension substatements.
fn collect_appinfo_refs(appinfo: &[crate::schema::Appinfo], out: &mut Vec<(SmolStr, SmolStr)>) {
    for info in appinfo {
        out.push((info.prefix.clone(), info.name.clone()));
        collect_appinfo_refs(&info.nested, out);
    }
}

/// Recurses the data tree collecting every `type`'s `(prefix, name)`
/// reference and every directly-attached `Appinfo`'s `(prefix, name)`
/// reference, the way [`collect_uses_targets`] does for `uses`.
fn collect_type_and_appinfo_refs(
    datadefs: &[crate::schema::DataDef],
    type_refs: &mut Vec<(Option<SmolStr>, SmolStr)>,
    appinfo_refs: &mut Vec<(SmolStr, SmolStr)>,
) {
    use crate::schema::DataDef;
    for def in datadefs {
        match def {
            DataDef::Leaf(l) => {
                collect_type_spec_refs(&l.type_spec, type_refs);
                collect_appinfo_refs(&l.appinfo, appinfo_refs);
            }
            DataDef::LeafList(l) => {
                collect_type_spec_refs(&l.type_spec, type_refs);
                collect_appinfo_refs(&l.appinfo, appinfo_refs);
            }
            DataDef::List(l) => {
                collect_appinfo_refs(&l.appinfo, appinfo_refs);
                collect_type_and_appinfo_refs(&l.children, type_refs, appinfo_refs);
            }
            DataDef::Container(c) => {
                collect_appinfo_refs(&c.appinfo, appinfo_refs);
                collect_type_and_appinfo_refs(&c.children, type_refs, appinfo_refs);
            }
            DataDef::Choice(c) => {
                collect_appinfo_refs(&c.appinfo, appinfo_refs);
                for case in &c.cases {
                    collect_type_and_appinfo_refs(&case.children, type_refs, appinfo_refs);
                }
            }
            DataDef::Case(c) => collect_type_and_appinfo_refs(&c.children, type_refs, appinfo_refs),
            DataDef::Augment(a) => collect_type_and_appinfo_refs(&a.children, type_refs, appinfo_refs),
            DataDef::AnyXml(_) | DataDef::Uses(_) => {}
        }
    }
}

/// Checks each `list`'s `key` leaf names against its own direct leaf
/// children (spec.md §8 supplement). A list that also `uses`s a grouping is
/// skipped: its key leaves may come from the grouping's body, which this
/// resolver does not inline into the list's `children`, so a literal-child
/// search would misreport a false positive.
fn validate_list_keys(datadefs: &[crate::schema::DataDef], diagnostics: &mut BuildDiagnostics) {
    use crate::schema::DataDef;
    for def in datadefs {
        match def {
            DataDef::List(list) => {
                let has_uses = list.children.iter().any(|c| matches!(c, DataDef::Uses(_)));
                if !has_uses {
                    for key_name in &list.key {
                        let found = list.children.iter().any(|c| match c {
                            DataDef::Leaf(leaf) => leaf.name == *key_name,
                            _ => false,
                        });
                        if !found {
                            diagnostics.push_error(
                                YangError::DefNotFound(key_name.to_string()).to_string(),
                                SourceLocation::unknown(),
                            );
                        }
                    }
                }
                validate_list_keys(&list.children, diagnostics);
            }
            DataDef::Container(c) => validate_list_keys(&c.children, diagnostics),
            DataDef::Choice(c) => {
                for case in &c.cases {
                    validate_list_keys(&case.children, diagnostics);
                }
            }
            DataDef::Case(c) => validate_list_keys(&c.children, diagnostics),
            DataDef::Leaf(_) | DataDef::LeafList(_) | DataDef::AnyXml(_) | DataDef::Uses(_) | DataDef::Augment(_) => {}
        }
    }
}

/// Recurses into `container`/`list`/`choice`/`case` children so a `uses`
/// nested arbitrarily deep in the data tree (or inside a grouping body) is
/// still bound, not just ones directly under the module.
fn collect_uses_targets(datadefs: &[crate::schema::DataDef], out: &mut Vec<(Option<SmolStr>, SmolStr)>) {
    use crate::schema::DataDef;
    for def in datadefs {
        match def {
            DataDef::Uses(u) => {
                out.push((u.grouping_prefix.clone(), u.grouping_name.clone()));
            }
            DataDef::Container(c) => collect_uses_targets(&c.children, out),
            DataDef::List(l) => collect_uses_targets(&l.children, out),
            DataDef::Choice(c) => {
                for case in &c.cases {
                    collect_uses_targets(&case.children, out);
                }
            }
            DataDef::Case(c) => collect_uses_targets(&c.children, out),
            DataDef::Leaf(_) | DataDef::LeafList(_) | DataDef::AnyXml(_) | DataDef::Augment(_) => {}
        }
    }
}

fn apply_deviations(
    registry: &mut ModuleRegistry,
    config: &ResolverConfig,
    pcb: &mut ParseControlBlock,
    deviation_module_name: &str,
    target: &mut Module,
    diagnostics: &mut BuildDiagnostics,
) -> Result<(), YangError> {
    pcb.enter_import(deviation_module_name)?;
    let result = resolve_module(registry, config, pcb, deviation_module_name, None, diagnostics);
    pcb.exit_import();
    let Some(dev_module) = result else { return Ok(()) };

    for deviation in &dev_module.deviations {
        let segments: Vec<&str> = deviation
            .target_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.rsplit(':').next().unwrap_or(s))
            .collect();
        if segments.is_empty() {
            diagnostics.push_error(
                YangError::DefNotFound(deviation.target_path.clone()).to_string(),
                SourceLocation::unknown(),
            );
            continue;
        }
        if !apply_deviation_at(&mut target.datadefs, &segments, &deviation.deviates) {
            diagnostics.push_error(
                YangError::DefNotFound(deviation.target_path.clone()).to_string(),
                SourceLocation::unknown(),
            );
        }
    }

    registry.register(dev_module);
    Ok(())
}

/// Walks `path` against `children`, applying `deviates` to the targeted
/// node once the final segment is reached (spec.md §8 supplement). A
/// `choice` is transparent to its `case` names: a path segment naming
/// either the case or one of its direct children is accepted, the way the
/// original resolves a deviation path written against the shorthand form.
fn apply_deviation_at(children: &mut Vec<crate::schema::DataDef>, path: &[&str], deviates: &[crate::schema::Deviate]) -> bool {
    use crate::schema::DataDef;

    let (head, rest) = match path.split_first() {
        Some(pair) => pair,
        None => return false,
    };

    let Some(idx) = children.iter().position(|c| c.name().map(|n| n.as_str()) == Some(*head)) else {
        for child in children.iter_mut() {
            if let DataDef::Choice(choice) = child {
                for case in &mut choice.cases {
                    if apply_deviation_at(&mut case.children, path, deviates) {
                        return true;
                    }
                }
            }
        }
        return false;
    };

    if rest.is_empty() {
        apply_deviates_to_node(&mut children[idx], deviates);
        if deviates.iter().any(|d| matches!(d.kind, crate::schema::DeviateKind::NotSupported)) {
            children.remove(idx);
        }
        return true;
    }

    match &mut children[idx] {
        DataDef::Container(c) => apply_deviation_at(&mut c.children, rest, deviates),
        DataDef::List(l) => apply_deviation_at(&mut l.children, rest, deviates),
        DataDef::Case(c) => apply_deviation_at(&mut c.children, rest, deviates),
        DataDef::Choice(c) => {
            for case in &mut c.cases {
                if apply_deviation_at(&mut case.children, rest, deviates) {
                    return true;
                }
            }
            false
        }
        _ => false,
    }
}

fn apply_deviates_to_node(node: &mut crate::schema::DataDef, deviates: &[crate::schema::Deviate]) {
    use crate::schema::{DataDef, DeviateKind};

    for deviate in deviates {
        match deviate.kind {
            DeviateKind::NotSupported => {}
            DeviateKind::Add | DeviateKind::Replace => match node {
                DataDef::Leaf(leaf) => {
                    if let Some(ts) = &deviate.type_spec {
                        leaf.type_spec = ts.clone();
                    }
                    if deviate.units.is_some() {
                        leaf.units = deviate.units.clone();
                    }
                    if deviate.default.is_some() {
                        leaf.default = deviate.default.clone();
                    }
                    if let Some(mandatory) = deviate.mandatory {
                        leaf.mandatory = mandatory;
                    }
                    if deviate.config.is_some() {
                        leaf.config = deviate.config;
                    }
                    leaf.must.extend(deviate.must.iter().cloned());
                }
                DataDef::LeafList(ll) => {
                    if let Some(ts) = &deviate.type_spec {
                        ll.type_spec = ts.clone();
                    }
                    if deviate.units.is_some() {
                        ll.units = deviate.units.clone();
                    }
                    if let Some(min) = deviate.min_elements {
                        ll.min_elements = min;
                    }
                    if deviate.max_elements.is_some() {
                        ll.max_elements = deviate.max_elements;
                    }
                    if deviate.config.is_some() {
                        ll.config = deviate.config;
                    }
                    ll.must.extend(deviate.must.iter().cloned());
                }
                DataDef::List(list) => {
                    if let Some(min) = deviate.min_elements {
                        list.min_elements = min;
                    }
                    if deviate.max_elements.is_some() {
                        list.max_elements = deviate.max_elements;
                    }
                    if deviate.config.is_some() {
                        list.config = deviate.config;
                    }
                    list.unique.extend(deviate.unique.iter().cloned());
                    list.must.extend(deviate.must.iter().cloned());
                }
                DataDef::Container(container) => {
                    if deviate.config.is_some() {
                        container.config = deviate.config;
                    }
                    container.must.extend(deviate.must.iter().cloned());
                }
                _ => {}
            },
            DeviateKind::Delete => match node {
                DataDef::Leaf(leaf) => {
                    if deviate.default.is_some() {
                        leaf.default = None;
                    }
                    if !deviate.must.is_empty() {
                        leaf.must.clear();
                    }
                }
                DataDef::List(list) => {
                    if !deviate.unique.is_empty() {
                        list.unique.clear();
                    }
                    if !deviate.must.is_empty() {
                        list.must.clear();
                    }
                }
                DataDef::LeafList(ll) => {
                    if !deviate.must.is_empty() {
                        ll.must.clear();
                    }
                }
                DataDef::Container(container) => {
                    if !deviate.must.is_empty() {
                        container.must.clear();
                    }
                }
                _ => {}
            },
        }
    }
}

/// `typedef-not-used` / `grouping-not-used` / `import-not-used` warnings,
/// plus a `date-future` sanity check on the most recent revision against
/// `config.today` (spec.md §4.4 post-checks, §7 warning taxonomy).
/// `date-past` is checked earlier, at `grammar::parse_revision` time, since
/// it only needs the literal date text and not the rest of the module.
fn post_checks(module: &Module, today: &RevisionDate, diagnostics: &mut BuildDiagnostics) {
    for typedef in &module.typedefs {
        if !typedef.used {
            diagnostics.push_warning(
                crate::error::Warning::TypedefNotUsed(typedef.name.to_string()).to_string(),
                SourceLocation::unknown(),
            );
        }
    }
    for grouping in &module.groupings {
        if !grouping.used {
            diagnostics.push_warning(
                crate::error::Warning::GroupingNotUsed(grouping.name.to_string()).to_string(),
                SourceLocation::unknown(),
            );
        }
    }
    for import in &module.imports {
        if !import.used {
            diagnostics.push_warning(
                crate::error::Warning::ImportNotUsed(import.module_name.to_string()).to_string(),
                SourceLocation::unknown(),
            );
        }
    }

    if let Some(latest) = module.revisions.iter().map(|r| &r.date).max() {
        if latest > today {
            diagnostics.push_warning(
                crate::error::Warning::DateFuture(latest.to_string()).to_string(),
                SourceLocation::unknown(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_module_reports_module_not_found() {
        let mut registry = ModuleRegistry::new();
        let config = ResolverConfig::default();
        let result = load_module(&mut registry, &config, "nonexistent", None, &[]);
        assert!(result.is_err());
        let diagnostics = result.unwrap_err();
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn locate_prefers_exact_revision_file() {
        let dir = std::env::temp_dir().join(format!("yang-resolver-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("acme-types.yang"), "module acme-types { namespace \"urn:acme\"; prefix at; }").unwrap();
        let config = ResolverConfig::default().with_search_path(vec![dir.clone()]);
        let found = locate(&config, "acme-types", None).unwrap();
        assert_eq!(found, dir.join("acme-types.yang"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
