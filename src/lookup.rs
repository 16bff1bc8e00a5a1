//! `ExternalLookup` (spec.md §4.5): resolves a `prefix:name` reference
//! encountered in one module against the module that prefix's `import`
//! points at, reporting failures against the *referring* token's location
//! rather than wherever the lookup itself happens to be.
//!
//! Grounded on the teacher's `LookupCtx`, which resolves a dotted
//! `Foo.bar` element/property reference by walking the enclosing
//! component's import list; here the walk is one level (YANG has no
//! transitive re-export of imported definitions) over a module's own
//! `imports`.

use crate::diagnostics::BuildDiagnostics;
use crate::diagnostics::SourceLocation;
use crate::error::YangError;
use crate::registry::ModuleRegistry;
use crate::schema::{Extension, Grouping, Module, Typedef};

pub struct ExternalLookup<'a> {
    pub registry: &'a ModuleRegistry,
}

impl<'a> ExternalLookup<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        ExternalLookup { registry }
    }

    /// Resolves `prefix` against `referring_module`'s own `import` list,
    /// marking the matched import as used. Reports `prefix-not-found`
    /// against `error_loc` and returns `None` if no import declares it.
    fn resolve_prefix(&self, referring_module: &mut Module, prefix: &str) -> Option<String> {
        let import = referring_module.imports.iter_mut().find(|imp| imp.prefix == prefix)?;
        import.used = true;
        Some(import.module_name.to_string())
    }

    fn report_prefix_not_found(&self, prefix: &str, error_loc: &SourceLocation, diagnostics: &mut BuildDiagnostics) {
        diagnostics.push_error(YangError::PrefixNotFound(prefix.to_string()).to_string(), error_loc.clone());
    }

    /// `find_imp_typedef(prefix, name)` (spec.md §4.5).
    pub fn find_imp_typedef(
        &self,
        referring_module: &mut Module,
        prefix: &str,
        name: &str,
        error_loc: &SourceLocation,
        diagnostics: &mut BuildDiagnostics,
    ) -> Option<Typedef> {
        let Some(module_name) = self.resolve_prefix(referring_module, prefix) else {
            self.report_prefix_not_found(prefix, error_loc, diagnostics);
            return None;
        };
        let module = self.registry.find_module(&module_name, None)?;
        let found = module.typedefs.iter().find(|t| t.name == name).cloned();
        if found.is_none() {
            diagnostics.push_error(YangError::DefNotFound(name.to_string()).to_string(), error_loc.clone());
        }
        found
    }

    /// `find_imp_grouping(prefix, name)` (spec.md §4.5).
    pub fn find_imp_grouping(
        &self,
        referring_module: &mut Module,
        prefix: &str,
        name: &str,
        error_loc: &SourceLocation,
        diagnostics: &mut BuildDiagnostics,
    ) -> Option<Grouping> {
        let Some(module_name) = self.resolve_prefix(referring_module, prefix) else {
            self.report_prefix_not_found(prefix, error_loc, diagnostics);
            return None;
        };
        let module = self.registry.find_module(&module_name, None)?;
        let found = module.groupings.iter().find(|g| g.name == name).cloned();
        if found.is_none() {
            diagnostics.push_error(YangError::DefNotFound(name.to_string()).to_string(), error_loc.clone());
        }
        found
    }

    /// `find_imp_extension(prefix, name)` (spec.md §4.5).
    pub fn find_imp_extension(
        &self,
        referring_module: &mut Module,
        prefix: &str,
        name: &str,
        error_loc: &SourceLocation,
        diagnostics: &mut BuildDiagnostics,
    ) -> Option<Extension> {
        let Some(module_name) = self.resolve_prefix(referring_module, prefix) else {
            self.report_prefix_not_found(prefix, error_loc, diagnostics);
            return None;
        };
        let module = self.registry.find_module(&module_name, None)?;
        let found = module.extensions.iter().find(|e| e.name == name).cloned();
        if found.is_none() {
            diagnostics.push_error(YangError::DefNotFound(name.to_string()).to_string(), error_loc.clone());
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Import, Status, TypeSpec};

    fn module_with_typedef(name: &str, td_name: &str) -> Module {
        let mut m = Module { name: name.into(), ..Module::default() };
        m.typedefs.push(Typedef {
            name: td_name.into(),
            defining_module: m.name.clone(),
            type_spec: TypeSpec::named("string"),
            units: None,
            default: None,
            status: Status::Current,
            description: None,
            reference: None,
            used: false,
        });
        m
    }

    #[test]
    fn finds_typedef_through_import_prefix() {
        let mut registry = ModuleRegistry::new();
        registry.register(module_with_typedef("imported", "my-type"));

        let mut referring = Module { name: "main".into(), ..Module::default() };
        referring.imports.push(Import { module_name: "imported".into(), prefix: "imp".into(), revision: None, used: false });

        let lookup = ExternalLookup::new(&registry);
        let mut diagnostics = BuildDiagnostics::default();
        let loc = SourceLocation::unknown();
        let found = lookup.find_imp_typedef(&mut referring, "imp", "my-type", &loc, &mut diagnostics);
        assert!(found.is_some());
        assert!(referring.imports[0].used);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_prefix_reports_prefix_not_found() {
        let registry = ModuleRegistry::new();
        let mut referring = Module { name: "main".into(), ..Module::default() };
        let lookup = ExternalLookup::new(&registry);
        let mut diagnostics = BuildDiagnostics::default();
        let loc = SourceLocation::unknown();
        let found = lookup.find_imp_typedef(&mut referring, "missing", "x", &loc, &mut diagnostics);
        assert!(found.is_none());
        assert!(diagnostics.has_errors());
    }
}
