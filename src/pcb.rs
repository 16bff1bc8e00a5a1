//! Parse Control Block (spec.md §3): the state threaded through one
//! `load_module` call and every recursive import/include it triggers.
//!
//! Grounded on the teacher's `TypeLoader` struct, which carries the
//! in-flight `currently_loading` set through recursive `.slint` imports;
//! here the same shape tracks YANG `import`/`include` cycles separately,
//! since the two have independent loop-detection rules (spec.md §7:
//! `import-loop` vs `include-loop`).

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::config::ResolverConfig;
use crate::error::YangError;

/// One entry per module currently on the import or include chain, used
/// both for cycle detection and for attributing `def-not-found` errors to
/// the right referring module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainEntry {
    pub name: SmolStr,
}

#[derive(Debug)]
pub struct ParseControlBlock {
    /// Name of the module at the root of this `load_module` call.
    pub top: SmolStr,
    /// The parent module, set only while resolving a submodule reached via
    /// `include` (spec.md §3: "mod — the parent module for submodules").
    pub parent: Option<SmolStr>,
    /// All modules pulled in by `import`, de-duplicated, across the whole
    /// PCB lifetime.
    pub all_imports: Vec<SmolStr>,
    /// All submodules pulled in by `include`, de-duplicated.
    pub all_includes: Vec<SmolStr>,
    /// Stack of modules currently being resolved via `import`, innermost
    /// last; used for `import-loop` detection.
    pub import_chain: Vec<ChainEntry>,
    /// Stack of modules currently being resolved via `include`.
    pub include_chain: Vec<ChainEntry>,
    /// Modules already attempted and rejected within this PCB; re-loading
    /// one of these short-circuits straight to `Failed` (spec.md §4.4).
    pub failed: HashSet<SmolStr>,
    /// True while resolving the body of a submodule reached via `include`.
    pub submodule_mode: bool,
    pub include_submods: bool,
    pub record_statement_order: bool,
    pub diff_mode: bool,
    pub save_descriptions: bool,
}

impl ParseControlBlock {
    pub fn new(top: impl Into<SmolStr>, config: &ResolverConfig) -> Self {
        ParseControlBlock {
            top: top.into(),
            parent: None,
            all_imports: Vec::new(),
            all_includes: Vec::new(),
            import_chain: Vec::new(),
            include_chain: Vec::new(),
            failed: HashSet::new(),
            submodule_mode: false,
            include_submods: config.include_submods,
            record_statement_order: config.record_statement_order,
            diff_mode: config.diff_mode,
            save_descriptions: config.save_descriptions,
        }
    }

    /// Pushes `name` onto the import chain, failing with `ImportLoop` if
    /// it's already on the chain.
    pub fn enter_import(&mut self, name: &str) -> Result<(), YangError> {
        if self.import_chain.iter().any(|e| e.name == name) {
            return Err(YangError::ImportLoop(name.to_string()));
        }
        self.import_chain.push(ChainEntry { name: SmolStr::new(name) });
        if !self.all_imports.iter().any(|n| n == name) {
            self.all_imports.push(SmolStr::new(name));
        }
        Ok(())
    }

    pub fn exit_import(&mut self) {
        self.import_chain.pop();
    }

    /// Pushes `name` onto the include chain, failing with `IncludeLoop` if
    /// it's already on the chain.
    pub fn enter_include(&mut self, name: &str) -> Result<(), YangError> {
        if self.include_chain.iter().any(|e| e.name == name) {
            return Err(YangError::IncludeLoop(name.to_string()));
        }
        self.include_chain.push(ChainEntry { name: SmolStr::new(name) });
        if !self.all_includes.iter().any(|n| n == name) {
            self.all_includes.push(SmolStr::new(name));
        }
        Ok(())
    }

    pub fn exit_include(&mut self) {
        self.include_chain.pop();
    }

    pub fn mark_failed(&mut self, name: &str) {
        self.failed.insert(SmolStr::new(name));
    }

    pub fn has_failed(&self, name: &str) -> bool {
        self.failed.contains(name)
    }

    /// Whether `name` has already been folded into the PCB via `include`,
    /// so a repeated `include` of the same submodule within one PCB
    /// lifetime is a no-op rather than a re-parse (spec.md §4.4).
    pub fn already_included(&self, name: &str) -> bool {
        self.all_includes.iter().any(|n| n == name)
    }

    pub fn already_imported(&self, name: &str) -> bool {
        self.all_imports.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_import_loop() {
        let config = ResolverConfig::default();
        let mut pcb = ParseControlBlock::new("a", &config);
        pcb.enter_import("a").unwrap();
        pcb.enter_import("b").unwrap();
        let err = pcb.enter_import("a").unwrap_err();
        assert!(matches!(err, YangError::ImportLoop(n) if n == "a"));
    }

    #[test]
    fn distinct_chains_for_import_and_include() {
        let config = ResolverConfig::default();
        let mut pcb = ParseControlBlock::new("a", &config);
        pcb.enter_import("b").unwrap();
        assert!(pcb.enter_include("b").is_ok());
    }

    #[test]
    fn include_chain_pops_on_exit() {
        let config = ResolverConfig::default();
        let mut pcb = ParseControlBlock::new("a", &config);
        pcb.enter_include("b").unwrap();
        pcb.exit_include();
        assert!(pcb.enter_include("b").is_ok());
    }
}
