//! Process-wide resolver configuration: search path and PCB flags exposed at
//! the resolver's construction boundary. Grounded on the teacher's
//! `CompilerConfiguration::new`, which reads `SLINT_STYLE`/
//! `SLINT_EMBED_RESOURCES`/`SLINT_INLINING` from the environment with a
//! typed, panic-on-malformed-value convention.

use std::env;
use std::path::PathBuf;

use crate::schema::RevisionDate;

/// Environment variable holding a colon-separated module search path,
/// analogous to `SLINT_STYLE` in the teacher.
pub const SEARCH_PATH_ENV: &str = "YANG_MODPATH";

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Directories searched, in order, for `<module>.yang` /
    /// `<module>@<revision>.yang` files (spec.md §6).
    pub search_path: Vec<PathBuf>,
    /// Whether `include`d submodule content is folded into the parent
    /// module's entity lists as it is resolved.
    pub include_submods: bool,
    /// Whether to build the parallel "statement-order" list used by
    /// downstream emitters (XSD/tree) to preserve declaration order.
    pub record_statement_order: bool,
    /// Whether the resolver is loading against a point-in-time registry
    /// snapshot (used by `ExternalLookup` when resolving references during
    /// a `diff`-style comparison of two registry states).
    pub diff_mode: bool,
    /// Whether `description`/`reference` text is retained on schema
    /// entities or discarded after parsing to save memory.
    pub save_descriptions: bool,
    /// "Today", against which `resolver::post_checks` flags a revision
    /// later than now as `date-future` (spec.md §7). Defaults to the system
    /// clock at construction but is overridable so a test (or a `diff_mode`
    /// comparison against a past registry snapshot) can pin it.
    pub today: RevisionDate,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            search_path: Vec::new(),
            include_submods: true,
            record_statement_order: false,
            diff_mode: false,
            save_descriptions: true,
            today: RevisionDate::today(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `YANG_MODPATH`-style colon-separated directories.
    pub fn search_path_from_str(value: &str) -> Vec<PathBuf> {
        value.split(':').filter(|s| !s.is_empty()).map(PathBuf::from).collect()
    }

    /// Build the search path from the `YANG_MODPATH` environment variable,
    /// if set. Panics on a malformed value the way the teacher panics on a
    /// malformed `SLINT_EMBED_RESOURCES`, since this is meant to be called
    /// once at process start, not in a hot path.
    pub fn from_search_path_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(SEARCH_PATH_ENV) {
            config.search_path = Self::search_path_from_str(&value);
        }
        config
    }

    pub fn with_search_path(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_path = dirs.into_iter().collect();
        self
    }

    pub fn with_today(mut self, today: RevisionDate) -> Self {
        self.today = today;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_separated_dirs() {
        let dirs = ResolverConfig::search_path_from_str("/a/yang:/b/yang::/c");
        assert_eq!(dirs, vec![PathBuf::from("/a/yang"), PathBuf::from("/b/yang"), PathBuf::from("/c")]);
    }

    #[test]
    fn defaults_are_permissive() {
        let config = ResolverConfig::default();
        assert!(config.include_submods);
        assert!(!config.diff_mode);
    }
}
