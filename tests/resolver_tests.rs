//! Resolver scenarios against real files on disk (spec.md §8 scenario 4,
//! plus unused-definition warnings).

use std::fs;
use std::path::PathBuf;

use yang_schema_core::config::ResolverConfig;
use yang_schema_core::YangContext;

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("yang-schema-core-test-{tag}-{}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        TempDir { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn import_loop_is_rejected_and_nothing_is_registered() {
    let dir = TempDir::new("import-loop");
    fs::write(
        dir.path.join("a.yang"),
        r#"module a { namespace "u:a"; prefix a; import b { prefix b; } }"#,
    )
    .unwrap();
    fs::write(
        dir.path.join("b.yang"),
        r#"module b { namespace "u:b"; prefix b; import a { prefix a; } }"#,
    )
    .unwrap();

    let config = ResolverConfig::default().with_search_path(vec![dir.path.clone()]);
    let mut ctx = YangContext::new(config);
    let result = ctx.load_module("a", None, &[]);

    assert!(result.is_err());
    assert!(ctx.find_module("a", None).is_none());
    assert!(ctx.find_module("b", None).is_none());
}

#[test]
fn unused_typedef_produces_a_warning_but_still_registers() {
    let dir = TempDir::new("unused-typedef");
    fs::write(
        dir.path.join("m.yang"),
        r#"module m { namespace "u:m"; prefix m;
            typedef unused-type { type string; }
            leaf a { type string; }
        }"#,
    )
    .unwrap();

    let config = ResolverConfig::default().with_search_path(vec![dir.path.clone()]);
    let mut ctx = YangContext::new(config);
    let (handle, diagnostics) = ctx.load_module("m", None, &[]).expect("module should still load");
    assert_eq!(handle.typedefs.len(), 1);
    assert!(!diagnostics.has_errors());
    assert!(!diagnostics.is_empty());
}

#[test]
fn locally_used_grouping_produces_no_warning() {
    let dir = TempDir::new("local-grouping");
    fs::write(
        dir.path.join("m.yang"),
        r#"module m { namespace "u:m"; prefix m;
            grouping g { leaf inner { type string; } }
            container top { uses g; }
        }"#,
    )
    .unwrap();

    let config = ResolverConfig::default().with_search_path(vec![dir.path.clone()]);
    let mut ctx = YangContext::new(config);
    let (handle, diagnostics) = ctx.load_module("m", None, &[]).expect("module should load");
    assert_eq!(handle.groupings.len(), 1);
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.is_empty(), "grouping used locally should not warn as unused: {diagnostics:?}");
}

#[test]
fn locally_used_typedef_produces_no_warning() {
    let dir = TempDir::new("local-typedef");
    fs::write(
        dir.path.join("m.yang"),
        r#"module m { namespace "u:m"; prefix m;
            typedef percent { type uint8; }
            leaf a { type percent; }
        }"#,
    )
    .unwrap();

    let config = ResolverConfig::default().with_search_path(vec![dir.path.clone()]);
    let mut ctx = YangContext::new(config);
    let (handle, diagnostics) = ctx.load_module("m", None, &[]).expect("module should load");
    assert_eq!(handle.typedefs.len(), 1);
    assert!(handle.typedefs[0].used, "typedef referenced by a leaf should be marked used");
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.is_empty(), "typedef used locally should not warn as unused: {diagnostics:?}");
}

#[test]
fn revision_later_than_today_produces_a_date_future_warning() {
    let dir = TempDir::new("date-future");
    fs::write(
        dir.path.join("m.yang"),
        r#"module m { namespace "u:m"; prefix m;
            revision 2999-01-01;
            leaf a { type string; }
        }"#,
    )
    .unwrap();

    let config = ResolverConfig::default()
        .with_search_path(vec![dir.path.clone()])
        .with_today(yang_schema_core::schema::RevisionDate { year: 2026, month: 1, day: 1 });
    let mut ctx = YangContext::new(config);
    let (_handle, diagnostics) = ctx.load_module("m", None, &[]).expect("module should load");
    assert!(!diagnostics.has_errors());
    assert!(!diagnostics.is_empty(), "a revision far in the future should produce a date-future warning");
}

#[test]
fn deviation_not_supported_removes_the_target_leaf() {
    let dir = TempDir::new("deviation");
    fs::write(
        dir.path.join("m.yang"),
        r#"module m { namespace "u:m"; prefix m;
            container top {
                leaf doomed { type string; }
                leaf kept { type string; }
            }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path.join("m-dev.yang"),
        r#"module m-dev { namespace "u:m-dev"; prefix md;
            deviation "/top/doomed" {
                deviate not-supported;
            }
        }"#,
    )
    .unwrap();

    let config = ResolverConfig::default().with_search_path(vec![dir.path.clone()]);
    let mut ctx = YangContext::new(config);
    let (handle, _diagnostics) =
        ctx.load_module("m", None, &["m-dev".to_string()]).expect("module should load");

    let top = handle
        .datadefs
        .iter()
        .find_map(|d| match d {
            yang_schema_core::schema::DataDef::Container(c) if c.name == "top" => Some(c),
            _ => None,
        })
        .expect("top container present");
    assert_eq!(top.children.len(), 1);
    assert_eq!(top.children[0].name().map(|n| n.as_str()), Some("kept"));
}

#[test]
fn missing_module_reports_module_not_found_without_touching_disk_layout() {
    let config = ResolverConfig::default();
    let mut ctx = YangContext::new(config);
    let result = ctx.load_module("does-not-exist-anywhere", None, &[]);
    assert!(result.is_err());
}
