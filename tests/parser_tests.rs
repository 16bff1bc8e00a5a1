//! End-to-end lex+parse scenarios (spec.md §8 scenarios 1, 5, 6).

use yang_schema_core::diagnostics::BuildDiagnostics;
use yang_schema_core::grammar::parse_module;
use yang_schema_core::lexer::TokenChain;
use yang_schema_core::schema::DataDef;
use yang_schema_core::token::SourceLanguage;

fn parse(source: &str) -> (yang_schema_core::schema::Module, BuildDiagnostics) {
    let mut chain = TokenChain::new(SourceLanguage::Module);
    chain.attach_buffer(source.as_bytes().to_vec());
    chain.tokenise().expect("tokenise should succeed");
    let mut diagnostics = BuildDiagnostics::default();
    let module = parse_module(&mut chain, &mut diagnostics).expect("parse should succeed");
    (module, diagnostics)
}

#[test]
fn minimal_module_round_trips_its_declared_fields() {
    let source = r#"module m { namespace "u:m"; prefix m; revision 2020-01-01; leaf a { type string; } }"#;
    let (module, diagnostics) = parse(source);

    assert_eq!(module.name.as_str(), "m");
    assert_eq!(module.namespace.as_deref(), Some("u:m"));
    assert_eq!(module.prefix.as_deref(), Some("m"));
    assert_eq!(module.revisions.len(), 1);
    assert_eq!(module.revisions[0].date.to_string(), "2020-01-01");

    assert_eq!(module.datadefs.len(), 1);
    match &module.datadefs[0] {
        DataDef::Leaf(leaf) => {
            assert_eq!(leaf.name.as_str(), "a");
            assert_eq!(leaf.type_spec.name.as_str(), "string");
        }
        other => panic!("expected a leaf, got {other:?}"),
    }

    assert!(!diagnostics.has_errors());
}

#[test]
fn quoted_string_concatenation_joins_into_one_value() {
    let source = r#"module m { namespace "u:m"; prefix m;
        description "foo" + 'bar' + "baz";
        leaf a { type string; }
    }"#;
    let (module, diagnostics) = parse(source);
    assert_eq!(module.description.as_deref(), Some("foobarbaz"));
    assert!(!diagnostics.has_errors());
}

#[test]
fn must_with_error_info_populates_all_three_fields() {
    let source = r#"module m { namespace "u:m"; prefix m;
        leaf a {
            type int32;
            must "a > 0" { error-message "positive"; error-app-tag pos; }
        }
    }"#;
    let (module, _diagnostics) = parse(source);
    match &module.datadefs[0] {
        DataDef::Leaf(leaf) => {
            assert_eq!(leaf.must.len(), 1);
            let info = &leaf.must[0];
            assert_eq!(info.xpath.as_deref(), Some("a > 0"));
            assert_eq!(info.error_message.as_deref(), Some("positive"));
            assert_eq!(info.error_app_tag.as_deref(), Some("pos"));
            assert!(info.description.is_none());
            assert!(info.reference.is_none());
        }
        other => panic!("expected a leaf, got {other:?}"),
    }
}

#[test]
fn must_with_vendor_extension_argument_is_captured_not_discarded() {
    let source = r#"module m { namespace "u:m"; prefix m;
        leaf a {
            type int32;
            must "a > 0" { x:hint "slider"; }
        }
    }"#;
    let (module, diagnostics) = parse(source);
    match &module.datadefs[0] {
        DataDef::Leaf(leaf) => {
            assert_eq!(leaf.must.len(), 1);
            let info = &leaf.must[0];
            assert_eq!(info.xpath.as_deref(), Some("a > 0"));
            assert_eq!(info.appinfo.len(), 1);
            assert_eq!(info.appinfo[0].prefix.as_str(), "x");
            assert_eq!(info.appinfo[0].name.as_str(), "hint");
            assert_eq!(info.appinfo[0].argument.as_deref(), Some("slider"));
        }
        other => panic!("expected a leaf, got {other:?}"),
    }
    assert!(!diagnostics.has_errors());
}

#[test]
fn unterminated_block_comment_fails_without_registering_a_module() {
    let source = "module m { /* oops";
    let mut chain = TokenChain::new(SourceLanguage::Module);
    chain.attach_buffer(source.as_bytes().to_vec());
    let result = chain.tokenise();
    assert!(result.is_err());
}
