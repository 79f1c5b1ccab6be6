#![allow(clippy::unwrap_used)]

use bluesitter::bluespec::{language, tree_sitter_bluespec};
use bluesitter::{Point, parse};

use crate::helpers::source_fixtures::{COUNTER_PACKAGE, TESTBENCH};

#[test]
fn test_accessor_returns_shared_language() {
    let pointer = tree_sitter_bluespec();
    assert!(!pointer.is_null());
    assert_eq!(pointer, tree_sitter_bluespec());
    assert_eq!(pointer, language().as_ptr());

    let language = language();
    assert_eq!(language.name(), "bluespec");
    assert_eq!(language.symbol_name(language.start_symbol()), Some("source_file"));
}

#[test]
fn test_counter_package_parses_cleanly() {
    let tree = parse(&language(), COUNTER_PACKAGE);
    assert!(!tree.has_error(), "{}", tree.to_sexp());
    assert_eq!(tree.text(), COUNTER_PACKAGE);

    let package = tree.root_node().named_child(0).unwrap();
    assert_eq!(package.kind(), "package");
    let kinds: Vec<_> = package
        .named_children()
        .filter(|node| !node.is_extra())
        .map(|node| node.kind().to_string())
        .collect();
    assert_eq!(
        kinds,
        [
            "Identifier",
            "import_decl",
            "export_decl",
            "interface_decl",
            "typedef_enum",
            "typedef_struct",
            "module_def",
            "function_def",
            "Identifier",
        ]
    );
}

#[test]
fn test_counter_module_contents() {
    let tree = parse(&language(), COUNTER_PACKAGE);
    let package = tree.root_node().named_child(0).unwrap();
    let module = package
        .named_children()
        .find(|node| node.kind() == "module_def")
        .unwrap();

    let kinds: Vec<_> = module
        .named_children()
        .filter(|node| !node.is_extra())
        .map(|node| node.kind().to_string())
        .collect();
    assert_eq!(
        kinds,
        [
            "attribute_instance",
            "module_proto",
            "module_inst",
            "module_inst",
            "rule",
            "method_def",
            "method_def",
            "identifier",
        ]
    );
    assert_eq!(module.start_position(), Point::new(18, 0));

    let guarded = module
        .named_children()
        .filter(|node| node.kind() == "method_def")
        .nth(1)
        .unwrap();
    assert!(
        guarded
            .named_children()
            .any(|node| node.kind() == "implicit_condition")
    );
}

#[test]
fn test_testbench_parses_cleanly() {
    let tree = parse(&language(), TESTBENCH);
    assert!(!tree.has_error(), "{}", tree.to_sexp());

    let root = tree.root_node();
    let comment = root.named_children().find(|node| node.kind() == "comment").unwrap();
    assert!(comment.is_extra());
    assert_eq!(comment.start_position(), Point::new(2, 0));
    assert_eq!(comment.end_position(), Point::new(3, 30));

    let module = root.named_children().find(|node| node.kind() == "module_def").unwrap();
    let rule = module.named_children().find(|node| node.kind() == "rule").unwrap();
    let statements: Vec<_> = rule
        .named_children()
        .filter(|node| !node.is_extra())
        .map(|node| node.kind().to_string())
        .collect();
    assert_eq!(
        statements,
        ["identifier", "reg_write", "let_binding", "if_statement", "if_statement"]
    );
}

#[test]
fn test_broken_source_still_covers_text() {
    let broken = COUNTER_PACKAGE.replace("endrule", "endrul");
    let tree = parse(&language(), &broken);
    assert!(tree.has_error());
    assert_eq!(tree.text(), broken);
    assert_eq!(tree.root_node().byte_range(), 0..broken.len());
    assert!(!tree.error_nodes().is_empty());
}
