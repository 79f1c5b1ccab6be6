#![allow(clippy::unwrap_used)]

use bluesitter::parse;

use crate::helpers::calc::calc;

#[test]
fn test_unexpected_token_alone() {
    let tree = parse(&calc(), "}");
    let root = tree.root_node();
    assert_eq!(root.byte_range(), 0..1);

    let errors = tree.error_nodes();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].byte_range(), 0..1);
    assert!(errors[0].is_error());
    assert!(root.has_error());
    assert_eq!(tree.stats().recoveries, 1);
}

#[test]
fn test_recovery_resumes_after_skipped_token() {
    let tree = parse(&calc(), "x } y");
    assert_eq!(tree.to_sexp(), "(source_file (identifier) (ERROR) (identifier))");

    let error = &tree.error_nodes()[0];
    assert_eq!(error.text(), "}");
    assert!(!error.next_sibling().unwrap().is_error());
    assert_eq!(tree.text(), "x } y");
}

#[test]
fn test_unclosed_block_at_end_of_input() {
    let tree = parse(&calc(), "{ x");
    assert_eq!(tree.to_sexp(), "(source_file (ERROR (identifier)))");
    assert_eq!(tree.error_nodes()[0].byte_range(), 0..3);
}

#[test]
fn test_unknown_characters_are_errors() {
    let tree = parse(&calc(), "a # b");
    assert!(tree.has_error());
    assert_eq!(tree.text(), "a # b");
    let root = tree.root_node();
    assert_eq!(root.named_child(0).unwrap().kind(), "identifier");
    let last = root.named_child(root.named_child_count() - 1).unwrap();
    assert_eq!(last.kind(), "identifier");
    assert_eq!(last.byte_range(), 4..5);
}

#[test]
fn test_error_free_siblings_report_no_error() {
    let tree = parse(&calc(), "{ a } }");
    let block = tree.root_node().named_child(0).unwrap();
    assert_eq!(block.kind(), "block");
    assert!(!block.has_error());
    assert!(tree.has_error());
}

#[test]
fn test_every_prefix_parses() {
    let language = calc();
    let text = "{ a + { b * 2 } - c } d";
    for end in 0..=text.len() {
        let tree = parse(&language, &text[..end]);
        assert_eq!(tree.text(), &text[..end]);
        assert_eq!(tree.root_node().byte_range(), 0..end);
    }
}

#[test]
fn test_unscannable_byte_is_a_single_error() {
    let tree = parse(&calc(), "#");
    assert_eq!(tree.to_sexp(), "(source_file (ERROR))");
    let errors = tree.error_nodes();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].byte_range(), 0..1);
}

#[test]
fn test_error_nodes_reports_outermost_regions() {
    let tree = parse(&calc(), "a # b # { c");
    let errors = tree.error_nodes();
    assert!(!errors.is_empty());
    for pair in errors.windows(2) {
        assert!(pair[0].byte_range().end <= pair[1].byte_range().start);
    }
}
