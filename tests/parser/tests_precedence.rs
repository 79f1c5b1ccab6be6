use bluesitter::parse;
use rstest::rstest;

use crate::helpers::calc::calc;

#[rstest]
#[case::left_assoc(
    "a - b - c",
    "(source_file (binary_expression (binary_expression (identifier) (identifier)) (identifier)))"
)]
#[case::product_binds_tighter(
    "a + b * c",
    "(source_file (binary_expression (identifier) (binary_expression (identifier) (identifier))))"
)]
#[case::product_first(
    "a * b + c",
    "(source_file (binary_expression (binary_expression (identifier) (identifier)) (identifier)))"
)]
fn test_binary_grouping(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(parse(&calc(), text).to_sexp(), expected);
}

#[test]
fn test_conflicts_are_recorded() {
    let language = calc();
    assert!(!language.conflicts().is_empty());
}
