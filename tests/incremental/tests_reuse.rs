#![allow(clippy::unwrap_used)]

use bluesitter::{InputEdit, Parser, ParserOptions, parse, reparse};

use crate::helpers::calc::calc;

#[test]
fn test_tokens_before_edit_are_carried() {
    let language = calc();
    let old = parse(&language, "x + 1");
    let (text, edit) = InputEdit::apply("x + 1", 4..5, "42");
    let new = reparse(&old.edit(&edit), &text);

    assert_eq!(new.text(), "x + 42");
    assert_eq!(new, parse(&language, &text));
    assert!(new.stats().carried_tokens > 0);

    let old_expression = old.root_node().named_child(0).unwrap();
    let new_expression = new.root_node().named_child(0).unwrap();
    for index in 0..2 {
        let before = old_expression.child(index).unwrap();
        let after = new_expression.child(index).unwrap();
        assert_eq!(before.kind(), after.kind());
        assert_eq!(before.id(), after.id());
    }
    let number = new_expression.named_child(1).unwrap();
    assert_eq!(number.text(), "42");
    assert_eq!(number.byte_range(), 4..6);
}

#[test]
fn test_untouched_blocks_are_reused() {
    let language = calc();
    let source = "{ a } { b } { c } x";
    let old = parse(&language, source);
    let (text, edit) = InputEdit::apply(source, 18..19, "y");
    let new = reparse(&old.edit(&edit), &text);

    assert_eq!(new, parse(&language, &text));
    assert!(new.stats().reused_nodes >= 1);

    let first_before = old.root_node().named_child(0).unwrap();
    let first_after = new.root_node().named_child(0).unwrap();
    assert_eq!(first_after.kind(), "block");
    assert_eq!(first_before.id(), first_after.id());
    assert_ne!(
        old.root_node().named_child(3).unwrap().id(),
        new.root_node().named_child(3).unwrap().id()
    );
}

#[test]
fn test_edited_block_is_rebuilt() {
    let language = calc();
    let source = "{ a } { b } { c }";
    let old = parse(&language, source);
    let (text, edit) = InputEdit::apply(source, 8..9, "b * 2");
    let new = reparse(&old.edit(&edit), &text);

    assert_eq!(new, parse(&language, &text));
    let middle = new.root_node().named_child(1).unwrap();
    assert_eq!(middle.to_sexp(), "(block (binary_expression (identifier) (number)))");
    assert_ne!(old.root_node().named_child(1).unwrap().id(), middle.id());
}

#[test]
fn test_length_mismatch_falls_back_to_full_parse() {
    let language = calc();
    let old = parse(&language, "a + b");
    let edited = old.edit(&InputEdit::new(4, 5, 6));
    let new = reparse(&edited, "a + b c d");

    assert_eq!(new, parse(&language, "a + b c d"));
    assert_eq!(new.stats().carried_tokens, 0);
    assert_eq!(new.stats().reused_nodes, 0);
}

#[test]
fn test_full_options_ignore_old_tree() {
    let language = calc();
    let old = parse(&language, "{ a } b");
    let (text, edit) = InputEdit::apply("{ a } b", 6..7, "c");
    let parser = Parser::with_options(&language, ParserOptions::full());
    let new = parser.parse(&text, Some(&old.edit(&edit)));

    assert_eq!(new, parse(&language, &text));
    assert_eq!(new.stats().carried_tokens, 0);
    assert_eq!(new.stats().lexed_tokens, new.token_count());
}

#[test]
fn test_old_tree_is_unchanged_by_reparse() {
    let language = calc();
    let old = parse(&language, "{ a } b");
    let snapshot = old.to_sexp();
    let (text, edit) = InputEdit::apply("{ a } b", 0..0, "}");
    let new = reparse(&old.edit(&edit), &text);

    assert!(new.has_error());
    assert_eq!(old.to_sexp(), snapshot);
    assert_eq!(old.text(), "{ a } b");
}
