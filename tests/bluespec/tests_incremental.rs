#![allow(clippy::unwrap_used)]

use bluesitter::bluespec::language;
use bluesitter::{InputEdit, parse, reparse};
use rstest::rstest;

use crate::helpers::source_fixtures::{COUNTER_PACKAGE, TESTBENCH};

fn edit_at(source: &str, needle: &str, replacement: &str) -> (String, InputEdit) {
    let start = source.find(needle).unwrap();
    InputEdit::apply(source, start..start + needle.len(), replacement)
}

#[test]
fn test_editing_a_rule_reuses_earlier_declarations() {
    let language = language();
    let old = parse(&language, COUNTER_PACKAGE);
    let (text, edit) = edit_at(COUNTER_PACKAGE, "value + 1", "value + 2");
    let new = reparse(&old.edit(&edit), &text);

    assert_eq!(new, parse(&language, &text));
    let stats = new.stats();
    assert!(stats.reused_nodes >= 1, "{stats:?}");
    assert!(stats.lexed_tokens < new.token_count());

    let interface = |tree: &bluesitter::Tree| {
        tree.root_node()
            .named_child(0)
            .unwrap()
            .named_children()
            .find(|node| node.kind() == "interface_decl")
            .unwrap()
            .id()
    };
    assert_eq!(interface(&old), interface(&new));
}

#[test]
fn test_breaking_and_fixing_a_module() {
    let language = language();
    let old = parse(&language, TESTBENCH);

    let (broken, edit) = edit_at(TESTBENCH, "endrule", "");
    let broken_tree = reparse(&old.edit(&edit), &broken);
    assert_eq!(broken_tree, parse(&language, &broken));
    assert!(broken_tree.has_error());

    let start = broken.find("\nendmodule").unwrap();
    let (fixed, edit) = InputEdit::apply(&broken, start..start, "endrule");
    let fixed_tree = reparse(&broken_tree.edit(&edit), &fixed);
    assert_eq!(fixed_tree, parse(&language, &fixed));
    assert!(!fixed_tree.has_error(), "{}", fixed_tree.to_sexp());
}

#[test]
fn test_renaming_an_identifier_everywhere() {
    let language = language();
    let mut text = COUNTER_PACKAGE.to_string();
    let mut tree = parse(&language, &text);
    while let Some(start) = text.find("value") {
        let (next, edit) = InputEdit::apply(&text, start..start + 5, "count");
        tree = reparse(&tree.edit(&edit), &next);
        text = next;
    }
    assert_eq!(tree, parse(&language, &text));
    assert!(!tree.has_error());
}

#[rstest]
#[case::counter(COUNTER_PACKAGE)]
#[case::testbench(TESTBENCH)]
fn test_every_single_byte_deletion(#[case] source: &str) {
    let language = language();
    let old = parse(&language, source);
    for start in 0..source.len() {
        let (text, edit) = InputEdit::apply(source, start..start + 1, "");
        let new = reparse(&old.edit(&edit), &text);
        assert_eq!(new, parse(&language, &text), "deleted byte {start}");
    }
}

#[rstest]
#[case::counter(COUNTER_PACKAGE)]
#[case::testbench(TESTBENCH)]
fn test_every_single_byte_replacement(#[case] source: &str) {
    let language = language();
    let old = parse(&language, source);
    for start in 0..source.len() {
        let (text, edit) = InputEdit::apply(source, start..start + 1, ";");
        let new = reparse(&old.edit(&edit), &text);
        assert_eq!(new, parse(&language, &text), "replaced byte {start}");
    }
}

#[test]
fn test_chained_edits_on_a_broken_tree() {
    let language = language();
    let (mut text, _) = edit_at(TESTBENCH, "endrule", "");
    let mut tree = parse(&language, &text);
    // Walk forward through the text, dropping every seventh byte.
    let mut start = 0;
    while start < text.len() {
        let (next, edit) = InputEdit::apply(&text, start..start + 1, "");
        tree = reparse(&tree.edit(&edit), &next);
        assert_eq!(tree, parse(&language, &next), "dropped byte {start}");
        text = next;
        start += 6;
    }
}
