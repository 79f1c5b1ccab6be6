use bluesitter::{InputEdit, parse, reparse};
use rstest::rstest;

use crate::helpers::calc::calc;
use crate::helpers::source_fixtures::{CALC_ERROR_SOURCES, CALC_SOURCES};

/// Edits expressed against the end of the text so they fit every source.
#[derive(Debug, Clone, Copy)]
enum Change {
    Append(&'static str),
    Prepend(&'static str),
    DeleteFirst,
    ReplaceMiddle(&'static str),
}

impl Change {
    fn apply(self, text: &str) -> (String, InputEdit) {
        let len = text.len();
        match self {
            Change::Append(suffix) => InputEdit::apply(text, len..len, suffix),
            Change::Prepend(prefix) => InputEdit::apply(text, 0..0, prefix),
            Change::DeleteFirst => InputEdit::apply(text, 0..len.min(1), ""),
            Change::ReplaceMiddle(replacement) => {
                InputEdit::apply(text, len / 2..len / 2 + usize::from(len > 0), replacement)
            }
        }
    }
}

#[rstest]
fn test_reparse_matches_full_parse(
    #[values(0, 1, 2, 3, 4, 5, 6, 7)] index: usize,
    #[values(
        Change::Append(" z"),
        Change::Append(" }"),
        Change::Prepend("{ "),
        Change::DeleteFirst,
        Change::ReplaceMiddle("+"),
        Change::ReplaceMiddle(" { q } ")
    )]
    change: Change,
) {
    let language = calc();
    let source = CALC_SOURCES[index];
    let old = parse(&language, source);
    let (text, edit) = change.apply(source);

    let new = reparse(&old.edit(&edit), &text);
    assert_eq!(new, parse(&language, &text), "{source:?} {change:?}");
    assert_eq!(new.text(), text);
}

#[test]
fn test_composed_edits() {
    let language = calc();
    let source = "{ a } { b } c";
    let old = parse(&language, source);

    let (first_text, first) = InputEdit::apply(source, 2..3, "x + y");
    let (second_text, second) = InputEdit::apply(&first_text, 0..0, "z * 3 ");
    let edited = old.edit(&first).edit(&second);
    assert_eq!(edited.new_len(), second_text.len());

    let new = reparse(&edited, &second_text);
    assert_eq!(new, parse(&language, &second_text));
}

#[test]
fn test_chained_reparses() {
    let language = calc();
    let mut text = String::from("a");
    let mut tree = parse(&language, &text);
    for step in ["{ ", "b ", "* 4 ", "} ", "c"] {
        let len = text.len();
        let (next, edit) = InputEdit::apply(&text, len..len, step);
        tree = reparse(&tree.edit(&edit), &next);
        text = next;
        assert_eq!(tree, parse(&language, &text), "{text:?}");
    }
    assert!(!tree.has_error());
}

#[rstest]
#[case::operator_after_recovery("x+e; ed", 5..6, "*")]
#[case::operand_after_recovery("a + b ; c d", 8..9, "* q")]
#[case::inside_block_after_recovery("{ a ; b } c", 6..7, "* 2")]
#[case::second_operand_after_recovery("x ; y z", 6..7, "+ w")]
#[case::before_error("a # b + c", 0..1, "q *")]
#[case::remove_error("x+e; ed", 3..4, "")]
#[case::insert_error("x + y * z", 4..4, ";")]
fn test_reparse_around_errors(
    #[case] source: &str,
    #[case] range: std::ops::Range<usize>,
    #[case] replacement: &str,
) {
    let language = calc();
    let old = parse(&language, source);
    let (text, edit) = InputEdit::apply(source, range, replacement);

    let new = reparse(&old.edit(&edit), &text);
    assert_eq!(new, parse(&language, &text), "{source:?} -> {text:?}");
}

#[rstest]
fn test_every_single_byte_edit(
    #[values("", "*", "+", "x", " ", ";", "}")] replacement: &str,
) {
    let language = calc();
    for source in CALC_SOURCES.iter().chain(CALC_ERROR_SOURCES) {
        let old = parse(&language, source);
        for start in 0..=source.len() {
            let end = (start + 1).min(source.len());
            let (text, edit) = InputEdit::apply(source, start..end, replacement);
            let new = reparse(&old.edit(&edit), &text);
            assert_eq!(new, parse(&language, &text), "{source:?} -> {text:?}");
        }
    }
}

/// Deterministic xorshift so failures replay
struct Steps(u64);

impl Steps {
    fn next(&mut self, bound: usize) -> usize {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % bound as u64) as usize
    }
}

#[rstest]
fn test_chained_edits_through_errors(#[values(1, 7, 42, 1234)] seed: u64) {
    const PIECES: &[&str] = &["", "a", "b ", "+", "*", ";", "{", "}", " 3", "#"];
    let language = calc();
    let mut steps = Steps(seed);
    let mut text = String::from("x+e; ed");
    let mut tree = parse(&language, &text);
    for _ in 0..200 {
        let start = steps.next(text.len() + 1);
        let end = (start + steps.next(3)).min(text.len());
        let piece = PIECES[steps.next(PIECES.len())];
        let (next, edit) = InputEdit::apply(&text, start..end, piece);
        tree = reparse(&tree.edit(&edit), &next);
        assert_eq!(tree, parse(&language, &next), "{text:?} -> {next:?}");
        text = next;
        if text.len() > 60 {
            text.truncate(20);
            tree = parse(&language, &text);
        }
    }
}
