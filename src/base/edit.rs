//! Text edits in byte coordinates.

use std::ops::Range;

/// A single replacement: bytes `start_byte..old_end_byte` of the old text
/// became bytes `start_byte..new_end_byte` of the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
}

impl InputEdit {
    pub fn new(start_byte: usize, old_end_byte: usize, new_end_byte: usize) -> Self {
        Self {
            start_byte,
            old_end_byte,
            new_end_byte,
        }
    }

    /// Edit replacing `range` of the old text with `replacement`
    pub fn replace(range: Range<usize>, replacement: &str) -> Self {
        Self::new(range.start, range.end, range.start + replacement.len())
    }

    /// Apply a replacement to `text`, returning the new text and its edit.
    ///
    /// The range is clamped to the text and to char boundaries.
    pub fn apply(text: &str, range: Range<usize>, replacement: &str) -> (String, Self) {
        let start = floor_char_boundary(text, range.start);
        let end = floor_char_boundary(text, range.end.max(start));
        let mut out = String::with_capacity(text.len() - (end - start) + replacement.len());
        out.push_str(&text[..start]);
        out.push_str(replacement);
        out.push_str(&text[end..]);
        (out, Self::replace(start..end, replacement))
    }

    pub fn old_len(&self) -> usize {
        self.old_end_byte - self.start_byte
    }

    pub fn new_len(&self) -> usize {
        self.new_end_byte - self.start_byte
    }

    /// Signed change in text length
    pub fn delta(&self) -> isize {
        self.new_end_byte as isize - self.old_end_byte as isize
    }

    /// True when the edit is well-formed against a text of `len` bytes
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start_byte <= self.old_end_byte
            && self.start_byte <= self.new_end_byte
            && self.old_end_byte <= len
    }

    /// Clamp the edit so it describes a replacement inside `len` bytes.
    pub fn clamped(&self, len: usize) -> Self {
        let start_byte = self.start_byte.min(len);
        let old_end_byte = self.old_end_byte.clamp(start_byte, len);
        let new_end_byte = self.new_end_byte.max(start_byte);
        Self::new(start_byte, old_end_byte, new_end_byte)
    }

    /// Length of the text after the edit, given the length before it
    pub fn apply_len(&self, old_len: usize) -> usize {
        (old_len + self.new_len()).saturating_sub(self.old_len())
    }

    /// True when the old `range` is strictly outside the edited region,
    /// neither overlapping nor touching it.
    pub fn is_clear_of(&self, range: Range<usize>) -> bool {
        range.end < self.start_byte || range.start > self.old_end_byte
    }

    /// Map an old range that is clear of the edit into new coordinates
    pub fn translate(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.end < self.start_byte {
            Some(range)
        } else if range.start > self.old_end_byte {
            let shift = |offset: usize| (offset as isize + self.delta()) as usize;
            Some(shift(range.start)..shift(range.end))
        } else {
            None
        }
    }

    /// Fold `next`, expressed in the coordinates produced by `self`, into one
    /// edit expressed in the coordinates before `self`.
    pub fn compose(&self, next: &InputEdit) -> InputEdit {
        let back_start = if next.start_byte <= self.start_byte {
            next.start_byte
        } else if next.start_byte >= self.new_end_byte {
            next.start_byte - self.new_end_byte + self.old_end_byte
        } else {
            self.start_byte
        };
        let back_end = if next.old_end_byte <= self.start_byte {
            next.old_end_byte
        } else if next.old_end_byte >= self.new_end_byte {
            next.old_end_byte - self.new_end_byte + self.old_end_byte
        } else {
            self.old_end_byte
        };

        let start_byte = self.start_byte.min(back_start);
        let old_end_byte = self.old_end_byte.max(back_end);
        let new_end = old_end_byte as isize + self.delta() + next.delta();
        InputEdit::new(start_byte, old_end_byte, (new_end.max(start_byte as isize)) as usize)
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
