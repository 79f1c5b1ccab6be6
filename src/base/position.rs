/// A position in source text (0-indexed row, byte column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Maps byte offsets to [`Point`]s.
///
/// Built once per tree; rows are split on `\n` only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of rows, counting a trailing empty row after a final newline
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a point. Offsets past the end clamp to the end.
    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.len);
        let row = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Point::new(row, offset - self.line_starts[row])
    }

    /// Convert a point back to a byte offset, if the row exists
    pub fn offset(&self, point: Point) -> Option<usize> {
        let start = *self.line_starts.get(point.row)?;
        let end = self
            .line_starts
            .get(point.row + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start + point.column;
        (offset <= end).then_some(offset)
    }
}
