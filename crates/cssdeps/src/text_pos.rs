use rowan::TextRange;
use serde::Serialize;

/// A byte range in the stylesheet together with the 1-based line and column
/// of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(
        source: &str,
        range: TextRange,
    ) -> Self {
        let start = usize::from(range.start());
        let (line, column) = line_column_from_byte_offset(source, start);
        Self {
            start,
            end: usize::from(range.end()),
            line,
            column,
        }
    }
}

/// 1-based line and column (in characters) of `byte_offset`. Offsets past
/// the end clamp to the end of the source.
pub fn line_column_from_byte_offset(
    source: &str,
    byte_offset: usize,
) -> (u32, u32) {
    let mut remaining = byte_offset.min(source.len());

    for (line_index, line) in source.split('\n').enumerate() {
        let line_len = line.len();
        if remaining <= line_len {
            let mut column = 0u32;
            let mut byte_count = 0usize;
            for ch in line.chars() {
                if byte_count >= remaining {
                    break;
                }
                column += 1;
                byte_count += ch.len_utf8();
            }
            return (line_index as u32 + 1, column + 1);
        }
        remaining = remaining.saturating_sub(line_len + 1);
    }

    (1, 1)
}
