use std::fmt;

/// A precise source position (1-indexed line/column) inside a specification file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolves a byte offset into `src`. Offsets past the end clamp to the end of the text.
    pub fn from_offset(src: &str, offset: usize) -> Self {
        PositionCursor::new(src).advance_to(offset)
    }
}

/// Resolves a sequence of offsets into one text, scanning each byte at most once when the
/// offsets arrive in ascending order.
#[derive(Debug, Clone)]
pub struct PositionCursor<'src> {
    src: &'src str,
    offset: usize,
    position: SourcePosition,
}

impl<'src> PositionCursor<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            offset: 0,
            position: SourcePosition::new(1, 1),
        }
    }

    /// Moves to `offset` and reports its position. Moving backwards rescans from the start.
    pub fn advance_to(&mut self, offset: usize) -> SourcePosition {
        if offset < self.offset {
            *self = Self::new(self.src);
        }
        let mut reached = self.src.len();
        for (rel, ch) in self.src[self.offset..].char_indices() {
            if self.offset + rel >= offset {
                reached = self.offset + rel;
                break;
            }
            if ch == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.offset = reached;
        self.position
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
