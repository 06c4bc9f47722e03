//! A bidirectional cursor over the raw program bytes.
//!
//! Control flow is resolved by scanning the byte stream itself: loop entry
//! and exit search for the partner bracket every time they jump, and comment
//! bodies are skipped by the same nesting-aware scan. No jump table is built.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::LinceError;

pub const LOOP_OPEN: u8 = b'[';
pub const LOOP_CLOSE: u8 = b']';
pub const COMMENT_OPEN: u8 = b'(';
pub const COMMENT_CLOSE: u8 = b')';
pub const LINE_COMMENT: u8 = b'#';
pub const NEWLINE: u8 = b'\n';

/// Which way a scan walks the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A nestable pair of delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `[` and `]`
    Loop,
    /// `(` and `)`
    Comment,
}

impl Delimiter {
    pub const fn open(self) -> u8 {
        match self {
            Delimiter::Loop => LOOP_OPEN,
            Delimiter::Comment => COMMENT_OPEN,
        }
    }

    pub const fn close(self) -> u8 {
        match self {
            Delimiter::Loop => LOOP_CLOSE,
            Delimiter::Comment => COMMENT_CLOSE,
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' '{}'", self.open() as char, self.close() as char)
    }
}

/// Read position over an immutable program.
///
/// `position` is the next byte to read. It may step outside the program
/// (before the start or past the end); reading there yields `None`.
#[derive(Debug, Clone)]
pub struct SourceCursor {
    source: Vec<u8>,
    position: isize,
}

impl SourceCursor {
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            position: 0,
        }
    }

    /// Load a program file as raw bytes.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinceError> {
        let path = path.as_ref();
        fs::read(path)
            .map(Self::new)
            .map_err(|source| LinceError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// The position clamped into `0..=len`, for error reporting.
    pub fn offset(&self) -> usize {
        self.position.clamp(0, self.source.len() as isize) as usize
    }

    /// The byte at the current position, or `None` outside the program.
    pub fn peek(&self) -> Option<u8> {
        usize::try_from(self.position)
            .ok()
            .and_then(|i| self.source.get(i).copied())
    }

    /// Move by `n` bytes in either direction; no clamping.
    pub fn advance(&mut self, n: isize) {
        self.position += n;
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    /// Walk forward until the cursor rests on `target`.
    ///
    /// Not nesting-aware. Returns `None` if the end is reached first.
    pub fn scan_to_byte(&mut self, target: u8) -> Option<u8> {
        loop {
            let byte = self.peek()?;
            if byte == target {
                return Some(byte);
            }
            self.advance(1);
        }
    }

    /// Walk in `direction` to the delimiter that closes the current region.
    ///
    /// The cursor must start just past the delimiter that opened the scan.
    /// Scanning forward, further `open` bytes nest and the first unnested
    /// `close` is the match; scanning backward the roles swap. On success
    /// the cursor rests on the matching byte, which is returned.
    ///
    /// Loop scans treat comments as opaque: a block comment is skipped as a
    /// unit and a `#` line comment is skipped to its newline, so neither
    /// contributes to bracket nesting.
    pub fn scan_to_matching(&mut self, delimiter: Delimiter, direction: Direction) -> Option<u8> {
        let (nest, end) = match direction {
            Direction::Forward => (delimiter.open(), delimiter.close()),
            Direction::Backward => (delimiter.close(), delimiter.open()),
        };
        let mut nesting = 0usize;
        loop {
            let byte = self.peek()?;
            if byte == nest {
                nesting += 1;
            } else if byte == end {
                if nesting == 0 {
                    return Some(byte);
                }
                nesting -= 1;
            } else if delimiter == Delimiter::Loop {
                self.skip_comment(byte, direction)?;
            }
            self.advance(direction.step());
        }
    }

    /// Skip a comment that starts (or, backward, ends) at the cursor.
    ///
    /// Leaves the cursor on the comment's last byte in scan order, or where
    /// it was when `byte` does not open a comment.
    fn skip_comment(&mut self, byte: u8, direction: Direction) -> Option<()> {
        match (direction, byte) {
            (Direction::Forward, COMMENT_OPEN) | (Direction::Backward, COMMENT_CLOSE) => {
                self.advance(direction.step());
                self.scan_to_matching(Delimiter::Comment, direction)?;
            }
            (Direction::Forward, LINE_COMMENT) => {
                self.scan_to_byte(NEWLINE)?;
            }
            (Direction::Backward, NEWLINE) => self.skip_line_comment_backward(),
            _ => {}
        }
        Some(())
    }

    /// With the cursor on a newline, jump to the `#` that starts a line
    /// comment on the preceding line, if it has one.
    fn skip_line_comment_backward(&mut self) {
        let Ok(end) = usize::try_from(self.position) else {
            return;
        };
        if let Some(start) = open_line_comment(&self.source[..end]) {
            self.position = start as isize;
        }
    }
}

/// Offset of the `#` whose line comment is still open at the end of `code`.
///
/// Block-comment depth is tracked from the first byte, so a `#` inside a
/// block comment is never a line comment, whichever line the comment
/// opened on. Parentheses inside a line comment do not count.
fn open_line_comment(code: &[u8]) -> Option<usize> {
    let mut depth = 0isize;
    let mut line_comment = None;
    for (i, &byte) in code.iter().enumerate() {
        if line_comment.is_some() {
            if byte == NEWLINE {
                line_comment = None;
            }
            continue;
        }
        match byte {
            COMMENT_OPEN => depth += 1,
            COMMENT_CLOSE => depth -= 1,
            LINE_COMMENT if depth <= 0 => line_comment = Some(i),
            _ => {}
        }
    }
    line_comment
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cursor placed just past the first occurrence of `at`.
    fn cursor_after(program: &str, at: u8) -> SourceCursor {
        let mut cursor = SourceCursor::new(program);
        let index = program.bytes().position(|b| b == at).unwrap();
        cursor.advance(index as isize + 1);
        cursor
    }

    /// Cursor placed just before the last occurrence of `at`.
    fn cursor_before_last(program: &str, at: u8) -> SourceCursor {
        let mut cursor = SourceCursor::new(program);
        let index = program.bytes().rposition(|b| b == at).unwrap();
        cursor.advance(index as isize - 1);
        cursor
    }

    #[test]
    fn peek_does_not_consume() {
        let cursor = SourceCursor::new("+-");
        assert_eq!(cursor.peek(), Some(b'+'));
        assert_eq!(cursor.peek(), Some(b'+'));
    }

    #[test]
    fn reads_outside_the_program_are_end_of_stream() {
        let mut cursor = SourceCursor::new("+");
        cursor.advance(5);
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.offset(), 1);
        cursor.advance(-7);
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.offset(), 0);
        cursor.rewind_to_start();
        assert_eq!(cursor.peek(), Some(b'+'));
    }

    #[test]
    fn scan_to_byte_stops_on_target_or_end() {
        let mut cursor = SourceCursor::new("# [ ]\n+");
        assert_eq!(cursor.scan_to_byte(b'\n'), Some(b'\n'));
        assert_eq!(cursor.position(), 5);

        let mut cursor = SourceCursor::new("# no newline");
        assert_eq!(cursor.scan_to_byte(b'\n'), None);
    }

    #[test]
    fn forward_loop_scan_respects_nesting() {
        let program = "[+[-[>]<]+]-";
        let mut cursor = cursor_after(program, b'[');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Forward), Some(b']'));
        assert_eq!(cursor.position(), 10);
    }

    #[test]
    fn backward_loop_scan_respects_nesting() {
        let program = "-[+[-[>]<]+]";
        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn loop_scans_skip_block_comments_both_ways() {
        let program = "[(]][)+]";
        let mut cursor = cursor_after(program, b'[');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Forward), Some(b']'));
        assert_eq!(cursor.position(), 7);

        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn nested_block_comments_are_one_unit() {
        let program = "((])[)]";
        let mut cursor = cursor_after(program, b'(');
        assert_eq!(cursor.scan_to_matching(Delimiter::Comment, Direction::Forward), Some(b')'));
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn comment_scan_ignores_loop_brackets_and_hashes() {
        let program = "( [ # ] )";
        let mut cursor = cursor_after(program, b'(');
        assert_eq!(cursor.scan_to_matching(Delimiter::Comment, Direction::Forward), Some(b')'));
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn loop_scans_skip_line_comments_both_ways() {
        let program = "[ # ] [\n-]";
        let mut cursor = cursor_after(program, b'[');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Forward), Some(b']'));
        assert_eq!(cursor.position(), 9);

        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn hash_inside_block_comment_is_not_a_line_comment_backward() {
        let program = "[ (#1) \n-]";
        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn hash_inside_multiline_block_comment_is_not_a_line_comment_backward() {
        let program = "++[-(a [\n# ] )\n]";
        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn line_comment_after_multiline_block_comment_is_skipped_backward() {
        let program = "[ (\n ] ) # ]\n-]";
        let mut cursor = cursor_before_last(program, b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), Some(b'['));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn open_line_comment_tracks_block_depth_from_the_start() {
        assert_eq!(open_line_comment(b"+ # x"), Some(2));
        assert_eq!(open_line_comment(b"( \n # )"), None);
        assert_eq!(open_line_comment(b"# (\n #"), Some(5));
        assert_eq!(open_line_comment(b"# x\n+"), None);
    }

    #[test]
    fn missing_partner_is_end_of_stream() {
        let mut cursor = cursor_after("[++", b'[');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Forward), None);

        let mut cursor = cursor_before_last("++]", b']');
        assert_eq!(cursor.scan_to_matching(Delimiter::Loop, Direction::Backward), None);
    }

    #[test]
    fn open_reports_missing_file() {
        let err = SourceCursor::open("/definitely/not/here.lc").unwrap_err();
        assert!(matches!(err, LinceError::SourceUnavailable { .. }));
    }
}
