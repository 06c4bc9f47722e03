//! The Lince interpreter: pre-flight validation and the dispatch loop.
//!
//! Byte vocabulary:
//! - `> < + - . , [ ]` behave as in Brainfuck, on a bounded tape of signed cells.
//! - `( ... )` is a block comment; comments nest and their brackets must balance.
//! - `#` starts a line comment that runs to the end of the line.
//! - space, tab, carriage return, newline and NUL are ignored.
//!
//! Any other byte halts the run with [`LinceError::UnknownCharacter`].

use std::io::{self, BufRead, Write};

use tracing::{debug, trace};

use crate::stream::{
    Delimiter, Direction, SourceCursor, COMMENT_CLOSE, COMMENT_OPEN, LINE_COMMENT, LOOP_CLOSE,
    LOOP_OPEN, NEWLINE,
};
use crate::tape::Tape;
use crate::LinceError;

type OutputSink = Box<dyn FnMut(u8) -> io::Result<()> + Send>;
type InputProvider = Box<dyn FnMut() -> io::Result<Option<u8>> + Send>;

/// Outcome of a single dispatch step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A byte was dispatched; call [`Interpreter::step`] again.
    Running,
    /// The end of the program was reached.
    Halted,
}

/// Where the cursor goes after a byte has been dispatched.
enum Flow {
    /// Move past the dispatched byte.
    Next,
    /// The handler already placed the cursor on the next byte to read.
    Stay,
}

/// A Lince interpreter owning one tape and one program for a whole run.
pub struct Interpreter {
    tape: Tape,
    cursor: SourceCursor,
    loop_depth: usize,
    output_sink: Option<OutputSink>,
    input_provider: Option<InputProvider>,
}

impl Interpreter {
    /// An interpreter for `source` with a default-capacity tape.
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self::with_tape(SourceCursor::new(source), Tape::new())
    }

    /// An interpreter for `source` with a tape of `capacity` cells.
    pub fn with_capacity(source: impl Into<Vec<u8>>, capacity: usize) -> Self {
        Self::with_tape(SourceCursor::new(source), Tape::with_capacity(capacity))
    }

    pub fn with_tape(cursor: SourceCursor, tape: Tape) -> Self {
        Self {
            tape,
            cursor,
            loop_depth: 0,
            output_sink: None,
            input_provider: None,
        }
    }

    /// Send `.` output to `sink` instead of stdout.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: FnMut(u8) -> io::Result<()> + Send + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Take `,` input from `provider` instead of stdin.
    /// Returning `Ok(None)` means no input is available; the cell is set to 0.
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: FnMut() -> io::Result<Option<u8>> + Send + 'static,
    {
        self.input_provider = Some(Box::new(provider));
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn cursor(&self) -> &SourceCursor {
        &self.cursor
    }

    /// How many loops the byte under the cursor is nested in.
    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    /// Check that `[`/`]` and `(`/`)` each balance over the whole program.
    ///
    /// Brackets inside block comments are counted; line comments are not.
    /// On failure the reported offset is where counting stopped, the end of
    /// the program. The cursor is rewound to the start either way.
    pub fn validate(&mut self) -> Result<(), LinceError> {
        let mut loops = 0isize;
        let mut comments = 0isize;
        while let Some(byte) = self.cursor.peek() {
            match byte {
                LOOP_OPEN => loops += 1,
                LOOP_CLOSE => loops -= 1,
                COMMENT_OPEN => comments += 1,
                COMMENT_CLOSE => comments -= 1,
                LINE_COMMENT if comments <= 0 => {
                    self.cursor.scan_to_byte(NEWLINE);
                }
                _ => {}
            }
            self.cursor.advance(1);
        }
        let offset = self.cursor.offset();
        self.cursor.rewind_to_start();

        let unbalanced = if loops != 0 {
            Some(Delimiter::Loop)
        } else if comments != 0 {
            Some(Delimiter::Comment)
        } else {
            None
        };
        if let Some(delimiter) = unbalanced {
            debug!(%delimiter, loops, comments, offset, "validation failed");
            return Err(LinceError::UnmatchedDelimiter { offset, delimiter });
        }
        debug!(len = self.cursor.len(), "validation passed");
        Ok(())
    }

    /// Validate, then execute until the end of the program or the first error.
    pub fn run(&mut self) -> Result<(), LinceError> {
        self.validate()?;
        debug!(capacity = self.tape.capacity(), "run started");
        while self.step()? == Step::Running {}
        debug!(pointer = self.tape.pointer(), "run finished");
        Ok(())
    }

    /// Dispatch the byte under the cursor.
    ///
    /// Does not validate; [`Interpreter::run`] does that first.
    pub fn step(&mut self) -> Result<Step, LinceError> {
        let Some(byte) = self.cursor.peek() else {
            return Ok(Step::Halted);
        };
        let offset = self.cursor.offset();
        trace!(
            offset,
            byte = %byte.escape_ascii(),
            pointer = self.tape.pointer(),
            cell = self.tape.current(),
            depth = self.loop_depth,
            "dispatch"
        );

        let flow = match byte {
            b'>' | b'<' => {
                let delta = if byte == b'>' { 1 } else { -1 };
                self.tape
                    .shift(delta)
                    .map_err(|err| LinceError::OutOfBounds { offset, pointer: err.clamped })?;
                Flow::Next
            }
            b'+' => {
                self.tape.increment();
                Flow::Next
            }
            b'-' => {
                self.tape.decrement();
                Flow::Next
            }
            b'.' => {
                self.output(self.tape.read())
                    .map_err(|source| LinceError::Unknown { offset, source })?;
                Flow::Next
            }
            b',' => {
                let input = self
                    .input()
                    .map_err(|source| LinceError::Unknown { offset, source })?;
                self.tape.write(input.unwrap_or(0));
                Flow::Next
            }
            LOOP_OPEN => self.enter_loop(offset)?,
            LOOP_CLOSE => self.exit_loop(offset)?,
            COMMENT_OPEN => {
                self.cursor.advance(1);
                self.cursor
                    .scan_to_matching(Delimiter::Comment, Direction::Forward)
                    .ok_or(LinceError::UnmatchedDelimiter { offset, delimiter: Delimiter::Comment })?;
                trace!(from = offset, to = self.cursor.offset(), "skipped block comment");
                Flow::Next
            }
            LINE_COMMENT => {
                self.cursor.scan_to_byte(NEWLINE);
                Flow::Next
            }
            COMMENT_CLOSE | NEWLINE | b'\0' | b' ' | b'\r' | b'\t' => Flow::Next,
            _ => return Err(LinceError::UnknownCharacter { byte, offset }),
        };

        if let Flow::Next = flow {
            self.cursor.advance(1);
        }
        Ok(Step::Running)
    }

    /// `[`: fall into the body, or jump onto the matching `]` when the cell is 0.
    ///
    /// Landing on the `]` rather than past it lets the `]` run its own exit,
    /// which keeps the loop depth balanced.
    fn enter_loop(&mut self, offset: usize) -> Result<Flow, LinceError> {
        self.loop_depth += 1;
        if !self.tape.is_zero() {
            return Ok(Flow::Next);
        }
        self.cursor.advance(1);
        self.cursor
            .scan_to_matching(Delimiter::Loop, Direction::Forward)
            .ok_or(LinceError::UnmatchedDelimiter { offset, delimiter: Delimiter::Loop })?;
        trace!(from = offset, to = self.cursor.offset(), "skipped loop");
        Ok(Flow::Stay)
    }

    /// `]`: leave the loop when the cell is 0, otherwise jump back onto the
    /// matching `[` so it is dispatched again.
    fn exit_loop(&mut self, offset: usize) -> Result<Flow, LinceError> {
        self.loop_depth = self.loop_depth.saturating_sub(1);
        if self.tape.is_zero() {
            return Ok(Flow::Next);
        }
        self.cursor.advance(-1);
        self.cursor
            .scan_to_matching(Delimiter::Loop, Direction::Backward)
            .ok_or(LinceError::UnmatchedDelimiter { offset, delimiter: Delimiter::Loop })?;
        trace!(from = offset, to = self.cursor.offset(), "repeat loop");
        Ok(Flow::Stay)
    }

    fn output(&mut self, byte: u8) -> io::Result<()> {
        if let Some(sink) = self.output_sink.as_mut() {
            return sink(byte);
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(&[byte])?;
        stdout.flush()
    }

    /// One byte of input: the first byte of the next stdin line.
    fn input(&mut self) -> io::Result<Option<u8>> {
        if let Some(provider) = self.input_provider.as_mut() {
            return provider();
        }
        let mut line = Vec::new();
        io::stdin().lock().read_until(NEWLINE, &mut line)?;
        Ok(line.first().copied())
    }
}
