//! An interpreter for Lince, a Brainfuck dialect with comments.
//!
//! A program is a flat stream of bytes run against a bounded tape of signed
//! 8-bit cells (1,000 by default) with a single data pointer.
//!
//! Features and behaviors:
//! - The eight Brainfuck commands `><+-.,[]`; cell arithmetic wraps.
//! - Moving the pointer off either end of the tape is an error; the pointer
//!   is clamped to the nearest cell first.
//! - `( ... )` block comments nest and may appear anywhere, including inside
//!   loop bodies. `#` starts a comment that runs to the end of the line.
//! - Space, tab, carriage return, newline and NUL are ignored; any other byte
//!   is an error.
//! - `,` reads one line of input and keeps its first byte (0 when there is
//!   none). `.` writes one byte and flushes.
//! - Loops are matched by scanning the program for the partner bracket at
//!   each jump, so no jump table is kept.
//!
//! Quick start:
//!
//! ```no_run
//! use lince::Interpreter;
//!
//! // Prints '@' (8 * 8 = 64).
//! let code = "++++++++[>++++++++<-]>. (that's all)";
//! let mut lince = Interpreter::new(code);
//! lince.run().expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod dump;
pub mod error;
pub mod interpreter;
pub mod stream;
pub mod tape;

pub use config::Settings;
pub use dump::render_tape;
pub use error::LinceError;
pub use interpreter::{Interpreter, Step};
pub use stream::{Delimiter, Direction, SourceCursor};
pub use tape::Tape;
