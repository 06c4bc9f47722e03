//! Human-readable view of the start of the tape.
//!
//! ```text
//! 000 001 002
//! 003 'A' -01
//!      ^
//! ```

use std::fmt::Write;

use crate::tape::Tape;

/// Width of one cell column, including the trailing space.
const COLUMN: usize = 4;

/// Render the first `cells` cells of `tape` as three lines: indices, values
/// and a `^` under the pointer. The last line is empty when the pointer lies
/// beyond the rendered cells.
pub fn render_tape(tape: &Tape, cells: usize) -> String {
    let shown = &tape.cells()[..cells.min(tape.capacity())];
    let mut out = String::new();

    for i in 0..shown.len() {
        let _ = write!(out, "{i:03} ");
    }
    out.push('\n');

    for &value in shown {
        let byte = value as u8;
        if (33..=126).contains(&byte) {
            let _ = write!(out, "'{}' ", byte as char);
        } else {
            let _ = write!(out, "{value:03} ");
        }
    }
    out.push('\n');

    if tape.pointer() < shown.len() {
        out.push_str(&" ".repeat(tape.pointer() * COLUMN + 1));
        out.push('^');
    }
    out.push('\n');
    out
}
