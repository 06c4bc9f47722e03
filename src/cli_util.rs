use std::io::{self, Write};

use tracing_subscriber::{fmt, EnvFilter};

use crate::LinceError;

/// Install the stderr log subscriber.
///
/// The filter comes from `LINCE_LOG` (e.g. `LINCE_LOG=trace` to follow every
/// dispatched byte) and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("LINCE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Print `err` as one line on stderr, followed by a caret window under the
/// offending byte when the error has an offset.
/// If `program` is `Some("lince")`, the message is prefixed with "lince: ".
pub fn print_error(program: Option<&str>, code: &[u8], err: &LinceError) {
    let msg = match program {
        Some(p) => format!("{p}: {err}"),
        None => err.to_string(),
    };
    eprintln!("{msg}");

    if let Some(pos) = err.offset() {
        print_context(code, pos);
    }
    let _ = io::stderr().flush();
}

/// Show a short window of the program around `pos` with a caret under it.
fn print_context(code: &[u8], pos: usize) {
    if code.is_empty() {
        return;
    }
    eprintln!("  {}", context_window(code, pos));
    let start = pos.saturating_sub(WINDOW_BYTES);
    eprintln!("  {}^", " ".repeat(pos - start));
}

const WINDOW_BYTES: usize = 32;

/// Up to `WINDOW_BYTES` either side of `pos`, one display column per byte.
fn context_window(code: &[u8], pos: usize) -> String {
    let start = pos.saturating_sub(WINDOW_BYTES);
    let end = (pos + WINDOW_BYTES + 1).min(code.len());
    code[start.min(end)..end]
        .iter()
        .map(|&b| match b {
            b'\n' | b'\r' | b'\t' | b'\0' => ' ',
            0x20..=0x7e => b as char,
            _ => '?',
        })
        .collect()
}
