use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use crate::cli_util::print_error;
use crate::{render_tape, Interpreter, Settings, SourceCursor, Tape};

/// Exit status when no program path is given; same as an unreadable source.
const EXIT_NO_INPUT: i32 = 4;
/// Exit status for malformed command lines; same as an unknown error.
pub const EXIT_USAGE: i32 = 5;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Path of the Lince program to run
    #[arg(value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print the first tape cells after the run
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Number of tape cells (fallback LINCE_CAPACITY, then config file; default 1000)
    #[arg(long = "capacity", value_name = "N")]
    pub capacity: Option<usize>,

    /// Number of cells shown by --debug (fallback LINCE_DUMP_CELLS, then config file; default 10)
    #[arg(long = "dump-cells", value_name = "N")]
    pub dump_cells: Option<usize>,

    /// Read settings from PATH instead of LINCE_CONFIG or ~/.config/lince.toml
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

/// Load, validate and execute one program; returns the process exit status.
pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        file,
        debug,
        capacity,
        dump_cells,
        config,
        ..
    } = args;

    let Some(path) = file else {
        eprintln!("{program}: no input file specified");
        usage_and_exit(program, EXIT_NO_INPUT);
    };

    // Resolve settings: flags -> env -> config file -> defaults
    let mut settings = Settings::load(config.as_deref());
    if let Some(capacity) = capacity {
        settings.capacity = capacity;
    }
    if let Some(cells) = dump_cells {
        settings.dump_cells = cells;
    }
    let settings = settings.normalized();

    let cursor = match SourceCursor::open(&path) {
        Ok(cursor) => cursor,
        Err(err) => {
            print_error(Some(program), &[], &err);
            return err.exit_code();
        }
    };

    let mut lince = Interpreter::with_tape(cursor, Tape::with_capacity(settings.capacity));
    let exit_code = match lince.run() {
        Ok(()) => 0,
        Err(err) => {
            print_error(Some(program), lince.cursor().source(), &err);
            err.exit_code()
        }
    };

    // The dump is shown even after a failed run; it is most useful then.
    if debug {
        println!();
        println!(" --- Tape debug dump ---");
        print!("{}", render_tape(lince.tape(), settings.dump_cells));
    }
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} <PATH> [--debug|-d]             # Run the Lince program at PATH
  {0} <PATH> [--capacity N] [--dump-cells N] [--config PATH]

Options:
  --debug, -d          After the run, print the first tape cells and the pointer
  --capacity <N>       Number of tape cells (default 1000)
  --dump-cells <N>     Number of cells shown by --debug (default 10)
  --config <PATH>      Read settings from PATH
  --help,  -h          Show this help

Language:
  > < + - . , [ ]      Brainfuck commands
  ( ... )              Block comment; nests, brackets inside must balance
  # ...                Comment to the end of the line

Notes:
- Input (`,`) reads one line from stdin and keeps its first byte; with no input the cell is set to 0.
- Output (`.`) writes one byte and flushes immediately.
- Any other non-whitespace byte is an error.
- Exit status: 0 ok, 1 unknown character, 2 unmatched bracket, 3 pointer out of bounds,
  4 source unavailable, 5 other errors.
- Set LINCE_LOG=debug (or trace) to log execution to stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
