use std::env;
use std::path::Path;

use clap::Parser;
use lince::cli_util::init_logging;
use lince::commands::run::{self, RunArgs, EXIT_USAGE};

#[derive(Parser, Debug)]
#[command(name = "lince", disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

fn main() {
    // Program name for messages and help, without the directory part
    let program = env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("lince"));

    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
    };

    std::process::exit(run::run(&program, cli.args));
}
