use clap::Parser;
use crossgate::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
