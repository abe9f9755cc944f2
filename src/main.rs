use clap::Parser;
use vectrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
