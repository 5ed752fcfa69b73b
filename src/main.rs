use clap::Parser;
use nepse_analyzer::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    env_logger::init();
    run(Cli::parse())
}
