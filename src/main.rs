use clap::Parser;
use foldersort::cli::{SortArgs, run_cli};
use foldersort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = SortArgs::parse();
    foldersort::init_tracing(args.verbose);

    match run_cli(&args) {
        // Individual file failures still count as a completed run
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
