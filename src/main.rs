use std::process::ExitCode;

fn main() -> miette::Result<ExitCode> {
    rill::cli::run()
}
