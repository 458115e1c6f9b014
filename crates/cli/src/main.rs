use std::process::ExitCode;

fn main() -> ExitCode {
    culturehub_cli::run()
}
