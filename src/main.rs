use std::process::ExitCode;

fn main() -> ExitCode {
    printqueue::app::startup::startup()
}
