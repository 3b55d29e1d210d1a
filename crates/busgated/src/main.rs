use std::process::ExitCode;

fn main() -> ExitCode {
    match busgated::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("busgated: {error}");
            ExitCode::FAILURE
        }
    }
}
