use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match sweepnorm::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
