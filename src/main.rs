use std::process::ExitCode;

fn main() -> ExitCode {
    workload_replay::entry::run()
}
