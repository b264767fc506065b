//! CLI entry point: parse flags, build a `Vm` over stdin, run it to
//! completion, and report failures the way the teacher's `main.rs` does —
//! through `Msg` rather than a bare panic.

use first::config::Config;
use first::error::RunOutcome;
use first::vm::Vm;
use std::process::ExitCode;
use std::time::Duration;

const PAGE_SIZE: i64 = 256;
const RET_BASE: i64 = 256;
const MEM_BASE: i64 = 1024;

fn main() -> ExitCode {
    let config: Config = argh::from_env();

    let mut vm = Vm::new(
        config.mem_limit,
        PAGE_SIZE,
        RET_BASE,
        MEM_BASE,
        Box::new(std::io::stdout()),
    );
    vm.input_mut().push_stdin();
    if config.trace {
        vm.request_trace();
    }
    if config.timeout > 0 {
        vm.set_timeout(Duration::from_secs(config.timeout));
    }

    match vm.run() {
        Ok(RunOutcome::Eof) | Ok(RunOutcome::Halt) | Ok(RunOutcome::Cancelled) => {
            if config.dump {
                match vm.dump_summary() {
                    Ok(summary) => print!("{}", summary),
                    Err(e) => vm.msg().error("main", "dump failed", Some(e)),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            vm.msg().error("main", "run failed", Some(e));
            ExitCode::FAILURE
        }
    }
}
