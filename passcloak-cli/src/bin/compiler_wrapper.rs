use passcloak_cli::env::WrapperEnv;
use passcloak_cli::logging::{init_logging, LOG_FILE_NAME};
use passcloak_cli::wrapper::prepare;
use passcloak_core::{hand_off, PassCloakError, Platform};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    let started = Instant::now();
    let env = WrapperEnv::capture();
    init_logging(Path::new(LOG_FILE_NAME), env.log_filter.as_deref(), env.debug);

    let wrapper_exe = std::env::current_exe().ok();
    let command = match prepare(
        std::env::args_os().collect(),
        &env,
        Platform::current(),
        wrapper_exe.as_deref(),
    ) {
        Ok(command) => command,
        Err(err) => fatal(err),
    };

    info!(
        "Delegating execution to: {} {:?}",
        command.program.display(),
        &command.args[1..]
    );
    let elapsed = started.elapsed();
    info!(
        elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        "Compiler wrapper rewrite completed in {:?}",
        elapsed
    );

    match hand_off(&command.program, &command.args) {
        Ok(code) => std::process::exit(code),
        Err(err) => fatal(err),
    }
}

fn fatal(err: PassCloakError) -> ! {
    error!("{}", err);
    eprintln!("compiler_wrapper: {}", err);
    std::process::exit(1);
}
