use anyhow::Context;
use rustman::app;
use rustman::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    let invocation = cli.into_invocation();
    rustman::tracing::init(invocation.verbosity);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("rustman: {:#}", e);
            return ExitCode::from(rustman::error::ERROR_EXIT_CODE);
        }
    };

    match runtime.block_on(app::run(invocation)) {
        Ok(exit) => exit.code(),
        Err(e) => {
            tracing::debug!(error = ?e, "Lookup failed");
            eprintln!("rustman: {}", e);
            e.exit_code()
        }
    }
}
