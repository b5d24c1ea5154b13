//! open115-supervisor - container entrypoint for the open115 API.
//!
//! Starts the token manager, waits until it has written tokens to the
//! shared token store, then replaces itself with the API server.
//!
//! # Examples
//!
//! ```bash
//! # Defaults: uvicorn app.main:app on 0.0.0.0:8000, workers = CPU count
//! open115-supervisor
//!
//! # Extra server flags are appended after the resolved ones
//! UVICORN_WORKERS=1 open115-supervisor --reload
//! ```

use op_supervisor::cli::Cli;
use op_supervisor::{
    HandoffPlan, Supervisor, SupervisorError, SupervisorResult, logger, probe_for,
};

use op_config::Config;

use std::process::ExitCode;

use log::{error, info};

fn main() -> ExitCode {
    let cli = Cli::try_from_args(std::env::args()).unwrap_or_else(|e| e.exit());

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("open115-supervisor: {e}");
            eprintln!("{}", e.recovery_hint());
            return ExitCode::from(e.exit_code());
        }
    };

    if let Err(e) = logger::initialize(config.logging.level, config.logging.colored) {
        eprintln!("open115-supervisor: {e}");
    }

    info!("Starting open115-supervisor v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let plan = match start(&config, &cli.server_args) {
        Ok(plan) => plan,
        Err(e) => return fail(e),
    };

    info!("Handing off to: {plan}");
    fail(plan.exec())
}

fn load_config() -> SupervisorResult<Config> {
    let config = Config::load()?;
    config.validate()?;
    Ok(config)
}

/// Run the startup sequence on a single-threaded runtime.
///
/// The runtime is dropped before returning so nothing of it survives into
/// the exec'd server.
fn start(config: &Config, server_args: &[String]) -> SupervisorResult<HandoffPlan> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SupervisorError::runtime(format!("Failed to build runtime: {e}")))?;

    let probe = probe_for(&config.token_manager);

    runtime.block_on(async {
        Supervisor::new(config, probe.as_ref())
            .run(server_args)
            .await
    })
}

fn fail(e: SupervisorError) -> ExitCode {
    if e.is_readiness_failure() {
        error!("Token manager did not become ready; exiting");
    } else {
        error!("{e}");
    }
    error!("{}", e.recovery_hint());
    ExitCode::from(e.exit_code())
}
