use std::process::ExitCode;

use configs::AppConfig;
use tracing::{error, info, warn};

const SERVICE: &str = "coffeeshop-api";

fn main() -> ExitCode {
    // .env before logging so RUST_LOG / LOG_FORMAT from the file apply
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env: {e}");
        }
    }
    common::utils::logging::init_logging_from_env();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, error = %format!("{e:#}"), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    std::panic::set_hook(Box::new(|info| {
        error!(service = SERVICE, pid = std::process::id(), message = %info, "panic");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = cfg.server.worker_threads {
        builder.worker_threads(n);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        version = env!("CARGO_PKG_VERSION"),
        addr = %cfg.server.bind_addr(),
        store = %cfg.store.path,
        "starting"
    );
    rt.block_on(serve(cfg))
}

/// Run the server until it fails or Ctrl-C arrives.
async fn serve(cfg: AppConfig) -> ExitCode {
    tokio::select! {
        res = server::run(cfg) => match res {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(service = SERVICE, error = %format!("{e:#}"), "server stopped with error");
                ExitCode::FAILURE
            }
        },
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(service = SERVICE, error = %e, "cannot listen for Ctrl-C");
                return ExitCode::FAILURE;
            }
            // a save in flight either completes its rename or leaves the old file
            info!(service = SERVICE, "shutting down");
            ExitCode::SUCCESS
        }
    }
}
