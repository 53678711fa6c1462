use std::process::ExitCode;

fn main() -> ExitCode {
    match app_lib::run() {
        Ok((state, _log_guard)) => {
            tracing::info!(
                path = %state.config.db_path().display(),
                "Database ready"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "Startup failed");
            eprintln!("agentpilot: {e}");
            ExitCode::FAILURE
        }
    }
}
