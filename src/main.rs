use std::env;
use std::process::ExitCode;

use spsc_logger::{log_record, Logger, LoggerConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "example.log".to_string());
    let mut config = LoggerConfig::default();
    if let Some(core_id) = env::var("SPSC_LOGGER_CORE").ok().and_then(|s| s.parse().ok()) {
        config = config.with_core(core_id);
    }

    let mut logger = match Logger::open_with_config(&path, config) {
        Ok(logger) => logger,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let string = String::from("Example String");
    let cstr = "Example C String";
    let i_val = 101;
    let d_val = 22.0f64 / 7.0;

    log_record!(logger, "Starting to log\n");
    log_record!(
        logger,
        "Here are the values \nString: %,\n&str: %,\ninteger: %,\nValue of pi: %\n",
        string,
        cstr,
        i_val,
        d_val
    );

    match logger.close() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
