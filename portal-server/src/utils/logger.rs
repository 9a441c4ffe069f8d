//! Logging Infrastructure
//!
//! `tracing-subscriber` with an `EnvFilter`, optionally writing to a
//! daily-rolling file when the log directory exists.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "portal_server=info,tower_http=info";

/// Build the log filter: explicit level, then `RUST_LOG`, then the default
pub fn build_filter(log_level: Option<&str>) -> EnvFilter {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the global subscriber
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "portal-server");
            subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .init();
            return;
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    subscriber.init();
}

/// Security audit log (target `security`)
///
/// ```ignore
/// security_log!("WARN", "nickname_mismatch", employee_id = id.to_string());
/// ```
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
