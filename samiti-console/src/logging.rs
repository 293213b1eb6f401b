//! Tracing setup: stderr plus a daily-rolling file

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init(log_dir: &Path, verbose: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = rolling::daily(log_dir, "samiti.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if verbose || cfg!(debug_assertions) {
        EnvFilter::new("info,samiti_client=debug,samiti_console=debug,reqwest=warn,hyper=warn")
    } else {
        EnvFilter::new("warn,samiti_client=info,samiti_console=info")
    };

    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_file);

    // command output owns stdout
    let stderr_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_filter(if verbose {
            tracing_subscriber::filter::LevelFilter::DEBUG
        } else {
            tracing_subscriber::filter::LevelFilter::WARN
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        let msg = info.to_string();
        eprintln!("!!! PANIC !!!\nMessage: {}\nBacktrace:\n{}", msg, backtrace);
        tracing::error!(target: "panic", message = %msg, backtrace = %backtrace, "panic occurred");
    }));

    tracing::debug!(path = %log_dir.display(), "Tracing initialized");
    Ok(guard)
}
