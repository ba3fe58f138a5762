use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Route tracing output to `<dir>/vyomsh.log` so it never lands on the prompt.
/// Level comes from `VYOMSH_LOG` (default `warn`). Keep the guard alive for
/// the whole process, dropping it flushes the writer.
pub fn init(dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::never(dir, "vyomsh.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("VYOMSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    guard
}
