#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

/// Keeps the file writer's worker alive; trace lines still buffered are
/// flushed when it drops.
#[cfg(feature = "trace")]
pub type TraceGuard = tracing_appender::non_blocking::WorkerGuard;
#[cfg(not(feature = "trace"))]
pub type TraceGuard = ();

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

/// Install the trace subscriber: JSON lines into `log_dir` when given,
/// human-readable lines on stderr otherwise. `RUST_LOG` overrides the filter.
///
/// Hold the returned guard until the program exits.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: Option<&Path>) -> Option<TraceGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let mut guard = None;
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ngram_core=debug,ngram_cli=debug"));
        match log_dir {
            Some(dir) => {
                let file_appender = tracing_appender::rolling::never(dir, "ngramtool-trace.jsonl");
                let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker);

                tracing_subscriber::fmt()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_env_filter(filter)
                    .init();
            }
            None => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_env_filter(filter)
                    .init();
            }
        }
    });
    guard
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: Option<&std::path::Path>) -> Option<TraceGuard> {
    None
}
