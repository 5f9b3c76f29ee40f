//! Structured logging initialization
//!
//! Provides consistent logging initialization across all startup helpers.

use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Guard that keeps the component span entered on the calling thread.
/// Drop this at the end of main.
pub struct LogGuard {
    _span: tracing::span::EnteredSpan,
}

/// Initialize structured logging for a component.
///
/// Logs go to stderr so the service manager captures them alongside the
/// daemon's own startup output. Events on the calling thread are tagged with
/// `component`; wrap work moved to other threads with `in_current_span`.
///
/// # Example
/// ```ignore
/// let _guard = init_logging("snmpd-config");
/// info!("Starting up...");
/// ```
pub fn init_logging(component: &str) -> LogGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();

    LogGuard {
        _span: component_span(component).entered(),
    }
}

/// Bind `f` to the current span so it keeps the span when run on another thread.
///
/// # Example
/// ```ignore
/// tokio::task::spawn_blocking(in_current_span(move || generate(&config)));
/// ```
pub fn in_current_span<F, T>(f: F) -> impl FnOnce() -> T + Send + 'static
where
    F: FnOnce() -> T + Send + 'static,
    T: 'static,
{
    let span = Span::current();
    move || span.in_scope(f)
}

fn component_span(component: &str) -> Span {
    tracing::info_span!("run", component = %component)
}
