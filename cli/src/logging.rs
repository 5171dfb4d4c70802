// Tracing setup

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Console output goes to stderr so stdout stays clean JSON. The returned
/// guard must live until exit or buffered file lines are lost.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let default_filter = if verbose {
        "info,rockgeo_api_client=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "rockgeo.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // a second call (e.g. from tests) keeps the first subscriber
    if let Err(error) = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!(error = %error, "tracing subscriber already installed");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let guard = init(false, Some(dir.path()));
        assert!(guard.is_some());

        assert!(init(true, None).is_none());
        tracing::info!("still logging after a second init");
    }
}
