//! Logging bootstrap: one tracing subscriber shared by binaries and
//! tests, with the `log` facade bridged in.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::layer::SubscriberExt;

/// Environment variable controlling the log filter.
pub const LOG_ENV_VAR: &str = "AGRITRACE_LOG";

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes tracing from the `AGRITRACE_LOG` environment variable.
///
/// Defaults to "info" if `AGRITRACE_LOG` is not set. Safe to call more
/// than once; later calls are no-ops. `log` records from the database
/// layer and dependencies are bridged into the same subscriber.
pub fn init_tracing() {
    init_with_format(false);
}

/// Same as [`init_tracing`] but emits one JSON object per line, for
/// deployments shipping logs to a collector.
pub fn init_tracing_json() {
    init_with_format(true);
}

fn init_with_format(json: bool) {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let _ = tracing_log::LogTracer::init();

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A host application may have installed its own subscriber already;
    // losing that race is fine.
    if json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json());
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer());
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
