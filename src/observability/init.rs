//! Tracing subscriber setup.

use super::exporter;
use super::file_writer::RotatingWriter;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `trace_level` is set.
pub const DEFAULT_LEVEL: &str = "warn";

/// Installs the global subscriber.
///
/// Level resolution: `RUST_LOG`, then `config.trace_level`, then [`DEFAULT_LEVEL`].
/// Human-readable output goes to stderr, keeping stdout for the shop itself. When
/// `config.trace_file` is set, spans are also exported as JSON lines to that file
/// (relative paths resolve in the data directory).
///
/// Calling this more than once keeps the first subscriber.
///
/// # Returns
///
/// The span export provider, if one was set up. Shut it down before exiting so the
/// exporter is closed.
pub fn init_tracing(config: &Config) -> Option<TracerProvider> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let provider = config.trace_file.as_deref().and_then(|file| {
        let path = paths::resolve_data_path(file);
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!(
                    "storefront: trace export disabled, cannot create {}: {e}",
                    parent.display()
                );
                return None;
            }
        }

        let resource = Resource::new(vec![
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        Some(exporter::create_tracer_provider(RotatingWriter::new(path), resource))
    });

    let otel_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(env!("CARGO_PKG_NAME"))));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(span_export = provider.is_some(), "tracing initialized");
    }
    provider
}
