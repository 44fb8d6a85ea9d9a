use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Log lines go to stderr so command output on stdout stays machine readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "blogdesk_cache_hit_total",
            Unit::Count,
            "Total number of query reads served from the cache."
        );
        describe_counter!(
            "blogdesk_cache_miss_total",
            Unit::Count,
            "Total number of query reads that went to the API."
        );
        describe_counter!(
            "blogdesk_cache_evict_total",
            Unit::Count,
            "Total number of single-post entries evicted due to capacity."
        );
        describe_counter!(
            "blogdesk_cache_invalidate_total",
            Unit::Count,
            "Total number of cached queries marked stale by a mutation."
        );
        describe_counter!(
            "blogdesk_cache_refetch_total",
            Unit::Count,
            "Total number of subscribed queries re-run after invalidation."
        );
    });
}
