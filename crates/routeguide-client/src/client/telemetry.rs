//! # Telemetry
//!
//! Log output always goes through `tracing`, rendered by
//! `tracing_subscriber::fmt` on stderr and filtered with `RUST_LOG` (default
//! `info`).
//!
//! Spans can additionally be exported through OpenTelemetry.
//!
//! ## Feature matrix
//!
//! - `stdout`: Exports spans with the OpenTelemetry stdout exporter.
//! - `otlp`: Exports spans over OTLP/gRPC. The collector endpoint is read
//!   from `OTEL_EXPORTER_OTLP_ENDPOINT`.
//!
//! Both exporters can be enabled at the same time. Each scenario runs in its
//! own span (`get_feature`, `list_features`, `record_route`, `route_chat`), so
//! exported traces show one span per call shape with the log events attached.
//!
//! ```bash
//! cargo run --features stdout -- --server-addr localhost:10000
//! ```

// `otel` is only a building block for the exporter features.
#[cfg(all(feature = "otel", not(any(feature = "stdout", feature = "otlp"))))]
compile_error!("The 'otel' feature requires at least one of 'stdout' or 'otlp' to be enabled.");

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "otel")]
use opentelemetry::{InstrumentationScope, KeyValue, trace::TracerProvider};
#[cfg(feature = "otel")]
use opentelemetry_sdk::{Resource, trace as sdktrace};
#[cfg(feature = "otel")]
use opentelemetry_semantic_conventions as semcvns;

#[cfg(feature = "otel")]
const SERVICE_NAME: &str = "routeguide-client";

pub struct TelemetryProviders {
    #[cfg(feature = "otel")]
    pub tracer_provider: sdktrace::SdkTracerProvider,
}

impl TelemetryProviders {
    /// Flushes pending spans and shuts the exporters down.
    pub fn shutdown(self) {
        #[cfg(feature = "otel")]
        {
            if let Err(err) = self.tracer_provider.force_flush() {
                eprintln!("Error flushing traces: {err:#?}");
            }
            if let Err(err) = self.tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer: {err:#?}");
            }
        }
    }
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "otel")]
    let tracer_provider = init_tracer()?;

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        );

    #[cfg(feature = "otel")]
    let registry = {
        let scope = InstrumentationScope::builder(SERVICE_NAME)
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schema_url(semcvns::SCHEMA_URL)
            .build();

        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        registry.with(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer_with_scope(scope))
                .with_error_records_to_exceptions(true),
        )
    };

    registry.try_init()?;

    Ok(TelemetryProviders {
        #[cfg(feature = "otel")]
        tracer_provider,
    })
}

#[cfg(feature = "otel")]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name(SERVICE_NAME)
        .with_schema_url(
            [KeyValue::new(
                semcvns::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semcvns::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "otel")]
fn init_tracer() -> anyhow::Result<sdktrace::SdkTracerProvider> {
    let builder = sdktrace::SdkTracerProvider::builder().with_resource(resource());

    // A run lasts seconds, so spans are exported as they close.
    #[cfg(feature = "stdout")]
    let builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());

    #[cfg(feature = "otlp")]
    let builder = {
        use anyhow::Context;
        use opentelemetry_otlp::{Protocol, WithExportConfig};

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_timeout(std::time::Duration::from_secs(10))
            .with_protocol(Protocol::Grpc)
            .build()
            .context("failed to build span exporter")?;

        let batch = sdktrace::BatchSpanProcessor::builder(exporter)
            .with_batch_config(
                sdktrace::BatchConfigBuilder::default()
                    .with_scheduled_delay(std::time::Duration::from_secs(1))
                    .with_max_queue_size(2048)
                    .build(),
            )
            .build();

        builder.with_span_processor(batch)
    };

    Ok(builder.build())
}
