use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn,sqlx=warn";

/// Tracing setup for the staffdir binaries.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub service_name: String,
    pub filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            filter: None,
            otlp_endpoint: None,
        }
    }

    /// Pick up `RUST_LOG` and `OTLP_ENDPOINT` overrides.
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            filter: std::env::var("RUST_LOG").ok(),
            otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok(),
        }
    }
}

/// Install the tracing subscriber once; repeated calls are no-ops so tests
/// can initialize freely.
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    if INIT.set(()).is_err() {
        return Ok(());
    }

    let filter = config.filter.unwrap_or_else(|| DEFAULT_FILTER.to_string());
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter)?)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    match config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = SpanExporter::builder()
                .with_http()
                .with_protocol(Protocol::HttpBinary)
                .with_endpoint(endpoint)
                .build()?;
            let provider = sdk::trace::SdkTracerProvider::builder()
                .with_resource(
                    Resource::builder()
                        .with_service_name(config.service_name.clone())
                        .build(),
                )
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
        }
        None => registry.try_init()?,
    }
    Ok(())
}
