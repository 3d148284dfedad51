#![allow(dead_code)]

use std::sync::Arc;

use chainquiz_api::models::question::QuestionBank;
use chainquiz_api::{chain, config::Config, create_router, services::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let _tracer = init_telemetry();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chainquiz_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer())
        .init();

    tracing::info!("Starting ChainQuiz API");

    let config = Config::load().expect("Failed to load configuration");
    let profile = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    tracing::info!("Configuration loaded ({} profile)", profile);

    let bank = QuestionBank::load(config.question_bank_path.as_deref())
        .expect("Failed to load question bank");
    tracing::info!("Question bank loaded with {} questions", bank.len());

    let (wallet, token) =
        chain::connect_backends(&config).expect("Failed to initialize chain backend");
    tracing::info!("Chain backend ready in {} mode", config.chain_mode.as_str());

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::new(config, bank, wallet, token));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();

    shutdown_telemetry();
}

/// Sets up the OTLP pipeline and installs the provider globally. Span export
/// can be pointed elsewhere via OTEL_EXPORTER_OTLP_ENDPOINT.
fn init_telemetry() -> opentelemetry_sdk::trace::Tracer {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use opentelemetry_sdk::Resource;

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4318".to_string());

    tracing::info!("Exporting traces over OTLP to {}", otlp_endpoint);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(otlp_endpoint)
        .build()
        .expect("Failed to create OTLP exporter");

    let resource = Resource::builder_empty()
        .with_service_name("chainquiz-api")
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("chainquiz-api");

    opentelemetry::global::set_tracer_provider(provider);

    tracer
}

fn shutdown_telemetry() {
    tracing::info!("Flushing telemetry");
    // Since opentelemetry 0.31 the provider flushes on drop, nothing to call here.
}
