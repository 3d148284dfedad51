use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, Counter, Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge,
    TextEncoder,
};

lazy_static! {
    // HTTP metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Chain metrics
    pub static ref CHAIN_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "chain_calls_total",
        "Total number of chain calls",
        &["method", "status"]
    )
    .unwrap();

    pub static ref CHAIN_CALL_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "chain_call_duration_seconds",
        "Chain call duration in seconds",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    // Quiz metrics
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quiz_sessions_total",
        "Total number of quiz sessions",
        &["event"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "quiz_sessions_active",
        "Number of currently open quiz sessions"
    )
    .unwrap();

    pub static ref WALLET_CONNECTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wallet_connects_total",
        "Total number of wallet connection attempts",
        &["status"]
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["result"]
    )
    .unwrap();

    pub static ref REWARDS_SENT_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rewards_sent_total",
        "Total number of reward transfers",
        &["status"]
    )
    .unwrap();

    pub static ref REWARD_WEI_TOTAL: Counter = register_counter!(
        "reward_wei_total",
        "Total reward paid out in wei"
    )
    .unwrap();

    pub static ref ACHIEVEMENTS_UNLOCKED_TOTAL: IntCounter = register_int_counter!(
        "achievements_unlocked_total",
        "Total number of achievements unlocked"
    )
    .unwrap();

    pub static ref LEADERBOARD_SIZE: IntGauge = register_int_gauge!(
        "leaderboard_size",
        "Number of accounts on the leaderboard"
    )
    .unwrap();
}

/// Encodes every registered metric in the Prometheus text format.
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a chain call with metrics
pub async fn track_chain_call<F, T, E>(method: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    CHAIN_CALLS_TOTAL
        .with_label_values(&[method, status])
        .inc();

    CHAIN_CALL_DURATION_SECONDS
        .with_label_values(&[method])
        .observe(duration);

    result
}
