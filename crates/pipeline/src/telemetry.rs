//! Pipeline metrics
//!
//! Recorded through the `metrics` facade; a no-op until the host process
//! installs a recorder.

use std::time::Duration;

use lyric_tutor_core::{Error, Operation};

pub const REQUESTS_TOTAL: &str = "lyric_tutor_requests_total";
pub const MODEL_LATENCY_SECONDS: &str = "lyric_tutor_model_latency_seconds";

/// Register metric descriptions with the installed recorder
pub fn describe() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Pipeline requests by operation and outcome");
    metrics::describe_histogram!(
        MODEL_LATENCY_SECONDS,
        metrics::Unit::Seconds,
        "Model call latency by operation"
    );
}

/// Outcome label for a finished request
pub fn outcome<T>(result: &Result<T, Error>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(Error::InputRejected(_)) => "rejected",
        Err(Error::Processing(_)) => "processing_error",
        Err(Error::Upstream { .. }) => "upstream_error",
    }
}

pub(crate) fn record_request<T>(operation: Operation, result: &Result<T, Error>) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome(result)
    )
    .increment(1);
}

pub(crate) fn record_model_latency(operation: Operation, elapsed: Duration) {
    metrics::histogram!(MODEL_LATENCY_SECONDS, "operation" => operation.to_string())
        .record(elapsed.as_secs_f64());
}
