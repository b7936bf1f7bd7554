use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

#[cfg(feature = "metrics")]
pub(crate) const LATENCY_METRIC: &str = "stroll_request_latency";
#[cfg(feature = "metrics")]
pub(crate) const SUCCESS_METRIC: &str = "stroll_request_success";
#[cfg(feature = "metrics")]
pub(crate) const ERROR_METRIC: &str = "stroll_request_error";

/// Times a single HTTP call and records its outcome against the current run.
pub(crate) async fn transaction_hook<T, R, E>(task: &str, func: T) -> T::Output
where
    T: Future<Output = Result<R, E>>,
{
    if let Ok(hook) = TRANSACTION_HOOK.try_with(|v| v.clone()) {
        let start = Instant::now();
        let res = func.await;
        let elapsed = start.elapsed();
        trace!("{task} transaction took {elapsed:?}");

        #[cfg(feature = "metrics")]
        metrics::histogram!(LATENCY_METRIC, "task" => task.to_string())
            .record(elapsed.as_secs_f64());

        if res.is_ok() {
            hook.success.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!(SUCCESS_METRIC, "task" => task.to_string()).increment(1);
        } else {
            hook.error.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!(ERROR_METRIC, "task" => task.to_string()).increment(1);
        }

        res
    } else {
        warn!("No hook available.");
        func.await
    }
}

#[cfg(feature = "metrics")]
pub(crate) fn describe_metrics() {
    metrics::describe_histogram!(
        LATENCY_METRIC,
        metrics::Unit::Seconds,
        "Latency of a single HTTP call."
    );
    metrics::describe_counter!(SUCCESS_METRIC, "HTTP calls answered with 2xx or 3xx.");
    metrics::describe_counter!(ERROR_METRIC, "HTTP calls which failed.");
}

#[derive(Clone, Default)]
pub(crate) struct TransactionData {
    pub success: Arc<AtomicU64>,
    pub error: Arc<AtomicU64>,
}

tokio::task_local! {
    pub(crate) static TRANSACTION_HOOK: TransactionData;
}
