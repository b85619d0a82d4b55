//! Prometheus metrics for dispatch.
//!
//! The dispatcher records through the `metrics` facade; nothing is exported
//! until a recorder is installed. [`MetricsRecorder`] installs the Prometheus
//! recorder and renders the scrape body.
//!
//! # Example
//!
//! ```rust,no_run
//! use composable_mvc_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! if let Some(body) = recorder.render() {
//!     println!("{body}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Dispatches started.
pub const DISPATCH_REQUESTS: &str = "dispatch_requests_total";
/// Forwards followed.
pub const DISPATCH_FORWARDS: &str = "dispatch_forwards_total";
/// Dispatches that ended in a not-found error.
pub const DISPATCH_NOT_FOUND: &str = "dispatch_not_found_total";
/// Dispatches aborted by the forward depth limit.
pub const DISPATCH_FORWARD_LOOPS: &str = "dispatch_forward_loops_total";
/// Controller instances constructed.
pub const CONTROLLERS_CREATED: &str = "dispatch_controllers_created_total";
/// Time spent in one dispatch, forwards included.
pub const DISPATCH_DURATION: &str = "dispatch_duration_seconds";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus recorder handle.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl MetricsRecorder {
    /// Create an uninstalled recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Describe the dispatch metrics and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built or installed. A
    /// recorder that is already installed (e.g. by another test) is not an
    /// error; [`Self::handle`] then stays `None`.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// The Prometheus handle, if this recorder installed one.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

fn register_metrics() {
    describe_counter!(DISPATCH_REQUESTS, "Total number of dispatches started");
    describe_counter!(DISPATCH_FORWARDS, "Total number of forwards followed");
    describe_counter!(
        DISPATCH_NOT_FOUND,
        "Total number of dispatches that found no controller or action"
    );
    describe_counter!(
        DISPATCH_FORWARD_LOOPS,
        "Total number of dispatches aborted by the forward depth limit"
    );
    describe_counter!(
        CONTROLLERS_CREATED,
        "Total number of controller instances constructed"
    );
    describe_histogram!(
        DISPATCH_DURATION,
        "Time taken by one dispatch, forwards included"
    );
}

/// Dispatch metrics recorder.
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a started dispatch.
    pub fn record_request() {
        counter!(DISPATCH_REQUESTS).increment(1);
    }

    /// Record a forward.
    pub fn record_forward() {
        counter!(DISPATCH_FORWARDS).increment(1);
    }

    /// Record a not-found outcome.
    pub fn record_not_found() {
        counter!(DISPATCH_NOT_FOUND).increment(1);
    }

    /// Record a forward loop.
    pub fn record_forward_loop() {
        counter!(DISPATCH_FORWARD_LOOPS).increment(1);
    }

    /// Record the duration of one dispatch.
    pub fn record_duration(duration: Duration) {
        histogram!(DISPATCH_DURATION).record(duration.as_secs_f64());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_starts_uninstalled() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.handle().is_none());
        assert!(recorder.render().is_none());
    }

    #[test]
    fn test_recorder_debug_reports_installation() {
        let recorder = MetricsRecorder::new();
        assert_eq!(format!("{recorder:?}"), "MetricsRecorder { installed: false, .. }");
    }

    #[test]
    fn test_recorder_install_and_render() {
        let mut recorder = MetricsRecorder::new();
        recorder.install().unwrap();

        DispatchMetrics::record_request();
        DispatchMetrics::record_forward();
        DispatchMetrics::record_duration(Duration::from_millis(3));

        // Another test may have installed the global recorder first.
        if let Some(rendered) = recorder.render() {
            assert!(rendered.contains(DISPATCH_REQUESTS));
            assert!(rendered.contains(DISPATCH_FORWARDS));
        }
    }

    #[test]
    fn test_second_install_is_not_an_error() {
        let mut first = MetricsRecorder::new();
        first.install().unwrap();
        let mut second = MetricsRecorder::new();
        assert!(second.install().is_ok());
    }
}
