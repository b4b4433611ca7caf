use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize structured logging system
pub fn init_logging(log_level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    // Set up environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = log_level.unwrap_or("info");
            EnvFilter::try_new(level)
        })
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    // Create registry
    let registry = Registry::default().with(env_filter);

    // Add console layer
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    // Add file layer if log file is specified
    if let Some(log_path) = log_file {
        let file_appender = rolling::daily(log_path.parent().unwrap_or(Path::new(".")), "app.log");
        let (non_blocking_appender, guard) = non_blocking(file_appender);
        // Keep the worker guard alive for the process lifetime
        std::mem::forget(guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_appender)
            .with_ansi(false)
            .with_target(true)
            .json();

        registry.with(console_layer).with(file_layer).init();
    } else {
        registry.with(console_layer).init();
    }

    info!("Logging system initialized");
    Ok(())
}

/// Performance timing utilities
pub struct OperationTimer {
    operation: String,
    start: std::time::Instant,
    reported: bool,
}

impl OperationTimer {
    #[must_use]
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: std::time::Instant::now(),
            reported: false,
        }
    }

    pub fn finish(mut self) -> u128 {
        let duration = self.start.elapsed().as_millis();
        tracing::info!(
            operation = self.operation,
            duration_ms = duration,
            "Operation completed"
        );
        self.reported = true;
        duration
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        // Timers dropped without an explicit finish still get a log line.
        if !self.reported && !std::thread::panicking() {
            let duration = self.start.elapsed().as_millis();
            tracing::debug!(
                operation = self.operation,
                duration_ms = duration,
                "Operation finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_consumes_the_timer_and_returns_elapsed_millis() {
        let timer = OperationTimer::new("noop");
        let duration = timer.finish();
        assert!(duration < 10_000);
    }

    #[test]
    fn dropping_an_unfinished_timer_does_not_panic() {
        let _timer = OperationTimer::new("abandoned");
    }
}
