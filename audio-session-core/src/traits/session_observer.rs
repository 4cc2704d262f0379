use crate::models::error::SessionError;
use crate::models::report::{ConfigurationReport, ConfigurationStep};

/// Event hook for configuration outcomes.
///
/// Lets the host surface degraded audio (failed steps, substituted sample
/// rates) to the user or to telemetry instead of only to the log.
/// Called synchronously on the thread running `configure()`.
pub trait SessionObserver: Send + Sync {
    /// Called as soon as a step fails, before the policy decides what runs next.
    fn on_step_failed(&self, step: ConfigurationStep, error: &SessionError);

    /// Called once per `configure()` with the finished report.
    fn on_configured(&self, report: &ConfigurationReport);
}
