use audio_session_core::{ConfigurationReport, ConfigurationStep, SessionError, SessionObserver};

/// Forwards degraded-audio events to the log under the `telemetry` target.
pub struct TelemetryObserver;

impl SessionObserver for TelemetryObserver {
    fn on_step_failed(&self, step: ConfigurationStep, error: &SessionError) {
        log::warn!(target: "telemetry", "audio_session.step_failed step={step} error={error}");
    }

    fn on_configured(&self, report: &ConfigurationReport) {
        let deviations = report.deviations();
        if !report.is_degraded() {
            log::info!(target: "telemetry", "audio_session.configured");
            return;
        }
        log::warn!(
            target: "telemetry",
            "audio_session.degraded active={} duplex={} failures={} deviations={:?}",
            report.is_active(),
            report.duplex,
            report.failures.len(),
            deviations
        );
    }
}
