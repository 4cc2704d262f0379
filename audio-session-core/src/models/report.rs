use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::SessionError;
use super::intent::AudioSessionIntent;
use super::parameters::SessionParameters;

/// Relative tolerance when comparing requested and granted buffer durations.
const BUFFER_DURATION_TOLERANCE: f64 = 0.05;

/// One request in the configuration sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationStep {
    Validate,
    Category,
    BufferDuration,
    SampleRate,
    Activate,
}

impl ConfigurationStep {
    pub const ALL: [ConfigurationStep; 5] = [
        Self::Validate,
        Self::Category,
        Self::BufferDuration,
        Self::SampleRate,
        Self::Activate,
    ];
}

impl fmt::Display for ConfigurationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validation",
            Self::Category => "category",
            Self::BufferDuration => "buffer duration",
            Self::SampleRate => "sample rate",
            Self::Activate => "activation",
        };
        f.write_str(name)
    }
}

/// What to do with the remaining steps once one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip everything after the first failure; never activate a partial setup.
    #[default]
    AbortOnFirstFailure,
    /// Attempt every step regardless and activate with whatever was accepted.
    AttemptAll,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: ConfigurationStep,
    #[serde(serialize_with = "serialize_error")]
    pub error: SessionError,
}

fn serialize_error<S: serde::Serializer>(error: &SessionError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// A requested value the OS granted differently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "parameter")]
pub enum Deviation {
    SampleRate { requested: f64, granted: f64 },
    BufferDuration { requested: f64, granted: f64 },
}

/// Outcome of one `configure()` attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationReport {
    pub requested: AudioSessionIntent,
    pub policy: FailurePolicy,
    /// Steps the OS accepted, in order.
    pub applied: Vec<ConfigurationStep>,
    /// Steps that failed, in order.
    pub failures: Vec<StepFailure>,
    /// Steps not attempted because of an earlier failure.
    pub skipped: Vec<ConfigurationStep>,
    /// Read back from the OS; present only once activation succeeded.
    pub actual: Option<SessionParameters>,
    /// Whether the requested category allows simultaneous input and output.
    pub duplex: bool,
    pub attempted_at: DateTime<Utc>,
}

impl ConfigurationReport {
    pub fn new(requested: AudioSessionIntent, policy: FailurePolicy) -> Self {
        Self {
            requested,
            policy,
            applied: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
            actual: None,
            duplex: requested.is_duplex(),
            attempted_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.is_active()
    }

    /// Whether the session was activated, possibly with partial settings.
    pub fn is_active(&self) -> bool {
        self.applied.contains(&ConfigurationStep::Activate)
    }

    /// Whether the host should treat audio as degraded: a step failed, the
    /// OS substituted a requested value, or the category cannot record and
    /// play at the same time.
    pub fn is_degraded(&self) -> bool {
        !self.is_success() || !self.duplex || !self.deviations().is_empty()
    }

    pub fn first_failure(&self) -> Option<&StepFailure> {
        self.failures.first()
    }

    pub fn failed_steps(&self) -> Vec<ConfigurationStep> {
        self.failures.iter().map(|f| f.step).collect()
    }

    /// Requested values the OS substituted. Empty when nothing was read back.
    pub fn deviations(&self) -> Vec<Deviation> {
        let Some(actual) = self.actual else {
            return Vec::new();
        };
        let mut deviations = Vec::new();

        let requested_rate = self.requested.preferred_sample_rate_hz;
        if (actual.sample_rate_hz - requested_rate).abs() >= 0.5 {
            deviations.push(Deviation::SampleRate {
                requested: requested_rate,
                granted: actual.sample_rate_hz,
            });
        }

        let requested_buffer = self.requested.preferred_io_buffer_duration_secs;
        let granted_buffer = actual.io_buffer_duration_secs;
        if (granted_buffer - requested_buffer).abs() > requested_buffer * BUFFER_DURATION_TOLERANCE {
            deviations.push(Deviation::BufferDuration {
                requested: requested_buffer,
                granted: granted_buffer,
            });
        }

        deviations
    }

    pub(crate) fn record_applied(&mut self, step: ConfigurationStep) {
        self.applied.push(step);
    }

    pub(crate) fn record_failure(&mut self, step: ConfigurationStep, error: SessionError) {
        self.failures.push(StepFailure { step, error });
    }

    pub(crate) fn record_skipped(&mut self, step: ConfigurationStep) {
        self.skipped.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intent::{CategoryOptions, SessionCategory};

    fn granted(sample_rate_hz: f64, io_buffer_duration_secs: f64) -> SessionParameters {
        SessionParameters {
            io_buffer_duration_secs,
            sample_rate_hz,
            input_latency_secs: 0.01,
            output_latency_secs: 0.01,
        }
    }

    #[test]
    fn empty_report_is_not_success() {
        let report = ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::default());

        assert!(!report.is_success());
        assert!(!report.is_active());
        assert!(report.first_failure().is_none());
        assert!(report.deviations().is_empty());
    }

    #[test]
    fn non_duplex_category_is_degraded() {
        let intent = AudioSessionIntent {
            category: SessionCategory::Playback,
            options: CategoryOptions::NONE,
            ..Default::default()
        };
        let mut report = ConfigurationReport::new(intent, FailurePolicy::default());
        report.applied = ConfigurationStep::ALL.to_vec();
        report.actual = Some(granted(16000.0, 0.003));

        assert!(!report.duplex);
        assert!(report.is_success());
        assert!(report.is_degraded());
    }

    #[test]
    fn clean_duplex_session_is_not_degraded() {
        let mut report = ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::default());
        report.applied = ConfigurationStep::ALL.to_vec();
        report.actual = Some(granted(16000.0, 0.003));

        assert!(report.duplex);
        assert!(!report.is_degraded());
    }

    #[test]
    fn activation_with_failures_is_active_but_not_success() {
        let mut report =
            ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::AttemptAll);
        report.record_applied(ConfigurationStep::Category);
        report.record_failure(
            ConfigurationStep::SampleRate,
            SessionError::rejected(ConfigurationStep::SampleRate, "unsupported"),
        );
        report.record_applied(ConfigurationStep::Activate);

        assert!(report.is_active());
        assert!(!report.is_success());
        assert_eq!(report.failed_steps(), vec![ConfigurationStep::SampleRate]);
    }

    #[test]
    fn deviations_report_substituted_values() {
        let mut report = ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::default());
        report.actual = Some(granted(48000.0, 0.005));

        assert_eq!(
            report.deviations(),
            vec![
                Deviation::SampleRate {
                    requested: 16000.0,
                    granted: 48000.0
                },
                Deviation::BufferDuration {
                    requested: 0.003,
                    granted: 0.005
                },
            ]
        );
    }

    #[test]
    fn close_buffer_duration_is_not_a_deviation() {
        let mut report = ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::default());
        // 128 frames at 44.1 kHz is the closest many devices get to 3 ms.
        report.actual = Some(granted(16000.0, 128.0 / 44100.0));
        assert!(report.deviations().is_empty());

        report.actual = Some(granted(16000.0, 0.004));
        assert_eq!(report.deviations().len(), 1);
    }

    #[test]
    fn report_serializes_errors_as_text() {
        let mut report = ConfigurationReport::new(AudioSessionIntent::default(), FailurePolicy::default());
        report.record_failure(
            ConfigurationStep::Activate,
            SessionError::ActivationFailed("route conflict".into()),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["step"], "activate");
        assert_eq!(json["failures"][0]["error"], "activation failed: route conflict");
        assert_eq!(json["policy"], "abort_on_first_failure");
    }
}
