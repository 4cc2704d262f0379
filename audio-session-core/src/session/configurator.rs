use std::sync::Arc;

use crate::models::error::SessionError;
use crate::models::intent::AudioSessionIntent;
use crate::models::report::{ConfigurationReport, ConfigurationStep, FailurePolicy};
use crate::traits::session_manager::AudioSessionManager;
use crate::traits::session_observer::SessionObserver;

/// Puts the shared OS audio session into a low-latency duplex state.
///
/// Generic over the platform session via `AudioSessionManager`. Run it once,
/// before anything opens an audio stream:
/// ```text
/// validate → category/mode/options → buffer duration → sample rate → activate → read back
/// ```
/// `configure()` is best-effort: failures are logged, handed to the observer
/// and recorded in the returned report, never propagated.
pub struct AudioSessionConfigurator<M: AudioSessionManager> {
    manager: M,
    intent: AudioSessionIntent,
    policy: FailurePolicy,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl<M: AudioSessionManager> AudioSessionConfigurator<M> {
    /// Configurator with the default intent and `AbortOnFirstFailure`.
    pub fn new(manager: M) -> Self {
        Self {
            manager,
            intent: AudioSessionIntent::default(),
            policy: FailurePolicy::default(),
            observer: None,
        }
    }

    pub fn with_intent(mut self, intent: AudioSessionIntent) -> Self {
        self.intent = intent;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_observer(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observer = Some(observer);
    }

    pub fn intent(&self) -> &AudioSessionIntent {
        &self.intent
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Request the intent from the OS and report what was achieved.
    ///
    /// Calling it again re-issues the same requests; the OS stays the
    /// authority on current state.
    pub fn configure(&mut self) -> ConfigurationReport {
        let intent = self.intent;
        let mut report = ConfigurationReport::new(intent, self.policy);

        log::debug!(
            "Configuring audio session via {} ({:?}): category={} mode={} options={:?}",
            self.manager.name(),
            self.policy,
            intent.category,
            intent.mode,
            intent.options.enabled()
        );
        if !report.duplex {
            log::warn!(
                "Audio session category {} cannot record and play simultaneously",
                intent.category
            );
        }

        for step in ConfigurationStep::ALL {
            if self.should_skip(&report) {
                report.record_skipped(step);
                continue;
            }
            match self.run_step(step, &intent) {
                Ok(()) => report.record_applied(step),
                Err(e) => {
                    log::warn!("Audio session {} failed: {}", step, e);
                    if let Some(ref observer) = self.observer {
                        observer.on_step_failed(step, &e);
                    }
                    report.record_failure(step, e);
                }
            }
        }

        if report.is_active() {
            let actual = self.manager.current_parameters();
            report.actual = Some(actual);
            self.log_outcome(&report);
        } else {
            log::error!(
                "Failed to configure audio session: {}",
                report
                    .first_failure()
                    .map(|f| f.error.to_string())
                    .unwrap_or_else(|| "session not activated".into())
            );
        }

        if let Some(ref observer) = self.observer {
            observer.on_configured(&report);
        }

        report
    }

    // --- Internal helpers ---

    fn should_skip(&self, report: &ConfigurationReport) -> bool {
        if report.failures.is_empty() {
            return false;
        }
        match self.policy {
            FailurePolicy::AbortOnFirstFailure => true,
            // An intent that failed validation is never sent to the OS.
            FailurePolicy::AttemptAll => {
                report.failed_steps().contains(&ConfigurationStep::Validate)
            }
        }
    }

    fn run_step(
        &mut self,
        step: ConfigurationStep,
        intent: &AudioSessionIntent,
    ) -> Result<(), SessionError> {
        match step {
            ConfigurationStep::Validate => intent.validate(),
            ConfigurationStep::Category => {
                self.manager
                    .set_category(intent.category, intent.mode, intent.options)
            }
            ConfigurationStep::BufferDuration => self
                .manager
                .set_preferred_io_buffer_duration(intent.preferred_io_buffer_duration_secs),
            ConfigurationStep::SampleRate => self
                .manager
                .set_preferred_sample_rate(intent.preferred_sample_rate_hz),
            ConfigurationStep::Activate => self.manager.set_active(true),
        }
    }

    fn log_outcome(&self, report: &ConfigurationReport) {
        let Some(actual) = report.actual else {
            return;
        };
        if report.is_success() {
            log::info!("Audio session configured:");
        } else {
            log::warn!(
                "Audio session active with partial settings (failed: {:?})",
                report.failed_steps()
            );
        }
        log::info!(
            "   - Preferred IO buffer duration: {} s",
            report.requested.preferred_io_buffer_duration_secs
        );
        for line in actual.to_string().lines() {
            log::info!("   - {}", line);
        }

        for deviation in report.deviations() {
            log::warn!("Audio session substituted a requested value: {:?}", deviation);
        }
    }
}
