//! In-memory audio session.
//!
//! Stands in for the OS session on hosts without one and in tests. Failures
//! can be injected per step, the granted values can differ from the requested
//! ones, and every call is recorded in order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::SessionError;
use crate::models::intent::{CategoryOptions, SessionCategory, SessionMode};
use crate::models::parameters::SessionParameters;
use crate::models::report::ConfigurationStep;
use crate::traits::session_manager::AudioSessionManager;

/// Hardware rate reported before any preference is set.
const HARDWARE_SAMPLE_RATE_HZ: f64 = 48000.0;

/// Buffer duration reported before any preference is set (1024 frames).
const HARDWARE_IO_BUFFER_DURATION_SECS: f64 = 1024.0 / HARDWARE_SAMPLE_RATE_HZ;

/// A call made against the simulated session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    SetCategory {
        category: SessionCategory,
        mode: SessionMode,
        options: CategoryOptions,
    },
    SetPreferredIoBufferDuration(f64),
    SetPreferredSampleRate(f64),
    SetActive(bool),
    ReadParameters,
    OpenInputStream,
}

#[derive(Default)]
struct SimulatedState {
    category: Option<SessionCategory>,
    preferred_io_buffer_duration: Option<f64>,
    preferred_sample_rate: Option<f64>,
    active: bool,
    granted_io_buffer_duration: Option<f64>,
    granted_sample_rate: Option<f64>,
    input_latency: f64,
    output_latency: f64,
    failures: HashMap<ConfigurationStep, SessionError>,
    calls: Vec<SessionCall>,
}

impl SimulatedState {
    fn attempt(&mut self, call: SessionCall, step: ConfigurationStep) -> Result<(), SessionError> {
        self.calls.push(call);
        match self.failures.get(&step) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Simulated OS audio session. Clones share the same session.
#[derive(Clone, Default)]
pub struct SimulatedSessionManager {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future request for `step` fail with `error`.
    pub fn fail_on(&self, step: ConfigurationStep, error: SessionError) -> &Self {
        self.state.lock().failures.insert(step, error);
        self
    }

    pub fn clear_failures(&self) -> &Self {
        self.state.lock().failures.clear();
        self
    }

    /// Report `hz` as the active sample rate regardless of the preference.
    pub fn grant_sample_rate(&self, hz: f64) -> &Self {
        self.state.lock().granted_sample_rate = Some(hz);
        self
    }

    /// Report `secs` as the active buffer duration regardless of the preference.
    pub fn grant_io_buffer_duration(&self, secs: f64) -> &Self {
        self.state.lock().granted_io_buffer_duration = Some(secs);
        self
    }

    pub fn grant_latencies(&self, input_secs: f64, output_secs: f64) -> &Self {
        let mut s = self.state.lock();
        s.input_latency = input_secs;
        s.output_latency = output_secs;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Open an input stream the way a recorder elsewhere in the app would.
    ///
    /// Fails unless the session is active with a category that can record.
    pub fn open_input_stream(&self) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.calls.push(SessionCall::OpenInputStream);
        if !s.active {
            return Err(SessionError::SessionUnavailable("session is not active".into()));
        }
        match s.category {
            Some(SessionCategory::Record | SessionCategory::PlayAndRecord | SessionCategory::MultiRoute) => {
                Ok(())
            }
            other => Err(SessionError::SessionUnavailable(format!(
                "category {other:?} does not allow recording"
            ))),
        }
    }
}

impl AudioSessionManager for SimulatedSessionManager {
    fn set_category(
        &mut self,
        category: SessionCategory,
        mode: SessionMode,
        options: CategoryOptions,
    ) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.attempt(
            SessionCall::SetCategory {
                category,
                mode,
                options,
            },
            ConfigurationStep::Category,
        )?;
        s.category = Some(category);
        Ok(())
    }

    fn set_preferred_io_buffer_duration(&mut self, secs: f64) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.attempt(
            SessionCall::SetPreferredIoBufferDuration(secs),
            ConfigurationStep::BufferDuration,
        )?;
        s.preferred_io_buffer_duration = Some(secs);
        Ok(())
    }

    fn set_preferred_sample_rate(&mut self, hz: f64) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.attempt(SessionCall::SetPreferredSampleRate(hz), ConfigurationStep::SampleRate)?;
        s.preferred_sample_rate = Some(hz);
        Ok(())
    }

    fn set_active(&mut self, active: bool) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.attempt(SessionCall::SetActive(active), ConfigurationStep::Activate)?;
        s.active = active;
        Ok(())
    }

    fn current_parameters(&self) -> SessionParameters {
        let mut s = self.state.lock();
        s.calls.push(SessionCall::ReadParameters);
        SessionParameters {
            io_buffer_duration_secs: s
                .granted_io_buffer_duration
                .or(s.preferred_io_buffer_duration)
                .unwrap_or(HARDWARE_IO_BUFFER_DURATION_SECS),
            sample_rate_hz: s
                .granted_sample_rate
                .or(s.preferred_sample_rate)
                .unwrap_or(HARDWARE_SAMPLE_RATE_HZ),
            input_latency_secs: s.input_latency,
            output_latency_secs: s.output_latency,
        }
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_hardware_defaults_before_configuration() {
        let session = SimulatedSessionManager::new();
        let params = session.current_parameters();

        assert_eq!(params.sample_rate_hz, 48000.0);
        assert_eq!(params.io_buffer_duration_secs, 1024.0 / 48000.0);
        assert!(!session.is_active());
    }

    #[test]
    fn granted_values_override_preferences() {
        let mut session = SimulatedSessionManager::new();
        session.grant_sample_rate(44100.0);

        session.set_preferred_sample_rate(16000.0).unwrap();
        session.set_preferred_io_buffer_duration(0.003).unwrap();

        let params = session.current_parameters();
        assert_eq!(params.sample_rate_hz, 44100.0);
        assert_eq!(params.io_buffer_duration_secs, 0.003);
    }

    #[test]
    fn injected_failure_leaves_state_untouched() {
        let mut session = SimulatedSessionManager::new();
        session.fail_on(
            ConfigurationStep::Activate,
            SessionError::ActivationFailed("busy".into()),
        );

        assert!(session.set_active(true).is_err());
        assert!(!session.is_active());
        assert_eq!(session.calls(), vec![SessionCall::SetActive(true)]);

        session.clear_failures();
        session.set_active(true).unwrap();
        assert!(session.is_active());
    }

    #[test]
    fn clones_share_the_session() {
        let mut session = SimulatedSessionManager::new();
        let observer = session.clone();

        session.set_active(true).unwrap();

        assert!(observer.is_active());
        assert_eq!(observer.calls(), vec![SessionCall::SetActive(true)]);
    }

    #[test]
    fn input_stream_needs_active_recording_category() {
        let mut session = SimulatedSessionManager::new();
        assert!(session.open_input_stream().is_err());

        session
            .set_category(SessionCategory::Playback, SessionMode::Default, CategoryOptions::NONE)
            .unwrap();
        session.set_active(true).unwrap();
        assert!(session.open_input_stream().is_err());

        session
            .set_category(
                SessionCategory::PlayAndRecord,
                SessionMode::VoiceChat,
                CategoryOptions::default(),
            )
            .unwrap();
        assert!(session.open_input_stream().is_ok());
    }
}
