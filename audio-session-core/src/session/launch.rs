use std::collections::HashMap;

use crate::models::report::ConfigurationReport;
use crate::session::configurator::AudioSessionConfigurator;
use crate::traits::plugin_registrant::PluginRegistrant;
use crate::traits::session_manager::AudioSessionManager;

/// Options the platform passed to the launching application.
pub type LaunchOptions = HashMap<String, serde_json::Value>;

/// The application's earliest launch hook.
///
/// Configures the audio session before anything else runs, then hands off to
/// the plugin registrant. Whatever happens to the audio session, launch
/// proceeds.
pub struct LaunchSequence<M: AudioSessionManager, P: PluginRegistrant> {
    configurator: AudioSessionConfigurator<M>,
    plugins: P,
    last_report: Option<ConfigurationReport>,
}

impl<M: AudioSessionManager, P: PluginRegistrant> LaunchSequence<M, P> {
    pub fn new(configurator: AudioSessionConfigurator<M>, plugins: P) -> Self {
        Self {
            configurator,
            plugins,
            last_report: None,
        }
    }

    /// Run the launch hook. Always returns `true` (proceed with launch).
    pub fn did_finish_launching(&mut self, options: &LaunchOptions) -> bool {
        let report = self.configurator.configure();
        if report.is_degraded() {
            log::warn!(
                "Continuing launch with degraded audio session ({} failed step(s), duplex={})",
                report.failures.len(),
                report.duplex
            );
        }
        self.last_report = Some(report);

        log::debug!("Registering plugins ({} launch option(s))", options.len());
        self.plugins.register(options);

        true
    }

    /// Report from the most recent launch, if any.
    pub fn last_report(&self) -> Option<&ConfigurationReport> {
        self.last_report.as_ref()
    }

    pub fn configurator(&self) -> &AudioSessionConfigurator<M> {
        &self.configurator
    }

    pub fn plugins(&self) -> &P {
        &self.plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::error::SessionError;
    use crate::models::report::{ConfigurationStep, FailurePolicy};
    use crate::session::simulated::{SessionCall, SimulatedSessionManager};
    use crate::traits::plugin_registrant::NoPlugins;

    /// Plugin that opens a recording stream as soon as it is registered.
    struct RecorderPlugin {
        session: SimulatedSessionManager,
        opened: Option<Result<(), SessionError>>,
        options_seen: usize,
    }

    impl PluginRegistrant for RecorderPlugin {
        fn register(&mut self, options: &LaunchOptions) {
            self.options_seen = options.len();
            self.opened = Some(self.session.open_input_stream());
        }
    }

    fn recorder(session: &SimulatedSessionManager) -> RecorderPlugin {
        RecorderPlugin {
            session: session.clone(),
            opened: None,
            options_seen: 0,
        }
    }

    #[test]
    fn launch_proceeds_for_every_failure() {
        for step in [
            ConfigurationStep::Category,
            ConfigurationStep::BufferDuration,
            ConfigurationStep::SampleRate,
            ConfigurationStep::Activate,
        ] {
            for policy in [FailurePolicy::AbortOnFirstFailure, FailurePolicy::AttemptAll] {
                let session = SimulatedSessionManager::new();
                session.fail_on(step, SessionError::rejected(step, "injected"));
                let configurator = AudioSessionConfigurator::new(session).with_policy(policy);
                let mut launch = LaunchSequence::new(configurator, NoPlugins);

                assert!(launch.did_finish_launching(&LaunchOptions::new()));
                let failed = launch.last_report().and_then(|r| r.first_failure());
                assert_eq!(failed.map(|f| f.step), Some(step));
            }
        }
    }

    #[test]
    fn session_is_configured_before_plugins_open_streams() {
        let session = SimulatedSessionManager::new();
        let configurator = AudioSessionConfigurator::new(session.clone());
        let mut launch = LaunchSequence::new(configurator, recorder(&session));

        assert!(launch.did_finish_launching(&LaunchOptions::new()));

        assert_eq!(launch.plugins().opened, Some(Ok(())));
        let calls = session.calls();
        let opened_at = calls
            .iter()
            .position(|c| *c == SessionCall::OpenInputStream)
            .unwrap();
        let activated_at = calls
            .iter()
            .position(|c| *c == SessionCall::SetActive(true))
            .unwrap();
        assert!(activated_at < opened_at);
    }

    #[test]
    fn stream_opened_before_configuration_fails() {
        let session = SimulatedSessionManager::new();
        let mut early = recorder(&session);

        early.register(&LaunchOptions::new());

        assert!(matches!(early.opened, Some(Err(SessionError::SessionUnavailable(_)))));
    }

    #[test]
    fn plugins_register_even_when_audio_fails() {
        let session = SimulatedSessionManager::new();
        session.fail_on(
            ConfigurationStep::Activate,
            SessionError::ActivationFailed("held by phone call".into()),
        );
        let configurator = AudioSessionConfigurator::new(session.clone());
        let mut launch = LaunchSequence::new(configurator, recorder(&session));
        let options = LaunchOptions::from([("url".to_string(), serde_json::json!("app://open"))]);

        assert!(launch.did_finish_launching(&options));

        assert_eq!(launch.plugins().options_seen, 1);
        assert!(matches!(launch.plugins().opened, Some(Err(_))));
        assert!(!launch.last_report().unwrap().is_success());
    }

    #[test]
    fn relaunch_replaces_report() {
        let session = SimulatedSessionManager::new();
        let configurator = AudioSessionConfigurator::new(session.clone());
        let mut launch = LaunchSequence::new(configurator, NoPlugins);
        assert!(launch.last_report().is_none());

        session.fail_on(
            ConfigurationStep::Category,
            SessionError::rejected(ConfigurationStep::Category, "busy"),
        );
        assert!(launch.did_finish_launching(&LaunchOptions::new()));
        assert!(!launch.last_report().unwrap().is_success());

        session.clear_failures();
        assert!(launch.did_finish_launching(&LaunchOptions::new()));
        assert!(launch.last_report().unwrap().is_success());
    }
}
