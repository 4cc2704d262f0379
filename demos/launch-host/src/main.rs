mod observer;
mod plugins;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use audio_session_core::{
    AudioSessionConfigurator, AudioSessionIntent, AudioSessionManager, FailurePolicy,
    LaunchOptions, LaunchSequence,
};

use observer::TelemetryObserver;
use plugins::HostPlugins;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Abort,
    AttemptAll,
}

impl From<Policy> for FailurePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Abort => FailurePolicy::AbortOnFirstFailure,
            Policy::AttemptAll => FailurePolicy::AttemptAll,
        }
    }
}

#[cfg(not(target_os = "ios"))]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Step {
    Category,
    BufferDuration,
    SampleRate,
    Activate,
}

#[cfg(not(target_os = "ios"))]
impl From<Step> for audio_session_core::ConfigurationStep {
    fn from(step: Step) -> Self {
        use audio_session_core::ConfigurationStep;
        match step {
            Step::Category => ConfigurationStep::Category,
            Step::BufferDuration => ConfigurationStep::BufferDuration,
            Step::SampleRate => ConfigurationStep::SampleRate,
            Step::Activate => ConfigurationStep::Activate,
        }
    }
}

/// Runs the application launch hook and prints the audio session report.
#[derive(Debug, Parser)]
#[command(name = "launch-host", version)]
struct Args {
    /// JSON file overriding the default session intent
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "abort")]
    policy: Policy,

    /// Launch option passed to plugins, as key=value
    #[arg(long = "option", value_parser = parse_option)]
    options: Vec<(String, String)>,

    /// Plugins to register after the audio session is configured
    #[arg(long = "plugin")]
    plugins: Vec<String>,

    /// Simulated session: fail this step
    #[cfg(not(target_os = "ios"))]
    #[arg(long, value_enum)]
    fail: Vec<Step>,

    /// Simulated session: sample rate the OS grants
    #[cfg(not(target_os = "ios"))]
    #[arg(long)]
    grant_sample_rate: Option<f64>,

    /// Simulated session: buffer duration the OS grants, in seconds
    #[cfg(not(target_os = "ios"))]
    #[arg(long)]
    grant_buffer_duration: Option<f64>,

    /// Simulated session: input and output latency, in seconds
    #[cfg(not(target_os = "ios"))]
    #[arg(long, num_args = 2, value_names = ["INPUT", "OUTPUT"])]
    latencies: Option<Vec<f64>>,
}

fn parse_option(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let intent = match &args.config {
        Some(path) => AudioSessionIntent::from_json_file(path)
            .with_context(|| format!("loading intent from {}", path.display()))?,
        None => AudioSessionIntent::default(),
    };

    launch(intent, &args)
}

#[cfg(target_os = "ios")]
fn launch(intent: AudioSessionIntent, args: &Args) -> Result<()> {
    let manager = audio_session_ios::AvAudioSessionManager::shared();
    run(manager, intent, args)?;
    log::info!("Record permission: {:?}", audio_session_ios::record_permission());
    Ok(())
}

#[cfg(not(target_os = "ios"))]
fn launch(intent: AudioSessionIntent, args: &Args) -> Result<()> {
    run(simulated_session(args), intent, args)
}

#[cfg(not(target_os = "ios"))]
fn simulated_session(args: &Args) -> audio_session_core::SimulatedSessionManager {
    use audio_session_core::ConfigurationStep;

    let session = audio_session_core::SimulatedSessionManager::new();
    for step in &args.fail {
        let step = ConfigurationStep::from(*step);
        let error = match step {
            ConfigurationStep::Activate => {
                audio_session_core::SessionError::ActivationFailed("injected by --fail".into())
            }
            _ => audio_session_core::SessionError::rejected(step, "injected by --fail"),
        };
        session.fail_on(step, error);
    }
    if let Some(hz) = args.grant_sample_rate {
        session.grant_sample_rate(hz);
    }
    if let Some(secs) = args.grant_buffer_duration {
        session.grant_io_buffer_duration(secs);
    }
    if let Some([input, output]) = args.latencies.as_deref() {
        session.grant_latencies(*input, *output);
    }
    session
}

fn run<M: AudioSessionManager>(manager: M, intent: AudioSessionIntent, args: &Args) -> Result<()> {
    let mut configurator = AudioSessionConfigurator::new(manager)
        .with_intent(intent)
        .with_policy(args.policy.into());
    configurator.set_observer(Arc::new(TelemetryObserver));

    let mut launch = LaunchSequence::new(configurator, HostPlugins::new(args.plugins.clone()));
    let configured = launch.configurator();
    log::info!(
        "Launching with {} session ({:?}): {:?}",
        configured.manager().name(),
        configured.policy(),
        configured.intent()
    );
    let options: LaunchOptions = args
        .options
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();

    let proceed = launch.did_finish_launching(&options);
    log::info!(
        "Launch {} with {} plugin(s)",
        if proceed { "proceeding" } else { "halted" },
        launch.plugins().registered().len()
    );

    if let Some(report) = launch.last_report() {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_option_splits_on_first_equals() {
        assert_eq!(
            parse_option("url=app://open?a=b"),
            Ok(("url".to_string(), "app://open?a=b".to_string()))
        );
        assert_eq!(parse_option("empty="), Ok(("empty".to_string(), String::new())));
    }

    #[test]
    fn parse_option_requires_equals() {
        let err = parse_option("no-separator").unwrap_err();
        assert_eq!(err, "expected key=value, got no-separator");
    }

    #[test]
    fn cli_rejects_malformed_option() {
        let result = Args::try_parse_from(["launch-host", "--option", "broken"]);
        assert!(result.is_err());

        let args =
            Args::try_parse_from(["launch-host", "--option", "k=v", "--plugin", "mic"]).unwrap();
        assert_eq!(args.options, vec![("k".to_string(), "v".to_string())]);
        assert_eq!(args.plugins, vec!["mic".to_string()]);
    }
}
