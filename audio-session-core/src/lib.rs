//! # audio-session-core
//!
//! Platform-agnostic audio session configuration.
//!
//! Describes the low-latency, simultaneous record/playback session an
//! application wants at launch, pushes it to the operating system through the
//! `AudioSessionManager` trait and reports what the OS actually granted.
//! Platform backends (iOS `AVAudioSession`) implement the trait and plug into
//! the generic `AudioSessionConfigurator`.
//!
//! ## Architecture
//!
//! ```text
//! audio-session-core (this crate)
//! ├── traits/   ← AudioSessionManager, SessionObserver, PluginRegistrant
//! ├── models/   ← AudioSessionIntent, SessionParameters, ConfigurationReport, SessionError
//! └── session/  ← AudioSessionConfigurator, LaunchSequence, SimulatedSessionManager
//! ```

pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::error::SessionError;
pub use models::intent::{AudioSessionIntent, CategoryOptions, SessionCategory, SessionMode};
pub use models::parameters::SessionParameters;
pub use models::report::{ConfigurationReport, ConfigurationStep, Deviation, FailurePolicy, StepFailure};
pub use session::configurator::AudioSessionConfigurator;
pub use session::launch::{LaunchOptions, LaunchSequence};
pub use session::simulated::{SessionCall, SimulatedSessionManager};
pub use traits::plugin_registrant::{NoPlugins, PluginRegistrant};
pub use traits::session_manager::AudioSessionManager;
pub use traits::session_observer::SessionObserver;
