//! # audio-session-ios
//!
//! iOS `AVAudioSession` backend for audio-session-core.
//!
//! Provides:
//! - `AvAudioSessionManager` — `AudioSessionManager` over `AVAudioSession.sharedInstance()`
//! - `permissions` — microphone record permission query
//! - `error_codes` — classification of `AVAudioSessionErrorCode` values
//!
//! ## Usage
//! ```ignore
//! use audio_session_core::{AudioSessionConfigurator, LaunchOptions, LaunchSequence, NoPlugins};
//! use audio_session_ios::AvAudioSessionManager;
//!
//! let configurator = AudioSessionConfigurator::new(AvAudioSessionManager::shared());
//! let mut launch = LaunchSequence::new(configurator, NoPlugins);
//! launch.did_finish_launching(&LaunchOptions::new());
//! ```

pub mod error_codes;

#[cfg(target_os = "ios")]
pub mod av_session;
#[cfg(target_os = "ios")]
pub mod permissions;

#[cfg(target_os = "ios")]
pub use av_session::AvAudioSessionManager;
#[cfg(target_os = "ios")]
pub use permissions::{record_permission, RecordPermission};
