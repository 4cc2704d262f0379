//! `AVAudioSession` backend.
//!
//! Wraps the process-wide shared session. Framework constants for categories
//! and modes are resolved at call time; a missing constant (older OS) is a
//! rejection of that step rather than a panic.

use objc2::rc::Retained;
use objc2_avf_audio::{
    AVAudioSession, AVAudioSessionCategory, AVAudioSessionCategoryAmbient,
    AVAudioSessionCategoryMultiRoute, AVAudioSessionCategoryOptions,
    AVAudioSessionCategoryPlayAndRecord, AVAudioSessionCategoryPlayback,
    AVAudioSessionCategoryRecord, AVAudioSessionCategorySoloAmbient, AVAudioSessionMode,
    AVAudioSessionModeDefault, AVAudioSessionModeGameChat, AVAudioSessionModeMeasurement,
    AVAudioSessionModeSpokenAudio, AVAudioSessionModeVideoChat, AVAudioSessionModeVoiceChat,
};
use objc2_foundation::NSError;

use audio_session_core::models::error::SessionError;
use audio_session_core::models::intent::{CategoryOptions, SessionCategory, SessionMode};
use audio_session_core::models::parameters::SessionParameters;
use audio_session_core::models::report::ConfigurationStep;
use audio_session_core::traits::session_manager::AudioSessionManager;

use crate::error_codes;

/// `AudioSessionManager` over `AVAudioSession.sharedInstance()`.
pub struct AvAudioSessionManager {
    session: Retained<AVAudioSession>,
}

// SAFETY: AVAudioSession is documented as thread-safe, and the shared
// instance lives for the whole process.
unsafe impl Send for AvAudioSessionManager {}

impl AvAudioSessionManager {
    /// Manager for the process-wide shared session.
    pub fn shared() -> Self {
        // SAFETY: Calling into system frameworks requires `unsafe`.
        let session = unsafe { AVAudioSession::sharedInstance() };
        Self { session }
    }
}

fn map_error(step: ConfigurationStep, error: Retained<NSError>) -> SessionError {
    #[allow(unused_unsafe)]
    // SAFETY: Plain property read on a framework error object.
    let code = unsafe { error.code() };
    error_codes::classify(step, code, format!("{error}"))
}

fn category_constant(
    category: SessionCategory,
) -> Option<&'static AVAudioSessionCategory> {
    // SAFETY: Reading framework-provided string constants.
    unsafe {
        match category {
            SessionCategory::Ambient => AVAudioSessionCategoryAmbient,
            SessionCategory::SoloAmbient => AVAudioSessionCategorySoloAmbient,
            SessionCategory::Playback => AVAudioSessionCategoryPlayback,
            SessionCategory::Record => AVAudioSessionCategoryRecord,
            SessionCategory::PlayAndRecord => AVAudioSessionCategoryPlayAndRecord,
            SessionCategory::MultiRoute => AVAudioSessionCategoryMultiRoute,
        }
    }
}

fn mode_constant(mode: SessionMode) -> Option<&'static AVAudioSessionMode> {
    // SAFETY: Reading framework-provided string constants.
    unsafe {
        match mode {
            SessionMode::Default => AVAudioSessionModeDefault,
            SessionMode::VoiceChat => AVAudioSessionModeVoiceChat,
            SessionMode::VideoChat => AVAudioSessionModeVideoChat,
            SessionMode::GameChat => AVAudioSessionModeGameChat,
            SessionMode::Measurement => AVAudioSessionModeMeasurement,
            SessionMode::SpokenAudio => AVAudioSessionModeSpokenAudio,
        }
    }
}

fn category_options(options: CategoryOptions) -> AVAudioSessionCategoryOptions {
    let mut flags = AVAudioSessionCategoryOptions::empty();
    if options.mix_with_others {
        flags |= AVAudioSessionCategoryOptions::MixWithOthers;
    }
    if options.duck_others {
        flags |= AVAudioSessionCategoryOptions::DuckOthers;
    }
    if options.allow_bluetooth {
        flags |= AVAudioSessionCategoryOptions::AllowBluetoothHFP;
    }
    if options.allow_bluetooth_a2dp {
        flags |= AVAudioSessionCategoryOptions::AllowBluetoothA2DP;
    }
    if options.allow_air_play {
        flags |= AVAudioSessionCategoryOptions::AllowAirPlay;
    }
    if options.default_to_speaker {
        flags |= AVAudioSessionCategoryOptions::DefaultToSpeaker;
    }
    flags
}

impl AudioSessionManager for AvAudioSessionManager {
    fn set_category(
        &mut self,
        category: SessionCategory,
        mode: SessionMode,
        options: CategoryOptions,
    ) -> Result<(), SessionError> {
        let step = ConfigurationStep::Category;
        let av_category = category_constant(category)
            .ok_or_else(|| SessionError::rejected(step, format!("category {category} unavailable")))?;
        let av_mode = mode_constant(mode)
            .ok_or_else(|| SessionError::rejected(step, format!("mode {mode} unavailable")))?;

        log::debug!(
            "AVAudioSession setCategory {} mode {} options {:?}",
            category,
            mode,
            options.enabled()
        );
        // SAFETY: Calling into system frameworks requires `unsafe`.
        unsafe {
            self.session
                .setCategory_mode_options_error(av_category, av_mode, category_options(options))
                .map_err(|e| map_error(step, e))
        }
    }

    fn set_preferred_io_buffer_duration(&mut self, secs: f64) -> Result<(), SessionError> {
        // SAFETY: Calling into system frameworks requires `unsafe`.
        unsafe {
            self.session
                .setPreferredIOBufferDuration_error(secs)
                .map_err(|e| map_error(ConfigurationStep::BufferDuration, e))
        }
    }

    fn set_preferred_sample_rate(&mut self, hz: f64) -> Result<(), SessionError> {
        // SAFETY: Calling into system frameworks requires `unsafe`.
        unsafe {
            self.session
                .setPreferredSampleRate_error(hz)
                .map_err(|e| map_error(ConfigurationStep::SampleRate, e))
        }
    }

    fn set_active(&mut self, active: bool) -> Result<(), SessionError> {
        // SAFETY: Calling into system frameworks requires `unsafe`.
        unsafe {
            self.session
                .setActive_error(active)
                .map_err(|e| map_error(ConfigurationStep::Activate, e))
        }
    }

    fn current_parameters(&self) -> SessionParameters {
        // SAFETY: Read-only property getters on the shared session.
        unsafe {
            SessionParameters {
                io_buffer_duration_secs: self.session.IOBufferDuration(),
                sample_rate_hz: self.session.sampleRate(),
                input_latency_secs: self.session.inputLatency(),
                output_latency_secs: self.session.outputLatency(),
            }
        }
    }

    fn name(&self) -> &str {
        "AVAudioSession"
    }
}
