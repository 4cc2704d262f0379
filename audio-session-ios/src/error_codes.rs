//! `AVAudioSessionErrorCode` values and their mapping onto `SessionError`.
//!
//! The codes are four-character codes packed big-endian into an integer.
//! Kept platform-independent so the mapping is testable off-device.

use audio_session_core::models::error::SessionError;
use audio_session_core::models::report::ConfigurationStep;

const fn fourcc(code: &[u8; 4]) -> isize {
    u32::from_be_bytes(*code) as isize
}

/// `'!act'`: another app with higher priority holds the session.
pub const IS_BUSY: isize = fourcc(b"!act");
/// `'!int'`: a non-mixable session cannot interrupt others.
pub const CANNOT_INTERRUPT_OTHERS: isize = fourcc(b"!int");
/// `'!cat'`: the category does not allow the requested operation.
pub const INCOMPATIBLE_CATEGORY: isize = fourcc(b"!cat");
/// `'!pri'`: the app lacks a required entitlement or permission.
pub const INSUFFICIENT_PRIORITY: isize = fourcc(b"!pri");
/// `'msrv'`: the media server died.
pub const MEDIA_SERVICES_FAILED: isize = fourcc(b"msrv");
/// `'!res'`: resources (e.g. hardware) are not available.
pub const RESOURCE_NOT_AVAILABLE: isize = fourcc(b"!res");
/// `kAudio_ParamError`: a requested value is out of range.
pub const BAD_PARAM: isize = -50;

/// Map an `NSError` from one of the configuration steps to a `SessionError`.
pub fn classify(step: ConfigurationStep, code: isize, description: String) -> SessionError {
    match code {
        MEDIA_SERVICES_FAILED | RESOURCE_NOT_AVAILABLE => {
            SessionError::SessionUnavailable(description)
        }
        IS_BUSY | CANNOT_INTERRUPT_OTHERS | INSUFFICIENT_PRIORITY
            if step == ConfigurationStep::Activate =>
        {
            SessionError::SessionUnavailable(description)
        }
        _ if step == ConfigurationStep::Activate => SessionError::ActivationFailed(description),
        _ => SessionError::rejected(step, description),
    }
}
