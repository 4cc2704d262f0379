//! Microphone record permission.
//!
//! Configuring a `PlayAndRecord` session succeeds without microphone
//! permission, but input streams then deliver silence. Hosts query this after
//! launch to tell the two apart.

use objc2_avf_audio::{AVAudioSession, AVAudioSessionRecordPermission};

/// Whether the user has allowed microphone access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPermission {
    /// The user has not been asked yet.
    Undetermined,
    Denied,
    Granted,
}

/// Current record permission for the shared session.
pub fn record_permission() -> RecordPermission {
    // SAFETY: Calling into system frameworks requires `unsafe`.
    let permission = unsafe { AVAudioSession::sharedInstance().recordPermission() };

    if permission == AVAudioSessionRecordPermission::Granted {
        RecordPermission::Granted
    } else if permission == AVAudioSessionRecordPermission::Denied {
        RecordPermission::Denied
    } else {
        if permission != AVAudioSessionRecordPermission::Undetermined {
            log::warn!("Unexpected record permission value: {:?}", permission);
        }
        RecordPermission::Undetermined
    }
}
