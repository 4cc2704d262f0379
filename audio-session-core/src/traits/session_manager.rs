use crate::models::error::SessionError;
use crate::models::intent::{CategoryOptions, SessionCategory, SessionMode};
use crate::models::parameters::SessionParameters;

/// Interface to the process-wide OS audio session.
///
/// Implemented by:
/// - `AvAudioSessionManager` (iOS, `AVAudioSession.sharedInstance()`)
/// - `SimulatedSessionManager` (in-memory, for tests and non-iOS hosts)
///
/// Every setter is a preference; the OS may accept it and still substitute a
/// nearby value. `current_parameters` is the only source of truth for what
/// was granted.
pub trait AudioSessionManager: Send {
    /// Request category, mode and routing options in one call.
    fn set_category(
        &mut self,
        category: SessionCategory,
        mode: SessionMode,
        options: CategoryOptions,
    ) -> Result<(), SessionError>;

    fn set_preferred_io_buffer_duration(&mut self, secs: f64) -> Result<(), SessionError>;

    fn set_preferred_sample_rate(&mut self, hz: f64) -> Result<(), SessionError>;

    /// Activate or deactivate the session.
    fn set_active(&mut self, active: bool) -> Result<(), SessionError>;

    /// Read the parameters the OS is currently running with.
    fn current_parameters(&self) -> SessionParameters;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
