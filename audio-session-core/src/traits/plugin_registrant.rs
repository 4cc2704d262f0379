use crate::session::launch::LaunchOptions;

/// Registers the application's capability handlers at launch.
///
/// Behavior is opaque to this crate: it is called exactly once per launch,
/// after the audio session has been configured.
pub trait PluginRegistrant {
    fn register(&mut self, options: &LaunchOptions);
}

/// Registrant for hosts without plugins.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlugins;

impl PluginRegistrant for NoPlugins {
    fn register(&mut self, _options: &LaunchOptions) {}
}
