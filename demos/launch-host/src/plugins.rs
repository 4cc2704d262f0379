use audio_session_core::{LaunchOptions, PluginRegistrant};

/// Registers a fixed list of named capability handlers.
pub struct HostPlugins {
    names: Vec<String>,
    registered: Vec<String>,
}

impl HostPlugins {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            registered: Vec::new(),
        }
    }

    pub fn registered(&self) -> &[String] {
        &self.registered
    }
}

impl PluginRegistrant for HostPlugins {
    fn register(&mut self, options: &LaunchOptions) {
        for name in &self.names {
            log::info!("Registered plugin {} ({} launch option(s))", name, options.len());
            self.registered.push(name.clone());
        }
    }
}
