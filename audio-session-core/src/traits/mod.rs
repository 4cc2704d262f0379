pub mod plugin_registrant;
pub mod session_manager;
pub mod session_observer;
