pub mod configurator;
pub mod launch;
pub mod simulated;
