use std::fmt;

use serde::{Deserialize, Serialize};

/// Session parameters as realized by the OS after activation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionParameters {
    pub io_buffer_duration_secs: f64,
    pub sample_rate_hz: f64,
    pub input_latency_secs: f64,
    pub output_latency_secs: f64,
}

impl fmt::Display for SessionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IO buffer duration: {} s", self.io_buffer_duration_secs)?;
        writeln!(f, "Sample rate: {} Hz", self.sample_rate_hz)?;
        writeln!(f, "Input latency: {} s", self.input_latency_secs)?;
        write!(f, "Output latency: {} s", self.output_latency_secs)
    }
}
