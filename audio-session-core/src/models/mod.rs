pub mod error;
pub mod intent;
pub mod parameters;
pub mod report;
