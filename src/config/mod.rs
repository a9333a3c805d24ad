// src/config/mod.rs

pub mod parameters;
pub mod scenario;

pub use parameters::{AltitudeUnit, PipelineParameters, PlaybackParameters};
pub use scenario::Scenario;
