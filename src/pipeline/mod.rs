// src/pipeline/mod.rs

pub mod decode;
pub mod event_anchor;
pub mod parser;
pub mod projector;
pub mod resampler;

pub use decode::{decode_structured, decode_telemetry, StructuredDecodeError};
pub use event_anchor::{anchor_events, derive_apogee, nearest_index, visible_events, APOGEE_EVENT};
pub use parser::parse_legacy;
pub use projector::{project_series, GeodesicProjector};
pub use resampler::{resample, select_indices};
