// src/models/mod.rs

pub mod flight_event;
pub mod geo_anchor;
pub mod projected_point;
pub mod telemetry;

pub use flight_event::{AnchoredEvent, DisplayStyle, EventKey, FlightEvent};
pub use geo_anchor::{AnchorPair, GeoAnchor};
pub use projected_point::{GeoPosition, ProjectedPoint};
pub use telemetry::{FieldLayout, TelemetrySample, TelemetrySeries, DEFAULT_FIELDS};
