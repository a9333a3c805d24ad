// src/lib.rs

//! 飛行シミュレーションのテレメトリを地表座標の点列に変換し、実時間で再生するためのコア。

pub mod config;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod playback;
pub mod simulation;

pub use math::error::{AnchorRole, MalformedTelemetry, OutOfRangeSeek, TrajectoryError, TrajectoryResult};
pub use models::{AnchorPair, AnchoredEvent, FlightEvent, GeoAnchor, ProjectedPoint, TelemetrySeries};
pub use playback::{PlaybackScheduler, PlaybackStatus, SeekOutcome, SessionToken, TickOutcome};
pub use simulation::{Trajectory, TrajectorySession};
