// src/simulation/mod.rs

pub mod csv;
pub mod framework;
pub mod load_parameters;

use crate::config::parameters::PipelineParameters;
use crate::models::{AnchorPair, AnchoredEvent, FlightEvent, ProjectedPoint, TelemetrySeries};
use crate::playback::{PlaybackScheduler, SessionToken};

/// 投影・再サンプリング・イベント対応付けまで済んだ軌道
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub source: String,
    pub bearing_deg: f64,
    pub points: Vec<ProjectedPoint>,
    pub events: Vec<AnchoredEvent>,
}

impl Trajectory {
    /// イベントが対応付けられた点
    pub fn event_point(&self, anchored: &AnchoredEvent) -> Option<&ProjectedPoint> {
        self.points.get(anchored.resolved_index)
    }
}

/// 単一の再生セッション
///
/// 系列または発射・目標地点が変わると派生データと再生状態をまとめて作り直す。
pub struct TrajectorySession {
    params: PipelineParameters,
    series: Option<TelemetrySeries>,
    anchors: AnchorPair,
    events: Vec<FlightEvent>,
    derive_apogee: bool,
    trajectory: Option<Trajectory>,
    scheduler: PlaybackScheduler,
    token: Option<SessionToken>,
}
