// src/simulation/framework.rs

use std::time::Duration;

use tracing::{debug, info};

use crate::config::parameters::{PipelineParameters, PlaybackParameters};
use crate::math::error::{TrajectoryError, TrajectoryResult};
use crate::models::{AnchorPair, AnchoredEvent, FlightEvent, GeoAnchor, ProjectedPoint, TelemetrySeries};
use crate::pipeline::{anchor_events, derive_apogee, resample, visible_events, GeodesicProjector};
use crate::playback::{PlaybackScheduler, SeekOutcome, SessionToken, TickOutcome};
use crate::simulation::{Trajectory, TrajectorySession};

/// 系列から描画用の軌道を組み立てる
///
/// # 引数
/// - `series`: パース済みの系列
/// - `anchors`: 発射・目標地点 (両方必須)
/// - `events`: 外部から与えられたイベント
/// - `with_apogee`: 最高高度点から頂点イベントを追加するか
/// - `params`: 投影・再サンプリングのパラメータ
///
/// # 戻り値
/// - 点列と対応付け済みイベント
pub fn build_trajectory(
    series: &TelemetrySeries,
    anchors: &AnchorPair,
    events: &[FlightEvent],
    with_apogee: bool,
    params: &PipelineParameters,
) -> TrajectoryResult<Trajectory> {
    let projector = GeodesicProjector::new(anchors, params.earth_radius_m)?;
    let positions = projector.project(series);
    let points = resample(series, &positions, params)?;
    let anchored = anchor_with_apogee(&points, events, with_apogee)?;

    Ok(Trajectory {
        source: series.source().to_string(),
        bearing_deg: projector.bearing_deg(),
        points,
        events: anchored,
    })
}

fn anchor_with_apogee(
    points: &[ProjectedPoint],
    events: &[FlightEvent],
    with_apogee: bool,
) -> TrajectoryResult<Vec<AnchoredEvent>> {
    let mut all: Vec<FlightEvent> = events.to_vec();
    if with_apogee {
        all.extend(derive_apogee(points));
    }
    anchor_events(points, &all)
}

impl TrajectorySession {
    pub fn new(pipeline: PipelineParameters, playback: &PlaybackParameters) -> TrajectoryResult<Self> {
        Ok(Self {
            params: pipeline,
            series: None,
            anchors: AnchorPair::default(),
            events: Vec::new(),
            derive_apogee: true,
            trajectory: None,
            scheduler: PlaybackScheduler::new(playback)?,
            token: None,
        })
    }

    /// 新しい系列に差し替える
    pub fn load_series(&mut self, series: TelemetrySeries) -> TrajectoryResult<Option<SessionToken>> {
        info!(source = series.source(), samples = series.len(), "系列を読み込みました");
        self.series = Some(series);
        self.rebuild()
    }

    pub fn set_launch(&mut self, launch: GeoAnchor) -> TrajectoryResult<Option<SessionToken>> {
        self.anchors.launch = Some(launch);
        self.rebuild()
    }

    pub fn set_target(&mut self, target: GeoAnchor) -> TrajectoryResult<Option<SessionToken>> {
        self.anchors.target = Some(target);
        self.rebuild()
    }

    pub fn set_anchors(&mut self, anchors: AnchorPair) -> TrajectoryResult<Option<SessionToken>> {
        self.anchors = anchors;
        self.rebuild()
    }

    /// イベントを差し替えて対応付けだけやり直す (再生状態は保持)
    pub fn set_events(&mut self, events: Vec<FlightEvent>, with_apogee: bool) -> TrajectoryResult<()> {
        self.events = events;
        self.derive_apogee = with_apogee;
        if let Some(trajectory) = self.trajectory.as_mut() {
            trajectory.events = anchor_with_apogee(&trajectory.points, &self.events, with_apogee)?;
        }
        Ok(())
    }

    /// 以前の派生データと再生状態を破棄し、可能なら作り直す
    ///
    /// 系列または地点が揃っていなければ Idle のまま `Ok(None)` を返す。
    fn rebuild(&mut self) -> TrajectoryResult<Option<SessionToken>> {
        self.trajectory = None;
        self.token = None;
        self.scheduler.unload();

        let Some(series) = self.series.as_ref() else {
            return Ok(None);
        };
        if self.anchors.launch.is_none() || self.anchors.target.is_none() {
            debug!("発射・目標地点が揃うまで投影を保留します");
            return Ok(None);
        }

        let trajectory = build_trajectory(
            series,
            &self.anchors,
            &self.events,
            self.derive_apogee,
            &self.params,
        )?;
        let token = self.scheduler.load(trajectory.points.len())?;
        info!(
            source = %trajectory.source,
            points = trajectory.points.len(),
            events = trajectory.events.len(),
            bearing_deg = trajectory.bearing_deg,
            "軌道を構築しました"
        );
        self.trajectory = Some(trajectory);
        self.token = Some(token);
        Ok(Some(token))
    }

    /// 投影を要求する。地点が未設定なら `MissingAnchor`
    pub fn require_trajectory(&self) -> TrajectoryResult<&Trajectory> {
        if let Some(trajectory) = self.trajectory.as_ref() {
            return Ok(trajectory);
        }
        self.anchors.require()?;
        Err(TrajectoryError::EmptySeries)
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    // 再生状態の変更は以下の操作に限る。load/unload はセッション自身が管理する

    pub fn play(&mut self) -> TrajectoryResult<()> {
        self.scheduler.play()
    }

    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    pub fn seek(&mut self, index: usize) -> TrajectoryResult<SeekOutcome> {
        self.scheduler.seek(index)
    }

    pub fn seek_fraction(&mut self, fraction: f64) -> TrajectoryResult<SeekOutcome> {
        self.scheduler.seek_fraction(fraction)
    }

    pub fn set_rate(&mut self, multiplier: f64) -> TrajectoryResult<()> {
        self.scheduler.set_rate(multiplier)
    }

    pub fn reset(&mut self) -> TrajectoryResult<()> {
        self.scheduler.reset()
    }

    /// 現在インデックスの点
    pub fn current_point(&self) -> Option<&ProjectedPoint> {
        self.trajectory
            .as_ref()
            .and_then(|t| t.points.get(self.scheduler.current_index()))
    }

    /// 現在インデックスまでに到達したイベント
    pub fn visible_events(&self) -> Vec<&AnchoredEvent> {
        match self.trajectory.as_ref() {
            Some(t) => visible_events(&t.events, self.scheduler.current_index()),
            None => Vec::new(),
        }
    }

    pub fn tick(&mut self, token: SessionToken, elapsed: Duration) -> TickOutcome {
        self.scheduler.tick(token, elapsed)
    }
}
