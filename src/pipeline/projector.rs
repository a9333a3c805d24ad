// src/pipeline/projector.rs

use tracing::{debug, warn};

use crate::math::error::TrajectoryResult;
use crate::math::geodesy::{destination_point, initial_bearing};
use crate::math::kinematics::planar_displacement;
use crate::models::geo_anchor::{AnchorPair, GeoAnchor};
use crate::models::projected_point::GeoPosition;
use crate::models::telemetry::{TelemetrySample, TelemetrySeries};

/// シミュレーション平面座標を地表の緯度・経度へ写像する
///
/// 発射地点から目標地点への方位角を一度だけ求め、各サンプルの平面変位をその方位に沿った
/// 大円距離として発射地点から進める。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicProjector {
    launch: GeoAnchor,
    bearing_deg: f64,
    radius_m: f64,
}

impl GeodesicProjector {
    /// # 引数
    /// - `anchors`: 発射・目標地点 (両方必須)
    /// - `radius_m`: 球の半径 (m)
    pub fn new(anchors: &AnchorPair, radius_m: f64) -> TrajectoryResult<Self> {
        let (launch, target) = anchors.require()?;
        let bearing_deg = initial_bearing(
            launch.latitude,
            launch.longitude,
            target.latitude,
            target.longitude,
        );
        Ok(Self {
            launch,
            bearing_deg,
            radius_m,
        })
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    /// 発射地点から `distance_m` 進んだ (緯度, 経度)
    pub fn locate(&self, distance_m: f64) -> (f64, f64) {
        destination_point(
            self.launch.latitude,
            self.launch.longitude,
            self.bearing_deg,
            distance_m,
            self.radius_m,
        )
    }

    /// 系列全体を投影する。出力はサンプルと同数・同順
    pub fn project(&self, series: &TelemetrySeries) -> Vec<GeoPosition> {
        let layout = series.layout();
        if layout.x.is_none() || layout.y.is_none() {
            warn!(
                source = series.source(),
                "x/y 列が無いため全点を発射地点に置きます"
            );
        }

        let coord = |sample: &TelemetrySample, column: Option<usize>| {
            column.and_then(|c| sample.get(c)).unwrap_or(0.0)
        };

        let Some(first) = series.samples().first() else {
            return Vec::new();
        };
        let x0 = coord(first, layout.x);
        let y0 = coord(first, layout.y);

        let positions: Vec<GeoPosition> = series
            .samples()
            .iter()
            .map(|sample| {
                let x = coord(sample, layout.x);
                let y = coord(sample, layout.y);
                let displacement_m = planar_displacement(x, y, x0, y0);
                let (latitude, longitude) = self.locate(displacement_m);
                GeoPosition {
                    latitude,
                    longitude,
                    displacement_m,
                    native_x: x,
                    native_y: y,
                }
            })
            .collect();

        debug!(
            source = series.source(),
            points = positions.len(),
            bearing_deg = self.bearing_deg,
            "系列を投影しました"
        );
        positions
    }
}

/// 系列を発射・目標地点に基づいて投影する
///
/// # 引数
/// - `series`: パース済みの系列
/// - `anchors`: 発射・目標地点
/// - `radius_m`: 球の半径 (m)
///
/// # 戻り値
/// - サンプルと1対1の投影位置。地点が未設定なら `MissingAnchor`
pub fn project_series(
    series: &TelemetrySeries,
    anchors: &AnchorPair,
    radius_m: f64,
) -> TrajectoryResult<Vec<GeoPosition>> {
    Ok(GeodesicProjector::new(anchors, radius_m)?.project(series))
}
