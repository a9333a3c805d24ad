// src/pipeline/event_anchor.rs

use tracing::{debug, warn};

use crate::math::error::{TrajectoryError, TrajectoryResult};
use crate::models::flight_event::{AnchoredEvent, DisplayStyle, FlightEvent};
use crate::models::projected_point::ProjectedPoint;

/// 頂点イベントの名前
pub const APOGEE_EVENT: &str = "apogee";

/// 時刻が最も近い点のインデックス (同差なら前の点)
pub fn nearest_index(points: &[ProjectedPoint], time: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, point) in points.iter().enumerate() {
        let diff = (point.time - time).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((i, diff)),
        }
    }
    best.map(|(i, _)| i)
}

/// 各イベントを系列上の最も近い点に対応付ける
///
/// 系列は変更しない。時刻が有限でないイベントは対応付けずに除外する。
///
/// # 引数
/// - `points`: 再サンプリング済みの点列
/// - `events`: 外部から与えられたイベント
///
/// # 戻り値
/// - イベントと解決済みインデックスの組 (入力順)
pub fn anchor_events(
    points: &[ProjectedPoint],
    events: &[FlightEvent],
) -> TrajectoryResult<Vec<AnchoredEvent>> {
    if points.is_empty() {
        return Err(TrajectoryError::EmptySeries);
    }

    let anchored: Vec<AnchoredEvent> = events
        .iter()
        .filter_map(|event| {
            if !event.time.is_finite() {
                warn!(name = %event.name, time = event.time, "時刻が不正なイベントを除外します");
                return None;
            }
            nearest_index(points, event.time).map(|resolved_index| AnchoredEvent {
                event: event.clone(),
                resolved_index,
            })
        })
        .collect();

    debug!(events = anchored.len(), "イベントを対応付けました");
    Ok(anchored)
}

/// 高度が最大の点 (同値なら最初の点) の時刻に頂点イベントを作る
pub fn derive_apogee(points: &[ProjectedPoint]) -> Option<FlightEvent> {
    let mut peak: Option<&ProjectedPoint> = None;
    for point in points {
        match peak {
            Some(p) if point.altitude_m <= p.altitude_m => {}
            _ => peak = Some(point),
        }
    }
    peak.map(|p| FlightEvent::new(APOGEE_EVENT, p.time).with_style(DisplayStyle::Pulse))
}

/// 現在インデックスまでに到達したイベント
pub fn visible_events(anchored: &[AnchoredEvent], current_index: usize) -> Vec<&AnchoredEvent> {
    anchored
        .iter()
        .filter(|a| a.is_visible(current_index))
        .collect()
}
