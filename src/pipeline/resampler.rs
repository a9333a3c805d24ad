// src/pipeline/resampler.rs

use tracing::debug;

use crate::config::parameters::PipelineParameters;
use crate::math::error::{TrajectoryError, TrajectoryResult};
use crate::math::kinematics::{flight_path_angle_deg, normalize_altitude, total_speed};
use crate::models::projected_point::{GeoPosition, ProjectedPoint};
use crate::models::telemetry::TelemetrySeries;

/// 周期の倍数との比較に用いる相対許容誤差
const CADENCE_TOLERANCE: f64 = 1e-9;

/// 一定周期で残すサンプルのインデックスを選ぶ
///
/// 各サンプルの時刻 (先頭からの相対時刻) が次の周期の倍数に達した最初のサンプルを残す。
/// 補間は行わない。
///
/// # 引数
/// - `times`: 単調非減少の時刻列
/// - `cadence`: 周期 (正の有限値)
///
/// # 戻り値
/// - 残すインデックス (昇順)。先頭は必ず含む
pub fn select_indices(times: &[f64], cadence: f64) -> Vec<usize> {
    let Some(&t0) = times.first() else {
        return Vec::new();
    };
    let tol = cadence * CADENCE_TOLERANCE;
    let mut next_mark = 0.0;
    let mut kept = Vec::new();

    for (i, &t) in times.iter().enumerate() {
        let rel = t - t0;
        if rel + tol >= next_mark {
            kept.push(i);
            next_mark = ((rel + tol) / cadence).floor() * cadence + cadence;
        }
    }
    kept
}

/// 投影済み系列を一定周期に間引き、派生量を計算する
///
/// # 引数
/// - `series`: 元の系列
/// - `positions`: `series` と1対1の投影位置
/// - `params`: 周期・高度単位などのパラメータ
///
/// # 戻り値
/// - 描画用の点列。先頭点の時刻は 0
pub fn resample(
    series: &TelemetrySeries,
    positions: &[GeoPosition],
    params: &PipelineParameters,
) -> TrajectoryResult<Vec<ProjectedPoint>> {
    if series.is_empty() {
        return Err(TrajectoryError::EmptySeries);
    }
    if positions.len() != series.len() {
        return Err(TrajectoryError::InvalidParameter(format!(
            "投影位置の数 {} が系列長 {} と一致しません",
            positions.len(),
            series.len()
        )));
    }
    if !params.cadence.is_finite() || params.cadence <= 0.0 {
        return Err(TrajectoryError::InvalidParameter(format!(
            "cadence は正の値である必要があります: {}",
            params.cadence
        )));
    }

    let layout = series.layout();
    let samples = series.samples();

    // time 列が無い系列は全サンプルを残し、順番を時刻として扱う
    let (indices, times): (Vec<usize>, Vec<f64>) = match layout.time {
        Some(column) => {
            let raw: Vec<f64> = samples.iter().map(|s| s.get(column).unwrap_or(0.0)).collect();
            let t0 = raw[0];
            let indices = select_indices(&raw, params.cadence);
            let times: Vec<f64> = indices.iter().map(|&i| raw[i] - t0).collect();
            (indices, times)
        }
        None => ((0..samples.len()).collect(), (0..samples.len()).map(|i| i as f64).collect()),
    };

    let points: Vec<ProjectedPoint> = indices
        .iter()
        .zip(times)
        .map(|(&i, time)| {
            let sample = &samples[i];
            let value = |column: Option<usize>| column.and_then(|c| sample.get(c)).unwrap_or(0.0);
            let (vx, vy, vz) = (value(layout.vx), value(layout.vy), value(layout.vz));
            let position = &positions[i];
            // alt 列は単位が曖昧なので正規化する。z 列は位置座標 (m) なのでそのまま使う
            let altitude_m = match layout.alt {
                Some(_) => normalize_altitude(
                    value(layout.alt),
                    params.altitude_unit,
                    params.km_threshold,
                ),
                None => value(layout.z),
            };

            ProjectedPoint {
                source_index: i,
                time,
                latitude: position.latitude,
                longitude: position.longitude,
                altitude_m,
                ground_range_km: position.displacement_m / 1000.0,
                total_speed: total_speed(vx, vy, vz),
                flight_path_angle_deg: flight_path_angle_deg(vx, vy, vz),
                native_x: position.native_x,
                native_y: position.native_y,
            }
        })
        .collect();

    debug!(
        source = series.source(),
        input = series.len(),
        retained = points.len(),
        cadence = params.cadence,
        "系列を再サンプリングしました"
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameters::AltitudeUnit;
    use crate::math::geodesy::EARTH_RADIUS_M;
    use crate::models::geo_anchor::{AnchorPair, GeoAnchor};
    use crate::pipeline::parser::parse_legacy;
    use crate::pipeline::projector::project_series;

    fn equator_anchors() -> AnchorPair {
        AnchorPair::new(Some(GeoAnchor::new(0.0, 0.0)), Some(GeoAnchor::new(0.0, 1.0)))
    }

    fn run(text: &str, params: &PipelineParameters) -> Vec<ProjectedPoint> {
        let series = parse_legacy(text, "t").unwrap();
        let positions = project_series(&series, &equator_anchors(), EARTH_RADIUS_M).unwrap();
        resample(&series, &positions, params).unwrap()
    }

    #[test]
    fn test_select_indices_half_cadence() {
        let times: Vec<f64> = (0..20).map(|i| i as f64 * 0.25).collect();
        let kept = select_indices(&times, 0.5);
        assert_eq!(kept, (0..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_select_indices_irregular_spacing() {
        // 0.7 の次は 1.0 以上を待つ
        let times = [0.0, 0.2, 0.7, 0.9, 1.0, 2.3, 2.4, 2.6];
        assert_eq!(select_indices(&times, 0.5), vec![0, 2, 4, 5, 7]);
    }

    #[test]
    fn test_select_indices_decimal_steps() {
        let times: Vec<f64> = (0..=30).map(|i| i as f64 * 0.1).collect();
        let kept = select_indices(&times, 0.5);
        assert_eq!(kept, vec![0, 5, 10, 15, 20, 25, 30]);
    }

    #[test]
    fn test_resample_rebases_time() {
        let mut text = String::from("#time x y\n");
        for i in 0..40 {
            text.push_str(&format!("{} {} 0\n", 100.0 + i as f64 * 0.25, i * 10));
        }
        let points = run(&text, &PipelineParameters::default());
        assert_eq!(points.len(), 20);
        assert_eq!(points[0].time, 0.0);
        assert!(points.windows(2).all(|w| w[1].time >= w[0].time));
        assert!((points[1].time - 0.5).abs() < 1e-12);
        assert_eq!(points[1].source_index, 2);
    }

    #[test]
    fn test_resample_derived_quantities() {
        let text = "#time x y vx vy vz alt\n0 0 0 0 0 0 0\n0.5 3000 4000 30 40 50 100000\n";
        let points = run(text, &PipelineParameters::default());
        assert_eq!(points.len(), 2);
        assert!((points[1].ground_range_km - 5.0).abs() < 1e-12);
        assert!((points[1].total_speed - (30f64.powi(2) + 40f64.powi(2) + 50f64.powi(2)).sqrt()).abs() < 1e-12);
        assert!((points[1].flight_path_angle_deg - 45.0).abs() < 1e-9);
        assert_eq!(points[1].altitude_m, 100000.0);
        assert_eq!(points[0].flight_path_angle_deg, 0.0);
        assert_eq!(points[0].total_speed, 0.0);
    }

    #[test]
    fn test_resample_small_altitude_read_as_km() {
        let points = run("#time,x,y,alt\n0 0 0 0\n1 1000 0 5\n", &PipelineParameters::default());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].altitude_m, 0.0);
        assert_eq!(points[1].altitude_m, 5000.0);
        assert!(points[1].longitude > points[0].longitude);
        assert!((points[1].ground_range_km - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_resample_explicit_meters() {
        let params = PipelineParameters {
            altitude_unit: AltitudeUnit::Meters,
            ..PipelineParameters::default()
        };
        let points = run("#time alt\n0 5\n", &params);
        assert_eq!(points[0].altitude_m, 5.0);
    }

    #[test]
    fn test_resample_falls_back_to_z_for_altitude() {
        let points = run("#time x y z\n0 0 0 12000\n", &PipelineParameters::default());
        assert_eq!(points[0].altitude_m, 12000.0);
    }

    #[test]
    fn test_resample_low_z_stays_in_meters() {
        let points = run("#time x y z\n0 0 0 0\n0.5 100 0 1200\n", &PipelineParameters::default());
        assert_eq!(points[1].altitude_m, 1200.0);
    }

    #[test]
    fn test_resample_without_time_keeps_everything() {
        let points = run("#x y\n0 0\n1 0\n2 0\n3 0\n", &PipelineParameters::default());
        assert_eq!(points.len(), 4);
        assert_eq!(points[3].time, 3.0);
    }

    #[test]
    fn test_resample_rejects_bad_cadence() {
        let series = parse_legacy("#time x y\n0 0 0\n", "t").unwrap();
        let positions = project_series(&series, &equator_anchors(), EARTH_RADIUS_M).unwrap();
        let params = PipelineParameters {
            cadence: 0.0,
            ..PipelineParameters::default()
        };
        assert!(matches!(
            resample(&series, &positions, &params),
            Err(TrajectoryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_resample_rejects_mismatched_positions() {
        let series = parse_legacy("#time x y\n0 0 0\n1 1 1\n", "t").unwrap();
        let positions = project_series(&series, &equator_anchors(), EARTH_RADIUS_M).unwrap();
        assert!(matches!(
            resample(&series, &positions[..1], &PipelineParameters::default()),
            Err(TrajectoryError::InvalidParameter(_))
        ));
    }
}
