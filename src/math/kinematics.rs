// src/math/kinematics.rs

use crate::config::parameters::AltitudeUnit;

/// 速度ベクトルの大きさを計算する純粋関数
pub fn total_speed(vx: f64, vy: f64, vz: f64) -> f64 {
    (vx.powi(2) + vy.powi(2) + vz.powi(2)).sqrt()
}

/// 経路角 (速度ベクトルと局所水平面のなす角) を計算する純粋関数
///
/// # 引数
/// - `vx`, `vy`: 水平速度成分
/// - `vz`: 鉛直速度成分
///
/// # 戻り値
/// - 経路角 (度)。水平・鉛直成分がともにゼロの場合は 0
pub fn flight_path_angle_deg(vx: f64, vy: f64, vz: f64) -> f64 {
    let horizontal = (vx.powi(2) + vy.powi(2)).sqrt();
    if horizontal == 0.0 && vz == 0.0 {
        return 0.0;
    }
    vz.atan2(horizontal).to_degrees()
}

/// 平面上の変位の大きさ (m)
pub fn planar_displacement(x: f64, y: f64, x0: f64, y0: f64) -> f64 {
    let dx = x - x0;
    let dy = y - y0;
    (dx.powi(2) + dy.powi(2)).sqrt()
}

/// 生の高度値をメートルに換算する純粋関数
///
/// # 引数
/// - `raw`: テレメトリ上の高度値
/// - `unit`: 高度の単位。`Auto` の場合は閾値による推定
/// - `km_threshold`: `Auto` 時、正かつこの値未満ならキロメートルとみなす
///
/// # 戻り値
/// - 高度 (m)
pub fn normalize_altitude(raw: f64, unit: AltitudeUnit, km_threshold: f64) -> f64 {
    match unit {
        AltitudeUnit::Meters => raw,
        AltitudeUnit::Kilometers => raw * 1000.0,
        AltitudeUnit::Auto => {
            if raw > 0.0 && raw < km_threshold {
                raw * 1000.0
            } else {
                raw
            }
        }
    }
}
