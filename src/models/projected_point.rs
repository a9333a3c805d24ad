// src/models/projected_point.rs

use serde::Serialize;

/// 投影直後の位置 (入力サンプルと1対1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub displacement_m: f64, // 先頭サンプルからの平面変位 (m)
    pub native_x: f64,       // 診断用
    pub native_y: f64,       // 診断用
}

/// 描画側へ渡す最終的な点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub source_index: usize, // 元系列でのインデックス
    pub time: f64,           // 先頭を 0 とした時刻
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub ground_range_km: f64,
    pub total_speed: f64,
    pub flight_path_angle_deg: f64,
    pub native_x: f64,
    pub native_y: f64,
}
