// src/config/parameters.rs

use serde::Deserialize;

use crate::math::geodesy::EARTH_RADIUS_M;

/// 高度列の単位
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AltitudeUnit {
    /// 閾値による推定 (既存テレメトリとの互換用)
    #[default]
    Auto,
    Meters,
    Kilometers,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineParameters {
    pub cadence: f64,              // 再サンプリング周期 (シミュレーション時間単位)
    pub earth_radius_m: f64,       // 投影に用いる球の半径 (m)
    pub altitude_unit: AltitudeUnit,
    pub km_threshold: f64,         // Auto 時に km とみなす上限値
}

impl Default for PipelineParameters {
    fn default() -> Self {
        Self {
            cadence: 0.5,
            earth_radius_m: EARTH_RADIUS_M,
            altitude_unit: AltitudeUnit::Auto,
            km_threshold: 5000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackParameters {
    pub tick_threshold_ms: f64, // 1インデックス進めるのに必要な (倍率適用後の) 経過時間 (ms)
    pub initial_rate: f64,      // 再生倍率の初期値
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self {
            tick_threshold_ms: 30.0,
            initial_rate: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_parameters_partial_yaml() {
        let params: PipelineParameters =
            serde_yaml::from_str("cadence: 1.0\naltitude_unit: meters\n").unwrap();
        assert_eq!(params.cadence, 1.0);
        assert_eq!(params.altitude_unit, AltitudeUnit::Meters);
        assert_eq!(params.km_threshold, 5000.0);
        assert_eq!(params.earth_radius_m, EARTH_RADIUS_M);
    }

    #[test]
    fn test_playback_parameters_defaults() {
        let params: PlaybackParameters = serde_yaml::from_str("{}").unwrap();
        assert_eq!(params, PlaybackParameters::default());
    }
}
