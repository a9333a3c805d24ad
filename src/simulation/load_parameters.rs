// src/simulation/load_parameters.rs

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::{parameters::PipelineParameters, parameters::PlaybackParameters, scenario::Scenario};
use crate::math::error::TrajectoryResult;
use crate::models::telemetry::TelemetrySeries;
use crate::pipeline::decode::decode_telemetry;

/// YAML ファイルを読み込む共通関数
pub fn parse_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> TrajectoryResult<T> {
    let contents = fs::read_to_string(path)?;
    let data: T = serde_yaml::from_str(&contents)?;
    Ok(data)
}

/// 投影・再サンプリングパラメータの読み込み
pub fn load_pipeline_parameters(path: impl AsRef<Path>) -> TrajectoryResult<PipelineParameters> {
    parse_yaml(path)
}

/// 再生パラメータの読み込み
pub fn load_playback_parameters(path: impl AsRef<Path>) -> TrajectoryResult<PlaybackParameters> {
    parse_yaml(path)
}

/// シナリオの読み込み
pub fn load_scenario(path: impl AsRef<Path>) -> TrajectoryResult<Scenario> {
    parse_yaml(path)
}

/// テレメトリファイルの読み込み
///
/// # 引数
/// - `path`: テレメトリファイル (JSON または旧形式テキスト)
/// - `source`: 系列の識別子。None ならファイル名を用いる
pub fn load_telemetry(path: impl AsRef<Path>, source: Option<&str>) -> TrajectoryResult<TelemetrySeries> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let fallback = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let series = decode_telemetry(&text, source.unwrap_or(&fallback))?;
    Ok(series)
}
