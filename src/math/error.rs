// src/math/error.rs

use std::fmt;

use thiserror::Error;

/// テレメトリ処理全体の結果型
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

/// テレメトリ本文の不正を表すエラー
///
/// 診断のため、空入力・列数不一致・数値でないトークンを区別する。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedTelemetry {
    #[error("テレメトリが空です (データ行がありません)")]
    EmptyInput,
    #[error("{line} 行目: 列数が一致しません (期待 {expected}, 実際 {found})")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("{line} 行目: 数値として解釈できないトークン '{token}'")]
    NonNumericToken { line: usize, token: String },
    #[error("{line} 行目: 時刻が逆行しています ({previous} -> {current})")]
    NonMonotonicTime {
        line: usize,
        previous: f64,
        current: f64,
    },
}

/// 投影に必要なアンカーの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRole {
    Launch,
    Target,
}

impl fmt::Display for AnchorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorRole::Launch => write!(f, "launch"),
            AnchorRole::Target => write!(f, "target"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TrajectoryError {
    #[error("テレメトリの形式が不正です: {0}")]
    Malformed(#[from] MalformedTelemetry),
    #[error("{0} 地点が設定されていません")]
    MissingAnchor(AnchorRole),
    #[error("系列が空です")]
    EmptySeries,
    #[error("パラメータが不正です: {0}")]
    InvalidParameter(String),
    #[error("I/O エラー: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML エラー: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// 範囲外シーク (クランプして継続するため、エラーとしては返さない)
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("シーク位置 {requested} は範囲外です (系列長 {len})")]
pub struct OutOfRangeSeek {
    pub requested: f64,
    pub len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_converts_into_trajectory_error() {
        let err: TrajectoryError = MalformedTelemetry::EmptyInput.into();
        assert!(matches!(
            err,
            TrajectoryError::Malformed(MalformedTelemetry::EmptyInput)
        ));
    }

    #[test]
    fn test_out_of_range_seek_is_error() {
        let err = OutOfRangeSeek {
            requested: 12.0,
            len: 4,
        };
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().contains("12"));
        assert!(boxed.to_string().contains("4"));
    }

    #[test]
    fn test_missing_anchor_message_names_role() {
        let err = TrajectoryError::MissingAnchor(AnchorRole::Target);
        assert!(err.to_string().contains("target"));
    }
}
