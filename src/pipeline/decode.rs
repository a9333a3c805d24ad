// src/pipeline/decode.rs

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::math::error::MalformedTelemetry;
use crate::models::telemetry::TelemetrySeries;
use crate::pipeline::parser::parse_legacy;

/// 構造化テレメトリ (JSON) の形
#[derive(Debug, Deserialize)]
struct StructuredTelemetry {
    #[serde(default)]
    source: Option<String>,
    fields: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// 構造化デコードの失敗
#[derive(Debug, Error)]
pub enum StructuredDecodeError {
    /// JSON として読めない、または形が違う
    #[error("構造化テレメトリとして読めません: {0}")]
    Syntax(#[source] serde_json::Error),
    /// 読めたが中身が不正
    #[error(transparent)]
    Malformed(#[from] MalformedTelemetry),
}

/// JSON 形式のテレメトリをデコードする
///
/// 形式: `{"source": "...", "fields": ["time", ...], "rows": [[...], ...]}` (`source` は省略可)
///
/// # 引数
/// - `text`: JSON 本文
/// - `source`: 本文に `source` が無い場合の識別子
pub fn decode_structured(
    text: &str,
    source: &str,
) -> Result<TelemetrySeries, StructuredDecodeError> {
    let doc: StructuredTelemetry =
        serde_json::from_str(text).map_err(StructuredDecodeError::Syntax)?;
    let source = doc.source.unwrap_or_else(|| source.to_string());
    let rows = doc
        .rows
        .into_iter()
        .enumerate()
        .map(|(i, values)| (i + 1, values))
        .collect();
    TelemetrySeries::from_rows(source, doc.fields, rows).map_err(StructuredDecodeError::Malformed)
}

/// 構造化デコードを試し、JSON として読めない場合のみ旧形式パーサを用いる
///
/// JSON として読めたが中身が不正な場合は、その診断をそのまま返す。
pub fn decode_telemetry(text: &str, source: &str) -> Result<TelemetrySeries, MalformedTelemetry> {
    match decode_structured(text, source) {
        Ok(series) => Ok(series),
        Err(StructuredDecodeError::Malformed(err)) => Err(err),
        Err(StructuredDecodeError::Syntax(err)) => {
            debug!(source, error = %err, "構造化デコードに失敗したため旧形式で再試行します");
            parse_legacy(text, source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_structured_json() {
        let json = r#"{"source": "run-7", "fields": ["time", "x"], "rows": [[0, 0], [0.5, 10.0]]}"#;
        let series = decode_structured(json, "fallback").unwrap();
        assert_eq!(series.source(), "run-7");
        assert_eq!(series.value(1, "x"), Some(10.0));
    }

    #[test]
    fn test_decode_structured_rejects_text() {
        let err = decode_structured("#time x\n0 0\n", "f").unwrap_err();
        assert!(matches!(err, StructuredDecodeError::Syntax(_)));
    }

    #[test]
    fn test_decode_structured_reports_bad_row() {
        let json = r#"{"fields": ["time", "x"], "rows": [[0, 0], [1]]}"#;
        let err = decode_structured(json, "f").unwrap_err();
        assert!(matches!(
            err,
            StructuredDecodeError::Malformed(MalformedTelemetry::FieldCountMismatch { line: 2, .. })
        ));
    }

    #[test]
    fn test_decode_telemetry_prefers_structured() {
        let json = r#"{"fields": ["time"], "rows": [[0], [1]]}"#;
        let series = decode_telemetry(json, "json-file").unwrap();
        assert_eq!(series.source(), "json-file");
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_decode_telemetry_falls_back_to_legacy() {
        let series = decode_telemetry("#time,x,y,alt\n0 0 0 0\n1 1000 0 5\n", "legacy").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_decode_telemetry_keeps_structured_diagnosis() {
        let json = r#"{"fields":["time","x"],"rows":[[1,0],[0,5]]}"#;
        let err = decode_telemetry(json, "reversed").unwrap_err();
        assert!(matches!(
            err,
            MalformedTelemetry::NonMonotonicTime { line: 2, .. }
        ));
    }

    #[test]
    fn test_structured_decode_error_messages() {
        let syntax = decode_structured("not json", "f").unwrap_err();
        assert!(std::error::Error::source(&syntax).is_some());
        let malformed: StructuredDecodeError = MalformedTelemetry::EmptyInput.into();
        assert_eq!(malformed.to_string(), MalformedTelemetry::EmptyInput.to_string());
    }

    #[test]
    fn test_decode_telemetry_returns_legacy_error() {
        let err = decode_telemetry("#time x\n0\n", "broken").unwrap_err();
        assert!(matches!(err, MalformedTelemetry::FieldCountMismatch { .. }));
    }
}
