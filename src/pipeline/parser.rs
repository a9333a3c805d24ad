// src/pipeline/parser.rs

use tracing::debug;

use crate::math::error::MalformedTelemetry;
use crate::models::telemetry::{TelemetrySeries, DEFAULT_FIELDS};

/// コメント行とみなす記号
const COMMENT_MARKERS: [char; 2] = ['#', '%'];

/// カンマ・空白の連続で区切る
fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

fn is_comment(line: &str) -> bool {
    line.contains(&COMMENT_MARKERS[..])
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// 1行分のトークンを数値に変換する
///
/// # 引数
/// - `line_no`: 1始まりの行番号 (診断用)
/// - `line`: トリム済みの行
/// - `expected`: 列数
///
/// # 戻り値
/// - 値の並び。列数不一致または数値でないトークンがあればエラー
fn parse_row(line_no: usize, line: &str, expected: usize) -> Result<Vec<f64>, MalformedTelemetry> {
    let tokens: Vec<&str> = tokenize(line).collect();
    if tokens.len() != expected {
        return Err(MalformedTelemetry::FieldCountMismatch {
            line: line_no,
            expected,
            found: tokens.len(),
        });
    }

    tokens
        .into_iter()
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(MalformedTelemetry::NonNumericToken {
                line: line_no,
                token: token.to_string(),
            }),
        })
        .collect()
}

/// 旧形式のテキストテレメトリをパースする
///
/// 先頭の非空行が `#` で始まればヘッダーとして列名を読み取り、無ければ既定の列並びを仮定する。
/// 1行でも不正があれば全体を失敗とし、途中までの系列は返さない。
///
/// # 引数
/// - `text`: テレメトリ本文
/// - `source`: 系列の識別子
///
/// # 戻り値
/// - パース済みの系列
pub fn parse_legacy(text: &str, source: &str) -> Result<TelemetrySeries, MalformedTelemetry> {
    let mut fields: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let expected = match &fields {
            Some(f) => f.len(),
            None => {
                if line.starts_with('#') {
                    let names: Vec<String> = tokenize(line.trim_start_matches('#'))
                        .map(str::to_string)
                        .collect();
                    fields = Some(if names.is_empty() { default_fields() } else { names });
                    continue;
                }
                let f = default_fields();
                let len = f.len();
                fields = Some(f);
                len
            }
        };

        if is_comment(line) {
            continue;
        }

        rows.push((line_no, parse_row(line_no, line, expected)?));
    }

    let Some(fields) = fields else {
        return Err(MalformedTelemetry::EmptyInput);
    };

    let series = TelemetrySeries::from_rows(source, fields, rows)?;
    debug!(
        source,
        rows = series.len(),
        fields = series.fields().len(),
        "旧形式テレメトリをパースしました"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let text = "#time,x,y,alt\n0 0 0 0\n1 1000 0 5\n";
        let series = parse_legacy(text, "sample").unwrap();
        assert_eq!(series.fields(), &["time", "x", "y", "alt"]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.value(1, "x"), Some(1000.0));
        assert_eq!(series.value(1, "alt"), Some(5.0));
    }

    #[test]
    fn test_parse_without_header_uses_default_fields() {
        let text = "0 0 0 0 0 0 0 0\n0.5 1 2 3 4 5 6 7\n";
        let series = parse_legacy(text, "noheader").unwrap();
        assert_eq!(series.fields().len(), DEFAULT_FIELDS.len());
        assert_eq!(series.value(1, "vz"), Some(6.0));
        assert_eq!(series.value(1, "alt"), Some(7.0));
    }

    #[test]
    fn test_parse_mixed_separators_and_blank_lines() {
        let text = "\n   # time, x ,y\n\n0,\t1 , 2\n  1  3,4  \n\n";
        let series = parse_legacy(text, "mixed").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.samples()[1].values(), &[1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_parse_skips_comment_lines_after_header() {
        let text = "#time x\n0 1\n% stage 2\n1 2 # trailing note\n2 3\n";
        let series = parse_legacy(text, "comments").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.value(1, "time"), Some(2.0));
    }

    #[test]
    fn test_parse_many_rows_in_order() {
        let mut text = String::from("#time x y\n");
        for i in 0..100 {
            text.push_str(&format!("{} {} {}\n", i as f64 * 0.1, i * 2, i * 3));
        }
        let series = parse_legacy(&text, "many").unwrap();
        assert_eq!(series.len(), 100);
        for i in 0..100 {
            assert_eq!(series.value(i, "x"), Some((i * 2) as f64));
        }
    }

    #[test]
    fn test_parse_field_count_mismatch_is_fatal() {
        let text = "#time x y\n0 0 0\n1 1\n2 2 2\n";
        let err = parse_legacy(text, "bad").unwrap_err();
        assert_eq!(
            err,
            MalformedTelemetry::FieldCountMismatch {
                line: 3,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_parse_non_numeric_token() {
        let text = "#time x\n0 0\n1 abc\n";
        let err = parse_legacy(text, "bad").unwrap_err();
        assert_eq!(
            err,
            MalformedTelemetry::NonNumericToken {
                line: 3,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_nan_token() {
        let err = parse_legacy("#time x\n0 NaN\n", "bad").unwrap_err();
        assert!(matches!(err, MalformedTelemetry::NonNumericToken { .. }));
    }

    #[test]
    fn test_parse_empty_inputs() {
        assert_eq!(parse_legacy("", "e").unwrap_err(), MalformedTelemetry::EmptyInput);
        assert_eq!(parse_legacy("  \n\t\n", "e").unwrap_err(), MalformedTelemetry::EmptyInput);
        assert_eq!(
            parse_legacy("#time x\n\n", "e").unwrap_err(),
            MalformedTelemetry::EmptyInput
        );
    }

    #[test]
    fn test_empty_header_falls_back_to_defaults() {
        let text = "#\n0 0 0 0 0 0 0 0\n";
        let series = parse_legacy(text, "hash-only").unwrap();
        assert_eq!(series.fields().len(), DEFAULT_FIELDS.len());
    }
}
