// src/models/telemetry.rs

use crate::math::error::MalformedTelemetry;

/// ヘッダー行が無い場合に仮定する列の並び
pub const DEFAULT_FIELDS: [&str; 8] = ["time", "x", "y", "z", "vx", "vy", "vz", "alt"];

/// テレメトリの1サンプル (系列の列名と同じ順に値を保持する)
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    values: Vec<f64>,
}

impl TelemetrySample {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// よく使う列の位置 (存在しない列は None)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldLayout {
    pub time: Option<usize>,
    pub x: Option<usize>,
    pub y: Option<usize>,
    pub z: Option<usize>,
    pub vx: Option<usize>,
    pub vy: Option<usize>,
    pub vz: Option<usize>,
    pub alt: Option<usize>,
}

/// パース済みのテレメトリ系列
///
/// 生成後は不変。全サンプルが同じ列を持ち、`time` 列があれば単調非減少であることを保証する。
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySeries {
    source: String,
    fields: Vec<String>,
    samples: Vec<TelemetrySample>,
}

impl TelemetrySeries {
    /// 行データから系列を組み立てる
    ///
    /// # 引数
    /// - `source`: ファイル名や実行IDなどの識別子
    /// - `fields`: 列名
    /// - `rows`: (元の行番号, 値) の並び
    ///
    /// # 戻り値
    /// - 系列。列数不一致・時刻逆行・データ行なしの場合はエラー
    pub fn from_rows(
        source: impl Into<String>,
        fields: Vec<String>,
        rows: Vec<(usize, Vec<f64>)>,
    ) -> Result<Self, MalformedTelemetry> {
        if rows.is_empty() || fields.is_empty() {
            return Err(MalformedTelemetry::EmptyInput);
        }

        let time_column = fields.iter().position(|f| f == "time");
        let mut previous_time: Option<f64> = None;
        let mut samples = Vec::with_capacity(rows.len());

        for (line, values) in rows {
            if values.len() != fields.len() {
                return Err(MalformedTelemetry::FieldCountMismatch {
                    line,
                    expected: fields.len(),
                    found: values.len(),
                });
            }
            if let Some(column) = time_column {
                let current = values[column];
                if let Some(previous) = previous_time {
                    if current < previous {
                        return Err(MalformedTelemetry::NonMonotonicTime {
                            line,
                            previous,
                            current,
                        });
                    }
                }
                previous_time = Some(current);
            }
            samples.push(TelemetrySample::new(values));
        }

        Ok(Self {
            source: source.into(),
            fields,
            samples,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// `index` 番目のサンプルの `name` 列の値
    pub fn value(&self, index: usize, name: &str) -> Option<f64> {
        let column = self.field_index(name)?;
        self.samples.get(index)?.get(column)
    }

    pub fn layout(&self) -> FieldLayout {
        FieldLayout {
            time: self.field_index("time"),
            x: self.field_index("x"),
            y: self.field_index("y"),
            z: self.field_index("z"),
            vx: self.field_index("vx"),
            vy: self.field_index("vy"),
            vz: self.field_index("vz"),
            alt: self.field_index("alt"),
        }
    }
}
