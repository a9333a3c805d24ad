// src/simulation/csv.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::math::error::TrajectoryResult;
use crate::models::projected_point::ProjectedPoint;

/// CSVヘッダーの書き込み
pub fn write_csv_header<W: Write>(writer: &mut W) -> Result<(), std::io::Error> {
    writer.write_all(
        b"time(s),lat(deg),lon(deg),alt(m),range(km),speed,gamma(deg),source_index\n",
    )
}

/// CSV行の作成
pub fn create_csv_row(point: &ProjectedPoint) -> String {
    format!(
        "{:.3},{:.6},{:.6},{:.1},{:.3},{:.3},{:.3},{}\n",
        point.time,
        point.latitude,
        point.longitude,
        point.altitude_m,
        point.ground_range_km,
        point.total_speed,
        point.flight_path_angle_deg,
        point.source_index
    )
}

/// 点列を CSV として書き出す
pub fn write_points<W: Write>(writer: &mut W, points: &[ProjectedPoint]) -> Result<(), std::io::Error> {
    write_csv_header(writer)?;
    for point in points {
        writer.write_all(create_csv_row(point).as_bytes())?;
    }
    writer.flush()
}

/// 点列を CSV ファイルに書き出す (親ディレクトリが無ければ作る)
pub fn export_points_csv(path: impl AsRef<Path>, points: &[ProjectedPoint]) -> TrajectoryResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_points(&mut writer, points)?;
    Ok(())
}
